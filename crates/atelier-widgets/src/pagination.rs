#![forbid(unsafe_code)]

//! Page navigation state and the pager strip.
//!
//! Pages are 1-based. Changing the page size keeps the first visible
//! record visible: the new page is the one containing the old page's
//! first record index.

use atelier_core::geometry::Rect;
use atelier_render::{Frame, HitId, HitRegion};
use atelier_style::{Style, theme};
use unicode_width::UnicodeWidthStr;

use crate::{StatefulWidget, draw_text_span};

/// Hit region for the previous-page control.
pub const PAGER_HIT_PREV: HitRegion = HitRegion::Custom(30);
/// Hit region for the next-page control.
pub const PAGER_HIT_NEXT: HitRegion = HitRegion::Custom(31);
/// Hit region for the page-size cycler; hit data is the new size.
pub const PAGER_HIT_SIZE: HitRegion = HitRegion::Custom(32);

pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// 1-based pagination over a server-reported total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current: usize,
    page_size: usize,
    total: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl PaginationState {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Pages needed for the current total; at least 1.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// 1-based index of the first record on the current page.
    #[must_use]
    pub fn start_index(&self) -> usize {
        (self.current - 1) * self.page_size + 1
    }

    /// 1-based index of the last record on the current page.
    #[must_use]
    pub fn end_index(&self) -> usize {
        (self.start_index() + self.page_size - 1).min(self.total)
    }

    /// Update the server-reported total, clamping the current page into
    /// range (a delete can empty the last page).
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current = self.current.min(self.page_count());
    }

    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.go_to(self.current + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.current.saturating_sub(1).max(1));
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    /// Change the page size, moving to the page that contains the record
    /// at the old page's start index.
    pub fn set_page_size(&mut self, new_size: usize) {
        let new_size = new_size.max(1);
        if new_size == self.page_size {
            return;
        }
        let start = self.start_index();
        self.page_size = new_size;
        self.current = start.div_ceil(new_size).min(self.page_count());
    }

    /// The next entry in [`PAGE_SIZES`] after the current one, wrapping.
    #[must_use]
    pub fn next_size_option(&self) -> usize {
        match PAGE_SIZES.iter().position(|size| *size == self.page_size) {
            Some(pos) => PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()],
            None => PAGE_SIZES[0],
        }
    }
}

/// One-line pager: `‹ Prev  11-20 of 143  Next ›  [25/page]`.
#[derive(Debug, Clone)]
pub struct Paginator {
    hit_id: HitId,
    style: Style,
}

impl Paginator {
    #[must_use]
    pub fn new(hit_id: HitId) -> Self {
        Self {
            hit_id,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for Paginator {
    type State = PaginationState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let y = area.y;
        let mut x = area.x;

        let prev_style = if state.has_prev() {
            self.style
        } else {
            self.style.patch(theme::placeholder())
        };
        let prev = "\u{2039} Prev";
        let after = draw_text_span(frame, x, y, prev, prev_style, area.right());
        if state.has_prev() {
            frame.register_hit(
                Rect::new(x, y, after - x, 1),
                self.hit_id,
                PAGER_HIT_PREV,
                0,
            );
        }
        x = after + 2;

        let range = if state.total() == 0 {
            String::from("0 of 0")
        } else {
            format!(
                "{}-{} of {}",
                state.start_index(),
                state.end_index(),
                state.total()
            )
        };
        x = draw_text_span(frame, x, y, &range, self.style, area.right()) + 2;

        let next_style = if state.has_next() {
            self.style
        } else {
            self.style.patch(theme::placeholder())
        };
        let next = "Next \u{203A}";
        let after = draw_text_span(frame, x, y, next, next_style, area.right());
        if state.has_next() {
            frame.register_hit(
                Rect::new(x, y, after - x, 1),
                self.hit_id,
                PAGER_HIT_NEXT,
                0,
            );
        }

        let size_label = format!("[{}/page]", state.page_size());
        let size_width = UnicodeWidthStr::width(size_label.as_str()) as u16;
        if area.width > size_width {
            let size_x = area.right() - size_width;
            draw_text_span(frame, size_x, y, &size_label, self.style, area.right());
            frame.register_hit(
                Rect::new(size_x, y, size_width, 1),
                self.hit_id,
                PAGER_HIT_SIZE,
                state.next_size_option() as u32,
            );
        }
    }
}
