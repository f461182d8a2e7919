#![forbid(unsafe_code)]

//! Bordered container with an optional title.

use atelier_core::geometry::Rect;
use atelier_render::Frame;
use atelier_style::Style;
use unicode_width::UnicodeWidthStr;

use crate::borders::{BorderChars, Borders};
use crate::{Widget, apply_style, draw_text_span, set_style_area};

/// Horizontal placement of a title within the top border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A bordered box. Pages draw one of these and then render content into
/// [`Block::inner`].
#[derive(Debug, Clone, Default)]
pub struct Block<'a> {
    borders: Borders,
    border_chars: BorderChars,
    border_style: Style,
    title: Option<&'a str>,
    title_alignment: Alignment,
    title_style: Style,
    style: Style,
}

impl<'a> Block<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which borders to draw.
    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn border_chars(mut self, chars: BorderChars) -> Self {
        self.border_chars = chars;
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn title_alignment(mut self, alignment: Alignment) -> Self {
        self.title_alignment = alignment;
        self
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Background style applied to the whole area before borders.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Compute the area inside the borders.
    pub fn inner(&self, area: Rect) -> Rect {
        let mut inner = area;

        if self.borders.contains(Borders::LEFT) {
            inner.x = inner.x.saturating_add(1);
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::TOP) {
            inner.y = inner.y.saturating_add(1);
            inner.height = inner.height.saturating_sub(1);
        }
        if self.borders.contains(Borders::RIGHT) {
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::BOTTOM) {
            inner.height = inner.height.saturating_sub(1);
        }

        inner
    }

    fn set_border(&self, frame: &mut Frame, x: u16, y: u16, c: char) {
        let mut cell = atelier_render::Cell::from_char(c);
        apply_style(&mut cell, self.border_style);
        frame.buffer.set(x, y, cell);
    }

    fn render_title(&self, area: Rect, frame: &mut Frame) {
        let Some(title) = self.title else {
            return;
        };
        if !self.borders.contains(Borders::TOP) || area.width < 4 {
            return;
        }

        let avail = area.width.saturating_sub(4);
        let title_width = (UnicodeWidthStr::width(title) as u16).min(avail);
        let x = match self.title_alignment {
            Alignment::Left => area.x + 2,
            Alignment::Center => area.x + (area.width.saturating_sub(title_width)) / 2,
            Alignment::Right => area.right().saturating_sub(2 + title_width),
        };
        draw_text_span(
            frame,
            x,
            area.y,
            title,
            self.border_style.patch(self.title_style),
            x + title_width,
        );
    }
}

impl Widget for Block<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }

        set_style_area(&mut frame.buffer, area, self.style);

        let chars = self.border_chars;
        if self.borders.contains(Borders::TOP) {
            for x in area.x..area.right() {
                self.set_border(frame, x, area.y, chars.horizontal);
            }
        }
        if self.borders.contains(Borders::BOTTOM) {
            for x in area.x..area.right() {
                self.set_border(frame, x, area.bottom() - 1, chars.horizontal);
            }
        }
        if self.borders.contains(Borders::LEFT) {
            for y in area.y..area.bottom() {
                self.set_border(frame, area.x, y, chars.vertical);
            }
        }
        if self.borders.contains(Borders::RIGHT) {
            for y in area.y..area.bottom() {
                self.set_border(frame, area.right() - 1, y, chars.vertical);
            }
        }

        if self.borders.contains(Borders::TOP) && self.borders.contains(Borders::LEFT) {
            self.set_border(frame, area.x, area.y, chars.top_left);
        }
        if self.borders.contains(Borders::TOP) && self.borders.contains(Borders::RIGHT) {
            self.set_border(frame, area.right() - 1, area.y, chars.top_right);
        }
        if self.borders.contains(Borders::BOTTOM) && self.borders.contains(Borders::LEFT) {
            self.set_border(frame, area.x, area.bottom() - 1, chars.bottom_left);
        }
        if self.borders.contains(Borders::BOTTOM) && self.borders.contains(Borders::RIGHT) {
            self.set_border(frame, area.right() - 1, area.bottom() - 1, chars.bottom_right);
        }

        self.render_title(area, frame);
    }
}
