#![forbid(unsafe_code)]

//! Transient notifications stacked in the top-right corner.
//!
//! The event loop owns a [`ToastCenter`], pushes entries on mutation
//! results, and calls [`ToastCenter::prune`] every tick. Toasts expire
//! after five seconds; there is no manual dismissal.

use atelier_core::geometry::Rect;
use atelier_render::Frame;
use atelier_style::{Style, theme};
use unicode_width::UnicodeWidthStr;
use web_time::{Duration, Instant};

use crate::{Widget, draw_text_span, set_style_area};

pub const TOAST_TTL: Duration = Duration::from_secs(5);
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn accent(self) -> Style {
        match self {
            Self::Success => theme::toast_success(),
            Self::Error => theme::toast_error(),
            Self::Info => Style::new().fg(theme::PRIMARY).bold(),
        }
    }

    fn glyph(self) -> char {
        match self {
            Self::Success => '✓',
            Self::Error => '✗',
            Self::Info => 'ℹ',
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
}

/// Queue of live toasts, newest last.
#[derive(Debug, Clone, Default)]
pub struct ToastCenter {
    toasts: Vec<Toast>,
}

impl ToastCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(message, ToastKind::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.push(message, ToastKind::Error, now);
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.push(message, ToastKind::Info, now);
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toasts.push(Toast {
            message: message.into(),
            kind,
            created: now,
        });
    }

    /// Drop expired toasts. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts
            .retain(|toast| now.duration_since(toast.created) < TOAST_TTL);
        self.toasts.len() != before
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

impl Widget for ToastCenter {
    /// `area` is the whole screen; toasts paint over whatever is there.
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() || self.toasts.is_empty() {
            return;
        }

        let visible = self.toasts.iter().rev().take(MAX_VISIBLE).rev();
        let mut y = area.y;
        for toast in visible {
            if y >= area.bottom() {
                break;
            }
            let body = format!(" {} {} ", toast.kind.glyph(), toast.message);
            let width = (UnicodeWidthStr::width(body.as_str()) as u16).min(area.width);
            let x = area.right().saturating_sub(width + 1);
            let row = Rect::new(x, y, width, 1);
            set_style_area(
                &mut frame.buffer,
                row,
                Style::new().bg(theme::SURFACE),
            );
            draw_text_span(frame, x, y, &body, toast.kind.accent(), row.right());
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_drops_expired() {
        let mut center = ToastCenter::new();
        let start = Instant::now();
        center.success("saved", start);
        center.error("failed", start + Duration::from_secs(3));

        assert!(!center.prune(start + Duration::from_secs(4)));
        assert_eq!(center.len(), 2);

        assert!(center.prune(start + Duration::from_secs(5)));
        assert_eq!(center.len(), 1);
        assert_eq!(center.iter().next().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn renders_top_right() {
        let mut center = ToastCenter::new();
        center.success("ok", Instant::now());
        let mut frame = Frame::new(20, 5);
        center.render(Rect::new(0, 0, 20, 5), &mut frame);

        // " ✓ ok " is 6 columns wide, right-aligned with a 1-col margin.
        assert_eq!(frame.buffer.get(14, 0).unwrap().ch, '✓');
        assert!(frame.buffer.get(0, 0).unwrap().is_empty());
    }

    #[test]
    fn stacks_newest_below() {
        let mut center = ToastCenter::new();
        let now = Instant::now();
        center.success("first", now);
        center.error("second", now);
        let mut frame = Frame::new(30, 5);
        center.render(Rect::new(0, 0, 30, 5), &mut frame);

        let row0: String = (0..30)
            .map(|x| frame.buffer.get(x, 0).unwrap().ch)
            .collect();
        let row1: String = (0..30)
            .map(|x| frame.buffer.get(x, 1).unwrap().ch)
            .collect();
        assert!(row0.contains("first"));
        assert!(row1.contains("second"));
    }

    #[test]
    fn caps_visible_toasts() {
        let mut center = ToastCenter::new();
        let now = Instant::now();
        for i in 0..6 {
            center.info(format!("toast {i}"), now);
        }
        let mut frame = Frame::new(30, 10);
        center.render(Rect::new(0, 0, 30, 10), &mut frame);

        let row0: String = (0..30)
            .map(|x| frame.buffer.get(x, 0).unwrap().ch)
            .collect();
        assert!(row0.contains("toast 2"));
        let row4: String = (0..30)
            .map(|x| frame.buffer.get(x, 4).unwrap().ch)
            .collect();
        assert!(!row4.contains("toast"));
    }
}
