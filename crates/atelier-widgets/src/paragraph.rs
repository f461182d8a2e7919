#![forbid(unsafe_code)]

//! Plain text with optional word wrap.

use atelier_core::geometry::Rect;
use atelier_render::Frame;
use atelier_style::Style;
use unicode_width::UnicodeWidthStr;

use crate::block::Alignment;
use crate::{Widget, draw_text_span};

/// Multi-line text widget. Lines past the bottom of the area are dropped.
#[derive(Debug, Clone, Default)]
pub struct Paragraph<'a> {
    text: &'a str,
    style: Style,
    alignment: Alignment,
    wrap: bool,
}

impl<'a> Paragraph<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
            alignment: Alignment::Left,
            wrap: false,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Wrap at word boundaries instead of clipping.
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    fn lines(&self, width: u16) -> Vec<String> {
        if !self.wrap {
            return self.text.lines().map(str::to_owned).collect();
        }
        let mut out = Vec::new();
        for line in self.text.lines() {
            out.extend(wrap_line(line, width as usize));
        }
        out
    }

    /// Number of rows this paragraph occupies at the given width.
    pub fn line_count(&self, width: u16) -> u16 {
        self.lines(width).len() as u16
    }
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    if UnicodeWidthStr::width(line) <= width {
        return vec![line.to_owned()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in line.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

impl Widget for Paragraph<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        for (i, line) in self.lines(area.width).iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.bottom() {
                break;
            }
            let line_width = (UnicodeWidthStr::width(line.as_str()) as u16).min(area.width);
            let x = match self.alignment {
                Alignment::Left => area.x,
                Alignment::Center => area.x + (area.width - line_width) / 2,
                Alignment::Right => area.right() - line_width,
            };
            draw_text_span(frame, x, y, line, self.style, area.right());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_lines() {
        let mut frame = Frame::new(10, 3);
        Paragraph::new("ab\ncd").render(Rect::new(0, 0, 10, 3), &mut frame);
        assert_eq!(frame.buffer.get(0, 0).unwrap().ch, 'a');
        assert_eq!(frame.buffer.get(0, 1).unwrap().ch, 'c');
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_line("one two three", 7);
        assert_eq!(lines, vec!["one two", "three"]);
    }

    #[test]
    fn long_word_stays_on_own_line() {
        let lines = wrap_line("a verylongword b", 6);
        assert_eq!(lines, vec!["a", "verylongword", "b"]);
    }

    #[test]
    fn drops_lines_past_bottom() {
        let mut frame = Frame::new(10, 1);
        Paragraph::new("ab\ncd").render(Rect::new(0, 0, 10, 1), &mut frame);
        assert_eq!(frame.buffer.get(0, 0).unwrap().ch, 'a');
    }

    #[test]
    fn centered_line() {
        let mut frame = Frame::new(10, 1);
        Paragraph::new("ab")
            .alignment(Alignment::Center)
            .render(Rect::new(0, 0, 10, 1), &mut frame);
        assert_eq!(frame.buffer.get(4, 0).unwrap().ch, 'a');
    }

    #[test]
    fn line_count_reflects_wrap() {
        let p = Paragraph::new("one two three").wrap(true);
        assert_eq!(p.line_count(7), 2);
    }
}
