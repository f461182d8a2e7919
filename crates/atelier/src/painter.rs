#![forbid(unsafe_code)]

//! Frame presenter.
//!
//! Diffs each rendered frame against the previously painted buffer and
//! emits crossterm commands for the changed cells only. A size change
//! discards the previous buffer and repaints the whole screen.
//!
//! The pen tracks the last emitted colors and attributes so runs of
//! same-styled cells cost one escape sequence, and the cursor position
//! is only re-sent when a changed cell is not adjacent to the last one.

use std::io::{self, Write};

use atelier_render::{Buffer, Cell, Frame, PackedRgba, StyleFlags};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use unicode_width::UnicodeWidthChar;

pub struct Painter<W: Write> {
    out: W,
    previous: Buffer,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Buffer::new(0, 0),
        }
    }

    /// Write the difference between `frame` and the last painted frame.
    pub fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let buffer = &frame.buffer;
        let full = self.previous.width() != buffer.width()
            || self.previous.height() != buffer.height();

        let mut pen = Pen::default();
        let mut next: Option<(u16, u16)> = None;

        for y in 0..buffer.height() {
            let mut skip_follower = false;
            for x in 0..buffer.width() {
                if skip_follower {
                    skip_follower = false;
                    continue;
                }
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if !full && self.previous.get(x, y) == Some(cell) {
                    continue;
                }
                if next != Some((x, y)) {
                    queue!(self.out, MoveTo(x, y))?;
                }
                pen.apply(&mut self.out, cell)?;
                queue!(self.out, Print(cell.ch))?;
                let width = cell.ch.width().unwrap_or(1).max(1) as u16;
                // A wide glyph covers its blanked follower cell.
                skip_follower = width == 2;
                next = Some((x + width, y));
            }
        }

        match frame.cursor() {
            Some((x, y)) => queue!(self.out, MoveTo(x, y), Show)?,
            None => queue!(self.out, Hide)?,
        }
        self.out.flush()?;
        self.previous = buffer.clone();
        Ok(())
    }
}

/// Last emitted style, so unchanged runs emit no escapes.
#[derive(Default)]
struct Pen {
    current: Option<(PackedRgba, PackedRgba, StyleFlags)>,
}

impl Pen {
    fn apply<W: Write>(&mut self, out: &mut W, cell: &Cell) -> io::Result<()> {
        let wanted = (cell.fg, cell.bg, cell.attrs);
        if self.current == Some(wanted) {
            return Ok(());
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        for (flag, attr) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
            (StyleFlags::STRIKETHROUGH, Attribute::CrossedOut),
        ] {
            if cell.attrs.contains(flag) {
                queue!(out, SetAttribute(attr))?;
            }
        }
        if !cell.fg.is_transparent() {
            queue!(out, SetForegroundColor(to_color(cell.fg)))?;
        }
        if !cell.bg.is_transparent() {
            queue!(out, SetBackgroundColor(to_color(cell.bg)))?;
        }
        self.current = Some(wanted);
        Ok(())
    }
}

fn to_color(color: PackedRgba) -> Color {
    Color::Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}
