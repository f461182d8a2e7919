#![forbid(unsafe_code)]

//! Terminal cell and packed color representation.

use bitflags::bitflags;

/// A color packed as `0xRRGGBBAA`.
///
/// Alpha `0` means "terminal default" and is the value of
/// [`PackedRgba::TRANSPARENT`]; the presenter emits no color sequence for
/// it. Partial alpha is carried through so overlay tints can scale their
/// intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// The terminal's default color.
    pub const TRANSPARENT: Self = Self(0);

    /// Fully opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether this is the terminal default.
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// Scale the alpha channel by `opacity` in `[0.0, 1.0]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = (self.a() as f32 * opacity).round() as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }
}

bitflags! {
    /// Text attribute bits carried by a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD = 0b0000_0001;
        const DIM = 0b0000_0010;
        const ITALIC = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE = 0b0001_0000;
        const STRIKETHROUGH = 0b0010_0000;
    }
}

/// One terminal cell: a character plus resolved colors and attributes.
///
/// Wide characters occupy their origin cell; the drawing routines blank the
/// follower cell so diffs and hit tests stay per-column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }
}

impl Cell {
    /// A cell holding `ch` with default colors.
    pub fn from_char(ch: char) -> Self {
        Self {
            ch,
            ..Self::default()
        }
    }

    /// Whether this cell is a blank with no color or attributes.
    pub fn is_empty(&self) -> bool {
        self.ch == ' '
            && self.fg.is_transparent()
            && self.bg.is_transparent()
            && self.attrs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_rgba_components_round_trip() {
        let c = PackedRgba::rgba(12, 34, 56, 78);
        assert_eq!(c.r(), 12);
        assert_eq!(c.g(), 34);
        assert_eq!(c.b(), 56);
        assert_eq!(c.a(), 78);
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(PackedRgba::rgb(1, 2, 3).a(), 255);
    }

    #[test]
    fn with_opacity_scales_alpha() {
        let c = PackedRgba::rgb(10, 20, 30).with_opacity(0.5);
        assert_eq!(c.a(), 128);
        assert_eq!(c.r(), 10);
    }

    #[test]
    fn with_opacity_clamps() {
        assert_eq!(PackedRgba::rgb(0, 0, 0).with_opacity(2.0).a(), 255);
        assert_eq!(PackedRgba::rgb(0, 0, 0).with_opacity(-1.0).a(), 0);
    }

    #[test]
    fn default_cell_is_empty() {
        assert!(Cell::default().is_empty());
        assert!(!Cell::from_char('x').is_empty());
    }
}
