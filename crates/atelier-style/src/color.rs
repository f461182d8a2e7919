#![forbid(unsafe_code)]

//! Color profiles and downgrade logic.
//!
//! The renderer works in RGBA throughout; downgrading to the terminal's
//! actual capability happens once, at presentation. Results are cached per
//! packed color value and the cache is invalidated when the profile changes.

use std::collections::HashMap;

use atelier_render::PackedRgba;

/// What the terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorProfile {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonoColor {
    Black,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ansi16Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Ansi16Color {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::BrightBlack => 8,
            Self::BrightRed => 9,
            Self::BrightGreen => 10,
            Self::BrightYellow => 11,
            Self::BrightBlue => 12,
            Self::BrightMagenta => 13,
            Self::BrightCyan => 14,
            Self::BrightWhite => 15,
        }
    }

    /// Reference RGB for distance matching (xterm defaults).
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Black => (0, 0, 0),
            Self::Red => (205, 0, 0),
            Self::Green => (0, 205, 0),
            Self::Yellow => (205, 205, 0),
            Self::Blue => (0, 0, 238),
            Self::Magenta => (205, 0, 205),
            Self::Cyan => (0, 205, 205),
            Self::White => (229, 229, 229),
            Self::BrightBlack => (127, 127, 127),
            Self::BrightRed => (255, 0, 0),
            Self::BrightGreen => (0, 255, 0),
            Self::BrightYellow => (255, 255, 0),
            Self::BrightBlue => (92, 92, 255),
            Self::BrightMagenta => (255, 0, 255),
            Self::BrightCyan => (0, 255, 255),
            Self::BrightWhite => (255, 255, 255),
        }
    }
}

/// A color resolved for a specific terminal profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalColor {
    TrueColor(PackedRgba),
    Ansi256(u8),
    Ansi16(Ansi16Color),
    Mono(MonoColor),
}

/// Caching color downgrader for one terminal profile.
#[derive(Debug)]
pub struct ColorDowngrader {
    profile: ColorProfile,
    cache: HashMap<u32, TerminalColor>,
}

impl ColorDowngrader {
    #[must_use]
    pub fn new(profile: ColorProfile) -> Self {
        Self {
            profile,
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn profile(&self) -> ColorProfile {
        self.profile
    }

    /// Change the profile, dropping cached conversions.
    pub fn set_profile(&mut self, profile: ColorProfile) {
        if self.profile != profile {
            self.profile = profile;
            self.cache.clear();
        }
    }

    /// Resolve a color for the current profile.
    #[must_use]
    pub fn downgrade(&mut self, color: PackedRgba) -> TerminalColor {
        if let Some(cached) = self.cache.get(&color.0) {
            return *cached;
        }
        let resolved = match self.profile {
            ColorProfile::TrueColor => TerminalColor::TrueColor(color),
            ColorProfile::Ansi256 => {
                TerminalColor::Ansi256(rgb_to_256(color.r(), color.g(), color.b()))
            }
            ColorProfile::Ansi16 => {
                TerminalColor::Ansi16(nearest_ansi16(color.r(), color.g(), color.b()))
            }
            ColorProfile::Mono => TerminalColor::Mono(rgb_to_mono(color.r(), color.g(), color.b())),
        };
        self.cache.insert(color.0, resolved);
        resolved
    }
}

impl Default for ColorDowngrader {
    fn default() -> Self {
        Self::new(ColorProfile::TrueColor)
    }
}

#[inline]
fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    // Grayscale ramp for achromatic input, 6x6x6 cube otherwise.
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r - 8) / 10).min(23);
    }

    let r6 = (u16::from(r) * 6 / 256) as u8;
    let g6 = (u16::from(g) * 6 / 256) as u8;
    let b6 = (u16::from(b) * 6 / 256) as u8;
    16 + 36 * r6 + 6 * g6 + b6
}

#[inline]
fn nearest_ansi16(r: u8, g: u8, b: u8) -> Ansi16Color {
    let mut best = Ansi16Color::Black;
    let mut best_dist = u32::MAX;

    for candidate in ANSI16_PALETTE {
        let (cr, cg, cb) = candidate.rgb();
        let dist = weighted_distance(r, g, b, cr, cg, cb);
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
    }

    best
}

#[inline]
fn rgb_to_mono(r: u8, g: u8, b: u8) -> MonoColor {
    let luma = u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722;
    if (luma / 10000) >= 128 {
        MonoColor::White
    } else {
        MonoColor::Black
    }
}

// Rec.709 luma weights, applied per squared channel difference.
#[inline]
fn weighted_distance(r: u8, g: u8, b: u8, cr: u8, cg: u8, cb: u8) -> u32 {
    let dr = i32::from(r) - i32::from(cr);
    let dg = i32::from(g) - i32::from(cg);
    let db = i32::from(b) - i32::from(cb);

    (dr * dr) as u32 * 2126 + (dg * dg) as u32 * 7152 + (db * db) as u32 * 722
}

const ANSI16_PALETTE: [Ansi16Color; 16] = [
    Ansi16Color::Black,
    Ansi16Color::Red,
    Ansi16Color::Green,
    Ansi16Color::Yellow,
    Ansi16Color::Blue,
    Ansi16Color::Magenta,
    Ansi16Color::Cyan,
    Ansi16Color::White,
    Ansi16Color::BrightBlack,
    Ansi16Color::BrightRed,
    Ansi16Color::BrightGreen,
    Ansi16Color::BrightYellow,
    Ansi16Color::BrightBlue,
    Ansi16Color::BrightMagenta,
    Ansi16Color::BrightCyan,
    Ansi16Color::BrightWhite,
];
