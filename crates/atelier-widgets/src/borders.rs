#![forbid(unsafe_code)]

//! Border edge selection and line-drawing character sets.

use bitflags::bitflags;

bitflags! {
    /// Which edges of a block get a border.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Borders: u8 {
        const TOP = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const LEFT = 1 << 3;
        const ALL = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

impl Default for Borders {
    fn default() -> Self {
        Self::ALL
    }
}

/// The characters used to draw a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl BorderChars {
    pub const SQUARE: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
    };

    pub const ROUNDED: Self = Self {
        horizontal: '─',
        vertical: '│',
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
    };

    pub const DOUBLE: Self = Self {
        horizontal: '═',
        vertical: '║',
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
    };

    pub const ASCII: Self = Self {
        horizontal: '-',
        vertical: '|',
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
    };
}

impl Default for BorderChars {
    fn default() -> Self {
        Self::SQUARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_edge() {
        assert!(Borders::ALL.contains(Borders::TOP));
        assert!(Borders::ALL.contains(Borders::RIGHT));
        assert!(Borders::ALL.contains(Borders::BOTTOM));
        assert!(Borders::ALL.contains(Borders::LEFT));
    }

    #[test]
    fn default_set_is_square() {
        assert_eq!(BorderChars::default(), BorderChars::SQUARE);
    }
}
