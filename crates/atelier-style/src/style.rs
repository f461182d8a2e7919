#![forbid(unsafe_code)]

//! Layered text style.

use atelier_render::{PackedRgba, StyleFlags};

/// A text style where unset fields inherit from whatever is underneath.
///
/// Styles compose by patching: applying a style to a cell only overwrites
/// the fields the style actually sets, so a backdrop tint can recolor the
/// background of existing glyphs without touching their foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// A style that sets nothing.
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color.
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    fn add_flag(mut self, flag: StyleFlags) -> Self {
        self.attrs = Some(match self.attrs {
            Some(attrs) => attrs.union(flag),
            None => flag,
        });
        self
    }

    pub fn bold(self) -> Self {
        self.add_flag(StyleFlags::BOLD)
    }

    pub fn dim(self) -> Self {
        self.add_flag(StyleFlags::DIM)
    }

    pub fn italic(self) -> Self {
        self.add_flag(StyleFlags::ITALIC)
    }

    pub fn underline(self) -> Self {
        self.add_flag(StyleFlags::UNDERLINE)
    }

    pub fn reverse(self) -> Self {
        self.add_flag(StyleFlags::REVERSE)
    }

    pub fn strikethrough(self) -> Self {
        self.add_flag(StyleFlags::STRIKETHROUGH)
    }

    /// Whether this style sets nothing.
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `over` on top of `self`: fields set in `over` win.
    pub fn patch(self, over: Style) -> Style {
        Style {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
            attrs: match (self.attrs, over.attrs) {
                (Some(base), Some(top)) => Some(base.union(top)),
                (base, top) => top.or(base),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_style_is_empty() {
        assert!(Style::new().is_empty());
        assert!(Style::default().is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let s = Style::new().fg(PackedRgba::rgb(1, 2, 3)).bold().underline();
        assert_eq!(s.fg, Some(PackedRgba::rgb(1, 2, 3)));
        assert!(s.bg.is_none());
        let attrs = s.attrs.unwrap();
        assert!(attrs.contains(StyleFlags::BOLD));
        assert!(attrs.contains(StyleFlags::UNDERLINE));
    }

    #[test]
    fn patch_overrides_set_fields_only() {
        let base = Style::new().fg(PackedRgba::rgb(1, 1, 1)).bold();
        let over = Style::new().bg(PackedRgba::rgb(2, 2, 2)).dim();
        let merged = base.patch(over);
        assert_eq!(merged.fg, Some(PackedRgba::rgb(1, 1, 1)));
        assert_eq!(merged.bg, Some(PackedRgba::rgb(2, 2, 2)));
        let attrs = merged.attrs.unwrap();
        assert!(attrs.contains(StyleFlags::BOLD));
        assert!(attrs.contains(StyleFlags::DIM));
    }

    #[test]
    fn patch_with_empty_is_identity() {
        let base = Style::new().fg(PackedRgba::rgb(9, 9, 9)).reverse();
        assert_eq!(base.patch(Style::new()), base);
    }
}
