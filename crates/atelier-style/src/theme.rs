#![forbid(unsafe_code)]

//! Semantic palette for the admin client.
//!
//! Widgets take [`Style`] values, so everything here is a convention, not a
//! mechanism; pages use these so the same action color means the same thing
//! everywhere.

use atelier_render::PackedRgba;

use crate::Style;

pub const PRIMARY: PackedRgba = PackedRgba::rgb(96, 165, 250);
pub const SUCCESS: PackedRgba = PackedRgba::rgb(74, 222, 128);
pub const WARNING: PackedRgba = PackedRgba::rgb(250, 204, 21);
pub const DANGER: PackedRgba = PackedRgba::rgb(248, 113, 113);
pub const MUTED: PackedRgba = PackedRgba::rgb(148, 163, 184);
pub const SURFACE: PackedRgba = PackedRgba::rgb(30, 41, 59);

/// Table header row.
pub fn table_header() -> Style {
    Style::new().fg(PRIMARY).bold()
}

/// Dimmed placeholder content (skeleton rows, empty states).
pub fn placeholder() -> Style {
    Style::new().fg(MUTED).dim()
}

/// Inline field validation error.
pub fn field_error() -> Style {
    Style::new().fg(DANGER)
}

/// Server-side error banner inside a modal.
pub fn error_banner() -> Style {
    Style::new().fg(DANGER).bold()
}

/// Success toast accent.
pub fn toast_success() -> Style {
    Style::new().fg(SUCCESS).bold()
}

/// Error toast accent.
pub fn toast_error() -> Style {
    Style::new().fg(DANGER).bold()
}

/// The focused interactive element.
pub fn focused() -> Style {
    Style::new().fg(PRIMARY).reverse()
}
