#![forbid(unsafe_code)]

//! Style and color primitives for Atelier.
//!
//! This crate provides:
//! - [`Style`] for layered text styling (unset fields inherit)
//! - [`ColorDowngrader`] for profile conversion (TrueColor → 256 → 16 → mono)
//! - [`theme`] with the semantic palette used across the admin client

pub mod color;
pub mod style;
pub mod theme;

pub use atelier_render::StyleFlags;
pub use color::{Ansi16Color, ColorDowngrader, ColorProfile, MonoColor, TerminalColor};
pub use style::Style;
