#![forbid(unsafe_code)]

//! Render kernel for Atelier.
//!
//! This crate provides:
//! - [`cell::Cell`] and [`cell::PackedRgba`]: the unit of terminal output
//! - [`buffer::Buffer`]: a row-major grid of cells
//! - [`frame::Frame`]: a buffer plus cursor position and hit regions for
//!   mouse routing
//! - [`text`]: display-width helpers for truncation and padding
//!
//! Style semantics live above this crate; a cell stores resolved colors and
//! attribute bits only.

pub mod buffer;
pub mod cell;
pub mod frame;
pub mod text;

pub use buffer::Buffer;
pub use cell::{Cell, PackedRgba, StyleFlags};
pub use frame::{Frame, HitData, HitId, HitRegion};
