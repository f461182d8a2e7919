#![forbid(unsafe_code)]

//! Terminal lifecycle, geometry, and input events for Atelier.
//!
//! This crate provides:
//! - [`geometry`]: screen-space primitives ([`Rect`], [`Size`], [`Sides`])
//! - [`event`]: backend-independent input events parsed from crossterm
//! - [`terminal_session`]: RAII terminal state management with
//!   cleanup-on-drop

pub mod event;
pub mod geometry;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
pub use geometry::{Rect, Sides, Size};
#[cfg(not(target_arch = "wasm32"))]
pub use terminal_session::{SessionOptions, TerminalSession};
