#![forbid(unsafe_code)]

//! Widget library for the Atelier admin client.
//!
//! Everything the pages compose lives here: the data table, the modal
//! stack, form controls, toasts, and the focus manager. Widgets render
//! into a [`Frame`](atelier_render::Frame) and never talk to the
//! terminal directly.

pub mod block;
pub mod borders;
pub mod focus;
pub mod input;
pub mod modal;
pub mod pagination;
pub mod paragraph;
pub mod responsive;
pub mod spinner;
pub mod table;
pub mod toast;

pub use block::Block;
pub use borders::{BorderChars, Borders};
pub use focus::{FocusId, FocusManager};
pub use modal::{
    Modal, ModalAction, ModalConfig, ModalId, ModalOutcome, ModalStack, ModalState, ModalWidth,
    StackModal,
};
pub use pagination::{PaginationState, Paginator};
pub use paragraph::Paragraph;
pub use responsive::Breakpoint;
pub use spinner::{Spinner, SpinnerState};
pub use table::{CellValue, Column, SelectAllScope, SortDirection, Table, TableState};
pub use toast::{Toast, ToastCenter, ToastKind};

use atelier_core::geometry::Rect;
use atelier_render::{Buffer, Cell, Frame};
use atelier_style::Style;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Frame` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the frame with mutable state.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Helper to apply style to a cell.
pub(crate) fn apply_style(cell: &mut Cell, style: Style) {
    if let Some(fg) = style.fg {
        cell.fg = fg;
    }
    if let Some(bg) = style.bg {
        cell.bg = bg;
    }
    if let Some(attrs) = style.attrs {
        cell.attrs = cell.attrs.union(attrs);
    }
}

/// Apply a style to all cells in a rectangular area.
///
/// This modifies existing cells, preserving their content.
pub(crate) fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                apply_style(cell, style);
            }
        }
    }
}

/// Draw a text span into a frame at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive). Wide characters occupy two columns;
/// the follower column is blanked so stale content cannot bleed through.
pub(crate) fn draw_text_span(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthStr;

    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x + w as u16 > max_x {
            break;
        }
        let Some(c) = grapheme.chars().next() else {
            continue;
        };

        let mut cell = Cell::from_char(c);
        apply_style(&mut cell, style);
        frame.buffer.set(x, y, cell);

        if w > 1 {
            let mut follower = Cell::from_char(' ');
            apply_style(&mut follower, style);
            frame.buffer.set(x + 1, y, follower);
        }

        x = x.saturating_add(w as u16);
    }
    x
}
