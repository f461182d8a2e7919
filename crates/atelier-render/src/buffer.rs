#![forbid(unsafe_code)]

//! Row-major cell grid.

use atelier_core::geometry::Rect;

use crate::cell::Cell;

/// A rectangular grid of cells, row-major.
///
/// All accessors are bounds-checked; out-of-range writes are dropped
/// silently so widgets can render near edges without clipping logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer of blank cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full area of this buffer as a rect at the origin.
    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill an area with copies of `cell`, clipped to the buffer.
    pub fn fill(&mut self, area: Rect, cell: Cell) {
        let area = area.intersection(self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize, discarding previous content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut buf = Buffer::new(4, 2);
        buf.set(3, 1, Cell::from_char('Z'));
        assert_eq!(buf.get(3, 1).unwrap().ch, 'Z');
    }

    #[test]
    fn out_of_bounds_get_is_none() {
        let buf = Buffer::new(4, 2);
        assert!(buf.get(4, 0).is_none());
        assert!(buf.get(0, 2).is_none());
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.set(5, 5, Cell::from_char('X'));
        assert!(buf.cells.iter().all(Cell::is_empty));
    }

    #[test]
    fn fill_clips_to_buffer() {
        let mut buf = Buffer::new(3, 3);
        buf.fill(Rect::new(2, 2, 5, 5), Cell::from_char('#'));
        assert_eq!(buf.get(2, 2).unwrap().ch, '#');
        assert!(buf.get(1, 1).unwrap().is_empty());
    }

    #[test]
    fn resize_discards_content() {
        let mut buf = Buffer::new(2, 2);
        buf.set(0, 0, Cell::from_char('A'));
        buf.resize(3, 3);
        assert_eq!(buf.width(), 3);
        assert!(buf.get(0, 0).unwrap().is_empty());
    }
}
