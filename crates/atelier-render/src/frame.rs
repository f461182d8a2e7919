#![forbid(unsafe_code)]

//! Frame: a buffer plus cursor state and mouse hit regions.

use atelier_core::geometry::Rect;

use crate::buffer::Buffer;

/// Identifier a widget attaches to its hit regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitId(u32);

impl HitId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Which part of a widget a hit region covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    /// The widget's main surface.
    Content,
    /// Widget-defined sub-region.
    Custom(u16),
}

/// Widget-defined payload attached to a hit region (e.g. a row index).
pub type HitData = u32;

#[derive(Debug, Clone, Copy)]
struct HitEntry {
    area: Rect,
    id: HitId,
    region: HitRegion,
    data: HitData,
}

/// One render pass worth of output.
///
/// Hit regions are tested in reverse registration order, so whatever was
/// drawn last (the topmost overlay) wins. The hit list is cleared together
/// with the buffer at the start of each frame.
#[derive(Debug)]
pub struct Frame {
    pub buffer: Buffer,
    cursor: Option<(u16, u16)>,
    hits: Vec<HitEntry>,
}

impl Frame {
    /// Create a frame with a blank buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            cursor: None,
            hits: Vec::new(),
        }
    }

    /// The drawable area.
    pub fn area(&self) -> Rect {
        self.buffer.area()
    }

    /// Reset buffer, cursor, and hit regions for a new pass.
    pub fn begin(&mut self) {
        self.buffer.clear();
        self.cursor = None;
        self.hits.clear();
    }

    /// Resize the underlying buffer, clearing all frame state.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(width, height);
        self.cursor = None;
        self.hits.clear();
    }

    /// Place the terminal cursor (used by focused text inputs).
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x, y));
    }

    /// The requested cursor position, if any widget placed it.
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Register a rectangular hit region.
    pub fn register_hit(&mut self, area: Rect, id: HitId, region: HitRegion, data: HitData) {
        if area.is_empty() {
            return;
        }
        self.hits.push(HitEntry {
            area,
            id,
            region,
            data,
        });
    }

    /// Topmost hit region containing the given cell.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, HitData)> {
        self.hits
            .iter()
            .rev()
            .find(|entry| entry.area.contains(x, y))
            .map(|entry| (entry.id, entry.region, entry.data))
    }
}
