#![forbid(unsafe_code)]

//! Indeterminate activity indicator.

use atelier_core::geometry::Rect;
use atelier_render::Frame;
use atelier_style::Style;
use web_time::{Duration, Instant};

use crate::{StatefulWidget, draw_text_span};

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animation state. Advance with [`SpinnerState::on_tick`] from the
/// event loop; renders are pure reads.
#[derive(Debug, Clone)]
pub struct SpinnerState {
    frame: usize,
    last_advance: Instant,
}

impl Default for SpinnerState {
    fn default() -> Self {
        Self {
            frame: 0,
            last_advance: Instant::now(),
        }
    }
}

impl SpinnerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the animation if enough time has passed. Returns true
    /// when the frame changed and a redraw is needed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_advance) >= FRAME_INTERVAL {
            self.frame = (self.frame + 1) % FRAMES.len();
            self.last_advance = now;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn glyph(&self) -> char {
        FRAMES[self.frame]
    }
}

/// Spinner with an optional trailing label.
#[derive(Debug, Clone, Default)]
pub struct Spinner<'a> {
    label: &'a str,
    style: Style,
}

impl<'a> Spinner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for Spinner<'_> {
    type State = SpinnerState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let mut text = String::from(state.glyph());
        if !self.label.is_empty() {
            text.push(' ');
            text.push_str(self.label);
        }
        draw_text_span(frame, area.x, area.y, &text, self.style, area.right());
    }
}
