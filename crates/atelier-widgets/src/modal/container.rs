#![forbid(unsafe_code)]

//! Modal container: backdrop tint, positioning, width presets.
//!
//! This widget renders:
//! 1) a full-screen backdrop (tinted overlay), then
//! 2) the content widget in a positioned rectangle.
//!
//! Hit regions distinguish backdrop from content so callers can close on
//! backdrop click via the hit grid.
//!
//! Invariants:
//! - A closed [`ModalState`] renders nothing and handles nothing.
//! - [`ModalState::handle_event`] never mutates the state; it reports
//!   what the user did and the owner decides whether that closes the
//!   modal. A submit in flight can therefore ignore an Escape without
//!   fighting the widget.

use atelier_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use atelier_core::geometry::{Rect, Size};
use atelier_render::{Frame, HitData, HitId, HitRegion, PackedRgba};
use atelier_style::{Style, theme};

use crate::{Widget, set_style_area};

/// Hit region tag for the modal backdrop.
pub const MODAL_HIT_BACKDROP: HitRegion = HitRegion::Custom(1);
/// Hit region tag for the modal content.
pub const MODAL_HIT_CONTENT: HitRegion = HitRegion::Custom(2);

/// What the user did to a modal, as reported by [`ModalState::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Backdrop was clicked.
    BackdropClicked,
    /// Escape was pressed.
    EscapePressed,
}

/// Backdrop configuration (color + opacity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropConfig {
    /// Backdrop color (alpha will be scaled by `opacity`).
    pub color: PackedRgba,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f32,
}

impl BackdropConfig {
    pub fn new(color: PackedRgba, opacity: f32) -> Self {
        Self { color, opacity }
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            color: PackedRgba::rgb(0, 0, 0),
            opacity: 0.6,
        }
    }
}

/// Width preset for a modal. The preset is a maximum; narrow terminals
/// shrink the modal to fit with a two-column margin on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalWidth {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl ModalWidth {
    #[must_use]
    pub const fn cols(self) -> u16 {
        match self {
            Self::Sm => 40,
            Self::Md => 60,
            Self::Lg => 80,
            Self::Xl => 100,
        }
    }
}

/// Where the modal sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPosition {
    #[default]
    Center,
    TopCenter {
        margin: u16,
    },
}

impl ModalPosition {
    pub(crate) fn resolve(self, area: Rect, size: Size) -> Rect {
        let x = area.x + area.width.saturating_sub(size.width) / 2;
        let y = match self {
            Self::Center => area.y + area.height.saturating_sub(size.height) / 2,
            Self::TopCenter { margin } => {
                (area.y + margin).min(area.y + area.height.saturating_sub(size.height))
            }
        };
        Rect::new(x, y, size.width, size.height)
    }
}

/// Modal configuration.
#[derive(Debug, Clone)]
pub struct ModalConfig {
    pub width: ModalWidth,
    pub max_height: Option<u16>,
    pub position: ModalPosition,
    pub backdrop: BackdropConfig,
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
    pub hit_id: Option<HitId>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            width: ModalWidth::Md,
            max_height: None,
            position: ModalPosition::Center,
            backdrop: BackdropConfig::default(),
            close_on_backdrop: true,
            close_on_escape: true,
            hit_id: None,
        }
    }
}

impl ModalConfig {
    pub fn width(mut self, width: ModalWidth) -> Self {
        self.width = width;
        self
    }

    pub fn max_height(mut self, max_height: u16) -> Self {
        self.max_height = Some(max_height);
        self
    }

    pub fn position(mut self, position: ModalPosition) -> Self {
        self.position = position;
        self
    }

    pub fn backdrop(mut self, backdrop: BackdropConfig) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }

    /// The content size for this config at the given screen area and
    /// desired content height.
    pub(crate) fn content_size(&self, area: Rect, desired_height: u16) -> Size {
        let width = self.width.cols().min(area.width.saturating_sub(4));
        let mut height = desired_height.min(area.height.saturating_sub(2));
        if let Some(max) = self.max_height {
            height = height.min(max);
        }
        Size::new(width, height)
    }
}

/// Open/closed flag for a modal. Starts closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Report a close gesture, if the event is one under this config.
    ///
    /// The caller should pass the hit-test result for the mouse event
    /// (usually from the last rendered frame). Whether the gesture
    /// actually closes the modal is the caller's call; this method only
    /// observes.
    #[must_use]
    pub fn handle_event(
        &self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
        config: &ModalConfig,
    ) -> Option<ModalAction> {
        if !self.open {
            return None;
        }

        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Escape,
                kind: KeyEventKind::Press,
                ..
            }) if config.close_on_escape => Some(ModalAction::EscapePressed),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                ..
            }) if config.close_on_backdrop => {
                if let (Some((id, region, _)), Some(expected)) = (hit, config.hit_id)
                    && id == expected
                    && region == MODAL_HIT_BACKDROP
                {
                    Some(ModalAction::BackdropClicked)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Modal container widget.
///
/// Failure modes:
/// - If the available area clamps the content to zero size, only the
///   backdrop is rendered.
/// - `close_on_backdrop` requires `hit_id` to be set; otherwise backdrop
///   clicks cannot be distinguished from content clicks.
#[derive(Debug, Clone)]
pub struct Modal<C> {
    content: C,
    config: ModalConfig,
    height: u16,
}

impl<C> Modal<C> {
    pub fn new(content: C, height: u16) -> Self {
        Self {
            content,
            config: ModalConfig::default(),
            height,
        }
    }

    pub fn config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    /// The rect the content will occupy at the given screen area.
    #[must_use]
    pub fn content_rect(&self, area: Rect) -> Rect {
        let size = self.config.content_size(area, self.height);
        self.config.position.resolve(area, size)
    }
}

pub(crate) fn render_backdrop(frame: &mut Frame, area: Rect, backdrop: BackdropConfig) {
    if backdrop.opacity > 0.0 {
        let color = backdrop.color.with_opacity(backdrop.opacity);
        set_style_area(&mut frame.buffer, area, Style::new().bg(color));
    }
}

impl<C: Widget> crate::StatefulWidget for Modal<C> {
    type State = ModalState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if !state.is_open() || area.is_empty() {
            return;
        }

        render_backdrop(frame, area, self.config.backdrop);

        let content_rect = self.content_rect(area);
        if content_rect.is_empty() {
            if let Some(id) = self.config.hit_id {
                frame.register_hit(area, id, MODAL_HIT_BACKDROP, 0);
            }
            return;
        }

        set_style_area(
            &mut frame.buffer,
            content_rect,
            Style::new().bg(theme::SURFACE),
        );
        self.content.render(content_rect, frame);

        if let Some(id) = self.config.hit_id {
            frame.register_hit(area, id, MODAL_HIT_BACKDROP, 0);
            frame.register_hit(content_rect, id, MODAL_HIT_CONTENT, 0);
        }
    }
}
