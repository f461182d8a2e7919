#![forbid(unsafe_code)]

//! Delete confirmation modal.
//!
//! Confirm emits [`ModalOutcome::Confirmed`] without closing; the page
//! layer pops the modal once the delete lands, or feeds an error back
//! in. Cancel, Escape, and backdrop clicks dismiss immediately. Focus
//! starts on Cancel.

use atelier_core::event::{Event, KeyCode, MouseButton, MouseEvent, MouseEventKind};
use atelier_core::geometry::Rect;
use atelier_render::{Frame, HitData, HitId, HitRegion};
use atelier_style::{Style, theme};
use atelier_widgets::modal::{
    MODAL_HIT_BACKDROP, ModalConfig, ModalOutcome, ModalWidth, StackEvent, StackModal,
};
use atelier_widgets::{Paragraph, SpinnerState, Widget};
use unicode_width::UnicodeWidthStr;

pub const CONFIRM_HIT_CANCEL: HitRegion = HitRegion::Custom(50);
pub const CONFIRM_HIT_CONFIRM: HitRegion = HitRegion::Custom(51);

pub struct ConfirmModal {
    title: String,
    message: String,
    confirm_label: String,
    focus_confirm: bool,
    is_submitting: bool,
    api_error: Option<String>,
    spinner: SpinnerState,
}

impl ConfirmModal {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: String::from("Delete"),
            focus_confirm: false,
            is_submitting: false,
            api_error: None,
            spinner: SpinnerState::new(),
        }
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    fn confirm(&self) -> Option<StackEvent> {
        Some(StackEvent::Emit(ModalOutcome::Confirmed))
    }
}

impl StackModal for ConfirmModal {
    fn render_content(&self, area: Rect, frame: &mut Frame, hit_id: HitId) {
        if area.width < 6 || area.height < 4 {
            return;
        }
        let x = area.x + 2;
        let width = area.width - 4;
        let mut y = area.y + 1;

        Paragraph::new(&self.title)
            .style(Style::new().bold())
            .render(Rect::new(x, y, width, 1), frame);
        y += 2;

        if let Some(error) = &self.api_error {
            Paragraph::new(error)
                .style(theme::error_banner())
                .render(Rect::new(x, y, width, 1), frame);
            y += 2;
        }

        let message = Paragraph::new(&self.message).wrap(true);
        let lines = message.line_count(width);
        message.render(Rect::new(x, y, width, lines), frame);
        y += lines + 1;
        if y >= area.bottom() {
            return;
        }

        let confirm_text = if self.is_submitting {
            format!("[ {} {} ]", self.spinner.glyph(), self.confirm_label)
        } else {
            format!("[ {} ]", self.confirm_label)
        };
        let cancel_text = "[ Cancel ]";
        let confirm_width = UnicodeWidthStr::width(confirm_text.as_str()) as u16;
        let cancel_width = cancel_text.len() as u16;
        let confirm_x = (x + width).saturating_sub(confirm_width);
        let cancel_x = confirm_x.saturating_sub(cancel_width + 2);

        let cancel_style = if self.is_submitting {
            theme::placeholder()
        } else if self.focus_confirm {
            Style::default()
        } else {
            theme::focused()
        };
        let confirm_style = if self.is_submitting {
            theme::placeholder()
        } else if self.focus_confirm {
            theme::focused()
        } else {
            Style::new().fg(theme::DANGER)
        };

        Paragraph::new(cancel_text)
            .style(cancel_style)
            .render(Rect::new(cancel_x, y, cancel_width, 1), frame);
        Paragraph::new(&confirm_text)
            .style(confirm_style)
            .render(Rect::new(confirm_x, y, confirm_width, 1), frame);
        if !self.is_submitting {
            frame.register_hit(
                Rect::new(cancel_x, y, cancel_width, 1),
                hit_id,
                CONFIRM_HIT_CANCEL,
                0,
            );
            frame.register_hit(
                Rect::new(confirm_x, y, confirm_width, 1),
                hit_id,
                CONFIRM_HIT_CONFIRM,
                0,
            );
        }
    }

    fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
    ) -> Option<StackEvent> {
        if self.is_submitting {
            return None;
        }
        match event {
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Escape => Some(StackEvent::Close(ModalOutcome::Dismissed)),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                    self.focus_confirm = !self.focus_confirm;
                    None
                }
                KeyCode::Enter => {
                    if self.focus_confirm {
                        self.confirm()
                    } else {
                        Some(StackEvent::Close(ModalOutcome::Dismissed))
                    }
                }
                _ => None,
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                ..
            }) => {
                let (_, region, _) = hit?;
                match region {
                    MODAL_HIT_BACKDROP | CONFIRM_HIT_CANCEL => {
                        Some(StackEvent::Close(ModalOutcome::Dismissed))
                    }
                    CONFIRM_HIT_CONFIRM => self.confirm(),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn config(&self) -> ModalConfig {
        ModalConfig::default().width(ModalWidth::Sm)
    }

    fn desired_height(&self, width: u16) -> u16 {
        let text_width = width.saturating_sub(4);
        let message_lines = Paragraph::new(&self.message).wrap(true).line_count(text_width);
        let error_lines = if self.api_error.is_some() { 2 } else { 0 };
        // top pad + title + blank + error + message + blank + buttons + pad
        3 + error_lines + message_lines + 3
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.is_submitting = submitting;
        if submitting {
            self.api_error = None;
        }
    }

    fn set_api_error(&mut self, error: Option<String>) {
        self.api_error = error;
        self.is_submitting = false;
    }

    fn on_tick(&mut self, now: web_time::Instant) -> bool {
        if self.is_submitting {
            self.spinner.on_tick(now)
        } else {
            false
        }
    }
}
