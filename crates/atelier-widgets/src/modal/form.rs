#![forbid(unsafe_code)]

//! Form modal: labeled fields, inline validation, submit/cancel row.
//!
//! The form owns its own focus cycle (fields, then Cancel, then Submit,
//! wrapping) because the whole modal is one keyboard scope. Validation
//! is supplied by the opener as a closure; the form only displays field
//! errors and the server error banner it is handed.
//!
//! Invariants:
//! - While a submit is in flight every input is inert: typing, Tab,
//!   Escape, and backdrop clicks all fall through until the opener
//!   either closes the modal or reports an error.
//! - A failed validation emits nothing; errors render under their
//!   fields and focus stays where it was.

use atelier_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
use atelier_core::geometry::Rect;
use atelier_render::{Frame, HitData, HitId, HitRegion};
use atelier_style::{Style, theme};
use unicode_width::UnicodeWidthStr;

use crate::input::{
    Checkbox, CheckboxState, Select, SelectState, TextInput, TextInputState,
};
use crate::modal::container::{MODAL_HIT_BACKDROP, ModalConfig};
use crate::modal::stack::{ModalOutcome, StackEvent, StackModal};
use crate::spinner::SpinnerState;
use crate::{StatefulWidget, draw_text_span};

/// Hit region for a field's control row; hit data is the field index.
pub const FORM_HIT_FIELD: HitRegion = HitRegion::Custom(40);
/// Hit region for the Cancel button.
pub const FORM_HIT_CANCEL: HitRegion = HitRegion::Custom(41);
/// Hit region for the Submit button.
pub const FORM_HIT_SUBMIT: HitRegion = HitRegion::Custom(42);

/// One input in the form.
#[derive(Debug, Clone)]
pub enum Control {
    Text(TextInputState),
    Checkbox(CheckboxState),
    Select(SelectState),
}

/// A labeled form field.
#[derive(Debug, Clone)]
pub struct FormField {
    key: &'static str,
    label: String,
    control: Control,
    error: Option<String>,
    required: bool,
    masked: bool,
}

impl FormField {
    pub fn text(key: &'static str, label: impl Into<String>, initial: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            control: Control::Text(TextInputState::new(initial)),
            error: None,
            required: false,
            masked: false,
        }
    }

    pub fn checkbox(key: &'static str, label: impl Into<String>, checked: bool) -> Self {
        Self {
            key,
            label: label.into(),
            control: Control::Checkbox(CheckboxState::new(checked)),
            error: None,
            required: false,
            masked: false,
        }
    }

    pub fn select(key: &'static str, label: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            key,
            label: label.into(),
            control: Control::Select(SelectState::new(options)),
            error: None,
            required: false,
            masked: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Render the value as bullets (password entry).
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Preselect a select option. No-op for other control kinds.
    pub fn with_selected(mut self, value: &str) -> Self {
        if let Control::Select(state) = &mut self.control {
            state.select_value(value);
        }
        self
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn rows(&self) -> u16 {
        // Label row + control row, plus an error row when set.
        2 + u16::from(self.error.is_some())
    }
}

/// Where form focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Cancel,
    Submit,
}

/// What the user asked the form to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Cancel,
    Submit,
}

/// All mutable form state: field values, errors, focus, pending flag.
#[derive(Debug, Clone)]
pub struct FormModalState {
    title: String,
    submit_label: String,
    fields: Vec<FormField>,
    focus: FormFocus,
    is_submitting: bool,
    api_error: Option<String>,
    spinner: SpinnerState,
}

impl FormModalState {
    #[must_use]
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        let focus = if fields.is_empty() {
            FormFocus::Submit
        } else {
            FormFocus::Field(0)
        };
        Self {
            title: title.into(),
            submit_label: String::from("Save"),
            fields,
            focus,
            is_submitting: false,
            api_error: None,
            spinner: SpinnerState::new(),
        }
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    /// The trimmed value of a text field.
    #[must_use]
    pub fn text_value(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.key == key).and_then(|f| {
            if let Control::Text(state) = &f.control {
                Some(state.value().trim())
            } else {
                None
            }
        })
    }

    #[must_use]
    pub fn checkbox_value(&self, key: &str) -> Option<bool> {
        self.fields.iter().find(|f| f.key == key).and_then(|f| {
            if let Control::Checkbox(state) = &f.control {
                Some(state.checked)
            } else {
                None
            }
        })
    }

    #[must_use]
    pub fn select_value(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.key == key).and_then(|f| {
            if let Control::Select(state) = &f.control {
                state.selected()
            } else {
                None
            }
        })
    }

    /// Attach a validation error to a field. Unknown keys are ignored.
    pub fn set_field_error(&mut self, key: &str, message: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.error = Some(message.into());
        }
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
        self.api_error = None;
    }

    pub fn set_api_error(&mut self, error: Option<String>) {
        self.api_error = error;
    }

    /// Flip the pending flag. Starting a submit clears the stale server
    /// error from the previous attempt.
    pub fn set_submitting(&mut self, submitting: bool) {
        self.is_submitting = submitting;
        if submitting {
            self.api_error = None;
        }
    }

    /// Advance the submit spinner. Returns true when a redraw is needed.
    pub fn on_tick(&mut self, now: web_time::Instant) -> bool {
        self.is_submitting && self.spinner.on_tick(now)
    }

    pub fn focus_field(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = FormFocus::Field(index);
        }
    }

    fn focus_order(&self) -> Vec<FormFocus> {
        let mut order: Vec<FormFocus> = (0..self.fields.len()).map(FormFocus::Field).collect();
        order.push(FormFocus::Cancel);
        order.push(FormFocus::Submit);
        order
    }

    fn cycle_focus(&mut self, backwards: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if backwards {
            (pos + order.len() - 1) % order.len()
        } else {
            (pos + 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Apply a key press. Inert while a submit is in flight.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        if self.is_submitting || !key.is_press() {
            return None;
        }

        match key.code {
            KeyCode::Escape => return Some(FormAction::Cancel),
            KeyCode::Tab if key.modifiers.contains(Modifiers::SHIFT) => {
                self.cycle_focus(true);
                return None;
            }
            KeyCode::Tab => {
                self.cycle_focus(false);
                return None;
            }
            KeyCode::BackTab => {
                self.cycle_focus(true);
                return None;
            }
            KeyCode::Enter => {
                return match self.focus {
                    FormFocus::Cancel => Some(FormAction::Cancel),
                    // Enter inside a field submits the form, like a
                    // browser form would.
                    FormFocus::Field(_) | FormFocus::Submit => Some(FormAction::Submit),
                };
            }
            _ => {}
        }

        if let FormFocus::Field(index) = self.focus
            && let Some(field) = self.fields.get_mut(index)
        {
            let changed = match &mut field.control {
                Control::Text(state) => state.handle_key(key),
                Control::Checkbox(state) => state.handle_key(key),
                Control::Select(state) => state.handle_key(key),
            };
            // Editing a field clears its stale error.
            if changed {
                field.error = None;
            }
        }
        None
    }

    /// Content height at any width: padding, title, error banner,
    /// fields, button row.
    #[must_use]
    pub fn desired_height(&self) -> u16 {
        let mut rows = 3; // top padding + title + blank
        if self.api_error.is_some() {
            rows += 2;
        }
        rows += self.fields.iter().map(FormField::rows).sum::<u16>();
        rows += u16::from(!self.fields.is_empty()); // blank before buttons
        rows += 2; // button row + bottom padding
        rows
    }
}

/// The form modal's renderer. All state lives in [`FormModalState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormModal {
    hit_id: Option<HitId>,
}

impl FormModal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }

    fn register(&self, frame: &mut Frame, area: Rect, region: HitRegion, data: HitData) {
        if let Some(id) = self.hit_id {
            frame.register_hit(area, id, region, data);
        }
    }
}

impl StatefulWidget for FormModal {
    type State = FormModalState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.width < 6 || area.height < 4 {
            return;
        }
        let x = area.x + 2;
        let width = area.width - 4;
        let mut y = area.y + 1;

        draw_text_span(frame, x, y, &state.title, Style::new().bold(), x + width);
        y += 2;

        if let Some(error) = &state.api_error {
            draw_text_span(frame, x, y, error, theme::error_banner(), x + width);
            y += 2;
        }

        for (index, field) in state.fields.iter_mut().enumerate() {
            if y >= area.bottom() {
                break;
            }
            let focused =
                !state.is_submitting && state.focus == FormFocus::Field(index);

            let mut label = field.label.clone();
            if field.required {
                label.push_str(" *");
            }
            draw_text_span(frame, x, y, &label, Style::new().fg(theme::MUTED), x + width);
            y += 1;

            let control_area = Rect::new(x, y, width, 1);
            match &mut field.control {
                Control::Text(text) => {
                    TextInput::new()
                        .focused(focused)
                        .masked(field.masked)
                        .render(control_area, frame, text);
                }
                Control::Checkbox(checkbox) => {
                    Checkbox::new("").focused(focused).render(control_area, frame, checkbox);
                }
                Control::Select(select) => {
                    Select::new().focused(focused).render(control_area, frame, select);
                }
            }
            self.register(frame, control_area, FORM_HIT_FIELD, index as u32);
            y += 1;

            if let Some(error) = &field.error {
                draw_text_span(frame, x, y, error, theme::field_error(), x + width);
                y += 1;
            }
        }

        if !state.fields.is_empty() {
            y += 1;
        }
        if y >= area.bottom() {
            return;
        }

        // Buttons, right-aligned: [ Cancel ]  [ Save ]
        let submit_text = if state.is_submitting {
            format!("[ {} {} ]", state.spinner.glyph(), state.submit_label)
        } else {
            format!("[ {} ]", state.submit_label)
        };
        let cancel_text = "[ Cancel ]";
        let submit_width = UnicodeWidthStr::width(submit_text.as_str()) as u16;
        let cancel_width = cancel_text.len() as u16;

        let submit_x = (x + width).saturating_sub(submit_width);
        let cancel_x = submit_x.saturating_sub(cancel_width + 2);

        let cancel_style = if state.is_submitting {
            theme::placeholder()
        } else if state.focus == FormFocus::Cancel {
            theme::focused()
        } else {
            Style::default()
        };
        let submit_style = if state.is_submitting {
            theme::placeholder()
        } else if state.focus == FormFocus::Submit {
            theme::focused()
        } else {
            Style::new().fg(theme::PRIMARY)
        };

        draw_text_span(frame, cancel_x, y, cancel_text, cancel_style, x + width);
        draw_text_span(frame, submit_x, y, &submit_text, submit_style, x + width);
        if !state.is_submitting {
            self.register(
                frame,
                Rect::new(cancel_x, y, cancel_width, 1),
                FORM_HIT_CANCEL,
                0,
            );
            self.register(
                frame,
                Rect::new(submit_x, y, submit_width, 1),
                FORM_HIT_SUBMIT,
                0,
            );
        }
    }
}

/// Validation function: inspects the state, returns `(field key, message)`
/// pairs. An empty vec means the form may submit.
pub type ValidateFn = Box<dyn Fn(&FormModalState) -> Vec<(&'static str, String)> + Send>;
/// Payload builder: serializes the state into the submit payload.
pub type PayloadFn = Box<dyn Fn(&FormModalState) -> String + Send>;

/// A form wired into the modal stack.
pub struct FormModalEntry {
    state: FormModalState,
    config: ModalConfig,
    validate: ValidateFn,
    payload: PayloadFn,
}

impl FormModalEntry {
    pub fn new(state: FormModalState, validate: ValidateFn, payload: PayloadFn) -> Self {
        Self {
            state,
            config: ModalConfig::default(),
            validate,
            payload,
        }
    }

    pub fn config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn state(&self) -> &FormModalState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormModalState {
        &mut self.state
    }

    fn try_submit(&mut self) -> Option<StackEvent> {
        self.state.clear_errors();
        let errors = (self.validate)(&self.state);
        if errors.is_empty() {
            let payload = (self.payload)(&self.state);
            Some(StackEvent::Emit(ModalOutcome::Submitted(payload)))
        } else {
            for (key, message) in errors {
                self.state.set_field_error(key, message);
            }
            None
        }
    }
}

impl StackModal for FormModalEntry {
    fn render_content(&self, area: Rect, frame: &mut Frame, hit_id: HitId) {
        let mut state = self.state.clone();
        FormModal::new().hit_id(hit_id).render(area, frame, &mut state);
    }

    fn handle_event(
        &mut self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
    ) -> Option<StackEvent> {
        match event {
            Event::Key(key) => {
                if key.code == KeyCode::Escape
                    && key.kind == KeyEventKind::Press
                    && !self.config.close_on_escape
                {
                    return None;
                }
                match self.state.handle_key(*key)? {
                    FormAction::Cancel => Some(StackEvent::Close(ModalOutcome::Dismissed)),
                    FormAction::Submit => self.try_submit(),
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                ..
            }) => {
                if self.state.is_submitting {
                    return None;
                }
                // Only the top modal receives events, and its regions are
                // registered last, so region matching is unambiguous here.
                let (_, region, data) = hit?;
                match region {
                    MODAL_HIT_BACKDROP if self.config.close_on_backdrop => {
                        Some(StackEvent::Close(ModalOutcome::Dismissed))
                    }
                    FORM_HIT_FIELD => {
                        self.state.focus_field(data as usize);
                        None
                    }
                    FORM_HIT_CANCEL => Some(StackEvent::Close(ModalOutcome::Dismissed)),
                    FORM_HIT_SUBMIT => self.try_submit(),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn config(&self) -> ModalConfig {
        self.config.clone()
    }

    fn desired_height(&self, _width: u16) -> u16 {
        self.state.desired_height()
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.state.set_submitting(submitting);
    }

    fn set_api_error(&mut self, error: Option<String>) {
        self.state.set_api_error(error);
    }

    fn on_tick(&mut self, now: web_time::Instant) -> bool {
        self.state.on_tick(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn sample_state() -> FormModalState {
        FormModalState::new(
            "Edit part",
            vec![
                FormField::text("name", "Name", "").required(),
                FormField::checkbox("active", "Active", true),
                FormField::select(
                    "metal",
                    "Metal",
                    vec!["gold".into(), "silver".into()],
                ),
            ],
        )
    }

    fn require_name() -> ValidateFn {
        Box::new(|state| {
            let mut errors = Vec::new();
            if state.text_value("name").is_none_or(str::is_empty) {
                errors.push(("name", String::from("Name is required")));
            }
            errors
        })
    }

    fn name_payload() -> PayloadFn {
        Box::new(|state| format!("{{\"name\":\"{}\"}}", state.text_value("name").unwrap_or("")))
    }

    #[test]
    fn tab_cycles_fields_then_buttons() {
        let mut state = sample_state();
        assert_eq!(state.focus(), FormFocus::Field(0));
        state.handle_key(press(KeyCode::Tab));
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.focus(), FormFocus::Field(2));
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.focus(), FormFocus::Cancel);
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.focus(), FormFocus::Submit);
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.focus(), FormFocus::Field(0));
    }

    #[test]
    fn back_tab_cycles_reverse() {
        let mut state = sample_state();
        state.handle_key(press(KeyCode::BackTab));
        assert_eq!(state.focus(), FormFocus::Submit);
    }

    #[test]
    fn typing_reaches_focused_text_field() {
        let mut state = sample_state();
        state.handle_key(press(KeyCode::Char('h')));
        state.handle_key(press(KeyCode::Char('i')));
        assert_eq!(state.text_value("name"), Some("hi"));
    }

    #[test]
    fn enter_in_field_requests_submit() {
        let mut state = sample_state();
        assert_eq!(state.handle_key(press(KeyCode::Enter)), Some(FormAction::Submit));
    }

    #[test]
    fn escape_requests_cancel() {
        let mut state = sample_state();
        assert_eq!(state.handle_key(press(KeyCode::Escape)), Some(FormAction::Cancel));
    }

    #[test]
    fn submitting_makes_everything_inert() {
        let mut state = sample_state();
        state.set_submitting(true);
        assert_eq!(state.handle_key(press(KeyCode::Escape)), None);
        assert_eq!(state.handle_key(press(KeyCode::Char('x'))), None);
        assert_eq!(state.text_value("name"), Some(""));
        assert_eq!(state.handle_key(press(KeyCode::Tab)), None);
        assert_eq!(state.focus(), FormFocus::Field(0));
    }

    #[test]
    fn editing_clears_field_error() {
        let mut state = sample_state();
        state.set_field_error("name", "Name is required");
        assert!(state.fields()[0].error().is_some());
        state.handle_key(press(KeyCode::Char('a')));
        assert!(state.fields()[0].error().is_none());
    }

    #[test]
    fn starting_submit_clears_api_error() {
        let mut state = sample_state();
        state.set_api_error(Some(String::from("boom")));
        state.set_submitting(true);
        assert_eq!(state.api_error(), None);
    }

    #[test]
    fn failed_validation_sets_errors_and_emits_nothing() {
        let mut entry = FormModalEntry::new(sample_state(), require_name(), name_payload());
        let event = Event::Key(press(KeyCode::Enter));
        assert_eq!(entry.handle_event(&event, None), None);
        assert_eq!(entry.state().fields()[0].error(), Some("Name is required"));
    }

    #[test]
    fn valid_submit_emits_payload_without_closing() {
        let mut entry = FormModalEntry::new(sample_state(), require_name(), name_payload());
        for c in "Bail".chars() {
            let _ = entry.handle_event(&Event::Key(press(KeyCode::Char(c))), None);
        }
        let result = entry.handle_event(&Event::Key(press(KeyCode::Enter)), None);
        assert_eq!(
            result,
            Some(StackEvent::Emit(ModalOutcome::Submitted(String::from(
                "{\"name\":\"Bail\"}"
            ))))
        );
    }

    #[test]
    fn backdrop_click_dismisses_unless_submitting() {
        let mut entry = FormModalEntry::new(sample_state(), require_name(), name_payload());
        let click = Event::Mouse(MouseEvent::new(
            MouseEventKind::Down(MouseButton::Left),
            0,
            0,
        ));
        let hit = Some((HitId::new(1), MODAL_HIT_BACKDROP, 0));

        entry.set_submitting(true);
        assert_eq!(entry.handle_event(&click, hit), None);

        entry.set_submitting(false);
        assert_eq!(
            entry.handle_event(&click, hit),
            Some(StackEvent::Close(ModalOutcome::Dismissed))
        );
    }

    #[test]
    fn escape_respects_close_on_escape_config() {
        let mut entry = FormModalEntry::new(sample_state(), require_name(), name_payload())
            .config(ModalConfig::default().close_on_escape(false));
        let escape = Event::Key(press(KeyCode::Escape));
        assert_eq!(entry.handle_event(&escape, None), None);
    }

    #[test]
    fn field_click_moves_focus() {
        let mut entry = FormModalEntry::new(sample_state(), require_name(), name_payload());
        let click = Event::Mouse(MouseEvent::new(
            MouseEventKind::Down(MouseButton::Left),
            0,
            0,
        ));
        let hit = Some((HitId::new(1), FORM_HIT_FIELD, 2));
        assert_eq!(entry.handle_event(&click, hit), None);
        assert_eq!(entry.state().focus(), FormFocus::Field(2));
    }

    #[test]
    fn desired_height_tracks_errors() {
        let mut state = sample_state();
        let base = state.desired_height();
        state.set_field_error("name", "bad");
        assert_eq!(state.desired_height(), base + 1);
        state.set_api_error(Some(String::from("boom")));
        assert_eq!(state.desired_height(), base + 3);
    }

    #[test]
    fn renders_title_fields_and_buttons() {
        let mut state = sample_state();
        let height = state.desired_height();
        let mut frame = Frame::new(60, 24);
        FormModal::new().render(Rect::new(0, 0, 60, height), &mut frame, &mut state);

        let all: String = (0..height)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .map(|(x, y)| frame.buffer.get(x, y).unwrap().ch)
            .collect();
        assert!(all.contains("Edit part"));
        assert!(all.contains("Name *"));
        assert!(all.contains("[ Cancel ]"));
        assert!(all.contains("[ Save ]"));
    }
}
