#![forbid(unsafe_code)]

//! Integration tests: modal stack flows driven by real events.

use atelier_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use atelier_core::geometry::Rect;
use atelier_harness::frame_text;
use atelier_render::Frame;
use atelier_widgets::modal::{
    FormField, FormFocus, FormModalEntry, FormModalState, ModalConfig, ModalOutcome, ModalStack,
};
use atelier_widgets::StackModal;

fn form(title: &str) -> FormModalEntry {
    let state = FormModalState::new(
        title,
        vec![
            FormField::text("name", "Name", "").required(),
            FormField::text("notes", "Notes", ""),
        ],
    );
    FormModalEntry::new(
        state,
        Box::new(|state| match state.text_value("name") {
            Some(value) if !value.is_empty() => Vec::new(),
            _ => vec![("name", String::from("Name is required"))],
        }),
        Box::new(|state| {
            serde_json::json!({ "name": state.text_value("name").unwrap_or("") }).to_string()
        }),
    )
}

fn press(stack: &mut ModalStack, code: KeyCode) -> Option<atelier_widgets::modal::StackResult> {
    stack.handle_event(&Event::Key(KeyEvent::new(code)), None)
}

fn type_text(stack: &mut ModalStack, text: &str) {
    for ch in text.chars() {
        press(stack, KeyCode::Char(ch));
    }
}

#[test]
fn escape_closes_only_the_top_modal() {
    let mut stack = ModalStack::new();
    let bottom = stack.push(Box::new(form("Edit Supply")));
    let top = stack.push(Box::new(form("New Metal")));

    let result = press(&mut stack, KeyCode::Escape).unwrap();
    assert_eq!(result.id, top);
    assert!(result.closed);
    assert_eq!(result.outcome, ModalOutcome::Dismissed);
    assert!(stack.contains(bottom));
    assert_eq!(stack.depth(), 1);
}

#[test]
fn submit_emits_without_closing() {
    let mut stack = ModalStack::new();
    stack.push(Box::new(form("New Supply")));
    type_text(&mut stack, "Ring blank");

    let result = press(&mut stack, KeyCode::Enter).unwrap();
    assert!(!result.closed);
    match result.outcome {
        ModalOutcome::Submitted(payload) => assert!(payload.contains("Ring blank")),
        other => panic!("expected a submit, got {other:?}"),
    }
    assert!(!stack.is_empty());
}

#[test]
fn invalid_submit_stays_put_and_reports_nothing() {
    let mut stack = ModalStack::new();
    stack.push(Box::new(form("New Supply")));

    assert_eq!(press(&mut stack, KeyCode::Enter), None);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn submitting_modal_ignores_input() {
    let mut stack = ModalStack::new();
    stack.push(Box::new(form("New Supply")));
    type_text(&mut stack, "Wire");
    press(&mut stack, KeyCode::Enter).unwrap();

    if let Some(top) = stack.top_mut() {
        top.set_submitting(true);
    }
    assert_eq!(press(&mut stack, KeyCode::Escape), None);
    assert_eq!(press(&mut stack, KeyCode::Enter), None);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn api_error_renders_inside_the_modal() {
    let mut stack = ModalStack::new();
    let id = stack.push(Box::new(form("New Supply")));
    type_text(&mut stack, "Wire");
    press(&mut stack, KeyCode::Enter).unwrap();

    if let Some(modal) = stack.get_mut(id) {
        modal.set_submitting(false);
        modal.set_api_error(Some(String::from("server returned 422: name taken")));
    }
    let mut frame = Frame::new(70, 20);
    stack.render(&mut frame, Rect::new(0, 0, 70, 20));
    assert!(frame_text(&frame).contains("name taken"));
}

#[test]
fn tab_cycles_fields_then_buttons_and_wraps() {
    let mut entry = form("New Supply");
    let tab = Event::Key(KeyEvent::new(KeyCode::Tab));

    assert_eq!(entry.state().focus(), FormFocus::Field(0));
    entry.handle_event(&tab, None);
    assert_eq!(entry.state().focus(), FormFocus::Field(1));
    entry.handle_event(&tab, None);
    assert_eq!(entry.state().focus(), FormFocus::Cancel);
    entry.handle_event(&tab, None);
    assert_eq!(entry.state().focus(), FormFocus::Submit);
    entry.handle_event(&tab, None);
    assert_eq!(entry.state().focus(), FormFocus::Field(0));

    // Shift+Tab from the first focusable wraps backwards to the last.
    let back_tab = Event::Key(KeyEvent::new(KeyCode::BackTab));
    entry.handle_event(&back_tab, None);
    assert_eq!(entry.state().focus(), FormFocus::Submit);
}

#[test]
fn backdrop_click_dismisses_when_allowed() {
    let mut stack = ModalStack::new();
    stack.push(Box::new(form("New Supply")));
    let mut frame = Frame::new(70, 20);
    stack.render(&mut frame, Rect::new(0, 0, 70, 20));

    let hit = frame.hit_test(0, 0);
    assert!(hit.is_some(), "backdrop must be hit-testable");
    let click = Event::Mouse(MouseEvent::new(
        MouseEventKind::Down(MouseButton::Left),
        0,
        0,
    ));
    let result = stack.handle_event(&click, hit).unwrap();
    assert!(result.closed);
    assert_eq!(result.outcome, ModalOutcome::Dismissed);
}

#[test]
fn locked_modal_ignores_escape_and_backdrop() {
    let locked = form("Sign In").config(
        ModalConfig::default()
            .close_on_escape(false)
            .close_on_backdrop(false),
    );
    let mut stack = ModalStack::new();
    stack.push(Box::new(locked));
    let mut frame = Frame::new(70, 20);
    stack.render(&mut frame, Rect::new(0, 0, 70, 20));

    assert_eq!(press(&mut stack, KeyCode::Escape), None);
    let hit = frame.hit_test(0, 0);
    let click = Event::Mouse(MouseEvent::new(
        MouseEventKind::Down(MouseButton::Left),
        0,
        0,
    ));
    assert_eq!(stack.handle_event(&click, hit), None);
    assert_eq!(stack.depth(), 1);
}
