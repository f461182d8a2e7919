#![forbid(unsafe_code)]

//! Metal form: name plus fineness entered as a percentage.
//!
//! The backend stores fineness as a fraction (`0.585`), but jewelers
//! talk in percent (`58.5`). The field shows and accepts percent; the
//! payload converts.

use atelier_client::Metal;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, check_number, number_value, require};

pub fn modal(mode: FormMode<'_, Metal>) -> FormModalEntry {
    let existing = mode.existing();
    let percentage = existing
        .map(|m| format!("{}", m.fine_percentage * 100.0))
        .unwrap_or_default();
    let state = FormModalState::new(
        mode.title("Metal"),
        vec![
            FormField::text("name", "Name", existing.map_or("", |m| m.name.as_str()))
                .required(),
            FormField::text("fine_percentage", "Fineness (%)", percentage).required(),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "name", "Name"));
            errors.extend(check_number(
                state,
                "fine_percentage",
                "Fineness",
                0.0..=100.0,
                true,
            ));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "name": state.text_value("name").unwrap_or(""),
                "fine_percentage": number_value(state, "fine_percentage")
                    .map(|p| p / 100.0),
            })
            .to_string()
        }),
    )
    .config(ModalConfig::default().width(ModalWidth::Sm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::event::{Event, KeyCode, KeyEvent};
    use atelier_widgets::modal::{ModalOutcome, StackEvent, StackModal};

    fn type_into(entry: &mut FormModalEntry, text: &str) {
        for c in text.chars() {
            let _ = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char(c))), None);
        }
    }

    fn tab(entry: &mut FormModalEntry) {
        let _ = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Tab)), None);
    }

    fn submit(entry: &mut FormModalEntry) -> Option<StackEvent> {
        entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None)
    }

    #[test]
    fn percent_input_submits_fraction() {
        let mut entry = modal(FormMode::Create);
        type_into(&mut entry, "Silver 585");
        tab(&mut entry);
        type_into(&mut entry, "58.5");
        let Some(StackEvent::Emit(ModalOutcome::Submitted(payload))) = submit(&mut entry) else {
            panic!("expected a submit");
        };
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["fine_percentage"], serde_json::json!(0.585));
    }

    #[test]
    fn edit_shows_percent_not_fraction() {
        let metal = Metal {
            id: 1,
            name: "Gold 750".into(),
            fine_percentage: 0.75,
        };
        let entry = modal(FormMode::Edit(&metal));
        assert_eq!(entry.state().text_value("fine_percentage"), Some("75"));
    }

    #[test]
    fn fineness_over_hundred_is_rejected() {
        let mut entry = modal(FormMode::Create);
        type_into(&mut entry, "Mystery");
        tab(&mut entry);
        type_into(&mut entry, "101");
        assert_eq!(submit(&mut entry), None);
        assert_eq!(
            entry.state().fields()[1].error(),
            Some("Fineness must be between 0 and 100")
        );
    }
}
