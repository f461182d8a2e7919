#![forbid(unsafe_code)]

//! Company form: name, optional email and phone.

use atelier_client::Company;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, check_email, optional_text, require};

pub fn modal(mode: FormMode<'_, Company>) -> FormModalEntry {
    let existing = mode.existing();
    let state = FormModalState::new(
        mode.title("Company"),
        vec![
            FormField::text("name", "Name", existing.map_or("", |c| c.name.as_str()))
                .required(),
            FormField::text(
                "email",
                "Email",
                existing.and_then(|c| c.email.as_deref()).unwrap_or(""),
            ),
            FormField::text(
                "phone",
                "Phone",
                existing.and_then(|c| c.phone.as_deref()).unwrap_or(""),
            ),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "name", "Name"));
            errors.extend(check_email(state, "email"));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "name": state.text_value("name").unwrap_or(""),
                "email": optional_text(state, "email"),
                "phone": optional_text(state, "phone"),
            })
            .to_string()
        }),
    )
    .config(ModalConfig::default().width(ModalWidth::Md))
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
    fn empty_name_blocks_submit() {
        let mut entry = modal(FormMode::Create);
        assert_eq!(submit(&mut entry), None);
        assert_eq!(
            entry.state().fields()[0].error(),
            Some("Name is required")
        );
    }

    #[test]
    fn bad_email_is_the_only_error() {
        let mut entry = modal(FormMode::Create);
        type_into(&mut entry, "Acme");
        tab(&mut entry);
        type_into(&mut entry, "bad-email");
        assert_eq!(submit(&mut entry), None);
        assert_eq!(entry.state().fields()[0].error(), None);
        assert_eq!(
            entry.state().fields()[1].error(),
            Some("Invalid email format")
        );
    }

    #[test]
    fn valid_submit_normalizes_payload() {
        let mut entry = modal(FormMode::Create);
        type_into(&mut entry, "Acme");
        tab(&mut entry);
        type_into(&mut entry, "info@acme.com");
        let Some(StackEvent::Emit(ModalOutcome::Submitted(payload))) = submit(&mut entry) else {
            panic!("expected a submit");
        };
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Acme",
                "email": "info@acme.com",
                "phone": null,
            })
        );
    }

    #[test]
    fn edit_mode_seeds_fields_create_mode_resets() {
        let company = Company {
            id: 9,
            name: "Gilded".into(),
            email: Some("ops@gilded.test".into()),
            phone: None,
        };
        let entry = modal(FormMode::Edit(&company));
        assert_eq!(entry.state().text_value("name"), Some("Gilded"));
        assert_eq!(entry.state().text_value("email"), Some("ops@gilded.test"));
        assert_eq!(entry.state().text_value("phone"), Some(""));

        let fresh = modal(FormMode::Create);
        assert_eq!(fresh.state().text_value("name"), Some(""));
        assert_eq!(fresh.state().text_value("email"), Some(""));
    }
}
