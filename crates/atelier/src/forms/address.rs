#![forbid(unsafe_code)]

//! Address form: street, city, ZIP required; state and country optional.

use atelier_client::Address;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, check_zip, optional_text, require};

pub fn modal(mode: FormMode<'_, Address>) -> FormModalEntry {
    let existing = mode.existing();
    let state = FormModalState::new(
        mode.title("Address"),
        vec![
            FormField::text(
                "street",
                "Street",
                existing.map_or("", |a| a.street.as_str()),
            )
            .required(),
            FormField::text("city", "City", existing.map_or("", |a| a.city.as_str()))
                .required(),
            FormField::text(
                "state",
                "State",
                existing.and_then(|a| a.state.as_deref()).unwrap_or(""),
            ),
            FormField::text("zip", "ZIP", existing.map_or("", |a| a.zip.as_str())).required(),
            FormField::text(
                "country",
                "Country",
                existing.and_then(|a| a.country.as_deref()).unwrap_or(""),
            ),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "street", "Street"));
            errors.extend(require(state, "city", "City"));
            errors.extend(require(state, "zip", "ZIP"));
            errors.extend(check_zip(state, "zip"));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "street": state.text_value("street").unwrap_or(""),
                "city": state.text_value("city").unwrap_or(""),
                "state": optional_text(state, "state"),
                "zip": state.text_value("zip").unwrap_or(""),
                "country": optional_text(state, "country"),
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
    use atelier_widgets::modal::StackModal;

    #[test]
    fn short_zip_is_flagged() {
        let address = Address {
            id: 1,
            street: "1 Forge Way".into(),
            city: "Boston".into(),
            state: None,
            zip: "123".into(),
            country: None,
        };
        let mut entry = modal(FormMode::Edit(&address));
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(result, None);
        assert_eq!(
            entry.state().fields()[3].error(),
            Some("ZIP must be at least 5 characters")
        );
    }

    #[test]
    fn required_fields_error_together() {
        let mut entry = modal(FormMode::Create);
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(result, None);
        let fields = entry.state().fields();
        assert!(fields[0].error().is_some());
        assert!(fields[1].error().is_some());
        assert!(fields[2].error().is_none());
        assert!(fields[3].error().is_some());
        assert!(fields[4].error().is_none());
    }
}
