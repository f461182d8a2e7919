#![forbid(unsafe_code)]

//! Lookup-value form: category and value, both required.

use atelier_client::LookupValue;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, require};

pub fn modal(mode: FormMode<'_, LookupValue>) -> FormModalEntry {
    let existing = mode.existing();
    let state = FormModalState::new(
        mode.title("Lookup Value"),
        vec![
            FormField::text(
                "category",
                "Category",
                existing.map_or("", |v| v.category.as_str()),
            )
            .required(),
            FormField::text("value", "Value", existing.map_or("", |v| v.value.as_str()))
                .required(),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "category", "Category"));
            errors.extend(require(state, "value", "Value"));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "category": state.text_value("category").unwrap_or(""),
                "value": state.text_value("value").unwrap_or(""),
            })
            .to_string()
        }),
    )
    .config(ModalConfig::default().width(ModalWidth::Sm))
}
