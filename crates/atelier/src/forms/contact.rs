#![forbid(unsafe_code)]

//! Contact form: names, optional email/phone, optional owning company.

use atelier_client::Contact;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, check_email, check_number, number_value, optional_text, require};

pub fn modal(mode: FormMode<'_, Contact>) -> FormModalEntry {
    let existing = mode.existing();
    let company_id = existing
        .and_then(|c| c.company_id)
        .map(|id| id.to_string())
        .unwrap_or_default();
    let state = FormModalState::new(
        mode.title("Contact"),
        vec![
            FormField::text(
                "first_name",
                "First name",
                existing.map_or("", |c| c.first_name.as_str()),
            )
            .required(),
            FormField::text(
                "last_name",
                "Last name",
                existing.map_or("", |c| c.last_name.as_str()),
            )
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
            FormField::text("company_id", "Company ID", company_id),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "first_name", "First name"));
            errors.extend(require(state, "last_name", "Last name"));
            errors.extend(check_email(state, "email"));
            errors.extend(check_number(
                state,
                "company_id",
                "Company ID",
                1.0..=f64::MAX,
                false,
            ));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "first_name": state.text_value("first_name").unwrap_or(""),
                "last_name": state.text_value("last_name").unwrap_or(""),
                "email": optional_text(state, "email"),
                "phone": optional_text(state, "phone"),
                "company_id": number_value(state, "company_id").map(|id| id as i64),
            })
            .to_string()
        }),
    )
    .config(ModalConfig::default().width(ModalWidth::Md))
}
