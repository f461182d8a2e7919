#![forbid(unsafe_code)]

//! Supply form: name, quantity, and a unit picker.

use atelier_client::Supply;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, check_number, number_value, require};

const UNITS: [&str; 5] = ["pcs", "g", "kg", "oz", "m"];

pub fn modal(mode: FormMode<'_, Supply>) -> FormModalEntry {
    let existing = mode.existing();
    let quantity = existing
        .map(|s| format!("{}", s.quantity))
        .unwrap_or_default();
    let mut unit = FormField::select(
        "unit",
        "Unit",
        UNITS.iter().map(|u| (*u).to_string()).collect(),
    );
    if let Some(current) = existing.and_then(|s| s.unit.as_deref()) {
        unit = unit.with_selected(current);
    }
    let state = FormModalState::new(
        mode.title("Supply"),
        vec![
            FormField::text("name", "Name", existing.map_or("", |s| s.name.as_str()))
                .required(),
            FormField::text("quantity", "Quantity", quantity).required(),
            unit,
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "name", "Name"));
            errors.extend(check_number(
                state,
                "quantity",
                "Quantity",
                0.0..=f64::MAX,
                true,
            ));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "name": state.text_value("name").unwrap_or(""),
                "quantity": number_value(state, "quantity"),
                "unit": state.select_value("unit"),
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

    #[test]
    fn negative_quantity_is_rejected() {
        let mut entry = modal(FormMode::Create);
        type_into(&mut entry, "Clasp wire");
        tab(&mut entry);
        type_into(&mut entry, "-3");
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(result, None);
        assert!(entry.state().fields()[1].error().is_some());
    }

    #[test]
    fn edit_seeds_unit_selection() {
        let supply = Supply {
            id: 4,
            name: "Solder".into(),
            quantity: 120.0,
            unit: Some("g".into()),
        };
        let entry = modal(FormMode::Edit(&supply));
        assert_eq!(entry.state().select_value("unit"), Some("g"));
        assert_eq!(entry.state().text_value("quantity"), Some("120"));
    }

    #[test]
    fn payload_carries_selected_unit() {
        let supply = Supply {
            id: 4,
            name: "Solder".into(),
            quantity: 120.0,
            unit: Some("kg".into()),
        };
        let mut entry = modal(FormMode::Edit(&supply));
        let Some(StackEvent::Emit(ModalOutcome::Submitted(payload))) =
            entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None)
        else {
            panic!("expected a submit");
        };
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["unit"], serde_json::json!("kg"));
        assert_eq!(value["quantity"], serde_json::json!(120.0));
    }
}
