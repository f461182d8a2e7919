#![forbid(unsafe_code)]

//! Metal-deposit form: which metal, how many grams.
//!
//! `deposited_at` is set by the backend on creation and is not
//! editable here.

use atelier_client::MetalDeposit;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, check_number, number_value};

pub fn modal(mode: FormMode<'_, MetalDeposit>) -> FormModalEntry {
    let existing = mode.existing();
    let metal_id = existing
        .map(|d| d.metal_id.to_string())
        .unwrap_or_default();
    let grams = existing.map(|d| format!("{}", d.grams)).unwrap_or_default();
    let state = FormModalState::new(
        mode.title("Metal Deposit"),
        vec![
            FormField::text("metal_id", "Metal ID", metal_id).required(),
            FormField::text("grams", "Grams", grams).required(),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(check_number(
                state,
                "metal_id",
                "Metal ID",
                1.0..=f64::MAX,
                true,
            ));
            errors.extend(check_number(state, "grams", "Grams", 0.001..=f64::MAX, true));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "metal_id": number_value(state, "metal_id").map(|id| id as i64),
                "grams": number_value(state, "grams"),
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

    #[test]
    fn zero_grams_is_rejected() {
        let mut entry = modal(FormMode::Create);
        type_into(&mut entry, "3");
        let _ = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Tab)), None);
        type_into(&mut entry, "0");
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(result, None);
        assert!(entry.state().fields()[1].error().is_some());
    }

    #[test]
    fn payload_has_integer_metal_id_and_float_grams() {
        let deposit = MetalDeposit {
            id: 11,
            metal_id: 3,
            grams: 15.5,
            deposited_at: chrono::Utc::now(),
        };
        let mut entry = modal(FormMode::Edit(&deposit));
        let Some(StackEvent::Emit(ModalOutcome::Submitted(payload))) =
            entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None)
        else {
            panic!("expected a submit");
        };
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["metal_id"], serde_json::json!(3));
        assert_eq!(value["grams"], serde_json::json!(15.5));
    }
}
