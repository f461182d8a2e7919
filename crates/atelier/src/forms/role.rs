#![forbid(unsafe_code)]

//! Role form: a single required name.

use atelier_client::Role;
use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{FormMode, require};

pub fn modal(mode: FormMode<'_, Role>) -> FormModalEntry {
    let existing = mode.existing();
    let state = FormModalState::new(
        mode.title("Role"),
        vec![
            FormField::text("name", "Name", existing.map_or("", |r| r.name.as_str()))
                .required(),
        ],
    );

    FormModalEntry::new(
        state,
        Box::new(|state| require(state, "name", "Name").into_iter().collect()),
        Box::new(|state| {
            serde_json::json!({
                "name": state.text_value("name").unwrap_or(""),
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
    use atelier_widgets::modal::StackModal;

    #[test]
    fn name_is_required() {
        let mut entry = modal(FormMode::Create);
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(result, None);
        assert_eq!(entry.state().fields()[0].error(), Some("Name is required"));
    }

    #[test]
    fn edit_seeds_name() {
        let role = Role {
            id: 2,
            name: "Polisher".into(),
        };
        let entry = modal(FormMode::Edit(&role));
        assert_eq!(entry.state().text_value("name"), Some("Polisher"));
        assert_eq!(entry.state().title(), "Edit Role");
    }
}
