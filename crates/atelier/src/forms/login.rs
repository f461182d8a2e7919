#![forbid(unsafe_code)]

//! Login form. Shown when no session token is available; cannot be
//! escaped or clicked away, only submitted.

use atelier_widgets::modal::{FormField, FormModalEntry, FormModalState, ModalConfig, ModalWidth};

use super::{check_email, require};

pub fn modal() -> FormModalEntry {
    let state = FormModalState::new(
        "Sign In",
        vec![
            FormField::text("email", "Email", "").required(),
            FormField::text("password", "Password", "").required().masked(),
        ],
    )
    .submit_label("Sign In");

    FormModalEntry::new(
        state,
        Box::new(|state| {
            let mut errors = Vec::new();
            errors.extend(require(state, "email", "Email"));
            errors.extend(check_email(state, "email"));
            errors.extend(require(state, "password", "Password"));
            errors
        }),
        Box::new(|state| {
            serde_json::json!({
                "email": state.text_value("email").unwrap_or(""),
                "password": state.text_value("password").unwrap_or(""),
            })
            .to_string()
        }),
    )
    .config(
        ModalConfig::default()
            .width(ModalWidth::Sm)
            .close_on_escape(false)
            .close_on_backdrop(false),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::event::{Event, KeyCode, KeyEvent};
    use atelier_widgets::modal::StackModal;

    #[test]
    fn escape_does_not_close_the_login_modal() {
        let mut entry = modal();
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape)), None);
        assert_eq!(result, None);
    }

    #[test]
    fn missing_credentials_block_submit() {
        let mut entry = modal();
        let result = entry.handle_event(&Event::Key(KeyEvent::new(KeyCode::Enter)), None);
        assert_eq!(result, None);
        assert!(entry.state().fields()[0].error().is_some());
        assert!(entry.state().fields()[1].error().is_some());
    }
}
