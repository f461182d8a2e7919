#![forbid(unsafe_code)]

//! Entity form modals.
//!
//! One module per backend entity, all built on the same contract: a
//! field list seeded from the entity in `Edit` mode (defaults in
//! `Create`), a pure validation function producing a field-keyed error
//! map, and a payload builder that trims and normalizes values before
//! the page layer runs the mutation.
//!
//! Validation messages are user-facing copy; keep them short and
//! capitalized.

pub mod address;
pub mod company;
pub mod contact;
pub mod login;
pub mod lookup_value;
pub mod metal;
pub mod metal_deposit;
pub mod role;
pub mod supply;

use std::sync::LazyLock;

use atelier_widgets::modal::FormModalState;
use regex::Regex;

/// Whether a form opens blank or seeded from an existing entity.
#[derive(Debug, Clone, Copy)]
pub enum FormMode<'a, T> {
    Create,
    Edit(&'a T),
}

impl<'a, T> FormMode<'a, T> {
    #[must_use]
    pub fn existing(&self) -> Option<&'a T> {
        match self {
            Self::Create => None,
            Self::Edit(entity) => Some(entity),
        }
    }

    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// Modal title: `New Company` or `Edit Company`.
    #[must_use]
    pub fn title(&self, noun: &str) -> String {
        match self {
            Self::Create => format!("New {noun}"),
            Self::Edit(_) => format!("Edit {noun}"),
        }
    }
}

// Deliberately loose: one @, no whitespace, a dot in the domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"));

/// `(key, message)` pair for a failed check, `None` when it passes.
pub type FieldError = (&'static str, String);

/// Required text field check.
#[must_use]
pub fn require(state: &FormModalState, key: &'static str, label: &str) -> Option<FieldError> {
    match state.text_value(key) {
        Some(value) if !value.is_empty() => None,
        _ => Some((key, format!("{label} is required"))),
    }
}

/// Email format check; empty values pass (pair with [`require`] when
/// the field is mandatory).
#[must_use]
pub fn check_email(state: &FormModalState, key: &'static str) -> Option<FieldError> {
    let value = state.text_value(key).unwrap_or("");
    if value.is_empty() || EMAIL_RE.is_match(value) {
        None
    } else {
        Some((key, String::from("Invalid email format")))
    }
}

/// Numeric field check within an inclusive range; empty values fail
/// only when `required`.
#[must_use]
pub fn check_number(
    state: &FormModalState,
    key: &'static str,
    label: &str,
    range: std::ops::RangeInclusive<f64>,
    required: bool,
) -> Option<FieldError> {
    let value = state.text_value(key).unwrap_or("");
    if value.is_empty() {
        return required.then(|| (key, format!("{label} is required")));
    }
    match value.parse::<f64>() {
        Ok(number) if range.contains(&number) => None,
        Ok(_) if *range.end() == f64::MAX => {
            Some((key, format!("{label} must be at least {}", range.start())))
        }
        Ok(_) => Some((
            key,
            format!("{label} must be between {} and {}", range.start(), range.end()),
        )),
        Err(_) => Some((key, format!("{label} must be a number"))),
    }
}

/// ZIP check: at least five characters when present.
#[must_use]
pub fn check_zip(state: &FormModalState, key: &'static str) -> Option<FieldError> {
    let value = state.text_value(key).unwrap_or("");
    if !value.is_empty() && value.len() < 5 {
        Some((key, String::from("ZIP must be at least 5 characters")))
    } else {
        None
    }
}

/// Trimmed text value, `None` when empty. Payload builders use this so
/// optional fields serialize as absent rather than `""`.
#[must_use]
pub fn optional_text(state: &FormModalState, key: &str) -> Option<String> {
    state
        .text_value(key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Parsed numeric value of a text field, `None` when absent or invalid.
#[must_use]
pub fn number_value(state: &FormModalState, key: &str) -> Option<f64> {
    state.text_value(key).and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_widgets::modal::FormField;

    fn state_with(key: &'static str, value: &str) -> FormModalState {
        FormModalState::new("t", vec![FormField::text(key, "Field", value)])
    }

    #[test]
    fn require_flags_empty_and_whitespace() {
        assert!(require(&state_with("name", ""), "name", "Name").is_some());
        assert!(require(&state_with("name", "   "), "name", "Name").is_some());
        assert!(require(&state_with("name", "Acme"), "name", "Name").is_none());
    }

    #[test]
    fn email_rules() {
        assert!(check_email(&state_with("email", ""), "email").is_none());
        assert!(check_email(&state_with("email", "info@acme.com"), "email").is_none());
        let err = check_email(&state_with("email", "bad-email"), "email");
        assert_eq!(err, Some(("email", String::from("Invalid email format"))));
        assert!(check_email(&state_with("email", "a b@c.com"), "email").is_some());
    }

    #[test]
    fn number_range_and_format() {
        let within = state_with("pct", "58.5");
        assert!(check_number(&within, "pct", "Fineness", 0.0..=100.0, true).is_none());
        let out = state_with("pct", "101");
        assert!(check_number(&out, "pct", "Fineness", 0.0..=100.0, true).is_some());
        let junk = state_with("pct", "abc");
        assert_eq!(
            check_number(&junk, "pct", "Fineness", 0.0..=100.0, true),
            Some(("pct", String::from("Fineness must be a number")))
        );
        let empty = state_with("pct", "");
        assert!(check_number(&empty, "pct", "Fineness", 0.0..=100.0, false).is_none());
        assert!(check_number(&empty, "pct", "Fineness", 0.0..=100.0, true).is_some());
    }

    #[test]
    fn unbounded_range_reads_as_at_least() {
        let low = state_with("grams", "-1");
        assert_eq!(
            check_number(&low, "grams", "Grams", 0.0..=f64::MAX, true),
            Some(("grams", String::from("Grams must be at least 0")))
        );
    }

    #[test]
    fn zip_length() {
        assert!(check_zip(&state_with("zip", ""), "zip").is_none());
        assert!(check_zip(&state_with("zip", "123"), "zip").is_some());
        assert!(check_zip(&state_with("zip", "02134"), "zip").is_none());
    }

    #[test]
    fn optional_text_drops_empty() {
        assert_eq!(optional_text(&state_with("phone", "  "), "phone"), None);
        assert_eq!(
            optional_text(&state_with("phone", " 555 "), "phone"),
            Some(String::from("555"))
        );
    }
}
