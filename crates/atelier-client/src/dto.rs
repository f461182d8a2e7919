#![forbid(unsafe_code)]

//! Serde mirrors of the backend's REST resources.
//!
//! These carry no domain logic. The backend owns the data model; this
//! client only decodes what the list and detail endpoints return and
//! encodes the payloads the entity forms build.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope for every list endpoint: one page of items plus the
/// server-side total used to drive pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}

impl Contact {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Metal purity is stored as a fraction (`0.585`), never as the
/// percentage the form displays (`58.5`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metal {
    pub id: i64,
    pub name: String,
    pub fine_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupValue {
    pub id: i64,
    pub category: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalDeposit {
    pub id: i64,
    pub metal_id: i64,
    pub grams: f64,
    pub deposited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_defaults_when_fields_missing() {
        let page: Paged<Company> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn company_omits_empty_optionals() {
        let company = Company {
            id: 1,
            name: "Acme".into(),
            email: None,
            phone: None,
        };
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Acme"}));
    }

    #[test]
    fn company_round_trips_with_optionals() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Acme",
            "email": "info@acme.com",
            "phone": "555-0100",
        });
        let company: Company = serde_json::from_value(json).unwrap();
        assert_eq!(company.email.as_deref(), Some("info@acme.com"));
    }

    #[test]
    fn metal_purity_is_a_fraction() {
        let metal: Metal =
            serde_json::from_value(serde_json::json!({"id": 1, "name": "14k", "fine_percentage": 0.585}))
                .unwrap();
        assert!((metal.fine_percentage - 0.585).abs() < f64::EPSILON);
    }

    #[test]
    fn contact_full_name_joins_parts() {
        let contact = Contact {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            email: None,
            phone: None,
            company_id: None,
        };
        assert_eq!(contact.full_name(), "Ada Byron");
    }
}
