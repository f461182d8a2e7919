#![forbid(unsafe_code)]

//! Typed HTTP wrapper over the backend's REST surface.
//!
//! One [`ApiClient`] is shared by every page. It owns the reqwest
//! client, the base URL, and the current bearer token. Retry policy
//! lives a layer up in [`crate::QueryClient`]; this layer does exactly
//! one request per call.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::dto::{AuthResponse, LoginRequest, Paged, User};
use crate::error::{ApiError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resource path segments, one per backend collection.
pub mod routes {
    pub const COMPANIES: &str = "companies";
    pub const CONTACTS: &str = "contacts";
    pub const ORDERS: &str = "orders";
    pub const METALS: &str = "metals";
    pub const ROLES: &str = "roles";
    pub const DEPARTMENTS: &str = "departments";
    pub const SUPPLIES: &str = "supplies";
    pub const LOOKUP_VALUES: &str = "lookup-values";
    pub const ADDRESSES: &str = "addresses";
    pub const METAL_DEPOSITS: &str = "metal-deposits";
}

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: usize,
    pub page_size: usize,
    pub search: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
            search: None,
        }
    }
}

impl ListParams {
    #[must_use]
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            search: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = &self.search
            && !search.is_empty()
        {
            query.push(("search".to_string(), search.clone()));
        }
        query
    }
}

/// Shared REST client. Token updates go through [`ApiClient::set_token`]
/// so a login or logout takes effect for every subsequent request.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client against `base_url` (scheme + host, no trailing
    /// path).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.read().is_ok_and(|slot| slot.is_some())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Ok(slot) = self.token.read()
            && let Some(token) = slot.as_deref()
        {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = Self::check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 {
            return Err(ApiError::Unauthenticated);
        }
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body, status.canonical_reason().unwrap_or("request failed"));
        warn!(status = status.as_u16(), %message, "request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// POST `/auth/login`. Never sends a bearer token; a stale one must
    /// not shadow fresh credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = format!("{}/auth/login", self.base_url);
        debug!(%url, "login");
        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// GET `/auth/me` for the authenticated user.
    pub async fn me(&self) -> Result<User> {
        let response = self.request(Method::GET, "auth/me").send().await?;
        Self::decode(response).await
    }

    /// GET one page of `resource`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &ListParams,
    ) -> Result<Paged<T>> {
        debug!(resource, page = params.page, "list");
        let response = self
            .request(Method::GET, resource)
            .query(&params.to_query())
            .send()
            .await?;
        Self::decode(response).await
    }

    /// GET an arbitrary path as raw JSON. The query cache stores values
    /// untyped so one cache serves every resource.
    pub async fn get_value(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::decode(response).await
    }

    /// POST a new entity to `resource`.
    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T> {
        debug!(resource, "create");
        let response = self
            .request(Method::POST, resource)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PATCH `resource/{id}`.
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        id: i64,
        body: &B,
    ) -> Result<T> {
        debug!(resource, id, "update");
        let response = self
            .request(Method::PATCH, &format!("{resource}/{id}"))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// DELETE `resource/{id}`.
    pub async fn delete(&self, resource: &str, id: i64) -> Result<()> {
        debug!(resource, id, "delete");
        let response = self
            .request(Method::DELETE, &format!("{resource}/{id}"))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Pull a human-readable message out of an error body. The backend
/// sends `{"message": "..."}`; anything else falls back to the raw body
/// or the status reason.
fn extract_message(body: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(message) = value.get("message").and_then(Value::as_str)
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_build_query_pairs() {
        let params = ListParams::new(2, 50).search("gold");
        assert_eq!(
            params.to_query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "50".to_string()),
                ("search".to_string(), "gold".to_string()),
            ]
        );
    }

    #[test]
    fn empty_search_is_omitted() {
        let params = ListParams::new(1, 25).search("");
        assert_eq!(params.to_query().len(), 2);
    }

    #[test]
    fn extract_message_prefers_json_message() {
        assert_eq!(
            extract_message(r#"{"message": "Name is required"}"#, "Bad Request"),
            "Name is required"
        );
    }

    #[test]
    fn extract_message_falls_back_to_body_then_reason() {
        assert_eq!(extract_message("plain text", "Bad Request"), "plain text");
        assert_eq!(extract_message("  ", "Bad Request"), "Bad Request");
        assert_eq!(extract_message(r#"{"other": 1}"#, "Bad Request"), r#"{"other": 1}"#);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn token_toggles() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        assert!(!client.has_token());
        client.set_token(Some("abc".into()));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }
}
