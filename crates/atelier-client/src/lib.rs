#![forbid(unsafe_code)]

//! REST client for the Atelier admin backend.
//!
//! Four layers, each injectable so pages and tests can substitute their
//! own:
//!
//! - [`ApiClient`]: thin typed HTTP wrapper (reqwest + rustls). Attaches
//!   the bearer token when one is set and maps non-success statuses to
//!   [`ApiError`].
//! - [`QueryClient`]: stale-time read cache keyed by [`QueryKey`]. GETs
//!   retry once, mutations never retry, concurrent fetches for the same
//!   key are de-duplicated, and a successful mutation invalidates
//!   dependent key prefixes.
//! - [`AuthStore`]: token + user session persisted as JSON under the
//!   platform config dir, with role checks for the fixed
//!   `manager` / `admin` set.
//! - DTOs in [`dto`]: serde mirrors of the backend's REST resources.
//!
//! # Failure Modes
//!
//! No error here is fatal. A failed fetch degrades one page section to
//! an inline error; a failed mutation leaves its modal open with the
//! server message displayed.

pub mod api;
pub mod auth;
pub mod dto;
pub mod error;
pub mod query;

pub use api::{ApiClient, ListParams, routes};
pub use auth::{AuthState, AuthStore, ROLE_ADMIN, ROLE_MANAGER};
pub use dto::{
    Address, AuthResponse, Company, Contact, Department, LookupValue, Metal, MetalDeposit, Order,
    Paged, Role, Supply, User,
};
pub use error::{ApiError, Result};
pub use query::{QueryClient, QueryKey};
