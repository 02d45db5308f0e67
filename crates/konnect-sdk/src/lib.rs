//! Konnect management API surface consumed by the sync core
//!
//! This crate carries no transport. It defines the typed request and response
//! shapes plus one capability trait per entity kind, so the core can be driven
//! by any HTTP client and by `mockall` mocks in tests (`mock` feature).

pub mod api;
pub mod error;
pub mod models;

pub use api::*;
pub use error::{ApiError, InvalidParameter, SdkError};
