//! Common types for Konnect sync: CRDs, errors, settings and telemetry

#![deny(missing_docs)]

pub mod config;
pub mod crd;
pub mod error;
pub mod telemetry;

pub use config::SyncConfig;
pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Annotation holding comma-separated user tags
pub const TAGS_ANNOTATION: &str = "konghq.com/tags";
