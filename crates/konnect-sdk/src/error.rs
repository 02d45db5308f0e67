//! Errors returned by the Konnect management API
//!
//! Konnect answers failed requests with an RFC 7807 style problem body. The
//! `instance` member carries a per-request trace identifier (`kong:trace:...`)
//! which changes on every call, so it is kept on the error for log correlation
//! but never rendered by `Display`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected field reported by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidParameter {
    /// Field path, e.g. `name` or `config.cidr_block`
    pub field: String,
    /// Why the field was rejected
    pub reason: String,
}

/// Problem body of a non-2xx API response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Short, human-readable summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable explanation specific to this occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request trace identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Per-field validation failures
    #[serde(default, rename = "invalid_parameters", skip_serializing_if = "Vec::is_empty")]
    pub invalid_parameters: Vec<InvalidParameter>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(title) = &self.title {
            write!(f, ": {title}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        if !self.invalid_parameters.is_empty() {
            let params = self
                .invalid_parameters
                .iter()
                .map(|p| format!("{}: {}", p.field, p.reason))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " ({params})")?;
        }
        Ok(())
    }
}

/// Error returned by every SDK operation
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SdkError {
    /// The API answered with a non-2xx status
    #[error("{0}")]
    Api(ApiError),

    /// The request never produced an API answer (connect failure, timeout, cancellation)
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },
}

impl SdkError {
    /// Build an API error with a status, title and detail
    pub fn api(status: u16, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Api(ApiError {
            status,
            title: Some(title.into()),
            detail: Some(detail.into()),
            instance: None,
            invalid_parameters: Vec::new(),
        })
    }

    /// Build a 404 error
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::api(404, "Not Found", detail)
    }

    /// Build a 409 error
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::api(409, "Conflict", detail)
    }

    /// Build a 400 error
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::api(400, "Bad Request", detail)
    }

    /// Build a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Attach a request trace identifier
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        if let Self::Api(api) = &mut self {
            api.instance = Some(instance.into());
        }
        self
    }

    /// Attach a per-field validation failure
    pub fn with_invalid_parameter(
        mut self,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        if let Self::Api(api) = &mut self {
            api.invalid_parameters.push(InvalidParameter {
                field: field.into(),
                reason: reason.into(),
            });
        }
        self
    }

    /// HTTP status code, if the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(api) => Some(api.status),
            Self::Transport { .. } => None,
        }
    }

    /// Problem detail text, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.detail.as_deref(),
            Self::Transport { .. } => None,
        }
    }

    /// Request trace identifier, if any
    pub fn instance(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.instance.as_deref(),
            Self::Transport { .. } => None,
        }
    }
}
