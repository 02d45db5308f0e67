//! Classification of remote API failures
//!
//! Every SDK error is classified exactly once, where the SDK call returns, into
//! the closed [`ErrorClass`] taxonomy. Recovery decisions downstream match on
//! the class and never re-inspect status codes or messages.

use konnect_sdk::SdkError;

/// Closed taxonomy of remote failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The entity does not exist remotely
    NotFound,
    /// The entity already exists, or the request conflicts with remote state
    Conflict,
    /// A previous submission is still being applied, or the submission is
    /// identical to the current state
    TransientProvisioningConflict,
    /// The request was structurally rejected; retrying cannot succeed
    BadRequest,
    /// Anything else, including transport failures
    Other,
}

impl ErrorClass {
    /// Stable name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::TransientProvisioningConflict => "transient_provisioning_conflict",
            Self::BadRequest => "bad_request",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detail fragments Konnect uses for a configuration that is still applying
const IN_PROGRESS_MARKERS: &[&str] = &[
    "in progress",
    "in-progress",
    "currently being",
    "still being applied",
];

/// Detail fragments Konnect uses for a resubmission of the current configuration
const NO_CHANGE_MARKERS: &[&str] = &[
    "no changes",
    "identical",
    "same as the current",
    "already applied",
];

/// Classify an SDK error
pub fn classify(err: &SdkError) -> ErrorClass {
    let Some(status) = err.status() else {
        return ErrorClass::Other;
    };

    match status {
        404 => ErrorClass::NotFound,
        409 => {
            if is_transient_conflict(err) {
                ErrorClass::TransientProvisioningConflict
            } else {
                ErrorClass::Conflict
            }
        }
        400 | 422 => ErrorClass::BadRequest,
        _ => ErrorClass::Other,
    }
}

fn is_transient_conflict(err: &SdkError) -> bool {
    let SdkError::Api(api) = err else {
        return false;
    };
    let text = [api.title.as_deref(), api.detail.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    IN_PROGRESS_MARKERS
        .iter()
        .chain(NO_CHANGE_MARKERS)
        .any(|marker| text.contains(marker))
}
