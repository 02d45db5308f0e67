//! Error taxonomy of sync operations
//!
//! Remote failures enter as [`OpError::Api`] with their class computed once
//! by [`classify`](crate::classify::classify). Local failures (missing IDs,
//! bad adopt options) are raised before any remote call.

use konnect_sdk::SdkError;
use thiserror::Error;

use crate::classify::{classify, ErrorClass};
use crate::conditions::reason;
use crate::entity::EntityKind;

/// Result alias for sync operations
pub type OpResult<T> = Result<T, OpError>;

/// Operation being performed, used in error messages and logs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Create the remote entity
    Create,
    /// Update the remote entity
    Update,
    /// Delete the remote entity
    Delete,
    /// Bind to a pre-existing remote entity
    Adopt,
    /// Read-only binding to a remote entity
    Mirror,
}

impl Op {
    /// Lowercase verb
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Adopt => "adopt",
            Self::Mirror => "mirror",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by dispatch, adapters, adoption and mirroring
#[derive(Debug, Error)]
pub enum OpError {
    /// A parent entity has not been programmed yet
    #[error("{kind} {entity} is missing the Konnect ID of its {parent}")]
    MissingParentId {
        /// Kind of the entity being synced
        kind: EntityKind,
        /// `namespace/name` of the entity
        entity: String,
        /// Relationship whose ID is missing (e.g. "control plane")
        parent: &'static str,
    },

    /// Update or delete was requested for an entity that was never created
    #[error("{kind} {entity} has no Konnect ID, cannot {op}")]
    MissingKonnectId {
        /// Kind of the entity
        kind: EntityKind,
        /// `namespace/name` of the entity
        entity: String,
        /// Operation that required the ID
        op: Op,
    },

    /// Create was requested for an entity that already has a remote ID
    #[error("{kind} {entity} already has Konnect ID {id}")]
    KonnectIdAlreadySet {
        /// Kind of the entity
        kind: EntityKind,
        /// `namespace/name` of the entity
        entity: String,
        /// The ID already on status
        id: String,
    },

    /// The API answered 2xx without a usable body or ID
    #[error("{op} {kind} returned an empty response")]
    NilResponse {
        /// Kind of the entity
        kind: EntityKind,
        /// Operation that got the empty answer
        op: Op,
    },

    /// Classified remote failure
    #[error("{source}")]
    Api {
        /// Failure class
        class: ErrorClass,
        /// Raw SDK error; its Display never includes the trace instance
        #[source]
        source: SdkError,
    },

    /// The primary entity was created but a dependent write failed
    #[error("{kind} created with Konnect ID {konnect_id} but {reason}: {source}")]
    CreatedButRelationsFailed {
        /// Kind of the entity
        kind: EntityKind,
        /// ID assigned by the primary create; must be kept on status
        konnect_id: String,
        /// Condition reason describing the failed relation
        reason: &'static str,
        /// Failure of the relation write
        #[source]
        source: Box<OpError>,
    },

    /// Adoption was rejected
    #[error(transparent)]
    Adoption(#[from] AdoptionError),

    /// Mirroring failed
    #[error("{message}")]
    Mirror {
        /// Condition reason
        reason: &'static str,
        /// What went wrong
        message: String,
    },

    /// Local and remote shapes could not be compared
    #[error("cannot compare configurations: {message}")]
    Normalization {
        /// What could not be normalized
        message: String,
    },

    /// The remote entity differs and cannot be modified in place
    #[error("{kind} {entity} cannot be modified after creation: {message}")]
    Immutable {
        /// Kind of the entity
        kind: EntityKind,
        /// `namespace/name` of the entity
        entity: String,
        /// What differs
        message: String,
    },

    /// Any of the above, with operation and object coordinates
    #[error("failed to {op} {kind} {entity}: {source}")]
    Wrapped {
        /// Operation that failed
        op: Op,
        /// Kind of the entity
        kind: EntityKind,
        /// `namespace/name` of the entity
        entity: String,
        /// Underlying failure
        #[source]
        source: Box<OpError>,
    },
}

impl From<SdkError> for OpError {
    fn from(source: SdkError) -> Self {
        Self::Api {
            class: classify(&source),
            source,
        }
    }
}

impl OpError {
    /// Create a missing parent ID error
    pub fn missing_parent(kind: EntityKind, entity: impl Into<String>, parent: &'static str) -> Self {
        Self::MissingParentId {
            kind,
            entity: entity.into(),
            parent,
        }
    }

    /// Create a normalization error
    pub fn normalization(message: impl Into<String>) -> Self {
        Self::Normalization {
            message: message.into(),
        }
    }

    /// Wrap with operation and object coordinates
    ///
    /// Already wrapped errors are returned unchanged so that the message
    /// names the outermost operation only once.
    pub fn wrap(self, op: Op, kind: EntityKind, entity: impl Into<String>) -> Self {
        match self {
            wrapped @ Self::Wrapped { .. } => wrapped,
            other => Self::Wrapped {
                op,
                kind,
                entity: entity.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost non-wrapper error
    pub fn root(&self) -> &OpError {
        match self {
            Self::Wrapped { source, .. } => source.root(),
            other => other,
        }
    }

    /// Class of the underlying remote failure, if this is one
    pub fn class(&self) -> Option<ErrorClass> {
        match self.root() {
            Self::Api { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// True when the remote entity does not exist
    pub fn is_not_found(&self) -> bool {
        self.class() == Some(ErrorClass::NotFound)
    }

    /// True when the remote reported a conflict
    pub fn is_conflict(&self) -> bool {
        self.class() == Some(ErrorClass::Conflict)
    }

    /// Check if this error is retryable
    ///
    /// Bad requests, adoption rejections, immutability violations and
    /// programming errors need a spec change; everything else may succeed on
    /// a later reconcile.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MissingParentId { .. } => true,
            Self::MissingKonnectId { .. } => false,
            Self::KonnectIdAlreadySet { .. } => false,
            Self::NilResponse { .. } => true,
            Self::Api { class, .. } => *class != ErrorClass::BadRequest,
            Self::CreatedButRelationsFailed { .. } => true,
            Self::Adoption(_) => false,
            Self::Mirror { reason: r, .. } => *r == reason::MIRROR_FETCH_FAILED,
            Self::Normalization { .. } => false,
            Self::Immutable { .. } => false,
            Self::Wrapped { source, .. } => source.is_retryable(),
        }
    }
}

/// Reasons an adoption is rejected
///
/// Each variant maps to a distinct `Adopted` condition reason.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AdoptionError {
    /// No adopt options on the spec
    #[error("adopt options are not set")]
    OptionsMissing,

    /// `from` names an unsupported source
    #[error("adoption source is not supported")]
    SourceNotSupported,

    /// `mode` names an unsupported mode
    #[error("adoption mode {mode} is not supported")]
    ModeNotSupported {
        /// The declared mode
        mode: String,
    },

    /// No Konnect ID to adopt
    #[error("Konnect ID to adopt is empty")]
    IdMissing,

    /// A parent entity has no Konnect ID yet
    #[error("cannot adopt {id}: missing Konnect ID of {parent}")]
    ParentMissing {
        /// Entity to adopt
        id: String,
        /// Missing relationship
        parent: &'static str,
    },

    /// The remote entity could not be read
    #[error("failed to fetch {id}: {message}")]
    FetchFailed {
        /// Entity to adopt
        id: String,
        /// Fetch failure
        message: String,
    },

    /// The remote entity belongs to another local object
    #[error("{id} is tagged with UID {remote_uid}, not {local_uid}")]
    UidTagConflict {
        /// Entity to adopt
        id: String,
        /// UID found in the remote identity tags
        remote_uid: String,
        /// UID of the local object
        local_uid: String,
    },

    /// Match mode found a difference
    #[error("{id} does not match the spec")]
    NotMatch {
        /// Entity to adopt
        id: String,
    },

    /// Match mode could not compare the remote entity with the spec
    #[error("cannot compare {id} with the spec: {message}")]
    NotComparable {
        /// Entity to adopt
        id: String,
        /// Normalization failure
        message: String,
    },

    /// Override mode could not write the spec
    #[error("failed to override {id}: {message}")]
    UpdateFailed {
        /// Entity to adopt
        id: String,
        /// Update failure
        message: String,
    },
}

impl AdoptionError {
    /// Condition reason for this rejection
    pub fn reason(&self) -> &'static str {
        match self {
            Self::OptionsMissing => reason::ADOPTION_OPTIONS_MISSING,
            Self::SourceNotSupported => reason::ADOPTION_SOURCE_NOT_SUPPORTED,
            Self::ModeNotSupported { .. } => reason::ADOPTION_MODE_NOT_SUPPORTED,
            Self::IdMissing => reason::ADOPTION_ID_MISSING,
            Self::ParentMissing { .. } => reason::ADOPTION_PARENT_MISSING,
            Self::FetchFailed { .. } => reason::ADOPTION_FETCH_FAILED,
            Self::UidTagConflict { .. } => reason::ADOPTION_UID_TAG_CONFLICT,
            Self::NotMatch { .. } => reason::ADOPTION_NOT_MATCH,
            Self::NotComparable { .. } => reason::ADOPTION_NOT_COMPARABLE,
            Self::UpdateFailed { .. } => reason::ADOPTION_UPDATE_FAILED,
        }
    }
}
