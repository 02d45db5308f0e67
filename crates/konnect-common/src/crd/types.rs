//! Supporting types shared by every Konnect-backed resource

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition status following Kubernetes conventions
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// Condition is true
    True,
    /// Condition is false
    False,
    /// Condition status is unknown
    #[default]
    Unknown,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Kubernetes-style condition for status reporting
///
/// `observed_generation` records the object generation the condition was
/// computed for, so a condition from an older spec is never mistaken for
/// the current one.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Programmed, Adopted, Mirrored)
    #[serde(rename = "type")]
    pub type_: String,

    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,

    /// Machine-readable reason for the condition
    pub reason: String,

    /// Human-readable message
    pub message: String,

    /// Generation of the object this condition was computed for
    #[serde(default)]
    pub observed_generation: i64,

    /// Last time the condition transitioned
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    /// Create a new condition with the current timestamp
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
        observed_generation: i64,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            reason: reason.into(),
            message: message.into(),
            observed_generation,
            last_transition_time: Utc::now(),
        }
    }

    /// True when status is `True`
    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

// =============================================================================
// Adoption
// =============================================================================

/// Where an adopted entity comes from
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdoptSource {
    /// The Konnect management API
    #[default]
    Konnect,
    /// Any value this operator does not support
    #[serde(other)]
    Unsupported,
}

/// How an adopted entity is reconciled with the local spec
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdoptMode {
    /// Adopt only if the remote entity already equals the local spec
    Match,
    /// Overwrite the remote entity with the local spec
    Override,
    /// Any value this operator does not support
    #[serde(other)]
    Unsupported,
}

impl std::fmt::Display for AdoptMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Override => write!(f, "override"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Konnect-side coordinates of an entity to adopt
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdoptKonnectOptions {
    /// Konnect ID of the existing entity
    #[serde(default)]
    pub id: String,
}

/// Options for binding a resource to a pre-existing remote entity
///
/// Example:
/// ```yaml
/// adopt:
///   from: konnect
///   mode: match
///   konnect:
///     id: 5a5c1a1e-...
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdoptOptions {
    /// Source of the entity
    #[serde(default)]
    pub from: AdoptSource,

    /// Adoption mode; override when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AdoptMode>,

    /// Konnect coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub konnect: Option<AdoptKonnectOptions>,
}

impl AdoptOptions {
    /// Adopt the Konnect entity `id` with the given mode
    pub fn konnect(id: impl Into<String>, mode: Option<AdoptMode>) -> Self {
        Self {
            from: AdoptSource::Konnect,
            mode,
            konnect: Some(AdoptKonnectOptions { id: id.into() }),
        }
    }

    /// External ID to adopt, if present and non-empty
    pub fn external_id(&self) -> Option<&str> {
        self.konnect
            .as_ref()
            .map(|k| k.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

// =============================================================================
// Mirroring
// =============================================================================

/// Whether the operator owns an entity or only mirrors it
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum EntitySource {
    /// The operator creates and manages the entity
    #[default]
    Origin,
    /// The entity exists in Konnect and is only read
    Mirror,
}

/// Konnect coordinates of a mirrored entity
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MirrorSpec {
    /// Konnect coordinates
    pub konnect: MirrorKonnect,
}

/// Konnect ID of a mirrored entity
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MirrorKonnect {
    /// Konnect ID
    pub id: String,
}

// =============================================================================
// References
// =============================================================================

/// How a control plane is referenced
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ControlPlaneRefType {
    /// A literal Konnect control plane ID
    #[serde(rename = "konnectID")]
    KonnectId,
    /// A KonnectGatewayControlPlane in the cluster
    #[default]
    #[serde(rename = "konnectNamespacedRef")]
    KonnectNamespacedRef,
}

/// Reference to an object by name, optionally in another namespace
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespacedRef {
    /// Object name
    pub name: String,
    /// Object namespace; the referrer's namespace when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Reference to the control plane an entity belongs to
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneRef {
    /// Reference type
    #[serde(rename = "type", default)]
    pub type_: ControlPlaneRefType,

    /// Konnect ID, for `konnectID` references
    #[serde(default, rename = "konnectID", skip_serializing_if = "Option::is_none")]
    pub konnect_id: Option<String>,

    /// In-cluster reference, for `konnectNamespacedRef` references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub konnect_namespaced_ref: Option<NamespacedRef>,
}

impl ControlPlaneRef {
    /// Reference a control plane by its Konnect ID
    pub fn konnect_id(id: impl Into<String>) -> Self {
        Self {
            type_: ControlPlaneRefType::KonnectId,
            konnect_id: Some(id.into()),
            konnect_namespaced_ref: None,
        }
    }

    /// Reference a KonnectGatewayControlPlane by name
    pub fn namespaced(name: impl Into<String>) -> Self {
        Self {
            type_: ControlPlaneRefType::KonnectNamespacedRef,
            konnect_id: None,
            konnect_namespaced_ref: Some(NamespacedRef {
                name: name.into(),
                namespace: None,
            }),
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Status shared by every Konnect-backed resource
///
/// Parent IDs are written either by the reconciler that resolved the parent
/// reference or by the sync core when the reference is a literal Konnect ID.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KonnectEntityStatus {
    /// Konnect ID of this entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Konnect ID of the owning control plane
    #[serde(default, rename = "controlPlaneID", skip_serializing_if = "Option::is_none")]
    pub control_plane_id: Option<String>,

    /// Konnect ID of the parent service
    #[serde(default, rename = "serviceID", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// Konnect ID of the parent route
    #[serde(default, rename = "routeID", skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    /// Konnect ID of the parent consumer
    #[serde(default, rename = "consumerID", skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,

    /// Konnect ID of the parent consumer group
    #[serde(default, rename = "consumerGroupID", skip_serializing_if = "Option::is_none")]
    pub consumer_group_id: Option<String>,

    /// Konnect ID of the parent certificate
    #[serde(default, rename = "certificateID", skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,

    /// Konnect ID of the parent upstream
    #[serde(default, rename = "upstreamID", skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,

    /// Konnect ID of the parent key set
    #[serde(default, rename = "keySetID", skip_serializing_if = "Option::is_none")]
    pub key_set_id: Option<String>,

    /// Konnect ID of the parent network
    #[serde(default, rename = "networkID", skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,

    /// Status conditions
    #[serde(default)]
    pub conditions: Vec<Condition>,
}
