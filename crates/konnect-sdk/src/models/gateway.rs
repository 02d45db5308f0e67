//! Gateway entity shapes scoped to a control plane
//!
//! Response types mirror the Konnect control-plane configuration API. Fields
//! the API may omit are `Option`, including `id`: a 2xx with no `id` is a
//! structurally incomplete answer that callers must reject.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference to another entity by ID
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    /// Referenced entity ID
    pub id: String,
}

impl IdRef {
    /// Build a reference to `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// =============================================================================
// Services and routes
// =============================================================================

/// Request body for creating or replacing a service
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A service as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: ServiceInput,
}

/// Request body for creating or replacing a route
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_path: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_host: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_redirect_status_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<IdRef>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A route as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: RouteInput,
}

// =============================================================================
// Consumers and consumer groups
// =============================================================================

/// Request body for creating or replacing a consumer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A consumer as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: ConsumerInput,
}

/// Request body for creating or replacing a consumer group
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroupInput {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A consumer group as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: ConsumerGroupInput,
}

// =============================================================================
// Upstreams and targets
// =============================================================================

/// Request body for creating or replacing an upstream
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An upstream as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: UpstreamInput,
}

/// Request body for creating or replacing a target
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInput {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A target as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: TargetInput,
}

// =============================================================================
// Certificates
// =============================================================================

/// Request body for creating or replacing a certificate
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInput {
    pub cert: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A certificate as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: CertificateInput,
}

/// Request body for creating or replacing a CA certificate
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaCertificateInput {
    pub cert: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_digest: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A CA certificate as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaCertificate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: CaCertificateInput,
}

/// Request body for creating or replacing an SNI
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SniInput {
    pub name: String,
    pub certificate: IdRef,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An SNI as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sni {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: SniInput,
}

// =============================================================================
// Keys and key sets
// =============================================================================

/// PEM-encoded key pair
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PemKeyPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Request body for creating or replacing a key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub kid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pem: Option<PemKeyPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<IdRef>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A key as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: KeyInput,
}

/// Request body for creating or replacing a key set
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySetInput {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A key set as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: KeySetInput,
}

// =============================================================================
// Vaults and plugins
// =============================================================================

/// Request body for creating or replacing a vault
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultInput {
    /// Vault backend, e.g. `env`, `aws`, `hcv`
    pub name: String,
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A vault as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: VaultInput,
}

/// Request body for creating or replacing a plugin
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group: Option<IdRef>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A plugin as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: PluginInput,
}

// =============================================================================
// Consumer credentials
// =============================================================================

/// Request body for a basic-auth credential
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuthInput {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A basic-auth credential as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<IdRef>,
    #[serde(flatten)]
    pub input: BasicAuthInput,
}

/// Request body for a key-auth (API key) credential
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAuthInput {
    pub key: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A key-auth credential as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAuth {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<IdRef>,
    #[serde(flatten)]
    pub input: KeyAuthInput,
}

/// Request body for an ACL credential
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclInput {
    pub group: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An ACL credential as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<IdRef>,
    #[serde(flatten)]
    pub input: AclInput,
}
