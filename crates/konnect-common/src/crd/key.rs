//! KongKey and KongKeySet CRDs

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, ControlPlaneRef, KonnectEntityStatus, NamespacedRef};

/// PEM key pair
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PemKeyPairSpec {
    /// PEM public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// PEM private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// KongKey declares a JWK or PEM key, optionally inside a KongKeySet.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongKey",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"KID","type":"string","jsonPath":".spec.kid"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongKeySpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Key set this key belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_set_ref: Option<NamespacedRef>,

    /// Key identifier
    pub kid: String,

    /// Key name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// JSON Web Key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwk: Option<String>,

    /// PEM key pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pem: Option<PemKeyPairSpec>,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing key instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongKeySet declares a named set of keys.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongKeySet",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongKeySetSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Key set name
    pub name: String,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing key set instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
