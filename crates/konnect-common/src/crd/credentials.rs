//! Consumer credential CRDs: basic-auth, API key and ACL

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, KonnectEntityStatus, NamespacedRef};

/// KongCredentialBasicAuth declares a basic-auth credential of a KongConsumer.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCredentialBasicAuth",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongCredentialBasicAuthSpec {
    /// Owning consumer
    pub consumer_ref: NamespacedRef,

    /// Username
    pub username: String,

    /// Password
    pub password: String,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing credential instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongCredentialAPIKey declares a key-auth credential of a KongConsumer.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCredentialAPIKey",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongCredentialAPIKeySpec {
    /// Owning consumer
    pub consumer_ref: NamespacedRef,

    /// The API key
    pub key: String,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing credential instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongCredentialACL declares an ACL group membership of a KongConsumer.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCredentialACL",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Group","type":"string","jsonPath":".spec.group"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongCredentialACLSpec {
    /// Owning consumer
    pub consumer_ref: NamespacedRef,

    /// ACL group
    pub group: String,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing credential instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
