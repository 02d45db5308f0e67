//! KongConsumer and KongConsumerGroup CRDs

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, ControlPlaneRef, KonnectEntityStatus};

/// KongConsumer declares an API consumer.
///
/// Consumer group membership is declared by group name; names are resolved to
/// Konnect IDs through the consumer groups API.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongConsumer",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Username","type":"string","jsonPath":".spec.username"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongConsumerSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Consumer username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Consumer custom ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    /// Names of consumer groups this consumer belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumer_groups: Vec<String>,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing consumer instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongConsumerGroup declares a consumer group.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongConsumerGroup",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongConsumerGroupSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Group name
    pub name: String,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing group instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
