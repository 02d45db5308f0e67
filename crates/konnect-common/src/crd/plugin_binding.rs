//! KongPluginBinding CRD

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, ControlPlaneRef, KonnectEntityStatus, NamespacedRef};

/// Entities a plugin instance is scoped to
///
/// All unset means a global plugin. Referenced entities must already be
/// programmed; their Konnect IDs are read from this binding's status.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginTargets {
    /// Target service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<NamespacedRef>,

    /// Target route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_ref: Option<NamespacedRef>,

    /// Target consumer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_ref: Option<NamespacedRef>,

    /// Target consumer group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_group_ref: Option<NamespacedRef>,
}

/// KongPluginBinding declares one plugin instance.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongPluginBinding",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Plugin","type":"string","jsonPath":".spec.pluginName"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongPluginBindingSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Plugin name, e.g. `rate-limiting`
    pub plugin_name: String,

    /// Plugin instance name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,

    /// Plugin configuration
    #[serde(default)]
    pub config: serde_json::Value,

    /// Whether the plugin is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Protocols the plugin runs on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    /// Scope of the plugin
    #[serde(default)]
    pub targets: PluginTargets,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing plugin instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
