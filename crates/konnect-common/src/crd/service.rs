//! KongService and KongRoute CRDs

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, ControlPlaneRef, KonnectEntityStatus, NamespacedRef};

/// KongService declares an upstream service in a Konnect control plane.
///
/// Example:
/// ```yaml
/// apiVersion: configuration.konghq.com/v1alpha1
/// kind: KongService
/// metadata:
///   name: svc-1
/// spec:
///   controlPlaneRef:
///     type: konnectNamespacedRef
///     konnectNamespacedRef:
///       name: prod
///   name: svc-1
///   host: example.com
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongService",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Host","type":"string","jsonPath":".spec.host"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongServiceSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Service name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Upstream host
    pub host: String,

    /// Upstream port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,

    /// Upstream protocol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Upstream path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Number of retries on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,

    /// Connect timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<i64>,

    /// Read timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<i64>,

    /// Write timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout: Option<i64>,

    /// Whether the service is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing service instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongRoute declares a route, optionally attached to a KongService.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongRoute",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongRouteSpec {
    /// Owning control plane, for service-less routes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Service the route forwards to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ref: Option<NamespacedRef>,

    /// Route name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Accepted protocols
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    /// Accepted HTTP methods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,

    /// Matched hosts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    /// Matched paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    /// Matched headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Vec<String>>,

    /// Strip the matched path prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_path: Option<bool>,

    /// Forward the original Host header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_host: Option<bool>,

    /// Status code for HTTPS redirects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_redirect_status_code: Option<i64>,

    /// Regex evaluation priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_priority: Option<i64>,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing route instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
