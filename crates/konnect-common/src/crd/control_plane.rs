//! KonnectGatewayControlPlane CRD
//!
//! A control plane is the top-level Konnect scope every gateway entity lives
//! in. Control planes carry labels rather than tags.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, EntitySource, KonnectEntityStatus, MirrorSpec};

/// Control plane flavour
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ControlPlaneClusterType {
    /// Hybrid control plane
    #[default]
    #[serde(rename = "CLUSTER_TYPE_CONTROL_PLANE")]
    ControlPlane,
    /// Managed by an in-cluster ingress controller
    #[serde(rename = "CLUSTER_TYPE_K8S_INGRESS_CONTROLLER")]
    K8sIngressController,
    /// Group of other control planes
    #[serde(rename = "CLUSTER_TYPE_CONTROL_PLANE_GROUP")]
    ControlPlaneGroup,
    /// Serverless gateway
    #[serde(rename = "CLUSTER_TYPE_SERVERLESS")]
    Serverless,
}

/// Data plane authentication mode
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControlPlaneAuthType {
    /// Pinned client certificates
    #[default]
    PinnedClientCerts,
    /// PKI client certificates
    PkiClientCerts,
}

/// Member of a control plane group, by Konnect ID
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneMember {
    /// Konnect ID of the member control plane
    #[serde(rename = "konnectID")]
    pub konnect_id: String,
}

/// KonnectGatewayControlPlane declares a Konnect control plane.
///
/// Example:
/// ```yaml
/// apiVersion: konnect.konghq.com/v1alpha1
/// kind: KonnectGatewayControlPlane
/// metadata:
///   name: prod
/// spec:
///   name: prod
///   clusterType: CLUSTER_TYPE_CONTROL_PLANE
///   labels:
///     team: payments
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "konnect.konghq.com",
    version = "v1alpha1",
    kind = "KonnectGatewayControlPlane",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#,
    printcolumn = r#"{"name":"Programmed","type":"string","jsonPath":".status.conditions[?(@.type==\"Programmed\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KonnectGatewayControlPlaneSpec {
    /// Control plane name in Konnect
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cluster type; immutable after creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<ControlPlaneClusterType>,

    /// Data plane auth mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<ControlPlaneAuthType>,

    /// Whether this control plane backs Dedicated Cloud Gateways
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_gateway: Option<bool>,

    /// User labels, merged over the identity labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Group members; only valid for CLUSTER_TYPE_CONTROL_PLANE_GROUP
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ControlPlaneMember>,

    /// Origin (managed) or Mirror (read-only)
    #[serde(default)]
    pub source: EntitySource,

    /// Mirror coordinates; required when source is Mirror
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<MirrorSpec>,

    /// Adopt an existing control plane instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

impl KonnectGatewayControlPlane {
    /// True for control plane groups
    pub fn is_group(&self) -> bool {
        self.spec.cluster_type == Some(ControlPlaneClusterType::ControlPlaneGroup)
    }

    /// Konnect IDs of the declared group members
    pub fn member_ids(&self) -> Vec<String> {
        self.spec
            .members
            .iter()
            .map(|m| m.konnect_id.clone())
            .collect()
    }
}
