//! Dedicated Cloud Gateway CRDs: networks, data plane group configurations
//! and transit gateways

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    AdoptOptions, ControlPlaneRef, EntitySource, KonnectEntityStatus, MirrorSpec, NamespacedRef,
};

// =============================================================================
// Network
// =============================================================================

/// KonnectCloudGatewayNetwork declares a cloud network for dedicated gateways.
///
/// Networks take several minutes to provision; everything except the name is
/// fixed at creation.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "konnect.konghq.com",
    version = "v1alpha1",
    kind = "KonnectCloudGatewayNetwork",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Region","type":"string","jsonPath":".spec.region"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KonnectCloudGatewayNetworkSpec {
    /// Network name
    pub name: String,

    /// Cloud provider account ID registered in Konnect
    #[serde(default)]
    pub cloud_gateway_provider_account_id: String,

    /// Provider region
    #[serde(default)]
    pub region: String,

    /// Availability zones; order is not significant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,

    /// CIDR block of the network
    #[serde(default)]
    pub cidr_block: String,

    /// Origin (managed) or Mirror (read-only)
    #[serde(default)]
    pub source: EntitySource,

    /// Mirror coordinates; required when source is Mirror
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<MirrorSpec>,

    /// Adopt an existing network instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

// =============================================================================
// Data plane group configuration
// =============================================================================

/// Autoscale flavour of a data plane group
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AutoscaleType {
    /// Fixed instance count
    #[default]
    Static,
    /// Scale on request rate
    Autopilot,
}

/// Fixed-size autoscale settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleStaticSpec {
    /// Instance type, e.g. `small`
    pub instance_type: String,
    /// Number of instances
    pub requested_instances: i64,
}

/// Request-rate-driven autoscale settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleAutopilotSpec {
    /// Baseline requests per second
    pub base_rps: i64,
    /// Upper bound of requests per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rps: Option<i64>,
}

/// Autoscale settings; only the block named by `type` is meaningful
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataPlaneGroupAutoscale {
    /// Which block applies
    #[serde(rename = "type", default)]
    pub type_: AutoscaleType,

    /// Static settings
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_: Option<AutoscaleStaticSpec>,

    /// Autopilot settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autopilot: Option<AutoscaleAutopilotSpec>,
}

/// Environment variable for data plane nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct DataPlaneEnvVar {
    /// Variable name
    pub name: String,
    /// Variable value
    pub value: String,
}

/// One requested data plane group
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataPlaneGroupSpec {
    /// Cloud provider (aws, azure, gcp)
    pub provider: String,

    /// Provider region
    pub region: String,

    /// Konnect ID of the network the group runs in
    #[serde(rename = "networkID")]
    pub network_id: String,

    /// Autoscale settings
    pub autoscale: DataPlaneGroupAutoscale,

    /// Environment variables; order is not significant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<DataPlaneEnvVar>,
}

/// KonnectCloudGatewayDataPlaneGroupConfiguration declares the data plane
/// groups of one cloud gateway control plane.
///
/// Konnect keeps a single configuration per control plane: every submission
/// replaces the previous one.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "konnect.konghq.com",
    version = "v1alpha1",
    kind = "KonnectCloudGatewayDataPlaneGroupConfiguration",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Version","type":"string","jsonPath":".spec.version"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KonnectCloudGatewayDataPlaneGroupConfigurationSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// Gateway version, e.g. `3.9`
    pub version: String,

    /// API access mode (private, public, private+public)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_access: Option<String>,

    /// Data plane groups; order is not significant
    #[serde(default)]
    pub dataplane_groups: Vec<DataPlaneGroupSpec>,

    /// Adopt an existing configuration instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

// =============================================================================
// Transit gateway
// =============================================================================

/// Attachment flavour of a transit gateway
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum TransitGatewayType {
    /// AWS transit gateway
    #[default]
    #[serde(rename = "AWSTransitGateway")]
    AwsTransitGateway,
    /// Azure VNET peering
    #[serde(rename = "AzureTransitGateway")]
    AzureTransitGateway,
}

/// Private DNS forwarding entry
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransitGatewayDnsConfigSpec {
    /// Remote DNS server addresses
    #[serde(default)]
    pub remote_dns_server_ip_addresses: Vec<String>,
    /// Domains forwarded to the remote servers
    #[serde(default)]
    pub domain_proxy_list: Vec<String>,
}

/// AWS attachment settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsTransitGatewaySpec {
    /// AWS transit gateway ID
    pub transit_gateway_id: String,
    /// RAM share ARN
    pub ram_share_arn: String,
}

/// Azure attachment settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AzureTransitGatewaySpec {
    /// Azure tenant
    pub tenant_id: String,
    /// Azure subscription
    pub subscription_id: String,
    /// Resource group of the peered VNET
    pub resource_group_name: String,
    /// Peered VNET name
    pub vnet_name: String,
}

/// KonnectCloudGatewayTransitGateway attaches a network to a customer network.
///
/// Transit gateways cannot be modified once created.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "konnect.konghq.com",
    version = "v1alpha1",
    kind = "KonnectCloudGatewayTransitGateway",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Type","type":"string","jsonPath":".spec.type"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KonnectCloudGatewayTransitGatewaySpec {
    /// Parent network
    pub network_ref: NamespacedRef,

    /// Transit gateway name
    pub name: String,

    /// CIDR blocks routed through the gateway; order is not significant
    #[serde(default)]
    pub cidr_blocks: Vec<String>,

    /// DNS forwarding configuration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_config: Vec<TransitGatewayDnsConfigSpec>,

    /// Attachment flavour
    #[serde(rename = "type", default)]
    pub type_: TransitGatewayType,

    /// AWS settings, for AWSTransitGateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_transit_gateway: Option<AwsTransitGatewaySpec>,

    /// Azure settings, for AzureTransitGateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_transit_gateway: Option<AzureTransitGatewaySpec>,

    /// Adopt an existing transit gateway instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
