//! Dedicated Cloud Gateway shapes: networks, data plane group configurations
//! and transit gateways
//!
//! One-of fields are modelled as enums. Variants the SDK does not know about
//! deserialize into `Unrecognized` so that callers can refuse to reason about
//! them instead of treating them as empty.

use serde::{Deserialize, Serialize};

// =============================================================================
// Networks
// =============================================================================

/// Request body for creating a network
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNetworkRequest {
    pub name: String,
    pub cloud_gateway_provider_account_id: String,
    pub region: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    pub cidr_block: String,
}

/// Request body for updating a network; only the name is mutable
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchNetworkRequest {
    pub name: String,
}

/// A network as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub cloud_gateway_provider_account_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub cidr_block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// =============================================================================
// Data plane group configurations
// =============================================================================

/// Static autoscale settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscaleStatic {
    pub instance_type: String,
    pub requested_instances: i64,
}

/// Autopilot autoscale settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscaleAutopilot {
    pub base_rps: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rps: Option<i64>,
}

/// Autoscale one-of
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Autoscale {
    Static(AutoscaleStatic),
    Autopilot(AutoscaleAutopilot),
    /// A variant this SDK version does not know
    #[serde(other)]
    Unrecognized,
}

/// Environment variable injected into data plane nodes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentField {
    pub name: String,
    pub value: String,
}

/// Requested data plane group
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPlaneGroupInput {
    pub provider: String,
    pub region: String,
    pub cloud_gateway_network_id: String,
    pub autoscale: Autoscale,
    #[serde(default)]
    pub environment: Vec<EnvironmentField>,
}

/// Data plane group as returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPlaneGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub input: DataPlaneGroupInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Request body for submitting a configuration (PUT semantics per control plane)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConfigurationRequest {
    pub control_plane_id: String,
    #[serde(default)]
    pub control_plane_geo: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_access: Option<String>,
    #[serde(default)]
    pub dataplane_groups: Vec<DataPlaneGroupInput>,
}

/// A configuration as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub control_plane_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_access: Option<String>,
    #[serde(default)]
    pub dataplane_groups: Vec<DataPlaneGroup>,
}

// =============================================================================
// Transit gateways
// =============================================================================

/// Private DNS forwarding entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitGatewayDnsConfig {
    #[serde(default)]
    pub remote_dns_server_ip_addresses: Vec<String>,
    #[serde(default)]
    pub domain_proxy_list: Vec<String>,
}

/// AWS transit gateway attachment
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsTransitGatewayAttachment {
    pub transit_gateway_id: String,
    pub ram_share_arn: String,
}

/// Azure VNET peering attachment
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureVnetPeeringAttachment {
    pub tenant_id: String,
    pub subscription_id: String,
    pub resource_group_name: String,
    pub vnet_name: String,
}

/// Attachment one-of
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitGatewayAttachment {
    AwsTransitGateway(AwsTransitGatewayAttachment),
    AzureVnetPeering(AzureVnetPeeringAttachment),
    /// A variant this SDK version does not know
    #[serde(other)]
    Unrecognized,
}

/// Request body for creating a transit gateway
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransitGatewayRequest {
    pub name: String,
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
    #[serde(default)]
    pub dns_config: Vec<TransitGatewayDnsConfig>,
    pub transit_gateway_attachment_config: TransitGatewayAttachment,
}

/// A transit gateway as returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitGateway {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
    #[serde(default)]
    pub dns_config: Vec<TransitGatewayDnsConfig>,
    pub transit_gateway_attachment_config: TransitGatewayAttachment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}
