//! Projections of cloud gateway configuration
//!
//! Local specs and remote entities are mapped into the same record types, so
//! the generic comparison sees identical field names on both sides. Only the
//! populated one-of variant is projected; a remote variant this crate does
//! not know is an error rather than an empty record.
//!
//! Projections are compared strictly with [`super::equal`]: every projected
//! field is part of the declaration, including lists left empty.

use serde::Serialize;

use konnect_common::crd::{
    AutoscaleType, DataPlaneGroupAutoscale, DataPlaneGroupSpec,
    KonnectCloudGatewayDataPlaneGroupConfigurationSpec, KonnectCloudGatewayNetworkSpec,
    KonnectCloudGatewayTransitGatewaySpec, TransitGatewayDnsConfigSpec, TransitGatewayType,
};
use konnect_sdk::models::{
    Autoscale, Configuration, DataPlaneGroup, Network, TransitGateway, TransitGatewayAttachment,
    TransitGatewayDnsConfig,
};

use crate::error::{OpError, OpResult};
use crate::normalize;

/// Comparable network
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedNetwork {
    pub name: String,
    pub provider_account_id: String,
    pub region: String,
    pub availability_zones: Vec<String>,
    pub cidr_block: String,
}

impl NormalizedNetwork {
    /// Project a network spec
    pub fn from_spec(spec: &KonnectCloudGatewayNetworkSpec) -> Self {
        Self {
            name: spec.name.clone(),
            provider_account_id: spec.cloud_gateway_provider_account_id.clone(),
            region: spec.region.clone(),
            availability_zones: spec.availability_zones.clone(),
            cidr_block: spec.cidr_block.clone(),
        }
    }

    /// Project a remote network
    pub fn from_remote(network: &Network) -> Self {
        Self {
            name: network.name.clone(),
            provider_account_id: network.cloud_gateway_provider_account_id.clone(),
            region: network.region.clone(),
            availability_zones: network.availability_zones.clone(),
            cidr_block: network.cidr_block.clone(),
        }
    }
}

/// Comparable autoscale policy; only the active variant's fields are set
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedAutoscale {
    Static {
        instance_type: String,
        requested_instances: i64,
    },
    Autopilot {
        base_rps: i64,
        max_rps: Option<i64>,
    },
}

impl NormalizedAutoscale {
    /// Project a local autoscale block
    pub fn from_spec(autoscale: &DataPlaneGroupAutoscale) -> OpResult<Self> {
        match autoscale.type_ {
            AutoscaleType::Static => autoscale
                .static_
                .as_ref()
                .map(|s| Self::Static {
                    instance_type: s.instance_type.clone(),
                    requested_instances: s.requested_instances,
                })
                .ok_or_else(|| OpError::normalization("autoscale type static without settings")),
            AutoscaleType::Autopilot => autoscale
                .autopilot
                .as_ref()
                .map(|a| Self::Autopilot {
                    base_rps: a.base_rps,
                    max_rps: a.max_rps,
                })
                .ok_or_else(|| {
                    OpError::normalization("autoscale type autopilot without settings")
                }),
        }
    }

    /// Project a remote autoscale policy
    pub fn from_remote(autoscale: &Autoscale) -> OpResult<Self> {
        match autoscale {
            Autoscale::Static(s) => Ok(Self::Static {
                instance_type: s.instance_type.clone(),
                requested_instances: s.requested_instances,
            }),
            Autoscale::Autopilot(a) => Ok(Self::Autopilot {
                base_rps: a.base_rps,
                max_rps: a.max_rps,
            }),
            Autoscale::Unrecognized => Err(OpError::normalization(
                "remote autoscale policy has an unrecognized kind",
            )),
        }
    }
}

/// Comparable environment variable
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedEnvVar {
    pub name: String,
    pub value: String,
}

/// Comparable data plane group
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedDataPlaneGroup {
    pub provider: String,
    pub region: String,
    pub network_id: String,
    pub autoscale: NormalizedAutoscale,
    pub environment: Vec<NormalizedEnvVar>,
}

impl NormalizedDataPlaneGroup {
    /// Project a local group
    pub fn from_spec(group: &DataPlaneGroupSpec) -> OpResult<Self> {
        Ok(Self {
            provider: group.provider.clone(),
            region: group.region.clone(),
            network_id: group.network_id.clone(),
            autoscale: NormalizedAutoscale::from_spec(&group.autoscale)?,
            environment: group
                .environment
                .iter()
                .map(|e| NormalizedEnvVar {
                    name: e.name.clone(),
                    value: e.value.clone(),
                })
                .collect(),
        })
    }

    /// Project a remote group
    pub fn from_remote(group: &DataPlaneGroup) -> OpResult<Self> {
        let input = &group.input;
        Ok(Self {
            provider: input.provider.clone(),
            region: input.region.clone(),
            network_id: input.cloud_gateway_network_id.clone(),
            autoscale: NormalizedAutoscale::from_remote(&input.autoscale)?,
            environment: input
                .environment
                .iter()
                .map(|e| NormalizedEnvVar {
                    name: e.name.clone(),
                    value: e.value.clone(),
                })
                .collect(),
        })
    }
}

/// Comparable data plane group configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedConfiguration {
    pub version: String,
    pub api_access: Option<String>,
    pub dataplane_groups: Vec<NormalizedDataPlaneGroup>,
}

impl NormalizedConfiguration {
    /// Project a local configuration
    pub fn from_spec(spec: &KonnectCloudGatewayDataPlaneGroupConfigurationSpec) -> OpResult<Self> {
        Ok(Self {
            version: spec.version.clone(),
            api_access: spec.api_access.clone(),
            dataplane_groups: spec
                .dataplane_groups
                .iter()
                .map(NormalizedDataPlaneGroup::from_spec)
                .collect::<OpResult<_>>()?,
        })
    }

    /// Project a remote configuration
    pub fn from_remote(config: &Configuration) -> OpResult<Self> {
        Ok(Self {
            version: config.version.clone(),
            api_access: config.api_access.clone(),
            dataplane_groups: config
                .dataplane_groups
                .iter()
                .map(NormalizedDataPlaneGroup::from_remote)
                .collect::<OpResult<_>>()?,
        })
    }

    /// Strict comparison, except that an API access mode left unset locally
    /// accepts the one Konnect chose
    pub fn same_as(&self, remote: &Self) -> OpResult<bool> {
        let local = Self {
            api_access: self.api_access.clone().or_else(|| remote.api_access.clone()),
            ..self.clone()
        };
        normalize::equal(&local, remote)
    }
}

/// Comparable DNS forwarding entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedDnsConfig {
    pub remote_dns_server_ip_addresses: Vec<String>,
    pub domain_proxy_list: Vec<String>,
}

impl From<&TransitGatewayDnsConfigSpec> for NormalizedDnsConfig {
    fn from(dns: &TransitGatewayDnsConfigSpec) -> Self {
        Self {
            remote_dns_server_ip_addresses: dns.remote_dns_server_ip_addresses.clone(),
            domain_proxy_list: dns.domain_proxy_list.clone(),
        }
    }
}

impl From<&TransitGatewayDnsConfig> for NormalizedDnsConfig {
    fn from(dns: &TransitGatewayDnsConfig) -> Self {
        Self {
            remote_dns_server_ip_addresses: dns.remote_dns_server_ip_addresses.clone(),
            domain_proxy_list: dns.domain_proxy_list.clone(),
        }
    }
}

/// Comparable attachment; only the active variant's fields are set
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedAttachment {
    AwsTransitGateway {
        transit_gateway_id: String,
        ram_share_arn: String,
    },
    AzureVnetPeering {
        tenant_id: String,
        subscription_id: String,
        resource_group_name: String,
        vnet_name: String,
    },
}

/// Comparable transit gateway
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedTransitGateway {
    pub name: String,
    pub cidr_blocks: Vec<String>,
    pub dns_config: Vec<NormalizedDnsConfig>,
    pub attachment: NormalizedAttachment,
}

impl NormalizedTransitGateway {
    /// Project a local transit gateway
    pub fn from_spec(spec: &KonnectCloudGatewayTransitGatewaySpec) -> OpResult<Self> {
        let attachment = match spec.type_ {
            TransitGatewayType::AwsTransitGateway => spec
                .aws_transit_gateway
                .as_ref()
                .map(|aws| NormalizedAttachment::AwsTransitGateway {
                    transit_gateway_id: aws.transit_gateway_id.clone(),
                    ram_share_arn: aws.ram_share_arn.clone(),
                })
                .ok_or_else(|| {
                    OpError::normalization("type AWSTransitGateway without awsTransitGateway")
                })?,
            TransitGatewayType::AzureTransitGateway => spec
                .azure_transit_gateway
                .as_ref()
                .map(|azure| NormalizedAttachment::AzureVnetPeering {
                    tenant_id: azure.tenant_id.clone(),
                    subscription_id: azure.subscription_id.clone(),
                    resource_group_name: azure.resource_group_name.clone(),
                    vnet_name: azure.vnet_name.clone(),
                })
                .ok_or_else(|| {
                    OpError::normalization("type AzureTransitGateway without azureTransitGateway")
                })?,
        };

        Ok(Self {
            name: spec.name.clone(),
            cidr_blocks: spec.cidr_blocks.clone(),
            dns_config: spec.dns_config.iter().map(Into::into).collect(),
            attachment,
        })
    }

    /// Project a remote transit gateway
    pub fn from_remote(tgw: &TransitGateway) -> OpResult<Self> {
        let attachment = match &tgw.transit_gateway_attachment_config {
            TransitGatewayAttachment::AwsTransitGateway(aws) => {
                NormalizedAttachment::AwsTransitGateway {
                    transit_gateway_id: aws.transit_gateway_id.clone(),
                    ram_share_arn: aws.ram_share_arn.clone(),
                }
            }
            TransitGatewayAttachment::AzureVnetPeering(azure) => {
                NormalizedAttachment::AzureVnetPeering {
                    tenant_id: azure.tenant_id.clone(),
                    subscription_id: azure.subscription_id.clone(),
                    resource_group_name: azure.resource_group_name.clone(),
                    vnet_name: azure.vnet_name.clone(),
                }
            }
            TransitGatewayAttachment::Unrecognized => {
                return Err(OpError::normalization(
                    "remote transit gateway attachment has an unrecognized kind",
                ))
            }
        };

        Ok(Self {
            name: tgw.name.clone(),
            cidr_blocks: tgw.cidr_blocks.clone(),
            dns_config: tgw.dns_config.iter().map(Into::into).collect(),
            attachment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::equal;
    use konnect_common::crd::{
        AutoscaleAutopilotSpec, AutoscaleStaticSpec, AwsTransitGatewaySpec, DataPlaneEnvVar,
        NamespacedRef,
    };
    use konnect_sdk::models::{
        AutoscaleAutopilot, AutoscaleStatic, AwsTransitGatewayAttachment, DataPlaneGroupInput,
        EnvironmentField,
    };

    fn local_group(region: &str, env: &[(&str, &str)]) -> DataPlaneGroupSpec {
        DataPlaneGroupSpec {
            provider: "aws".into(),
            region: region.into(),
            network_id: "net-1".into(),
            autoscale: DataPlaneGroupAutoscale {
                type_: AutoscaleType::Static,
                static_: Some(AutoscaleStaticSpec {
                    instance_type: "small".into(),
                    requested_instances: 2,
                }),
                autopilot: None,
            },
            environment: env
                .iter()
                .map(|(n, v)| DataPlaneEnvVar {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    fn remote_group(region: &str, env: &[(&str, &str)], autoscale: Autoscale) -> DataPlaneGroup {
        DataPlaneGroup {
            id: Some(format!("dpg-{region}")),
            input: DataPlaneGroupInput {
                provider: "aws".into(),
                region: region.into(),
                cloud_gateway_network_id: "net-1".into(),
                autoscale,
                environment: env
                    .iter()
                    .map(|(n, v)| EnvironmentField {
                        name: n.to_string(),
                        value: v.to_string(),
                    })
                    .collect(),
            },
            state: Some("ready".into()),
        }
    }

    fn small_static() -> Autoscale {
        Autoscale::Static(AutoscaleStatic {
            instance_type: "small".into(),
            requested_instances: 2,
        })
    }

    #[test]
    fn configurations_match_regardless_of_group_and_env_order() {
        let local = KonnectCloudGatewayDataPlaneGroupConfigurationSpec {
            version: "3.9".into(),
            dataplane_groups: vec![
                local_group("us-east-2", &[("A", "1"), ("B", "2")]),
                local_group("eu-west-1", &[]),
            ],
            ..Default::default()
        };
        let remote = Configuration {
            id: Some("cfg-1".into()),
            control_plane_id: "cp-1".into(),
            version: "3.9".into(),
            api_access: Some("private+public".into()),
            dataplane_groups: vec![
                remote_group("eu-west-1", &[], small_static()),
                remote_group("us-east-2", &[("B", "2"), ("A", "1")], small_static()),
            ],
        };

        let local = NormalizedConfiguration::from_spec(&local).unwrap();
        let remote = NormalizedConfiguration::from_remote(&remote).unwrap();
        assert!(local.same_as(&remote).unwrap());
    }

    #[test]
    fn only_the_active_autoscale_variant_is_compared() {
        let mut group = local_group("us-east-2", &[]);
        group.autoscale.autopilot = Some(AutoscaleAutopilotSpec {
            base_rps: 100,
            max_rps: None,
        });

        let local = NormalizedDataPlaneGroup::from_spec(&group).unwrap();
        let remote =
            NormalizedDataPlaneGroup::from_remote(&remote_group("us-east-2", &[], small_static()))
                .unwrap();
        assert!(equal(&local, &remote).unwrap());
    }

    #[test]
    fn autoscale_scalar_difference_is_a_mismatch() {
        let local = NormalizedDataPlaneGroup::from_spec(&local_group("us-east-2", &[])).unwrap();
        let remote = NormalizedDataPlaneGroup::from_remote(&remote_group(
            "us-east-2",
            &[],
            Autoscale::Static(AutoscaleStatic {
                instance_type: "small".into(),
                requested_instances: 3,
            }),
        ))
        .unwrap();
        assert!(!equal(&local, &remote).unwrap());

        let autopilot = NormalizedDataPlaneGroup::from_remote(&remote_group(
            "us-east-2",
            &[],
            Autoscale::Autopilot(AutoscaleAutopilot {
                base_rps: 1,
                max_rps: None,
            }),
        ))
        .unwrap();
        assert!(!equal(&local, &autopilot).unwrap());
    }

    #[test]
    fn unrecognized_remote_variants_fail_fast() {
        let err = NormalizedDataPlaneGroup::from_remote(&remote_group(
            "us-east-2",
            &[],
            Autoscale::Unrecognized,
        ))
        .unwrap_err();
        assert!(matches!(err, OpError::Normalization { .. }));

        let tgw = TransitGateway {
            id: Some("tgw".into()),
            name: "tgw".into(),
            cidr_blocks: vec![],
            dns_config: vec![],
            transit_gateway_attachment_config: TransitGatewayAttachment::Unrecognized,
            state: None,
        };
        assert!(NormalizedTransitGateway::from_remote(&tgw).is_err());
    }

    #[test]
    fn missing_local_variant_settings_is_an_error() {
        let mut group = local_group("us-east-2", &[]);
        group.autoscale.static_ = None;
        assert!(NormalizedDataPlaneGroup::from_spec(&group).is_err());
    }

    #[test]
    fn transit_gateways_compare_cidrs_and_dns_as_sets() {
        let spec = KonnectCloudGatewayTransitGatewaySpec {
            network_ref: NamespacedRef {
                name: "net".into(),
                namespace: None,
            },
            name: "tgw".into(),
            cidr_blocks: vec!["10.1.0.0/16".into(), "10.2.0.0/16".into()],
            dns_config: vec![TransitGatewayDnsConfigSpec {
                remote_dns_server_ip_addresses: vec!["10.0.0.2".into(), "10.0.0.3".into()],
                domain_proxy_list: vec!["corp.local".into()],
            }],
            type_: TransitGatewayType::AwsTransitGateway,
            aws_transit_gateway: Some(AwsTransitGatewaySpec {
                transit_gateway_id: "tgw-123".into(),
                ram_share_arn: "arn:aws:ram:share".into(),
            }),
            ..Default::default()
        };
        let remote = TransitGateway {
            id: Some("t-1".into()),
            name: "tgw".into(),
            cidr_blocks: vec!["10.2.0.0/16".into(), "10.1.0.0/16".into()],
            dns_config: vec![TransitGatewayDnsConfig {
                remote_dns_server_ip_addresses: vec!["10.0.0.3".into(), "10.0.0.2".into()],
                domain_proxy_list: vec!["corp.local".into()],
            }],
            transit_gateway_attachment_config: TransitGatewayAttachment::AwsTransitGateway(
                AwsTransitGatewayAttachment {
                    transit_gateway_id: "tgw-123".into(),
                    ram_share_arn: "arn:aws:ram:share".into(),
                },
            ),
            state: Some("ready".into()),
        };

        let local = NormalizedTransitGateway::from_spec(&spec).unwrap();
        let remote_norm = NormalizedTransitGateway::from_remote(&remote).unwrap();
        assert!(equal(&local, &remote_norm).unwrap());

        let mut moved = remote;
        moved.cidr_blocks.push("10.3.0.0/16".into());
        let moved = NormalizedTransitGateway::from_remote(&moved).unwrap();
        assert!(!equal(&local, &moved).unwrap());
    }

    #[test]
    fn networks_ignore_zone_order() {
        let spec = KonnectCloudGatewayNetworkSpec {
            name: "net".into(),
            cloud_gateway_provider_account_id: "acct".into(),
            region: "us-east-2".into(),
            availability_zones: vec!["use2-az1".into(), "use2-az2".into()],
            cidr_block: "10.0.0.0/8".into(),
            ..Default::default()
        };
        let remote = Network {
            id: Some("n-1".into()),
            name: "net".into(),
            cloud_gateway_provider_account_id: "acct".into(),
            region: "us-east-2".into(),
            availability_zones: vec!["use2-az2".into(), "use2-az1".into()],
            cidr_block: "10.0.0.0/8".into(),
            state: Some("ready".into()),
        };
        assert!(equal(
            &NormalizedNetwork::from_spec(&spec),
            &NormalizedNetwork::from_remote(&remote)
        )
        .unwrap());
    }

    #[test]
    fn empty_local_zones_do_not_match_remote_zones() {
        let spec = KonnectCloudGatewayNetworkSpec {
            name: "net".into(),
            cloud_gateway_provider_account_id: "acct".into(),
            region: "us-east-2".into(),
            availability_zones: vec![],
            cidr_block: "10.0.0.0/8".into(),
            ..Default::default()
        };
        let remote = Network {
            id: Some("n-1".into()),
            name: "net".into(),
            cloud_gateway_provider_account_id: "acct".into(),
            region: "us-east-2".into(),
            availability_zones: vec!["use2-az1".into()],
            cidr_block: "10.0.0.0/8".into(),
            state: Some("ready".into()),
        };
        assert!(!equal(
            &NormalizedNetwork::from_spec(&spec),
            &NormalizedNetwork::from_remote(&remote)
        )
        .unwrap());
    }

    #[test]
    fn empty_local_environment_does_not_match_remote_environment() {
        let local = NormalizedDataPlaneGroup::from_spec(&local_group("us-east-2", &[])).unwrap();
        let remote = NormalizedDataPlaneGroup::from_remote(&remote_group(
            "us-east-2",
            &[("KONG_LOG_LEVEL", "debug")],
            small_static(),
        ))
        .unwrap();
        assert!(!equal(&local, &remote).unwrap());
    }

    #[test]
    fn explicit_api_access_must_match() {
        let local = KonnectCloudGatewayDataPlaneGroupConfigurationSpec {
            version: "3.9".into(),
            api_access: Some("private".into()),
            dataplane_groups: vec![local_group("us-east-2", &[])],
            ..Default::default()
        };
        let remote = Configuration {
            id: Some("cfg-1".into()),
            control_plane_id: "cp-1".into(),
            version: "3.9".into(),
            api_access: Some("private+public".into()),
            dataplane_groups: vec![remote_group("us-east-2", &[], small_static())],
        };

        let local = NormalizedConfiguration::from_spec(&local).unwrap();
        let remote = NormalizedConfiguration::from_remote(&remote).unwrap();
        assert!(!local.same_as(&remote).unwrap());
    }
}
