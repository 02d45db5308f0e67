//! Dedicated Cloud Gateway adapters: networks, data plane group
//! configurations and transit gateways
//!
//! None of these kinds record a local identity remotely, so a create
//! conflict cannot be resolved by lookup. Networks and configurations are
//! never re-created behind the user's back when they vanish.

use async_trait::async_trait;
use tracing::{debug, info};

use konnect_common::crd::{
    EntitySource, KonnectCloudGatewayDataPlaneGroupConfiguration, KonnectCloudGatewayNetwork,
    KonnectCloudGatewayTransitGateway,
};
use konnect_sdk::models::{
    Autoscale, AutoscaleAutopilot, AutoscaleStatic, AwsTransitGatewayAttachment,
    AzureVnetPeeringAttachment, Configuration, CreateConfigurationRequest, CreateNetworkRequest,
    CreateTransitGatewayRequest, DataPlaneGroupInput, EnvironmentField, Network,
    PatchNetworkRequest, TransitGateway, TransitGatewayAttachment, TransitGatewayDnsConfig,
};
use konnect_sdk::{KonnectSdk, SdkError};

use super::{assigned_id, control_plane_id, first_id, konnect_id, parent_id};
use crate::classify::ErrorClass;
use crate::entity::{Adoptable, EntityOps, KonnectEntity, Mirrorable};
use crate::error::{Op, OpError, OpResult};
use crate::normalize::cloud_gateway::{
    NormalizedAttachment, NormalizedAutoscale, NormalizedConfiguration, NormalizedNetwork,
    NormalizedTransitGateway,
};
use crate::normalize;

// =============================================================================
// Networks
// =============================================================================

fn network_request(network: &KonnectCloudGatewayNetwork) -> CreateNetworkRequest {
    let spec = &network.spec;
    CreateNetworkRequest {
        name: spec.name.clone(),
        cloud_gateway_provider_account_id: spec.cloud_gateway_provider_account_id.clone(),
        region: spec.region.clone(),
        availability_zones: spec.availability_zones.clone(),
        cidr_block: spec.cidr_block.clone(),
    }
}

#[async_trait]
impl EntityOps for KonnectCloudGatewayNetwork {
    const RECREATE_ON_NOT_FOUND: bool = false;

    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let created = sdk
            .cloud_gateways()
            .create_network(&network_request(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|n| n.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    /// Only the name of a network can change after creation
    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let id = konnect_id(self, Op::Update)?;
        let patch = PatchNetworkRequest {
            name: self.spec.name.clone(),
        };
        sdk.cloud_gateways().update_network(&id, &patch).await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let id = konnect_id(self, Op::Delete)?;
        sdk.cloud_gateways().delete_network(&id).await?;
        Ok(())
    }
}

#[async_trait]
impl Adoptable for KonnectCloudGatewayNetwork {
    type Remote = Network;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Network>> {
        Ok(sdk.cloud_gateways().get_network(id).await?)
    }

    fn matches(&self, remote: &Network) -> OpResult<bool> {
        normalize::equal(
            &NormalizedNetwork::from_spec(&self.spec),
            &NormalizedNetwork::from_remote(remote),
        )
    }
}

impl Mirrorable for KonnectCloudGatewayNetwork {
    fn mirror_id(&self) -> Option<&str> {
        if self.spec.source != EntitySource::Mirror {
            return None;
        }
        self.spec
            .mirror
            .as_ref()
            .map(|m| m.konnect.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

// =============================================================================
// Data plane group configurations
// =============================================================================

fn autoscale(normalized: NormalizedAutoscale) -> Autoscale {
    match normalized {
        NormalizedAutoscale::Static {
            instance_type,
            requested_instances,
        } => Autoscale::Static(AutoscaleStatic {
            instance_type,
            requested_instances,
        }),
        NormalizedAutoscale::Autopilot { base_rps, max_rps } => {
            Autoscale::Autopilot(AutoscaleAutopilot { base_rps, max_rps })
        }
    }
}

fn configuration_request(
    config: &KonnectCloudGatewayDataPlaneGroupConfiguration,
    cp_id: String,
) -> OpResult<CreateConfigurationRequest> {
    let normalized = NormalizedConfiguration::from_spec(&config.spec)?;
    Ok(CreateConfigurationRequest {
        control_plane_id: cp_id,
        control_plane_geo: String::new(),
        version: normalized.version,
        api_access: normalized.api_access,
        dataplane_groups: normalized
            .dataplane_groups
            .into_iter()
            .map(|group| DataPlaneGroupInput {
                provider: group.provider,
                region: group.region,
                cloud_gateway_network_id: group.network_id,
                autoscale: autoscale(group.autoscale),
                environment: group
                    .environment
                    .into_iter()
                    .map(|e| EnvironmentField {
                        name: e.name,
                        value: e.value,
                    })
                    .collect(),
            })
            .collect(),
    })
}

/// Submit a configuration and return the ID it is stored under
///
/// Submissions are not idempotent: a conflict while a previous submission
/// is still being applied, or for an unchanged configuration, means the
/// remote state is already what was asked for. The current configuration
/// is then looked up instead.
async fn submit_configuration(
    sdk: &dyn KonnectSdk,
    req: &CreateConfigurationRequest,
    op: Op,
) -> OpResult<Option<String>> {
    let kind = KonnectCloudGatewayDataPlaneGroupConfiguration::KIND;
    match sdk.cloud_gateways().create_configuration(req).await {
        Ok(created) => assigned_id(kind, op, created.and_then(|c| c.id)).map(Some),
        Err(err) => {
            let err = OpError::from(err);
            if err.class() != Some(ErrorClass::TransientProvisioningConflict) {
                return Err(err);
            }
            info!(
                control_plane_id = %req.control_plane_id,
                error = %err,
                "configuration submission conflicted, re-fetching current configuration"
            );
            let current = sdk
                .cloud_gateways()
                .list_configurations(&req.control_plane_id)
                .await?;
            Ok(first_id(current.into_iter().map(|c| c.id)))
        }
    }
}

#[async_trait]
impl EntityOps for KonnectCloudGatewayDataPlaneGroupConfiguration {
    const RECREATE_ON_NOT_FOUND: bool = false;

    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let req = configuration_request(self, cp_id)?;
        let id = submit_configuration(sdk, &req, Op::Create)
            .await?
            .ok_or(OpError::NilResponse {
                kind: Self::KIND,
                op: Op::Create,
            })?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        konnect_id(self, Op::Update)?;
        let cp_id = control_plane_id(self)?;
        let req = configuration_request(self, cp_id)?;
        if let Some(id) = submit_configuration(sdk, &req, Op::Update).await? {
            if self.konnect_id() != Some(id.as_str()) {
                debug!(konnect_id = %id, "configuration stored under a new ID");
                self.set_konnect_id(id);
            }
        }
        Ok(())
    }

    /// A configuration cannot be deleted by ID; an empty group list is
    /// submitted instead, which tears down every data plane group
    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        konnect_id(self, Op::Delete)?;
        let cp_id = control_plane_id(self)?;
        let req = CreateConfigurationRequest {
            control_plane_id: cp_id,
            control_plane_geo: String::new(),
            version: self.spec.version.clone(),
            api_access: self.spec.api_access.clone(),
            dataplane_groups: Vec::new(),
        };
        submit_configuration(sdk, &req, Op::Delete).await?;
        Ok(())
    }
}

#[async_trait]
impl Adoptable for KonnectCloudGatewayDataPlaneGroupConfiguration {
    type Remote = Configuration;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Configuration>> {
        Ok(sdk.cloud_gateways().get_configuration(id).await?)
    }

    fn matches(&self, remote: &Configuration) -> OpResult<bool> {
        NormalizedConfiguration::from_spec(&self.spec)?
            .same_as(&NormalizedConfiguration::from_remote(remote)?)
    }
}

// =============================================================================
// Transit gateways
// =============================================================================

fn network_id(tgw: &KonnectCloudGatewayTransitGateway) -> OpResult<String> {
    parent_id(
        tgw,
        tgw.entity_status().and_then(|s| s.network_id.as_deref()),
        "network",
    )
}

fn transit_gateway_request(
    tgw: &KonnectCloudGatewayTransitGateway,
) -> OpResult<CreateTransitGatewayRequest> {
    let normalized = NormalizedTransitGateway::from_spec(&tgw.spec)?;
    let attachment = match normalized.attachment {
        NormalizedAttachment::AwsTransitGateway {
            transit_gateway_id,
            ram_share_arn,
        } => TransitGatewayAttachment::AwsTransitGateway(AwsTransitGatewayAttachment {
            transit_gateway_id,
            ram_share_arn,
        }),
        NormalizedAttachment::AzureVnetPeering {
            tenant_id,
            subscription_id,
            resource_group_name,
            vnet_name,
        } => TransitGatewayAttachment::AzureVnetPeering(AzureVnetPeeringAttachment {
            tenant_id,
            subscription_id,
            resource_group_name,
            vnet_name,
        }),
    };
    Ok(CreateTransitGatewayRequest {
        name: normalized.name,
        cidr_blocks: normalized.cidr_blocks,
        dns_config: normalized
            .dns_config
            .into_iter()
            .map(|dns| TransitGatewayDnsConfig {
                remote_dns_server_ip_addresses: dns.remote_dns_server_ip_addresses,
                domain_proxy_list: dns.domain_proxy_list,
            })
            .collect(),
        transit_gateway_attachment_config: attachment,
    })
}

#[async_trait]
impl EntityOps for KonnectCloudGatewayTransitGateway {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let network_id = network_id(self)?;
        let req = transit_gateway_request(self)?;
        let created = sdk
            .cloud_gateways()
            .create_transit_gateway(&network_id, &req)
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|t| t.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    /// Transit gateways cannot be modified: the remote entity is only
    /// checked against the spec
    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let id = konnect_id(self, Op::Update)?;
        let remote = self.fetch(sdk, &id).await?.ok_or_else(|| {
            OpError::from(SdkError::not_found(format!("transit gateway {id} not found")))
        })?;
        if self.matches(&remote)? {
            return Ok(());
        }
        Err(OpError::Immutable {
            kind: Self::KIND,
            entity: self.coordinates(),
            message: format!(
                "remote transit gateway {id} differs from the spec; delete and re-create it to apply changes"
            ),
        })
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let network_id = network_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.cloud_gateways()
            .delete_transit_gateway(&network_id, &id)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Adoptable for KonnectCloudGatewayTransitGateway {
    type Remote = TransitGateway;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<TransitGateway>> {
        let network_id = network_id(self)?;
        Ok(sdk
            .cloud_gateways()
            .get_transit_gateway(&network_id, id)
            .await?)
    }

    fn matches(&self, remote: &TransitGateway) -> OpResult<bool> {
        normalize::equal(
            &NormalizedTransitGateway::from_spec(&self.spec)?,
            &NormalizedTransitGateway::from_remote(remote)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{meta, TestSdk};
    use konnect_common::crd::{
        AutoscaleStaticSpec, AutoscaleType, AwsTransitGatewaySpec, ControlPlaneRef,
        DataPlaneGroupAutoscale, DataPlaneGroupSpec,
        KonnectCloudGatewayDataPlaneGroupConfigurationSpec,
        KonnectCloudGatewayTransitGatewaySpec, KonnectEntityStatus, NamespacedRef,
        TransitGatewayType,
    };

    // =========================================================================
    // Data plane group configurations
    // =========================================================================

    fn configuration() -> KonnectCloudGatewayDataPlaneGroupConfiguration {
        KonnectCloudGatewayDataPlaneGroupConfiguration {
            metadata: meta("dpgc", "uid-dpgc"),
            spec: KonnectCloudGatewayDataPlaneGroupConfigurationSpec {
                control_plane_ref: Some(ControlPlaneRef::konnect_id("cp-1")),
                version: "3.9".into(),
                dataplane_groups: vec![DataPlaneGroupSpec {
                    provider: "aws".into(),
                    region: "us-east-2".into(),
                    network_id: "net-1".into(),
                    autoscale: DataPlaneGroupAutoscale {
                        type_: AutoscaleType::Static,
                        static_: Some(AutoscaleStaticSpec {
                            instance_type: "small".into(),
                            requested_instances: 2,
                        }),
                        autopilot: None,
                    },
                    environment: vec![],
                }],
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                control_plane_id: Some("cp-1".into()),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn configuration_create_submits_groups() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_create_configuration()
            .withf(|req| {
                req.control_plane_id == "cp-1"
                    && req.dataplane_groups.len() == 1
                    && req.dataplane_groups[0].cloud_gateway_network_id == "net-1"
            })
            .times(1)
            .returning(|req| {
                Ok(Some(Configuration {
                    id: Some("cfg-1".into()),
                    control_plane_id: req.control_plane_id.clone(),
                    version: req.version.clone(),
                    ..Default::default()
                }))
            });

        let mut cfg = configuration();
        cfg.create(&sdk).await.unwrap();
        assert_eq!(cfg.konnect_id(), Some("cfg-1"));
    }

    #[tokio::test]
    async fn in_progress_conflict_refetches_instead_of_failing() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_create_configuration()
            .returning(|_| {
                Err(SdkError::conflict(
                    "a previous configuration is still in progress",
                ))
            });
        sdk.cloud_gateways
            .expect_list_configurations()
            .withf(|cp| cp == "cp-1")
            .times(1)
            .returning(|_| {
                Ok(vec![Configuration {
                    id: Some("cfg-current".into()),
                    ..Default::default()
                }])
            });

        let mut cfg = configuration();
        cfg.create(&sdk).await.unwrap();
        assert_eq!(cfg.konnect_id(), Some("cfg-current"));
    }

    #[tokio::test]
    async fn plain_conflict_is_propagated() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_create_configuration()
            .returning(|_| Err(SdkError::conflict("name already taken")));

        let mut cfg = configuration();
        let err = cfg.create(&sdk).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(cfg.konnect_id(), None);
    }

    #[tokio::test]
    async fn configuration_delete_submits_empty_groups() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_create_configuration()
            .withf(|req| req.dataplane_groups.is_empty() && req.version == "3.9")
            .times(1)
            .returning(|_| {
                Ok(Some(Configuration {
                    id: Some("cfg-2".into()),
                    ..Default::default()
                }))
            });

        let mut cfg = configuration();
        cfg.set_konnect_id("cfg-1".into());
        cfg.delete(&sdk).await.unwrap();
    }

    // =========================================================================
    // Transit gateways
    // =========================================================================

    fn transit_gateway(name: &str) -> KonnectCloudGatewayTransitGateway {
        KonnectCloudGatewayTransitGateway {
            metadata: meta("tgw", "uid-tgw"),
            spec: KonnectCloudGatewayTransitGatewaySpec {
                network_ref: NamespacedRef {
                    name: "net".into(),
                    namespace: None,
                },
                name: name.into(),
                cidr_blocks: vec!["10.1.0.0/16".into()],
                type_: TransitGatewayType::AwsTransitGateway,
                aws_transit_gateway: Some(AwsTransitGatewaySpec {
                    transit_gateway_id: "tgw-123".into(),
                    ram_share_arn: "arn:aws:ram::share".into(),
                }),
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                id: Some("tg-1".into()),
                network_id: Some("net-1".into()),
                ..Default::default()
            }),
        }
    }

    fn remote_gateway(name: &str) -> TransitGateway {
        TransitGateway {
            id: Some("tg-1".into()),
            name: name.into(),
            cidr_blocks: vec!["10.1.0.0/16".into()],
            dns_config: vec![],
            transit_gateway_attachment_config: TransitGatewayAttachment::AwsTransitGateway(
                AwsTransitGatewayAttachment {
                    transit_gateway_id: "tgw-123".into(),
                    ram_share_arn: "arn:aws:ram::share".into(),
                },
            ),
            state: Some("ready".into()),
        }
    }

    #[tokio::test]
    async fn unchanged_transit_gateway_update_is_a_no_op() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_get_transit_gateway()
            .withf(|net, id| net == "net-1" && id == "tg-1")
            .returning(|_, _| Ok(Some(remote_gateway("tgw"))));

        let mut tgw = transit_gateway("tgw");
        tgw.update(&sdk).await.unwrap();
    }

    #[tokio::test]
    async fn changed_transit_gateway_is_immutable() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_get_transit_gateway()
            .returning(|_, _| Ok(Some(remote_gateway("old-name"))));

        let mut tgw = transit_gateway("tgw");
        let err = tgw.update(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::Immutable { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn remote_dns_and_cidrs_added_outside_the_spec_are_drift() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_get_transit_gateway()
            .returning(|_, _| {
                let mut remote = remote_gateway("tgw");
                remote.dns_config = vec![TransitGatewayDnsConfig {
                    remote_dns_server_ip_addresses: vec!["10.0.0.2".into()],
                    domain_proxy_list: vec!["corp.local".into()],
                }];
                Ok(Some(remote))
            });

        let mut tgw = transit_gateway("tgw");
        let err = tgw.update(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::Immutable { .. }));

        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_get_transit_gateway()
            .returning(|_, _| Ok(Some(remote_gateway("tgw"))));

        let mut tgw = transit_gateway("tgw");
        tgw.spec.cidr_blocks = vec![];
        let err = tgw.update(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::Immutable { .. }));
    }

    #[tokio::test]
    async fn vanished_transit_gateway_reports_not_found() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_get_transit_gateway()
            .returning(|_, _| Ok(None));

        let mut tgw = transit_gateway("tgw");
        let err = tgw.update(&sdk).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn transit_gateway_request_carries_the_active_attachment() {
        let req = transit_gateway_request(&transit_gateway("tgw")).unwrap();
        assert!(matches!(
            req.transit_gateway_attachment_config,
            TransitGatewayAttachment::AwsTransitGateway(_)
        ));

        let mut tgw = transit_gateway("tgw");
        tgw.spec.aws_transit_gateway = None;
        assert!(matches!(
            transit_gateway_request(&tgw),
            Err(OpError::Normalization { .. })
        ));
    }

    #[test]
    fn networks_and_configurations_are_not_recreated() {
        assert!(!KonnectCloudGatewayNetwork::RECREATE_ON_NOT_FOUND);
        assert!(!KonnectCloudGatewayDataPlaneGroupConfiguration::RECREATE_ON_NOT_FOUND);
        assert!(KonnectCloudGatewayTransitGateway::RECREATE_ON_NOT_FOUND);
    }
}
