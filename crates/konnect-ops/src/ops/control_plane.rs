//! KonnectGatewayControlPlane adapter
//!
//! Control planes carry identity as labels. Group control planes also own
//! their member list, written in full after every create and update.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use konnect_common::crd::{
    ControlPlaneAuthType, ControlPlaneClusterType, EntitySource, KonnectGatewayControlPlane,
};
use konnect_sdk::models::{
    AuthType, ClusterType, ControlPlane, CreateControlPlaneRequest, UpdateControlPlaneRequest,
};
use konnect_sdk::KonnectSdk;

use super::{assigned_id, first_id, konnect_id};
use crate::conditions::reason;
use crate::entity::{Adoptable, EntityOps, KonnectEntity, Mirrorable};
use crate::error::{Op, OpError, OpResult};
use crate::normalize;
use crate::tags::{generate_labels, local_uid, uid_from_labels, uid_tag};

fn cluster_type(t: ControlPlaneClusterType) -> ClusterType {
    match t {
        ControlPlaneClusterType::ControlPlane => ClusterType::ControlPlane,
        ControlPlaneClusterType::K8sIngressController => ClusterType::K8sIngressController,
        ControlPlaneClusterType::ControlPlaneGroup => ClusterType::ControlPlaneGroup,
        ControlPlaneClusterType::Serverless => ClusterType::Serverless,
    }
}

fn auth_type(t: ControlPlaneAuthType) -> AuthType {
    match t {
        ControlPlaneAuthType::PinnedClientCerts => AuthType::PinnedClientCerts,
        ControlPlaneAuthType::PkiClientCerts => AuthType::PkiClientCerts,
    }
}

fn create_request(cp: &KonnectGatewayControlPlane) -> CreateControlPlaneRequest {
    let spec = &cp.spec;
    CreateControlPlaneRequest {
        name: spec.name.clone(),
        description: spec.description.clone(),
        cluster_type: spec.cluster_type.map(cluster_type),
        auth_type: spec.auth_type.map(auth_type),
        cloud_gateway: spec.cloud_gateway,
        labels: generate_labels(cp, &spec.labels),
    }
}

fn update_request(cp: &KonnectGatewayControlPlane) -> UpdateControlPlaneRequest {
    let spec = &cp.spec;
    UpdateControlPlaneRequest {
        name: Some(spec.name.clone()),
        description: spec.description.clone(),
        auth_type: spec.auth_type.map(auth_type),
        labels: generate_labels(cp, &spec.labels),
    }
}

/// Replace the member list of a group control plane
async fn set_members(
    cp: &KonnectGatewayControlPlane,
    sdk: &dyn KonnectSdk,
    id: &str,
) -> OpResult<()> {
    if !cp.is_group() {
        return Ok(());
    }
    let members = cp.member_ids();
    debug!(group_id = id, members = members.len(), "setting control plane group members");
    sdk.control_plane_groups()
        .put_group_memberships(id, &members)
        .await?;
    Ok(())
}

#[async_trait]
impl EntityOps for KonnectGatewayControlPlane {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let created = sdk
            .control_planes()
            .create_control_plane(&create_request(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|cp| cp.id))?;
        self.set_konnect_id(id.clone());

        set_members(self, sdk, &id)
            .await
            .map_err(|source| OpError::CreatedButRelationsFailed {
                kind: Self::KIND,
                konnect_id: id,
                reason: reason::FAILED_TO_SET_CONTROL_PLANE_GROUP_MEMBERS,
                source: Box::new(source),
            })
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let id = konnect_id(self, Op::Update)?;
        sdk.control_planes()
            .update_control_plane(&id, &update_request(self))
            .await?;
        set_members(self, sdk, &id).await
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let id = konnect_id(self, Op::Delete)?;
        sdk.control_planes().delete_control_plane(&id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let found = sdk
            .control_planes()
            .list_control_planes(&uid_tag(local_uid(self)))
            .await?;
        Ok(first_id(found.into_iter().map(|cp| cp.id)))
    }
}

/// Fields of a control plane the spec controls, laid out like the remote
/// entity so that the generic comparison lines them up
#[derive(Serialize)]
struct ControlPlaneShape<'a> {
    name: &'a str,
    description: Option<&'a str>,
    labels: &'a BTreeMap<String, String>,
    config: ConfigShape,
}

#[derive(Serialize)]
struct ConfigShape {
    cluster_type: Option<ClusterType>,
    auth_type: Option<AuthType>,
    cloud_gateway: Option<bool>,
}

#[async_trait]
impl Adoptable for KonnectGatewayControlPlane {
    type Remote = ControlPlane;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<ControlPlane>> {
        Ok(sdk.control_planes().get_control_plane(id).await?)
    }

    fn remote_uid(remote: &ControlPlane) -> Option<String> {
        uid_from_labels(&remote.labels).map(str::to_string)
    }

    /// Identity labels are rewritten on adoption and are not compared; user
    /// labels must be present on the remote side.
    fn matches(&self, remote: &ControlPlane) -> OpResult<bool> {
        let spec = &self.spec;
        let local = ControlPlaneShape {
            name: &spec.name,
            description: spec.description.as_deref(),
            labels: &spec.labels,
            config: ConfigShape {
                cluster_type: spec.cluster_type.map(cluster_type),
                auth_type: spec.auth_type.map(auth_type),
                cloud_gateway: spec.cloud_gateway,
            },
        };
        normalize::matches(&local, remote)
    }
}

impl Mirrorable for KonnectGatewayControlPlane {
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
