//! KongUpstream and KongTarget adapters

use async_trait::async_trait;

use konnect_common::crd::{KongTarget, KongUpstream};
use konnect_sdk::models::{Target, TargetInput, Upstream, UpstreamInput};
use konnect_sdk::KonnectSdk;

use super::{
    assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags, parent_id,
};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn upstream_input(upstream: &KongUpstream) -> UpstreamInput {
    let spec = &upstream.spec;
    UpstreamInput {
        name: spec.name.clone(),
        algorithm: spec.algorithm.clone(),
        slots: spec.slots,
        host_header: spec.host_header.clone(),
        tags: generate_tags(upstream, &spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongUpstream {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .upstreams()
            .create_upstream(&cp_id, &upstream_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|u| u.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.upstreams()
            .upsert_upstream(&cp_id, &id, &upstream_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.upstreams().delete_upstream(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .upstreams()
            .list_upstreams(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|u| u.id)))
    }
}

#[async_trait]
impl Adoptable for KongUpstream {
    type Remote = Upstream;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Upstream>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.upstreams().get_upstream(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Upstream) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Upstream) -> OpResult<bool> {
        matches_ignoring_tags(&upstream_input(self), &remote.input)
    }
}

fn upstream_id(target: &KongTarget) -> OpResult<String> {
    parent_id(
        target,
        target.entity_status().and_then(|s| s.upstream_id.as_deref()),
        "upstream",
    )
}

fn target_input(target: &KongTarget) -> TargetInput {
    TargetInput {
        target: target.spec.target.clone(),
        weight: target.spec.weight,
        tags: generate_tags(target, &target.spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongTarget {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let upstream_id = upstream_id(self)?;
        let created = sdk
            .targets()
            .create_target(&cp_id, &upstream_id, &target_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|t| t.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let upstream_id = upstream_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.targets()
            .upsert_target(&cp_id, &upstream_id, &id, &target_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let upstream_id = upstream_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.targets().delete_target(&cp_id, &upstream_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let upstream_id = upstream_id(self)?;
        let found = sdk
            .targets()
            .list_targets(&cp_id, &upstream_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|t| t.id)))
    }
}

#[async_trait]
impl Adoptable for KongTarget {
    type Remote = Target;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Target>> {
        let cp_id = control_plane_id(self)?;
        let upstream_id = upstream_id(self)?;
        Ok(sdk.targets().get_target(&cp_id, &upstream_id, id).await?)
    }

    fn remote_uid(remote: &Target) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Target) -> OpResult<bool> {
        matches_ignoring_tags(&target_input(self), &remote.input)
    }
}
