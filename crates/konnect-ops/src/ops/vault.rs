//! KongVault adapter

use async_trait::async_trait;

use konnect_common::crd::KongVault;
use konnect_sdk::models::{Vault, VaultInput};
use konnect_sdk::KonnectSdk;

use super::{assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn vault_input(vault: &KongVault) -> VaultInput {
    let spec = &vault.spec;
    VaultInput {
        name: spec.backend.clone(),
        prefix: spec.prefix.clone(),
        description: spec.description.clone(),
        config: spec.config.clone(),
        tags: generate_tags(vault, &spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongVault {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .vaults()
            .create_vault(&cp_id, &vault_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|v| v.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.vaults()
            .upsert_vault(&cp_id, &id, &vault_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.vaults().delete_vault(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .vaults()
            .list_vaults(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|v| v.id)))
    }
}

#[async_trait]
impl Adoptable for KongVault {
    type Remote = Vault;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Vault>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.vaults().get_vault(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Vault) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Vault) -> OpResult<bool> {
        matches_ignoring_tags(&vault_input(self), &remote.input)
    }
}
