//! KongKey and KongKeySet adapters

use async_trait::async_trait;

use konnect_common::crd::{KongKey, KongKeySet};
use konnect_sdk::models::{IdRef, Key, KeyInput, KeySet, KeySetInput, PemKeyPair};
use konnect_sdk::KonnectSdk;

use super::{
    assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags, parent_id,
};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

/// Key set binding: required once the key references a set
fn key_set(key: &KongKey) -> OpResult<Option<IdRef>> {
    if key.spec.key_set_ref.is_none() {
        return Ok(None);
    }
    let id = parent_id(
        key,
        key.entity_status().and_then(|s| s.key_set_id.as_deref()),
        "key set",
    )?;
    Ok(Some(IdRef::new(id)))
}

fn key_input(key: &KongKey) -> OpResult<KeyInput> {
    let spec = &key.spec;
    Ok(KeyInput {
        kid: spec.kid.clone(),
        name: spec.name.clone(),
        jwk: spec.jwk.clone(),
        pem: spec.pem.as_ref().map(|pem| PemKeyPair {
            public_key: pem.public_key.clone(),
            private_key: pem.private_key.clone(),
        }),
        set: key_set(key)?,
        tags: generate_tags(key, &spec.tags),
    })
}

#[async_trait]
impl EntityOps for KongKey {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let input = key_input(self)?;
        let created = sdk.keys().create_key(&cp_id, &input).await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|k| k.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        let input = key_input(self)?;
        sdk.keys().upsert_key(&cp_id, &id, &input).await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.keys().delete_key(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .keys()
            .list_keys(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|k| k.id)))
    }
}

#[async_trait]
impl Adoptable for KongKey {
    type Remote = Key;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Key>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.keys().get_key(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Key) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Key) -> OpResult<bool> {
        matches_ignoring_tags(&key_input(self)?, &remote.input)
    }
}

fn key_set_input(set: &KongKeySet) -> KeySetInput {
    KeySetInput {
        name: set.spec.name.clone(),
        tags: generate_tags(set, &set.spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongKeySet {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .key_sets()
            .create_key_set(&cp_id, &key_set_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|s| s.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.key_sets()
            .upsert_key_set(&cp_id, &id, &key_set_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.key_sets().delete_key_set(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .key_sets()
            .list_key_sets(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|s| s.id)))
    }
}

#[async_trait]
impl Adoptable for KongKeySet {
    type Remote = KeySet;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<KeySet>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.key_sets().get_key_set(&cp_id, id).await?)
    }

    fn remote_uid(remote: &KeySet) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &KeySet) -> OpResult<bool> {
        matches_ignoring_tags(&key_set_input(self), &remote.input)
    }
}
