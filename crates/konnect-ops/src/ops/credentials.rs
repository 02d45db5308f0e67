//! Consumer credential adapters: basic-auth, API key and ACL
//!
//! Credentials are scoped to a consumer. Their status carries both the
//! consumer ID and the consumer's control plane ID.

use async_trait::async_trait;

use konnect_common::crd::{KongCredentialACL, KongCredentialAPIKey, KongCredentialBasicAuth};
use konnect_sdk::models::{Acl, AclInput, BasicAuth, BasicAuthInput, KeyAuth, KeyAuthInput};
use konnect_sdk::KonnectSdk;

use super::{
    assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags, parent_id,
};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn consumer_id<T: KonnectEntity>(credential: &T) -> OpResult<String> {
    parent_id(
        credential,
        credential
            .entity_status()
            .and_then(|s| s.consumer_id.as_deref()),
        "consumer",
    )
}

fn basic_auth_input(cred: &KongCredentialBasicAuth) -> BasicAuthInput {
    BasicAuthInput {
        username: cred.spec.username.clone(),
        password: cred.spec.password.clone(),
        tags: generate_tags(cred, &cred.spec.tags),
    }
}

fn key_auth_input(cred: &KongCredentialAPIKey) -> KeyAuthInput {
    KeyAuthInput {
        key: cred.spec.key.clone(),
        tags: generate_tags(cred, &cred.spec.tags),
    }
}

fn acl_input(cred: &KongCredentialACL) -> AclInput {
    AclInput {
        group: cred.spec.group.clone(),
        tags: generate_tags(cred, &cred.spec.tags),
    }
}

/// EntityOps and Adoptable for one credential kind, which differ only in
/// the SDK methods called and the request builder
macro_rules! credential_adapter {
    (
        $ty:ty, $remote:ty, $input:ident,
        $create:ident, $upsert:ident, $delete:ident, $get:ident, $list:ident
    ) => {
        #[async_trait]
        impl EntityOps for $ty {
            async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
                let cp_id = control_plane_id(self)?;
                let consumer_id = consumer_id(self)?;
                let created = sdk
                    .credentials()
                    .$create(&cp_id, &consumer_id, &$input(self))
                    .await?;
                let id = assigned_id(Self::KIND, Op::Create, created.and_then(|c| c.id))?;
                self.set_konnect_id(id);
                Ok(())
            }

            async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
                let cp_id = control_plane_id(self)?;
                let consumer_id = consumer_id(self)?;
                let id = konnect_id(self, Op::Update)?;
                sdk.credentials()
                    .$upsert(&cp_id, &consumer_id, &id, &$input(self))
                    .await?;
                Ok(())
            }

            async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
                let cp_id = control_plane_id(self)?;
                let consumer_id = consumer_id(self)?;
                let id = konnect_id(self, Op::Delete)?;
                sdk.credentials().$delete(&cp_id, &consumer_id, &id).await?;
                Ok(())
            }

            async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
                let cp_id = control_plane_id(self)?;
                let consumer_id = consumer_id(self)?;
                let found = sdk
                    .credentials()
                    .$list(&cp_id, &consumer_id, &[uid_tag(local_uid(self))])
                    .await?;
                Ok(first_id(found.into_iter().map(|c| c.id)))
            }
        }

        #[async_trait]
        impl Adoptable for $ty {
            type Remote = $remote;

            async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<$remote>> {
                let cp_id = control_plane_id(self)?;
                let consumer_id = consumer_id(self)?;
                Ok(sdk.credentials().$get(&cp_id, &consumer_id, id).await?)
            }

            fn remote_uid(remote: &$remote) -> Option<String> {
                uid_from_tags(&remote.input.tags).map(str::to_string)
            }

            fn matches(&self, remote: &$remote) -> OpResult<bool> {
                matches_ignoring_tags(&$input(self), &remote.input)
            }
        }
    };
}

credential_adapter!(
    KongCredentialBasicAuth, BasicAuth, basic_auth_input,
    create_basic_auth, upsert_basic_auth, delete_basic_auth, get_basic_auth, list_basic_auths
);
credential_adapter!(
    KongCredentialAPIKey, KeyAuth, key_auth_input,
    create_key_auth, upsert_key_auth, delete_key_auth, get_key_auth, list_key_auths
);
credential_adapter!(
    KongCredentialACL, Acl, acl_input,
    create_acl, upsert_acl, delete_acl, get_acl, list_acls
);
