//! KongConsumer and KongConsumerGroup adapters
//!
//! A consumer's group memberships are a secondary write: after the consumer
//! itself is created or updated, memberships named in the spec are added and
//! memberships the spec no longer names are removed.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;

use konnect_common::crd::{KongConsumer, KongConsumerGroup};
use konnect_sdk::models::{Consumer, ConsumerGroup, ConsumerGroupInput, ConsumerInput};
use konnect_sdk::KonnectSdk;

use super::{assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags};
use crate::conditions::reason;
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpError, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn consumer_input(consumer: &KongConsumer) -> ConsumerInput {
    let spec = &consumer.spec;
    ConsumerInput {
        username: spec.username.clone(),
        custom_id: spec.custom_id.clone(),
        tags: generate_tags(consumer, &spec.tags),
    }
}

/// Converge the consumer's group memberships to the names in its spec
async fn sync_groups(
    consumer: &KongConsumer,
    sdk: &dyn KonnectSdk,
    cp_id: &str,
    consumer_id: &str,
) -> OpResult<()> {
    let mut desired = BTreeSet::new();
    for name in &consumer.spec.consumer_groups {
        let group = sdk.consumer_groups().get_consumer_group(cp_id, name).await?;
        let id = group.and_then(|g| g.id).filter(|id| !id.is_empty()).ok_or_else(|| {
            OpError::missing_parent(KongConsumer::KIND, consumer.coordinates(), "consumer group")
        })?;
        desired.insert(id);
    }

    let current: BTreeSet<String> = sdk
        .consumers()
        .list_consumer_groups_for_consumer(cp_id, consumer_id)
        .await?
        .into_iter()
        .filter_map(|g| g.id)
        .collect();

    for group_id in desired.difference(&current) {
        debug!(consumer_id, group_id = %group_id, "adding consumer to group");
        sdk.consumers()
            .add_consumer_to_group(cp_id, group_id, consumer_id)
            .await?;
    }
    for group_id in current.difference(&desired) {
        debug!(consumer_id, group_id = %group_id, "removing consumer from group");
        sdk.consumers()
            .remove_consumer_from_group(cp_id, group_id, consumer_id)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl EntityOps for KongConsumer {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .consumers()
            .create_consumer(&cp_id, &consumer_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|c| c.id))?;
        self.set_konnect_id(id.clone());

        sync_groups(self, sdk, &cp_id, &id)
            .await
            .map_err(|source| OpError::CreatedButRelationsFailed {
                kind: Self::KIND,
                konnect_id: id,
                reason: reason::FAILED_TO_ATTACH_CONSUMER_TO_CONSUMER_GROUP,
                source: Box::new(source),
            })
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.consumers()
            .upsert_consumer(&cp_id, &id, &consumer_input(self))
            .await?;
        sync_groups(self, sdk, &cp_id, &id).await
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.consumers().delete_consumer(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .consumers()
            .list_consumers(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|c| c.id)))
    }
}

#[async_trait]
impl Adoptable for KongConsumer {
    type Remote = Consumer;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Consumer>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.consumers().get_consumer(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Consumer) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Consumer) -> OpResult<bool> {
        matches_ignoring_tags(&consumer_input(self), &remote.input)
    }
}

fn group_input(group: &KongConsumerGroup) -> ConsumerGroupInput {
    ConsumerGroupInput {
        name: group.spec.name.clone(),
        tags: generate_tags(group, &group.spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongConsumerGroup {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .consumer_groups()
            .create_consumer_group(&cp_id, &group_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|g| g.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.consumer_groups()
            .upsert_consumer_group(&cp_id, &id, &group_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.consumer_groups().delete_consumer_group(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .consumer_groups()
            .list_consumer_groups(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|g| g.id)))
    }
}

#[async_trait]
impl Adoptable for KongConsumerGroup {
    type Remote = ConsumerGroup;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<ConsumerGroup>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.consumer_groups().get_consumer_group(&cp_id, id).await?)
    }

    fn remote_uid(remote: &ConsumerGroup) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &ConsumerGroup) -> OpResult<bool> {
        matches_ignoring_tags(&group_input(self), &remote.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{meta, TestSdk};
    use konnect_common::crd::{KongConsumerSpec, KonnectEntityStatus};
    use konnect_sdk::SdkError;

    fn consumer(groups: &[&str]) -> KongConsumer {
        KongConsumer {
            metadata: meta("alice", "uid-alice"),
            spec: KongConsumerSpec {
                username: Some("alice".into()),
                consumer_groups: groups.iter().map(|g| g.to_string()).collect(),
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                control_plane_id: Some("cp-1".into()),
                ..Default::default()
            }),
        }
    }

    fn group(id: &str, name: &str) -> ConsumerGroup {
        ConsumerGroup {
            id: Some(id.into()),
            input: ConsumerGroupInput {
                name: name.into(),
                tags: vec![],
            },
        }
    }

    fn expect_created(sdk: &mut TestSdk) {
        sdk.consumers.expect_create_consumer().returning(|_, input| {
            Ok(Some(Consumer {
                id: Some("c-1".into()),
                input: input.clone(),
            }))
        });
    }

    #[tokio::test]
    async fn create_without_groups_touches_no_memberships() {
        let mut sdk = TestSdk::default();
        expect_created(&mut sdk);
        sdk.consumers
            .expect_list_consumer_groups_for_consumer()
            .returning(|_, _| Ok(vec![]));

        let mut c = consumer(&[]);
        c.create(&sdk).await.unwrap();
        assert_eq!(c.konnect_id(), Some("c-1"));
    }

    #[tokio::test]
    async fn memberships_are_added_and_removed() {
        let mut sdk = TestSdk::default();
        sdk.consumers
            .expect_upsert_consumer()
            .returning(|_, _, _| Ok(None));
        sdk.consumer_groups
            .expect_get_consumer_group()
            .withf(|_, name| name == "gold")
            .returning(|_, _| Ok(Some(group("g-gold", "gold"))));
        sdk.consumers
            .expect_list_consumer_groups_for_consumer()
            .returning(|_, _| Ok(vec![group("g-silver", "silver")]));
        sdk.consumers
            .expect_add_consumer_to_group()
            .withf(|cp, group, consumer| cp == "cp-1" && group == "g-gold" && consumer == "c-1")
            .times(1)
            .returning(|_, _, _| Ok(()));
        sdk.consumers
            .expect_remove_consumer_from_group()
            .withf(|_, group, _| group == "g-silver")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut c = consumer(&["gold"]);
        c.set_konnect_id("c-1".into());
        c.update(&sdk).await.unwrap();
    }

    #[tokio::test]
    async fn failed_membership_after_create_keeps_the_id() {
        let mut sdk = TestSdk::default();
        expect_created(&mut sdk);
        sdk.consumer_groups
            .expect_get_consumer_group()
            .returning(|_, _| Ok(Some(group("g-gold", "gold"))));
        sdk.consumers
            .expect_list_consumer_groups_for_consumer()
            .returning(|_, _| Ok(vec![]));
        sdk.consumers
            .expect_add_consumer_to_group()
            .returning(|_, _, _| Err(SdkError::bad_request("group is full")));

        let mut c = consumer(&["gold"]);
        let err = c.create(&sdk).await.unwrap_err();
        match err {
            OpError::CreatedButRelationsFailed {
                konnect_id, reason, ..
            } => {
                assert_eq!(konnect_id, "c-1");
                assert_eq!(reason, "FailedToAttachConsumerToConsumerGroup");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(c.konnect_id(), Some("c-1"));
    }

    #[tokio::test]
    async fn unknown_group_name_is_a_missing_parent() {
        let mut sdk = TestSdk::default();
        sdk.consumers
            .expect_upsert_consumer()
            .returning(|_, _, _| Ok(None));
        sdk.consumer_groups
            .expect_get_consumer_group()
            .returning(|_, _| Ok(None));

        let mut c = consumer(&["nope"]);
        c.set_konnect_id("c-1".into());
        let err = c.update(&sdk).await.unwrap_err();
        assert!(matches!(
            err,
            OpError::MissingParentId {
                parent: "consumer group",
                ..
            }
        ));
    }

    #[test]
    fn consumer_match_compares_username() {
        let c = consumer(&[]);
        let remote = Consumer {
            id: Some("c-1".into()),
            input: ConsumerInput {
                username: Some("bob".into()),
                ..Default::default()
            },
        };
        assert!(!c.matches(&remote).unwrap());
        assert_eq!(KongConsumer::remote_uid(&remote), None);
    }
}
