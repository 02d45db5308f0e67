//! Generic create/update/delete over every supported kind
//!
//! The dispatcher owns the behaviour shared by all kinds: ID preconditions,
//! resync backoff, conflict-on-create lookup, not-found-on-update
//! re-creation, condition writing and error wrapping. Adapters only talk to
//! the remote API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use kube::runtime::controller::Action;
use tracing::{debug, error, info, instrument, warn};

use konnect_common::crd::ConditionStatus;
use konnect_common::SyncConfig;
use konnect_sdk::KonnectSdk;

use crate::conditions::{
    backoff_remaining, reason, refresh_condition, set_not_programmed, PROGRAMMED,
};
use crate::entity::{EntityOps, KonnectEntity};
use crate::error::{Op, OpError, OpResult};

/// Collaborators and settings for one sync call
#[derive(Clone)]
pub struct SyncContext {
    /// Remote API
    pub sdk: Arc<dyn KonnectSdk>,
    /// Minimum time between two updates of a converged entity
    pub sync_period: Duration,
}

impl SyncContext {
    /// Build a context from sync settings
    pub fn new(sdk: Arc<dyn KonnectSdk>, config: &SyncConfig) -> Self {
        Self {
            sdk,
            sync_period: config.sync_period,
        }
    }
}

/// What the caller should do after a successful call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Converged; nothing to schedule
    Done,
    /// Call again after the given delay
    RequeueAfter(Duration),
}

impl Outcome {
    /// Convert to a controller action
    pub fn into_action(self) -> Action {
        match self {
            Self::Done => Action::await_change(),
            Self::RequeueAfter(delay) => Action::requeue(delay),
        }
    }
}

/// Create the remote entity for a declaration that has no remote ID
///
/// On success the assigned ID is on status and Programmed is True. On
/// failure Programmed is False with the failure message and the error is
/// returned wrapped with the entity coordinates. A create that succeeded
/// but whose relation writes failed keeps its ID.
#[instrument(skip(ctx, entity), fields(kind = %T::KIND, entity = %entity.coordinates()))]
pub async fn create<T: EntityOps>(ctx: &SyncContext, entity: &mut T) -> OpResult<Outcome> {
    if entity.is_mirrored() {
        debug!("mirrored entity, skipping create");
        return Ok(Outcome::Done);
    }
    if let Some(id) = entity.konnect_id() {
        return Err(OpError::KonnectIdAlreadySet {
            kind: T::KIND,
            entity: entity.coordinates(),
            id: id.to_string(),
        });
    }

    let started = Instant::now();
    entity.bind_parents();
    let result = create_remote(ctx.sdk.as_ref(), entity).await;
    log_result(entity, Op::Create, started, &result);

    match result {
        Ok(()) => {
            mark_programmed(entity);
            Ok(Outcome::Done)
        }
        Err(err) => Err(fail(entity, Op::Create, err)),
    }
}

/// Converge the remote entity of a declaration that has a remote ID
///
/// Returns [`Outcome::RequeueAfter`] without any remote call while the
/// entity is programmed for its current generation and the sync period has
/// not elapsed since the last write.
#[instrument(skip(ctx, entity), fields(kind = %T::KIND, entity = %entity.coordinates()))]
pub async fn update<T: EntityOps>(ctx: &SyncContext, entity: &mut T) -> OpResult<Outcome> {
    if entity.is_mirrored() {
        debug!("mirrored entity, skipping update");
        return Ok(Outcome::Done);
    }
    if entity.konnect_id().is_none() {
        return Err(OpError::MissingKonnectId {
            kind: T::KIND,
            entity: entity.coordinates(),
            op: Op::Update,
        });
    }
    if let Some(remaining) = backoff_remaining(entity, ctx.sync_period, Utc::now()) {
        debug!(
            requeue_after_ms = remaining.as_millis() as u64,
            "entity converged within sync period, skipping update"
        );
        return Ok(Outcome::RequeueAfter(remaining));
    }

    let sdk = ctx.sdk.as_ref();
    let started = Instant::now();
    entity.bind_parents();
    let result = match entity.update(sdk).await {
        Err(err) if err.is_not_found() && T::RECREATE_ON_NOT_FOUND => {
            info!(
                konnect_id = entity.konnect_id().unwrap_or_default(),
                "remote entity is gone, re-creating"
            );
            entity.clear_konnect_id();
            create_remote(sdk, entity).await
        }
        other => other,
    };
    log_result(entity, Op::Update, started, &result);

    match result {
        Ok(()) => {
            mark_programmed(entity);
            Ok(Outcome::Done)
        }
        Err(err) => Err(fail(entity, Op::Update, err)),
    }
}

/// Delete the remote entity of a declaration
///
/// A remote not-found counts as success. Mirrored entities are never
/// deleted remotely.
#[instrument(skip(ctx, entity), fields(kind = %T::KIND, entity = %entity.coordinates()))]
pub async fn delete<T: EntityOps>(ctx: &SyncContext, entity: &mut T) -> OpResult<Outcome> {
    if entity.is_mirrored() {
        debug!("mirrored entity, leaving remote entity in place");
        return Ok(Outcome::Done);
    }
    if entity.konnect_id().is_none() {
        return Err(OpError::MissingKonnectId {
            kind: T::KIND,
            entity: entity.coordinates(),
            op: Op::Delete,
        });
    }

    let started = Instant::now();
    entity.bind_parents();
    let result = match entity.delete(ctx.sdk.as_ref()).await {
        Err(err) if err.is_not_found() => {
            info!(
                konnect_id = entity.konnect_id().unwrap_or_default(),
                "remote entity already gone"
            );
            Ok(())
        }
        other => other,
    };
    log_result(entity, Op::Delete, started, &result);

    result
        .map(|()| Outcome::Done)
        .map_err(|err| err.wrap(Op::Delete, T::KIND, entity.coordinates()))
}

/// Adapter create, resolving a conflict by binding the entity created for
/// this object earlier and updating it
async fn create_remote<T: EntityOps>(sdk: &dyn KonnectSdk, entity: &mut T) -> OpResult<()> {
    match entity.create(sdk).await {
        Err(err) if err.is_conflict() => {
            let Some(existing) = entity.find_existing(sdk).await? else {
                return Err(err);
            };
            info!(
                konnect_id = %existing,
                "entity already exists remotely, binding it"
            );
            entity.set_konnect_id(existing);
            entity.update(sdk).await
        }
        other => other,
    }
}

/// Programmed=True with a fresh transition time, starting the backoff window
fn mark_programmed<T: KonnectEntity>(entity: &mut T) {
    refresh_condition(
        entity,
        PROGRAMMED,
        ConditionStatus::True,
        reason::PROGRAMMED,
        "",
    );
}

/// Record a failure on Programmed and wrap the error
fn fail<T: KonnectEntity>(entity: &mut T, op: Op, err: OpError) -> OpError {
    let reason = match err.root() {
        OpError::CreatedButRelationsFailed { reason, .. } => *reason,
        _ if op == Op::Create => reason::FAILED_TO_CREATE,
        _ => reason::FAILED_TO_UPDATE,
    };
    set_not_programmed(entity, reason, &err.to_string());
    err.wrap(op, T::KIND, entity.coordinates())
}

fn log_result<T: KonnectEntity>(entity: &T, op: Op, started: Instant, result: &OpResult<()>) {
    let meta = entity.meta();
    let name = meta.name.as_deref().unwrap_or_default();
    let namespace = meta.namespace.as_deref().unwrap_or_default();
    let konnect_id = entity.konnect_id().unwrap_or_default();
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => info!(
            kind = %T::KIND, op = %op, konnect_id, name, namespace, duration_ms,
            "operation succeeded"
        ),
        Err(err) if err.is_retryable() => warn!(
            kind = %T::KIND, op = %op, konnect_id, name, namespace, duration_ms,
            error = %err,
            "operation failed"
        ),
        Err(err) => error!(
            kind = %T::KIND, op = %op, konnect_id, name, namespace, duration_ms,
            error = %err,
            "operation failed permanently"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::find_condition;
    use crate::testing::{meta, TestSdk};
    use konnect_common::crd::{
        ControlPlaneRef, KongConsumer, KongConsumerSpec, KongService, KongServiceSpec,
        KonnectCloudGatewayNetwork, KonnectCloudGatewayNetworkSpec, KonnectEntityStatus,
    };
    use konnect_sdk::models::{Consumer, ConsumerGroup, ConsumerGroupInput, Service, ServiceInput};
    use konnect_sdk::SdkError;

    const PERIOD: Duration = Duration::from_secs(60);

    fn ctx(sdk: TestSdk) -> SyncContext {
        SyncContext::new(
            Arc::new(sdk),
            &SyncConfig::default().with_sync_period(PERIOD),
        )
    }

    fn service() -> KongService {
        KongService {
            metadata: meta("svc-1", "uid-svc"),
            spec: KongServiceSpec {
                control_plane_ref: Some(ControlPlaneRef::konnect_id("cp-1")),
                name: Some("svc-1".into()),
                host: "example.com".into(),
                ..Default::default()
            },
            status: None,
        }
    }

    fn programmed(entity: &impl KonnectEntity) -> Option<(ConditionStatus, String, String)> {
        find_condition(entity, PROGRAMMED)
            .map(|c| (c.status.clone(), c.reason.clone(), c.message.clone()))
    }

    fn created(
        id: &'static str,
    ) -> impl Fn(&str, &ServiceInput) -> Result<Option<Service>, SdkError> + Send + 'static {
        move |_: &str, input: &ServiceInput| {
            Ok(Some(Service {
                id: Some(id.into()),
                input: input.clone(),
            }))
        }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Story: a new service is created, its ID lands on status and it is
    /// reported as programmed
    #[tokio::test]
    async fn story_create_binds_id_and_programs() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_create_service()
            .withf(|cp, _| cp == "cp-1")
            .times(1)
            .returning(created("12345"));

        let mut svc = service();
        let outcome = create(&ctx(sdk), &mut svc).await.unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(svc.konnect_id(), Some("12345"));
        assert_eq!(svc.control_plane_id(), Some("cp-1"));
        let (status, reason, _) = programmed(&svc).unwrap();
        assert_eq!(status, ConditionStatus::True);
        assert_eq!(reason, "Programmed");
    }

    /// Story: the API rejects the request; the entity stays unbound and the
    /// remote message surfaces on Programmed
    #[tokio::test]
    async fn story_rejected_create_reports_remote_message() {
        let mut sdk = TestSdk::default();
        sdk.services.expect_create_service().returning(|_, _| {
            Err(SdkError::bad_request("name is too long").with_instance("kong:trace:42"))
        });

        let mut svc = service();
        let err = create(&ctx(sdk), &mut svc).await.unwrap_err();

        assert_eq!(svc.konnect_id(), None);
        assert_eq!(
            err.to_string(),
            "failed to create KongService default/svc-1: HTTP 400: Bad Request: name is too long"
        );
        assert!(!err.is_retryable());

        let (status, reason, message) = programmed(&svc).unwrap();
        assert_eq!(status, ConditionStatus::False);
        assert_eq!(reason, "FailedToCreate");
        assert!(message.contains("name is too long"));
        assert!(!message.contains("kong:trace"));
    }

    #[tokio::test]
    async fn create_with_existing_id_is_rejected_without_remote_call() {
        let mut svc = service();
        svc.set_konnect_id("12345".into());

        let err = create(&ctx(TestSdk::default()), &mut svc)
            .await
            .unwrap_err();
        assert!(matches!(err, OpError::KonnectIdAlreadySet { .. }));
    }

    #[tokio::test]
    async fn conflict_on_create_binds_existing_entity_and_updates_it() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_create_service()
            .returning(|_, _| Err(SdkError::conflict("service name already exists")));
        sdk.services.expect_list_services().returning(|_, _| {
            Ok(vec![Service {
                id: Some("existing".into()),
                ..Default::default()
            }])
        });
        sdk.services
            .expect_upsert_service()
            .withf(|cp, id, _| cp == "cp-1" && id == "existing")
            .times(1)
            .returning(|_, _, _| Ok(None));

        let mut svc = service();
        create(&ctx(sdk), &mut svc).await.unwrap();

        assert_eq!(svc.konnect_id(), Some("existing"));
        assert_eq!(programmed(&svc).unwrap().0, ConditionStatus::True);
    }

    #[tokio::test]
    async fn conflict_without_existing_entity_is_terminal() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_create_service()
            .returning(|_, _| Err(SdkError::conflict("service name already exists")));
        sdk.services
            .expect_list_services()
            .returning(|_, _| Ok(vec![]));

        let mut svc = service();
        let err = create(&ctx(sdk), &mut svc).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(svc.konnect_id(), None);
        assert_eq!(programmed(&svc).unwrap().1, "FailedToCreate");
    }

    /// Story: the consumer is created but cannot join its group; the ID is
    /// kept so the next reconcile only retries the membership
    #[tokio::test]
    async fn story_partial_failure_preserves_id() {
        let mut sdk = TestSdk::default();
        sdk.consumers.expect_create_consumer().returning(|_, input| {
            Ok(Some(Consumer {
                id: Some("c-1".into()),
                input: input.clone(),
            }))
        });
        sdk.consumer_groups
            .expect_get_consumer_group()
            .returning(|_, _| {
                Ok(Some(ConsumerGroup {
                    id: Some("g-1".into()),
                    input: ConsumerGroupInput {
                        name: "gold".into(),
                        tags: vec![],
                    },
                }))
            });
        sdk.consumers
            .expect_list_consumer_groups_for_consumer()
            .returning(|_, _| Ok(vec![]));
        sdk.consumers
            .expect_add_consumer_to_group()
            .returning(|_, _, _| Err(SdkError::transport("connection reset")));

        let mut consumer = KongConsumer {
            metadata: meta("alice", "uid-alice"),
            spec: KongConsumerSpec {
                control_plane_ref: Some(ControlPlaneRef::konnect_id("cp-1")),
                username: Some("alice".into()),
                consumer_groups: vec!["gold".into()],
                ..Default::default()
            },
            status: None,
        };
        let err = create(&ctx(sdk), &mut consumer).await.unwrap_err();

        assert_eq!(consumer.konnect_id(), Some("c-1"));
        assert!(matches!(
            err.root(),
            OpError::CreatedButRelationsFailed { .. }
        ));
        assert!(err.is_retryable());
        let (status, reason, _) = programmed(&consumer).unwrap();
        assert_eq!(status, ConditionStatus::False);
        assert_eq!(reason, "FailedToAttachConsumerToConsumerGroup");
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Story: two updates inside one sync period reach the API once; the
    /// second asks to be called back instead
    #[tokio::test]
    async fn story_resync_backoff_skips_second_update() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_upsert_service()
            .times(1)
            .returning(|_, _, _| Ok(None));
        let ctx = ctx(sdk);

        let mut svc = service();
        svc.set_konnect_id("12345".into());

        assert_eq!(update(&ctx, &mut svc).await.unwrap(), Outcome::Done);
        match update(&ctx, &mut svc).await.unwrap() {
            Outcome::RequeueAfter(after) => assert!(after <= PERIOD),
            other => panic!("expected requeue, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_generation_bypasses_backoff() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_upsert_service()
            .times(2)
            .returning(|_, _, _| Ok(None));
        let ctx = ctx(sdk);

        let mut svc = service();
        svc.set_konnect_id("12345".into());
        update(&ctx, &mut svc).await.unwrap();

        svc.metadata.generation = Some(2);
        assert_eq!(update(&ctx, &mut svc).await.unwrap(), Outcome::Done);
    }

    #[tokio::test]
    async fn update_without_id_is_a_programming_error() {
        let mut svc = service();
        let err = update(&ctx(TestSdk::default()), &mut svc)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OpError::MissingKonnectId { op: Op::Update, .. }
        ));
    }

    #[tokio::test]
    async fn vanished_service_is_recreated_on_update() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_upsert_service()
            .returning(|_, _, _| Err(SdkError::not_found("service not found")));
        sdk.services
            .expect_create_service()
            .times(1)
            .returning(created("67890"));

        let mut svc = service();
        svc.set_konnect_id("12345".into());
        update(&ctx(sdk), &mut svc).await.unwrap();

        assert_eq!(svc.konnect_id(), Some("67890"));
    }

    #[tokio::test]
    async fn vanished_network_is_not_recreated() {
        let mut sdk = TestSdk::default();
        sdk.cloud_gateways
            .expect_update_network()
            .returning(|_, _| Err(SdkError::not_found("network not found")));

        let mut network = KonnectCloudGatewayNetwork {
            metadata: meta("net", "uid-net"),
            spec: KonnectCloudGatewayNetworkSpec {
                name: "net".into(),
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                id: Some("net-1".into()),
                ..Default::default()
            }),
        };
        let err = update(&ctx(sdk), &mut network).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(network.konnect_id(), Some("net-1"));
        assert_eq!(programmed(&network).unwrap().1, "FailedToUpdate");
    }

    // =========================================================================
    // Delete
    // =========================================================================

    #[tokio::test]
    async fn delete_of_absent_remote_entity_succeeds() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_delete_service()
            .times(1)
            .returning(|_, _| Err(SdkError::not_found("service not found")));

        let mut svc = service();
        svc.set_konnect_id("12345".into());
        assert_eq!(delete(&ctx(sdk), &mut svc).await.unwrap(), Outcome::Done);
    }

    #[tokio::test]
    async fn delete_failure_is_wrapped() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_delete_service()
            .returning(|_, _| Err(SdkError::transport("timeout")));

        let mut svc = service();
        svc.set_konnect_id("12345".into());
        let err = delete(&ctx(sdk), &mut svc).await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("failed to delete KongService default/svc-1:"));
    }

    #[tokio::test]
    async fn delete_without_id_fails_fast() {
        let mut svc = service();
        let err = delete(&ctx(TestSdk::default()), &mut svc)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OpError::MissingKonnectId { op: Op::Delete, .. }
        ));
    }

    #[tokio::test]
    async fn mirrored_entities_are_never_written() {
        let mut network = KonnectCloudGatewayNetwork {
            metadata: meta("net", "uid-net"),
            spec: KonnectCloudGatewayNetworkSpec {
                name: "net".into(),
                source: konnect_common::crd::EntitySource::Mirror,
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                id: Some("net-1".into()),
                ..Default::default()
            }),
        };
        let ctx = ctx(TestSdk::default());

        assert_eq!(update(&ctx, &mut network).await.unwrap(), Outcome::Done);
        assert_eq!(delete(&ctx, &mut network).await.unwrap(), Outcome::Done);
    }

    #[test]
    fn outcome_maps_to_controller_action() {
        assert_eq!(Outcome::Done.into_action(), Action::await_change());
        assert_eq!(
            Outcome::RequeueAfter(Duration::from_secs(5)).into_action(),
            Action::requeue(Duration::from_secs(5))
        );
    }
}
