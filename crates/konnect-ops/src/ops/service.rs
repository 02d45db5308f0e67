//! KongService and KongRoute adapters

use async_trait::async_trait;

use konnect_common::crd::{KongRoute, KongService};
use konnect_sdk::models::{IdRef, Route, RouteInput, Service, ServiceInput};
use konnect_sdk::KonnectSdk;

use super::{assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn service_input(svc: &KongService) -> ServiceInput {
    let spec = &svc.spec;
    ServiceInput {
        name: spec.name.clone(),
        host: spec.host.clone(),
        port: spec.port,
        protocol: spec.protocol.clone(),
        path: spec.path.clone(),
        retries: spec.retries,
        connect_timeout: spec.connect_timeout,
        read_timeout: spec.read_timeout,
        write_timeout: spec.write_timeout,
        enabled: spec.enabled,
        tags: generate_tags(svc, &spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongService {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .services()
            .create_service(&cp_id, &service_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|s| s.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.services()
            .upsert_service(&cp_id, &id, &service_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.services().delete_service(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .services()
            .list_services(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|s| s.id)))
    }
}

#[async_trait]
impl Adoptable for KongService {
    type Remote = Service;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Service>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.services().get_service(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Service) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Service) -> OpResult<bool> {
        matches_ignoring_tags(&service_input(self), &remote.input)
    }
}

/// Service ID for a route: its status, when the route references a service
fn route_service(route: &KongRoute) -> OpResult<Option<IdRef>> {
    match &route.spec.service_ref {
        None => Ok(None),
        Some(_) => super::parent_id(
            route,
            route.entity_status().and_then(|s| s.service_id.as_deref()),
            "service",
        )
        .map(|id| Some(IdRef::new(id))),
    }
}

fn route_input(route: &KongRoute) -> OpResult<RouteInput> {
    let spec = &route.spec;
    Ok(RouteInput {
        name: spec.name.clone(),
        protocols: spec.protocols.clone(),
        methods: spec.methods.clone(),
        hosts: spec.hosts.clone(),
        paths: spec.paths.clone(),
        headers: spec.headers.clone(),
        strip_path: spec.strip_path,
        preserve_host: spec.preserve_host,
        https_redirect_status_code: spec.https_redirect_status_code,
        regex_priority: spec.regex_priority,
        service: route_service(route)?,
        tags: generate_tags(route, &spec.tags),
    })
}

#[async_trait]
impl EntityOps for KongRoute {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let input = route_input(self)?;
        let created = sdk.routes().create_route(&cp_id, &input).await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|r| r.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        let input = route_input(self)?;
        sdk.routes().upsert_route(&cp_id, &id, &input).await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.routes().delete_route(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .routes()
            .list_routes(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|r| r.id)))
    }
}

#[async_trait]
impl Adoptable for KongRoute {
    type Remote = Route;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Route>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.routes().get_route(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Route) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Route) -> OpResult<bool> {
        matches_ignoring_tags(&route_input(self)?, &remote.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpError;
    use crate::testing::{meta, TestSdk};
    use konnect_common::crd::{
        KongRouteSpec, KongServiceSpec, KonnectEntityStatus, NamespacedRef,
    };
    use konnect_sdk::SdkError;

    fn service() -> KongService {
        KongService {
            metadata: meta("svc-1", "uid-svc"),
            spec: KongServiceSpec {
                name: Some("svc-1".into()),
                host: "example.com".into(),
                tags: vec!["team:a".into()],
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                control_plane_id: Some("cp-1".into()),
                ..Default::default()
            }),
        }
    }

    fn route(service_ref: bool) -> KongRoute {
        KongRoute {
            metadata: meta("route-1", "uid-route"),
            spec: KongRouteSpec {
                paths: vec!["/api".into()],
                service_ref: service_ref.then(|| NamespacedRef {
                    name: "svc-1".into(),
                    namespace: None,
                }),
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                control_plane_id: Some("cp-1".into()),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn create_sends_identity_tags_and_binds_id() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_create_service()
            .withf(|cp, input| {
                cp == "cp-1"
                    && input.host == "example.com"
                    && input.tags.contains(&"k8s-uid:uid-svc".to_string())
                    && input.tags.contains(&"team:a".to_string())
            })
            .times(1)
            .returning(|_, input| {
                Ok(Some(Service {
                    id: Some("12345".into()),
                    input: input.clone(),
                }))
            });

        let mut svc = service();
        svc.create(&sdk).await.unwrap();
        assert_eq!(svc.konnect_id(), Some("12345"));
    }

    #[tokio::test]
    async fn create_without_id_in_answer_is_nil_response() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_create_service()
            .returning(|_, _| Ok(Some(Service::default())));

        let mut svc = service();
        let err = svc.create(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::NilResponse { .. }));
        assert_eq!(svc.konnect_id(), None);
    }

    #[tokio::test]
    async fn missing_control_plane_fails_before_remote_call() {
        let sdk = TestSdk::default();
        let mut svc = service();
        svc.status = None;
        let err = svc.create(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::MissingParentId { parent: "control plane", .. }));
    }

    #[tokio::test]
    async fn find_existing_looks_up_by_uid_tag() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_list_services()
            .withf(|cp, tags| cp == "cp-1" && tags == ["k8s-uid:uid-svc".to_string()])
            .returning(|_, _| {
                Ok(vec![Service {
                    id: Some("existing".into()),
                    ..Default::default()
                }])
            });

        let found = service().find_existing(&sdk).await.unwrap();
        assert_eq!(found.as_deref(), Some("existing"));
    }

    #[tokio::test]
    async fn remote_errors_are_classified() {
        let mut sdk = TestSdk::default();
        sdk.services
            .expect_delete_service()
            .returning(|_, _| Err(SdkError::not_found("gone")));

        let mut svc = service();
        svc.set_konnect_id("12345".into());
        let err = svc.delete(&sdk).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn route_with_service_ref_requires_service_id() {
        let sdk = TestSdk::default();
        let mut r = route(true);
        let err = r.create(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::MissingParentId { parent: "service", .. }));
    }

    #[tokio::test]
    async fn route_create_references_parent_service() {
        let mut sdk = TestSdk::default();
        sdk.routes
            .expect_create_route()
            .withf(|_, input| input.service == Some(IdRef::new("svc-id")))
            .returning(|_, input| {
                Ok(Some(Route {
                    id: Some("r-1".into()),
                    input: input.clone(),
                }))
            });

        let mut r = route(true);
        r.entity_status_mut().service_id = Some("svc-id".into());
        r.create(&sdk).await.unwrap();
        assert_eq!(r.konnect_id(), Some("r-1"));
    }

    #[test]
    fn service_match_ignores_tags_and_unset_fields() {
        let svc = service();
        let remote = Service {
            id: Some("12345".into()),
            input: ServiceInput {
                name: Some("svc-1".into()),
                host: "example.com".into(),
                port: Some(80),
                tags: vec!["k8s-uid:someone-else".into()],
                ..Default::default()
            },
        };
        assert!(svc.matches(&remote).unwrap());
        assert_eq!(
            KongService::remote_uid(&remote).as_deref(),
            Some("someone-else")
        );

        let mut other = remote.clone();
        other.input.host = "other.com".into();
        assert!(!svc.matches(&other).unwrap());
    }

    #[test]
    fn serviceless_route_has_no_service_reference() {
        let input = route_input(&route(false)).unwrap();
        assert_eq!(input.service, None);
        assert_eq!(input.paths, vec!["/api".to_string()]);
    }
}
