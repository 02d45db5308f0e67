//! The closed set of synced entity kinds and the capabilities each provides
//!
//! Every kind implements [`KonnectEntity`] (status and identity access) and
//! [`EntityOps`] (remote create/update/delete). Kinds that can bind to a
//! pre-existing remote entity implement [`Adoptable`]; kinds that can be
//! mirrored read-only implement [`Mirrorable`]. The dispatcher is written
//! against these traits, so adding a kind means adding one adapter.

use async_trait::async_trait;
use kube::Resource;

use konnect_common::crd::{
    AdoptOptions, Condition, ControlPlaneRef, ControlPlaneRefType, EntitySource, KongCACertificate,
    KongCertificate, KongConsumer, KongConsumerGroup, KongCredentialACL, KongCredentialAPIKey,
    KongCredentialBasicAuth, KongKey, KongKeySet, KongPluginBinding, KongRoute, KongSNI,
    KongService, KongTarget, KongUpstream, KongVault, KonnectCloudGatewayDataPlaneGroupConfiguration,
    KonnectCloudGatewayNetwork, KonnectCloudGatewayTransitGateway, KonnectEntityStatus,
    KonnectGatewayControlPlane,
};
use konnect_sdk::KonnectSdk;

use crate::conditions::ConditionsAware;
use crate::error::OpResult;

/// Supported entity kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Konnect control plane
    KonnectGatewayControlPlane,
    /// Gateway service
    KongService,
    /// Gateway route
    KongRoute,
    /// API consumer
    KongConsumer,
    /// Consumer group
    KongConsumerGroup,
    /// Load-balanced upstream
    KongUpstream,
    /// Upstream target
    KongTarget,
    /// TLS certificate
    KongCertificate,
    /// Trusted CA certificate
    KongCACertificate,
    /// Server name indication
    KongSNI,
    /// JWK or PEM key
    KongKey,
    /// Key set
    KongKeySet,
    /// Secret vault
    KongVault,
    /// Plugin instance
    KongPluginBinding,
    /// Basic-auth credential
    KongCredentialBasicAuth,
    /// API key credential
    KongCredentialAPIKey,
    /// ACL credential
    KongCredentialACL,
    /// Cloud gateway network
    KonnectCloudGatewayNetwork,
    /// Cloud gateway data plane group configuration
    KonnectCloudGatewayDataPlaneGroupConfiguration,
    /// Cloud gateway transit gateway
    KonnectCloudGatewayTransitGateway,
}

impl EntityKind {
    /// Kubernetes kind name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KonnectGatewayControlPlane => "KonnectGatewayControlPlane",
            Self::KongService => "KongService",
            Self::KongRoute => "KongRoute",
            Self::KongConsumer => "KongConsumer",
            Self::KongConsumerGroup => "KongConsumerGroup",
            Self::KongUpstream => "KongUpstream",
            Self::KongTarget => "KongTarget",
            Self::KongCertificate => "KongCertificate",
            Self::KongCACertificate => "KongCACertificate",
            Self::KongSNI => "KongSNI",
            Self::KongKey => "KongKey",
            Self::KongKeySet => "KongKeySet",
            Self::KongVault => "KongVault",
            Self::KongPluginBinding => "KongPluginBinding",
            Self::KongCredentialBasicAuth => "KongCredentialBasicAuth",
            Self::KongCredentialAPIKey => "KongCredentialAPIKey",
            Self::KongCredentialACL => "KongCredentialACL",
            Self::KonnectCloudGatewayNetwork => "KonnectCloudGatewayNetwork",
            Self::KonnectCloudGatewayDataPlaneGroupConfiguration => {
                "KonnectCloudGatewayDataPlaneGroupConfiguration"
            }
            Self::KonnectCloudGatewayTransitGateway => "KonnectCloudGatewayTransitGateway",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and identity access shared by every synced kind
pub trait KonnectEntity: Resource<DynamicType = ()> + Clone + Send + Sync + 'static {
    /// Kind tag of this type
    const KIND: EntityKind;

    /// Status block, if any has been written
    fn entity_status(&self) -> Option<&KonnectEntityStatus>;

    /// Status block, created on first access
    fn entity_status_mut(&mut self) -> &mut KonnectEntityStatus;

    /// Adoption options from the spec
    fn adopt_options(&self) -> Option<&AdoptOptions>;

    /// Control plane reference from the spec, for kinds that have one
    fn control_plane_ref(&self) -> Option<&ControlPlaneRef> {
        None
    }

    /// True when the spec asks for read-only mirroring
    fn is_mirrored(&self) -> bool {
        false
    }

    /// Remote ID, if bound
    fn konnect_id(&self) -> Option<&str> {
        self.entity_status()
            .and_then(|s| s.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Bind a remote ID
    fn set_konnect_id(&mut self, id: String) {
        self.entity_status_mut().id = Some(id);
    }

    /// Forget the remote ID
    fn clear_konnect_id(&mut self) {
        self.entity_status_mut().id = None;
    }

    /// Konnect ID of the owning control plane
    fn control_plane_id(&self) -> Option<&str> {
        self.entity_status()
            .and_then(|s| s.control_plane_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Write parent IDs that can be derived from the spec alone
    ///
    /// A `konnectID` control plane reference needs no in-cluster resolution,
    /// so its ID goes straight to `status.controlPlaneID`.
    fn bind_parents(&mut self) {
        let literal = self
            .control_plane_ref()
            .filter(|r| r.type_ == ControlPlaneRefType::KonnectId)
            .and_then(|r| r.konnect_id.clone())
            .filter(|id| !id.is_empty());
        if let Some(id) = literal {
            if self.control_plane_id() != Some(id.as_str()) {
                self.entity_status_mut().control_plane_id = Some(id);
            }
        }
    }

    /// `namespace/name`, or `name` for cluster-scoped objects
    fn coordinates(&self) -> String {
        let meta = self.meta();
        let name = meta.name.as_deref().unwrap_or_default();
        match meta.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}/{name}"),
            _ => name.to_string(),
        }
    }
}

impl<T: KonnectEntity> ConditionsAware for T {
    fn conditions(&self) -> &[Condition] {
        self.entity_status()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.entity_status_mut().conditions
    }

    fn generation(&self) -> i64 {
        self.meta().generation.unwrap_or_default()
    }
}

/// Remote create/update/delete of one kind
#[async_trait]
pub trait EntityOps: KonnectEntity {
    /// Whether an update that finds the remote entity gone re-creates it
    const RECREATE_ON_NOT_FOUND: bool = true;

    /// Create the remote entity and bind its ID
    ///
    /// When a secondary write fails after the primary create, the ID is
    /// bound and `OpError::CreatedButRelationsFailed` is returned.
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()>;

    /// Converge the remote entity bound by ID to the spec
    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()>;

    /// Delete the remote entity bound by ID
    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()>;

    /// Find a remote entity created for this object, by its identity tag or label
    ///
    /// Used when create reports a conflict. Kinds without identity return None.
    async fn find_existing(&self, _sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        Ok(None)
    }
}

/// Binding to a pre-existing remote entity
#[async_trait]
pub trait Adoptable: EntityOps {
    /// Remote representation
    type Remote: Send + Sync;

    /// Read the remote entity by ID; `Ok(None)` for an empty answer
    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Self::Remote>>;

    /// Local UID recorded on the remote entity, if the kind records one
    fn remote_uid(_remote: &Self::Remote) -> Option<String> {
        None
    }

    /// Structural equality of the spec and the remote entity
    ///
    /// Order of list-valued fields is not significant. Fields left unset in
    /// the spec are not compared.
    fn matches(&self, remote: &Self::Remote) -> OpResult<bool>;
}

/// Read-only binding to a remote entity
pub trait Mirrorable: Adoptable {
    /// Konnect ID named by the mirror spec
    fn mirror_id(&self) -> Option<&str>;
}

macro_rules! konnect_entity {
    ($ty:ty => $kind:ident $(, $feature:ident)*) => {
        impl KonnectEntity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn entity_status(&self) -> Option<&KonnectEntityStatus> {
                self.status.as_ref()
            }

            fn entity_status_mut(&mut self) -> &mut KonnectEntityStatus {
                self.status.get_or_insert_with(Default::default)
            }

            fn adopt_options(&self) -> Option<&AdoptOptions> {
                self.spec.adopt.as_ref()
            }

            $(konnect_entity!(@$feature);)*
        }
    };
    (@control_plane_ref) => {
        fn control_plane_ref(&self) -> Option<&ControlPlaneRef> {
            self.spec.control_plane_ref.as_ref()
        }
    };
    (@mirror) => {
        fn is_mirrored(&self) -> bool {
            self.spec.source == EntitySource::Mirror
        }
    };
}

konnect_entity!(KonnectGatewayControlPlane => KonnectGatewayControlPlane, mirror);
konnect_entity!(KongService => KongService, control_plane_ref);
konnect_entity!(KongRoute => KongRoute, control_plane_ref);
konnect_entity!(KongConsumer => KongConsumer, control_plane_ref);
konnect_entity!(KongConsumerGroup => KongConsumerGroup, control_plane_ref);
konnect_entity!(KongUpstream => KongUpstream, control_plane_ref);
konnect_entity!(KongTarget => KongTarget, control_plane_ref);
konnect_entity!(KongCertificate => KongCertificate, control_plane_ref);
konnect_entity!(KongCACertificate => KongCACertificate, control_plane_ref);
konnect_entity!(KongSNI => KongSNI);
konnect_entity!(KongKey => KongKey, control_plane_ref);
konnect_entity!(KongKeySet => KongKeySet, control_plane_ref);
konnect_entity!(KongVault => KongVault, control_plane_ref);
konnect_entity!(KongPluginBinding => KongPluginBinding, control_plane_ref);
konnect_entity!(KongCredentialBasicAuth => KongCredentialBasicAuth);
konnect_entity!(KongCredentialAPIKey => KongCredentialAPIKey);
konnect_entity!(KongCredentialACL => KongCredentialACL);
konnect_entity!(KonnectCloudGatewayNetwork => KonnectCloudGatewayNetwork, mirror);
konnect_entity!(
    KonnectCloudGatewayDataPlaneGroupConfiguration => KonnectCloudGatewayDataPlaneGroupConfiguration,
    control_plane_ref
);
konnect_entity!(KonnectCloudGatewayTransitGateway => KonnectCloudGatewayTransitGateway);

#[cfg(test)]
mod tests {
    use super::*;
    use konnect_common::crd::KongServiceSpec;
    use kube::api::ObjectMeta;

    fn service(cp_ref: Option<ControlPlaneRef>) -> KongService {
        KongService {
            metadata: ObjectMeta {
                name: Some("svc".into()),
                namespace: Some("team-a".into()),
                generation: Some(4),
                ..Default::default()
            },
            spec: KongServiceSpec {
                host: "example.com".into(),
                control_plane_ref: cp_ref,
                ..Default::default()
            },
            status: None,
        }
    }

    #[test]
    fn kind_names_match_resource_kinds() {
        assert_eq!(KongService::KIND.as_str(), KongService::kind(&()));
        assert_eq!(
            KonnectCloudGatewayTransitGateway::KIND.to_string(),
            KonnectCloudGatewayTransitGateway::kind(&())
        );
        assert_eq!(KongVault::KIND.as_str(), KongVault::kind(&()));
    }

    #[test]
    fn konnect_id_round_trips_through_status() {
        let mut svc = service(None);
        assert_eq!(svc.konnect_id(), None);
        svc.set_konnect_id("12345".into());
        assert_eq!(svc.konnect_id(), Some("12345"));
        svc.clear_konnect_id();
        assert_eq!(svc.konnect_id(), None);
    }

    #[test]
    fn empty_konnect_id_counts_as_unbound() {
        let mut svc = service(None);
        svc.set_konnect_id(String::new());
        assert_eq!(svc.konnect_id(), None);
    }

    #[test]
    fn literal_control_plane_reference_is_bound_to_status() {
        let mut svc = service(Some(ControlPlaneRef::konnect_id("cp-1")));
        svc.bind_parents();
        assert_eq!(svc.control_plane_id(), Some("cp-1"));

        let mut svc = service(Some(ControlPlaneRef::namespaced("cp")));
        svc.bind_parents();
        assert_eq!(svc.control_plane_id(), None);
    }

    #[test]
    fn conditions_and_generation_come_from_the_object() {
        let svc = service(None);
        assert!(svc.conditions().is_empty());
        assert_eq!(svc.generation(), 4);
        assert_eq!(svc.coordinates(), "team-a/svc");
    }
}
