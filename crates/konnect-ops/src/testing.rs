//! Test doubles shared by adapter, dispatcher and adoption tests

use kube::api::ObjectMeta;

use konnect_sdk::*;

/// SDK whose every capability is a mockall mock
///
/// A mock without expectations panics when called, so a test that sets none
/// on a capability proves the code under test made no remote call there.
#[derive(Default)]
pub(crate) struct TestSdk {
    pub control_planes: MockControlPlanesApi,
    pub control_plane_groups: MockControlPlaneGroupsApi,
    pub services: MockServicesApi,
    pub routes: MockRoutesApi,
    pub consumers: MockConsumersApi,
    pub consumer_groups: MockConsumerGroupsApi,
    pub upstreams: MockUpstreamsApi,
    pub targets: MockTargetsApi,
    pub certificates: MockCertificatesApi,
    pub ca_certificates: MockCaCertificatesApi,
    pub snis: MockSnisApi,
    pub keys: MockKeysApi,
    pub key_sets: MockKeySetsApi,
    pub vaults: MockVaultsApi,
    pub plugins: MockPluginsApi,
    pub credentials: MockCredentialsApi,
    pub cloud_gateways: MockCloudGatewaysApi,
}

impl KonnectSdk for TestSdk {
    fn control_planes(&self) -> &dyn ControlPlanesApi {
        &self.control_planes
    }
    fn control_plane_groups(&self) -> &dyn ControlPlaneGroupsApi {
        &self.control_plane_groups
    }
    fn services(&self) -> &dyn ServicesApi {
        &self.services
    }
    fn routes(&self) -> &dyn RoutesApi {
        &self.routes
    }
    fn consumers(&self) -> &dyn ConsumersApi {
        &self.consumers
    }
    fn consumer_groups(&self) -> &dyn ConsumerGroupsApi {
        &self.consumer_groups
    }
    fn upstreams(&self) -> &dyn UpstreamsApi {
        &self.upstreams
    }
    fn targets(&self) -> &dyn TargetsApi {
        &self.targets
    }
    fn certificates(&self) -> &dyn CertificatesApi {
        &self.certificates
    }
    fn ca_certificates(&self) -> &dyn CaCertificatesApi {
        &self.ca_certificates
    }
    fn snis(&self) -> &dyn SnisApi {
        &self.snis
    }
    fn keys(&self) -> &dyn KeysApi {
        &self.keys
    }
    fn key_sets(&self) -> &dyn KeySetsApi {
        &self.key_sets
    }
    fn vaults(&self) -> &dyn VaultsApi {
        &self.vaults
    }
    fn plugins(&self) -> &dyn PluginsApi {
        &self.plugins
    }
    fn credentials(&self) -> &dyn CredentialsApi {
        &self.credentials
    }
    fn cloud_gateways(&self) -> &dyn CloudGatewaysApi {
        &self.cloud_gateways
    }
}

/// Namespaced object metadata with a UID and generation 1
pub(crate) fn meta(name: &str, uid: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some("default".to_string()),
        uid: Some(uid.to_string()),
        generation: Some(1),
        ..Default::default()
    }
}
