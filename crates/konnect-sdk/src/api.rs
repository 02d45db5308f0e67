//! Capability interfaces of the Konnect management API
//!
//! One trait per entity kind. Create and upsert return `Ok(None)` when the API
//! answered 2xx without a body, which callers treat as an incomplete response.
//! List operations filter by exact tag match (gateway entities) or by a label
//! filter expression (control planes).

use async_trait::async_trait;

#[cfg(any(test, feature = "mock"))]
use mockall::automock;

use crate::error::SdkError;
use crate::models::*;

/// Result alias for SDK calls
pub type SdkResult<T> = Result<T, SdkError>;

// =============================================================================
// Control planes
// =============================================================================

/// Control plane operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ControlPlanesApi: Send + Sync {
    async fn create_control_plane(
        &self,
        req: &CreateControlPlaneRequest,
    ) -> SdkResult<Option<ControlPlane>>;
    async fn update_control_plane(
        &self,
        id: &str,
        req: &UpdateControlPlaneRequest,
    ) -> SdkResult<Option<ControlPlane>>;
    async fn delete_control_plane(&self, id: &str) -> SdkResult<()>;
    async fn get_control_plane(&self, id: &str) -> SdkResult<Option<ControlPlane>>;
    /// List control planes matching a label filter such as `k8s-uid:1234`
    async fn list_control_planes(&self, label_filter: &str) -> SdkResult<Vec<ControlPlane>>;
}

/// Control plane group membership operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ControlPlaneGroupsApi: Send + Sync {
    /// Replace the full member list of a group
    async fn put_group_memberships(&self, group_id: &str, member_ids: &[String]) -> SdkResult<()>;
}

// =============================================================================
// Gateway entities
// =============================================================================

/// Service operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ServicesApi: Send + Sync {
    async fn create_service(&self, cp_id: &str, input: &ServiceInput)
        -> SdkResult<Option<Service>>;
    async fn upsert_service(
        &self,
        cp_id: &str,
        id: &str,
        input: &ServiceInput,
    ) -> SdkResult<Option<Service>>;
    async fn delete_service(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_service(&self, cp_id: &str, id: &str) -> SdkResult<Option<Service>>;
    async fn list_services(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Service>>;
}

/// Route operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait RoutesApi: Send + Sync {
    async fn create_route(&self, cp_id: &str, input: &RouteInput) -> SdkResult<Option<Route>>;
    async fn upsert_route(
        &self,
        cp_id: &str,
        id: &str,
        input: &RouteInput,
    ) -> SdkResult<Option<Route>>;
    async fn delete_route(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_route(&self, cp_id: &str, id: &str) -> SdkResult<Option<Route>>;
    async fn list_routes(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Route>>;
}

/// Consumer operations, including consumer group membership
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ConsumersApi: Send + Sync {
    async fn create_consumer(
        &self,
        cp_id: &str,
        input: &ConsumerInput,
    ) -> SdkResult<Option<Consumer>>;
    async fn upsert_consumer(
        &self,
        cp_id: &str,
        id: &str,
        input: &ConsumerInput,
    ) -> SdkResult<Option<Consumer>>;
    async fn delete_consumer(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_consumer(&self, cp_id: &str, id: &str) -> SdkResult<Option<Consumer>>;
    async fn list_consumers(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Consumer>>;
    async fn list_consumer_groups_for_consumer(
        &self,
        cp_id: &str,
        consumer_id: &str,
    ) -> SdkResult<Vec<ConsumerGroup>>;
    async fn add_consumer_to_group(
        &self,
        cp_id: &str,
        group_id: &str,
        consumer_id: &str,
    ) -> SdkResult<()>;
    async fn remove_consumer_from_group(
        &self,
        cp_id: &str,
        group_id: &str,
        consumer_id: &str,
    ) -> SdkResult<()>;
}

/// Consumer group operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ConsumerGroupsApi: Send + Sync {
    async fn create_consumer_group(
        &self,
        cp_id: &str,
        input: &ConsumerGroupInput,
    ) -> SdkResult<Option<ConsumerGroup>>;
    async fn upsert_consumer_group(
        &self,
        cp_id: &str,
        id: &str,
        input: &ConsumerGroupInput,
    ) -> SdkResult<Option<ConsumerGroup>>;
    async fn delete_consumer_group(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    /// Fetch by ID or by name
    async fn get_consumer_group(
        &self,
        cp_id: &str,
        id_or_name: &str,
    ) -> SdkResult<Option<ConsumerGroup>>;
    async fn list_consumer_groups(
        &self,
        cp_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<ConsumerGroup>>;
}

/// Upstream operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait UpstreamsApi: Send + Sync {
    async fn create_upstream(
        &self,
        cp_id: &str,
        input: &UpstreamInput,
    ) -> SdkResult<Option<Upstream>>;
    async fn upsert_upstream(
        &self,
        cp_id: &str,
        id: &str,
        input: &UpstreamInput,
    ) -> SdkResult<Option<Upstream>>;
    async fn delete_upstream(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_upstream(&self, cp_id: &str, id: &str) -> SdkResult<Option<Upstream>>;
    async fn list_upstreams(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Upstream>>;
}

/// Target operations, scoped to an upstream
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait TargetsApi: Send + Sync {
    async fn create_target(
        &self,
        cp_id: &str,
        upstream_id: &str,
        input: &TargetInput,
    ) -> SdkResult<Option<Target>>;
    async fn upsert_target(
        &self,
        cp_id: &str,
        upstream_id: &str,
        id: &str,
        input: &TargetInput,
    ) -> SdkResult<Option<Target>>;
    async fn delete_target(&self, cp_id: &str, upstream_id: &str, id: &str) -> SdkResult<()>;
    async fn get_target(
        &self,
        cp_id: &str,
        upstream_id: &str,
        id: &str,
    ) -> SdkResult<Option<Target>>;
    async fn list_targets(
        &self,
        cp_id: &str,
        upstream_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<Target>>;
}

/// Certificate operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait CertificatesApi: Send + Sync {
    async fn create_certificate(
        &self,
        cp_id: &str,
        input: &CertificateInput,
    ) -> SdkResult<Option<Certificate>>;
    async fn upsert_certificate(
        &self,
        cp_id: &str,
        id: &str,
        input: &CertificateInput,
    ) -> SdkResult<Option<Certificate>>;
    async fn delete_certificate(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_certificate(&self, cp_id: &str, id: &str) -> SdkResult<Option<Certificate>>;
    async fn list_certificates(
        &self,
        cp_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<Certificate>>;
}

/// CA certificate operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait CaCertificatesApi: Send + Sync {
    async fn create_ca_certificate(
        &self,
        cp_id: &str,
        input: &CaCertificateInput,
    ) -> SdkResult<Option<CaCertificate>>;
    async fn upsert_ca_certificate(
        &self,
        cp_id: &str,
        id: &str,
        input: &CaCertificateInput,
    ) -> SdkResult<Option<CaCertificate>>;
    async fn delete_ca_certificate(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_ca_certificate(&self, cp_id: &str, id: &str)
        -> SdkResult<Option<CaCertificate>>;
    async fn list_ca_certificates(
        &self,
        cp_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<CaCertificate>>;
}

/// SNI operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait SnisApi: Send + Sync {
    async fn create_sni(&self, cp_id: &str, input: &SniInput) -> SdkResult<Option<Sni>>;
    async fn upsert_sni(&self, cp_id: &str, id: &str, input: &SniInput)
        -> SdkResult<Option<Sni>>;
    async fn delete_sni(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_sni(&self, cp_id: &str, id: &str) -> SdkResult<Option<Sni>>;
    async fn list_snis(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Sni>>;
}

/// Key operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait KeysApi: Send + Sync {
    async fn create_key(&self, cp_id: &str, input: &KeyInput) -> SdkResult<Option<Key>>;
    async fn upsert_key(&self, cp_id: &str, id: &str, input: &KeyInput)
        -> SdkResult<Option<Key>>;
    async fn delete_key(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_key(&self, cp_id: &str, id: &str) -> SdkResult<Option<Key>>;
    async fn list_keys(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Key>>;
}

/// Key set operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait KeySetsApi: Send + Sync {
    async fn create_key_set(&self, cp_id: &str, input: &KeySetInput)
        -> SdkResult<Option<KeySet>>;
    async fn upsert_key_set(
        &self,
        cp_id: &str,
        id: &str,
        input: &KeySetInput,
    ) -> SdkResult<Option<KeySet>>;
    async fn delete_key_set(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_key_set(&self, cp_id: &str, id: &str) -> SdkResult<Option<KeySet>>;
    async fn list_key_sets(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<KeySet>>;
}

/// Vault operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait VaultsApi: Send + Sync {
    async fn create_vault(&self, cp_id: &str, input: &VaultInput) -> SdkResult<Option<Vault>>;
    async fn upsert_vault(
        &self,
        cp_id: &str,
        id: &str,
        input: &VaultInput,
    ) -> SdkResult<Option<Vault>>;
    async fn delete_vault(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_vault(&self, cp_id: &str, id: &str) -> SdkResult<Option<Vault>>;
    async fn list_vaults(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Vault>>;
}

/// Plugin operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait PluginsApi: Send + Sync {
    async fn create_plugin(&self, cp_id: &str, input: &PluginInput)
        -> SdkResult<Option<Plugin>>;
    async fn upsert_plugin(
        &self,
        cp_id: &str,
        id: &str,
        input: &PluginInput,
    ) -> SdkResult<Option<Plugin>>;
    async fn delete_plugin(&self, cp_id: &str, id: &str) -> SdkResult<()>;
    async fn get_plugin(&self, cp_id: &str, id: &str) -> SdkResult<Option<Plugin>>;
    async fn list_plugins(&self, cp_id: &str, tags: &[String]) -> SdkResult<Vec<Plugin>>;
}

/// Consumer credential operations, scoped to a consumer
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait CredentialsApi: Send + Sync {
    async fn create_basic_auth(
        &self,
        cp_id: &str,
        consumer_id: &str,
        input: &BasicAuthInput,
    ) -> SdkResult<Option<BasicAuth>>;
    async fn upsert_basic_auth(
        &self,
        cp_id: &str,
        consumer_id: &str,
        id: &str,
        input: &BasicAuthInput,
    ) -> SdkResult<Option<BasicAuth>>;
    async fn delete_basic_auth(&self, cp_id: &str, consumer_id: &str, id: &str)
        -> SdkResult<()>;
    async fn get_basic_auth(
        &self,
        cp_id: &str,
        consumer_id: &str,
        id: &str,
    ) -> SdkResult<Option<BasicAuth>>;
    async fn list_basic_auths(
        &self,
        cp_id: &str,
        consumer_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<BasicAuth>>;

    async fn create_key_auth(
        &self,
        cp_id: &str,
        consumer_id: &str,
        input: &KeyAuthInput,
    ) -> SdkResult<Option<KeyAuth>>;
    async fn upsert_key_auth(
        &self,
        cp_id: &str,
        consumer_id: &str,
        id: &str,
        input: &KeyAuthInput,
    ) -> SdkResult<Option<KeyAuth>>;
    async fn delete_key_auth(&self, cp_id: &str, consumer_id: &str, id: &str) -> SdkResult<()>;
    async fn get_key_auth(
        &self,
        cp_id: &str,
        consumer_id: &str,
        id: &str,
    ) -> SdkResult<Option<KeyAuth>>;
    async fn list_key_auths(
        &self,
        cp_id: &str,
        consumer_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<KeyAuth>>;

    async fn create_acl(
        &self,
        cp_id: &str,
        consumer_id: &str,
        input: &AclInput,
    ) -> SdkResult<Option<Acl>>;
    async fn upsert_acl(
        &self,
        cp_id: &str,
        consumer_id: &str,
        id: &str,
        input: &AclInput,
    ) -> SdkResult<Option<Acl>>;
    async fn delete_acl(&self, cp_id: &str, consumer_id: &str, id: &str) -> SdkResult<()>;
    async fn get_acl(&self, cp_id: &str, consumer_id: &str, id: &str)
        -> SdkResult<Option<Acl>>;
    async fn list_acls(
        &self,
        cp_id: &str,
        consumer_id: &str,
        tags: &[String],
    ) -> SdkResult<Vec<Acl>>;
}

// =============================================================================
// Dedicated Cloud Gateways
// =============================================================================

/// Network, configuration and transit gateway operations
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait CloudGatewaysApi: Send + Sync {
    async fn create_network(&self, req: &CreateNetworkRequest) -> SdkResult<Option<Network>>;
    async fn update_network(
        &self,
        id: &str,
        req: &PatchNetworkRequest,
    ) -> SdkResult<Option<Network>>;
    async fn delete_network(&self, id: &str) -> SdkResult<()>;
    async fn get_network(&self, id: &str) -> SdkResult<Option<Network>>;

    /// Submit the full data plane group configuration of a control plane
    async fn create_configuration(
        &self,
        req: &CreateConfigurationRequest,
    ) -> SdkResult<Option<Configuration>>;
    async fn get_configuration(&self, id: &str) -> SdkResult<Option<Configuration>>;
    async fn list_configurations(&self, control_plane_id: &str) -> SdkResult<Vec<Configuration>>;

    async fn create_transit_gateway(
        &self,
        network_id: &str,
        req: &CreateTransitGatewayRequest,
    ) -> SdkResult<Option<TransitGateway>>;
    async fn delete_transit_gateway(&self, network_id: &str, id: &str) -> SdkResult<()>;
    async fn get_transit_gateway(
        &self,
        network_id: &str,
        id: &str,
    ) -> SdkResult<Option<TransitGateway>>;
}

// =============================================================================
// Aggregate
// =============================================================================

/// Entry point grouping every capability interface
///
/// Implementations hold one authenticated client per Konnect organization and
/// hand out borrowed capability views.
pub trait KonnectSdk: Send + Sync {
    fn control_planes(&self) -> &dyn ControlPlanesApi;
    fn control_plane_groups(&self) -> &dyn ControlPlaneGroupsApi;
    fn services(&self) -> &dyn ServicesApi;
    fn routes(&self) -> &dyn RoutesApi;
    fn consumers(&self) -> &dyn ConsumersApi;
    fn consumer_groups(&self) -> &dyn ConsumerGroupsApi;
    fn upstreams(&self) -> &dyn UpstreamsApi;
    fn targets(&self) -> &dyn TargetsApi;
    fn certificates(&self) -> &dyn CertificatesApi;
    fn ca_certificates(&self) -> &dyn CaCertificatesApi;
    fn snis(&self) -> &dyn SnisApi;
    fn keys(&self) -> &dyn KeysApi;
    fn key_sets(&self) -> &dyn KeySetsApi;
    fn vaults(&self) -> &dyn VaultsApi;
    fn plugins(&self) -> &dyn PluginsApi;
    fn credentials(&self) -> &dyn CredentialsApi;
    fn cloud_gateways(&self) -> &dyn CloudGatewaysApi;
}
