//! Custom Resource Definitions for Konnect-backed entities
//!
//! Control planes and cloud gateway constructs live in `konnect.konghq.com`;
//! gateway configuration entities live in `configuration.konghq.com`.

mod certificate;
mod cloud_gateway;
mod consumer;
mod control_plane;
mod credentials;
mod key;
mod plugin_binding;
mod service;
mod types;
mod upstream;
mod vault;

pub use certificate::{
    KongCACertificate, KongCACertificateSpec, KongCertificate, KongCertificateSpec, KongSNI,
    KongSNISpec,
};
pub use cloud_gateway::{
    AutoscaleAutopilotSpec, AutoscaleStaticSpec, AutoscaleType, AwsTransitGatewaySpec,
    AzureTransitGatewaySpec, DataPlaneEnvVar, DataPlaneGroupAutoscale, DataPlaneGroupSpec,
    KonnectCloudGatewayDataPlaneGroupConfiguration,
    KonnectCloudGatewayDataPlaneGroupConfigurationSpec, KonnectCloudGatewayNetwork,
    KonnectCloudGatewayNetworkSpec, KonnectCloudGatewayTransitGateway,
    KonnectCloudGatewayTransitGatewaySpec, TransitGatewayDnsConfigSpec, TransitGatewayType,
};
pub use consumer::{KongConsumer, KongConsumerGroup, KongConsumerGroupSpec, KongConsumerSpec};
pub use control_plane::{
    ControlPlaneAuthType, ControlPlaneClusterType, ControlPlaneMember, KonnectGatewayControlPlane,
    KonnectGatewayControlPlaneSpec,
};
pub use credentials::{
    KongCredentialACL, KongCredentialACLSpec, KongCredentialAPIKey, KongCredentialAPIKeySpec,
    KongCredentialBasicAuth, KongCredentialBasicAuthSpec,
};
pub use key::{KongKey, KongKeySet, KongKeySetSpec, KongKeySpec, PemKeyPairSpec};
pub use plugin_binding::{KongPluginBinding, KongPluginBindingSpec, PluginTargets};
pub use service::{KongRoute, KongRouteSpec, KongService, KongServiceSpec};
pub use types::{
    AdoptKonnectOptions, AdoptMode, AdoptOptions, AdoptSource, Condition, ConditionStatus,
    ControlPlaneRef, ControlPlaneRefType, EntitySource, KonnectEntityStatus, MirrorKonnect,
    MirrorSpec, NamespacedRef,
};
pub use upstream::{KongTarget, KongTargetSpec, KongUpstream, KongUpstreamSpec};
pub use vault::{KongVault, KongVaultSpec};
