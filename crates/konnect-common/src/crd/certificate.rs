//! KongCertificate, KongCACertificate and KongSNI CRDs

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{AdoptOptions, ControlPlaneRef, KonnectEntityStatus, NamespacedRef};

/// KongCertificate declares a TLS certificate and key.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCertificate",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongCertificateSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// PEM certificate
    pub cert: String,

    /// PEM private key
    pub key: String,

    /// Alternate PEM certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_alt: Option<String>,

    /// Alternate PEM private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alt: Option<String>,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing certificate instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongCACertificate declares a trusted CA certificate.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongCACertificate",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongCACertificateSpec {
    /// Owning control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_ref: Option<ControlPlaneRef>,

    /// PEM CA certificate
    pub cert: String,

    /// SHA-256 digest of the certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_digest: Option<String>,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing CA certificate instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}

/// KongSNI binds a server name to a KongCertificate.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "configuration.konghq.com",
    version = "v1alpha1",
    kind = "KongSNI",
    namespaced,
    status = "KonnectEntityStatus",
    printcolumn = r#"{"name":"Name","type":"string","jsonPath":".spec.name"}"#,
    printcolumn = r#"{"name":"ID","type":"string","jsonPath":".status.id"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KongSNISpec {
    /// Certificate served for this name
    pub certificate_ref: NamespacedRef,

    /// Server name
    pub name: String,

    /// Extra tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Adopt an existing SNI instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adopt: Option<AdoptOptions>,
}
