//! KongCertificate, KongCACertificate and KongSNI adapters
//!
//! SNIs hang off a certificate. The SNI has no control plane reference of
//! its own; the control plane ID is written to its status together with the
//! certificate ID when the certificate reference is resolved.

use async_trait::async_trait;

use konnect_common::crd::{KongCACertificate, KongCertificate, KongSNI};
use konnect_sdk::models::{
    CaCertificate, CaCertificateInput, Certificate, CertificateInput, IdRef, Sni, SniInput,
};
use konnect_sdk::KonnectSdk;

use super::{
    assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags, parent_id,
};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn certificate_input(cert: &KongCertificate) -> CertificateInput {
    let spec = &cert.spec;
    CertificateInput {
        cert: spec.cert.clone(),
        key: spec.key.clone(),
        cert_alt: spec.cert_alt.clone(),
        key_alt: spec.key_alt.clone(),
        tags: generate_tags(cert, &spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongCertificate {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .certificates()
            .create_certificate(&cp_id, &certificate_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|c| c.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.certificates()
            .upsert_certificate(&cp_id, &id, &certificate_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.certificates().delete_certificate(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .certificates()
            .list_certificates(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|c| c.id)))
    }
}

#[async_trait]
impl Adoptable for KongCertificate {
    type Remote = Certificate;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Certificate>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.certificates().get_certificate(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Certificate) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Certificate) -> OpResult<bool> {
        matches_ignoring_tags(&certificate_input(self), &remote.input)
    }
}

fn ca_certificate_input(cert: &KongCACertificate) -> CaCertificateInput {
    CaCertificateInput {
        cert: cert.spec.cert.clone(),
        cert_digest: cert.spec.cert_digest.clone(),
        tags: generate_tags(cert, &cert.spec.tags),
    }
}

#[async_trait]
impl EntityOps for KongCACertificate {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let created = sdk
            .ca_certificates()
            .create_ca_certificate(&cp_id, &ca_certificate_input(self))
            .await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|c| c.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        sdk.ca_certificates()
            .upsert_ca_certificate(&cp_id, &id, &ca_certificate_input(self))
            .await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.ca_certificates().delete_ca_certificate(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .ca_certificates()
            .list_ca_certificates(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|c| c.id)))
    }
}

#[async_trait]
impl Adoptable for KongCACertificate {
    type Remote = CaCertificate;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<CaCertificate>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.ca_certificates().get_ca_certificate(&cp_id, id).await?)
    }

    fn remote_uid(remote: &CaCertificate) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &CaCertificate) -> OpResult<bool> {
        matches_ignoring_tags(&ca_certificate_input(self), &remote.input)
    }
}

fn sni_input(sni: &KongSNI) -> OpResult<SniInput> {
    let certificate_id = parent_id(
        sni,
        sni.entity_status().and_then(|s| s.certificate_id.as_deref()),
        "certificate",
    )?;
    Ok(SniInput {
        name: sni.spec.name.clone(),
        certificate: IdRef::new(certificate_id),
        tags: generate_tags(sni, &sni.spec.tags),
    })
}

#[async_trait]
impl EntityOps for KongSNI {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let input = sni_input(self)?;
        let created = sdk.snis().create_sni(&cp_id, &input).await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|s| s.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        let input = sni_input(self)?;
        sdk.snis().upsert_sni(&cp_id, &id, &input).await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.snis().delete_sni(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .snis()
            .list_snis(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|s| s.id)))
    }
}

#[async_trait]
impl Adoptable for KongSNI {
    type Remote = Sni;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Sni>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.snis().get_sni(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Sni) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Sni) -> OpResult<bool> {
        matches_ignoring_tags(&sni_input(self)?, &remote.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpError;
    use crate::testing::{meta, TestSdk};
    use konnect_common::crd::{KongSNISpec, KonnectEntityStatus, NamespacedRef};

    fn sni(certificate_id: Option<&str>) -> KongSNI {
        KongSNI {
            metadata: meta("sni-1", "uid-sni"),
            spec: KongSNISpec {
                certificate_ref: NamespacedRef {
                    name: "cert".into(),
                    namespace: None,
                },
                name: "api.example.com".into(),
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                control_plane_id: Some("cp-1".into()),
                certificate_id: certificate_id.map(str::to_string),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn sni_create_references_certificate() {
        let mut sdk = TestSdk::default();
        sdk.snis
            .expect_create_sni()
            .withf(|cp, input| cp == "cp-1" && input.certificate == IdRef::new("cert-1"))
            .times(1)
            .returning(|_, input| {
                Ok(Some(Sni {
                    id: Some("sni-id".into()),
                    input: input.clone(),
                }))
            });

        let mut s = sni(Some("cert-1"));
        s.create(&sdk).await.unwrap();
        assert_eq!(s.konnect_id(), Some("sni-id"));
    }

    #[tokio::test]
    async fn sni_without_certificate_id_makes_no_call() {
        let sdk = TestSdk::default();
        let mut s = sni(None);
        let err = s.create(&sdk).await.unwrap_err();
        assert!(matches!(err, OpError::MissingParentId { parent: "certificate", .. }));
    }

    #[test]
    fn sni_match_compares_certificate_binding() {
        let s = sni(Some("cert-1"));
        let mut remote = Sni {
            id: Some("sni-id".into()),
            input: SniInput {
                name: "api.example.com".into(),
                certificate: IdRef::new("cert-1"),
                tags: vec![],
            },
        };
        assert!(s.matches(&remote).unwrap());
        remote.input.certificate = IdRef::new("cert-2");
        assert!(!s.matches(&remote).unwrap());
    }
}
