//! KongPluginBinding adapter
//!
//! A binding attaches a plugin instance to any combination of service,
//! route, consumer and consumer group. Every target named in the spec must
//! have its Konnect ID on status before the plugin is written; a binding
//! with no targets is a global plugin.

use async_trait::async_trait;

use konnect_common::crd::{KongPluginBinding, KonnectEntityStatus, NamespacedRef};
use konnect_sdk::models::{IdRef, Plugin, PluginInput};
use konnect_sdk::KonnectSdk;

use super::{
    assigned_id, control_plane_id, first_id, konnect_id, matches_ignoring_tags, parent_id,
};
use crate::entity::{Adoptable, EntityOps, KonnectEntity};
use crate::error::{Op, OpResult};
use crate::tags::{generate_tags, local_uid, uid_from_tags, uid_tag};

fn target(
    binding: &KongPluginBinding,
    reference: Option<&NamespacedRef>,
    id: fn(&KonnectEntityStatus) -> Option<&str>,
    parent: &'static str,
) -> OpResult<Option<IdRef>> {
    if reference.is_none() {
        return Ok(None);
    }
    let id = parent_id(binding, binding.entity_status().and_then(id), parent)?;
    Ok(Some(IdRef::new(id)))
}

fn plugin_input(binding: &KongPluginBinding) -> OpResult<PluginInput> {
    let spec = &binding.spec;
    let targets = &spec.targets;
    Ok(PluginInput {
        name: spec.plugin_name.clone(),
        instance_name: spec.instance_name.clone(),
        config: spec.config.clone(),
        enabled: spec.enabled,
        protocols: spec.protocols.clone(),
        service: target(
            binding,
            targets.service_ref.as_ref(),
            |s| s.service_id.as_deref(),
            "service",
        )?,
        route: target(
            binding,
            targets.route_ref.as_ref(),
            |s| s.route_id.as_deref(),
            "route",
        )?,
        consumer: target(
            binding,
            targets.consumer_ref.as_ref(),
            |s| s.consumer_id.as_deref(),
            "consumer",
        )?,
        consumer_group: target(
            binding,
            targets.consumer_group_ref.as_ref(),
            |s| s.consumer_group_id.as_deref(),
            "consumer group",
        )?,
        tags: generate_tags(binding, &spec.tags),
    })
}

#[async_trait]
impl EntityOps for KongPluginBinding {
    async fn create(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let input = plugin_input(self)?;
        let created = sdk.plugins().create_plugin(&cp_id, &input).await?;
        let id = assigned_id(Self::KIND, Op::Create, created.and_then(|p| p.id))?;
        self.set_konnect_id(id);
        Ok(())
    }

    async fn update(&mut self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Update)?;
        let input = plugin_input(self)?;
        sdk.plugins().upsert_plugin(&cp_id, &id, &input).await?;
        Ok(())
    }

    async fn delete(&self, sdk: &dyn KonnectSdk) -> OpResult<()> {
        let cp_id = control_plane_id(self)?;
        let id = konnect_id(self, Op::Delete)?;
        sdk.plugins().delete_plugin(&cp_id, &id).await?;
        Ok(())
    }

    async fn find_existing(&self, sdk: &dyn KonnectSdk) -> OpResult<Option<String>> {
        let cp_id = control_plane_id(self)?;
        let found = sdk
            .plugins()
            .list_plugins(&cp_id, &[uid_tag(local_uid(self))])
            .await?;
        Ok(first_id(found.into_iter().map(|p| p.id)))
    }
}

#[async_trait]
impl Adoptable for KongPluginBinding {
    type Remote = Plugin;

    async fn fetch(&self, sdk: &dyn KonnectSdk, id: &str) -> OpResult<Option<Plugin>> {
        let cp_id = control_plane_id(self)?;
        Ok(sdk.plugins().get_plugin(&cp_id, id).await?)
    }

    fn remote_uid(remote: &Plugin) -> Option<String> {
        uid_from_tags(&remote.input.tags).map(str::to_string)
    }

    fn matches(&self, remote: &Plugin) -> OpResult<bool> {
        matches_ignoring_tags(&plugin_input(self)?, &remote.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpError;
    use crate::testing::{meta, TestSdk};
    use konnect_common::crd::{KongPluginBindingSpec, PluginTargets};
    use serde_json::json;

    fn named(name: &str) -> Option<NamespacedRef> {
        Some(NamespacedRef {
            name: name.into(),
            namespace: None,
        })
    }

    fn binding(targets: PluginTargets, status: KonnectEntityStatus) -> KongPluginBinding {
        KongPluginBinding {
            metadata: meta("rate-limit", "uid-plugin"),
            spec: KongPluginBindingSpec {
                plugin_name: "rate-limiting".into(),
                config: json!({ "minute": 5 }),
                targets,
                ..Default::default()
            },
            status: Some(KonnectEntityStatus {
                control_plane_id: Some("cp-1".into()),
                ..status
            }),
        }
    }

    #[test]
    fn global_plugin_has_no_targets() {
        let input = plugin_input(&binding(PluginTargets::default(), Default::default())).unwrap();
        assert_eq!(input.service, None);
        assert_eq!(input.route, None);
        assert_eq!(input.consumer, None);
        assert_eq!(input.consumer_group, None);
    }

    #[test]
    fn every_named_target_needs_its_id() {
        let targets = PluginTargets {
            service_ref: named("svc"),
            consumer_ref: named("alice"),
            ..Default::default()
        };
        let status = KonnectEntityStatus {
            service_id: Some("svc-1".into()),
            ..Default::default()
        };
        let err = plugin_input(&binding(targets.clone(), status)).unwrap_err();
        assert!(matches!(err, OpError::MissingParentId { parent: "consumer", .. }));

        let status = KonnectEntityStatus {
            service_id: Some("svc-1".into()),
            consumer_id: Some("c-1".into()),
            ..Default::default()
        };
        let input = plugin_input(&binding(targets, status)).unwrap();
        assert_eq!(input.service, Some(IdRef::new("svc-1")));
        assert_eq!(input.consumer, Some(IdRef::new("c-1")));
    }

    #[tokio::test]
    async fn create_sends_plugin_config() {
        let mut sdk = TestSdk::default();
        sdk.plugins
            .expect_create_plugin()
            .withf(|_, input| input.name == "rate-limiting" && input.config["minute"] == 5)
            .times(1)
            .returning(|_, input| {
                Ok(Some(Plugin {
                    id: Some("p-1".into()),
                    input: input.clone(),
                }))
            });

        let mut b = binding(PluginTargets::default(), Default::default());
        b.create(&sdk).await.unwrap();
        assert_eq!(b.konnect_id(), Some("p-1"));
    }
}
