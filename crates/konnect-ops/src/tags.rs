//! Identity tags and labels
//!
//! Remote entities carry `key:value` tags (or, for control planes, a label
//! map) derived from the local object's coordinates. Other systems read these
//! to resolve ownership, so keys and format are fixed.

use std::collections::{BTreeMap, BTreeSet};

use kube::Resource;

use konnect_common::TAGS_ANNOTATION;

/// Namespace of the local object
pub const NAMESPACE_KEY: &str = "k8s-namespace";
/// Name of the local object
pub const NAME_KEY: &str = "k8s-name";
/// UID of the local object
pub const UID_KEY: &str = "k8s-uid";
/// Kind of the local object
pub const KIND_KEY: &str = "k8s-kind";
/// API group of the local object
pub const GROUP_KEY: &str = "k8s-group";
/// API version of the local object
pub const VERSION_KEY: &str = "k8s-version";
/// Generation of the local object
pub const GENERATION_KEY: &str = "k8s-generation";

/// Maximum number of tags Konnect accepts on one entity
pub const MAX_TAGS: usize = 20;
/// Maximum tag length, in characters
pub const MAX_TAG_LEN: usize = 65;
/// Maximum label value length, in characters
pub const MAX_LABEL_VALUE_LEN: usize = 63;

/// Identity tags for `obj` plus caller-supplied and annotation tags
///
/// Priority on deduplication and when the count exceeds [`MAX_TAGS`] is
/// coordinate tags, then `extra`, then annotation tags; the lowest priority
/// tags are dropped first. The result is sorted.
pub fn generate_tags<K>(obj: &K, extra: &[String]) -> Vec<String>
where
    K: Resource<DynamicType = ()>,
{
    let coordinates = coordinates(obj)
        .into_iter()
        .map(|(key, value)| format!("{key}:{value}"));
    let extra = extra.iter().cloned();
    let annotated = annotation_tags(obj);

    let mut seen = BTreeSet::new();
    let mut tags = Vec::new();
    for tag in coordinates.chain(extra).chain(annotated) {
        let tag = truncate(tag.trim(), MAX_TAG_LEN);
        if tag.is_empty() || !seen.insert(tag.clone()) {
            continue;
        }
        tags.push(tag);
    }

    tags.truncate(MAX_TAGS);
    tags.sort();
    tags
}

/// Identity labels for `obj`, with `user` labels merged on top
pub fn generate_labels<K>(obj: &K, user: &BTreeMap<String, String>) -> BTreeMap<String, String>
where
    K: Resource<DynamicType = ()>,
{
    let mut labels: BTreeMap<String, String> = coordinates(obj)
        .into_iter()
        .map(|(key, value)| (key.to_string(), truncate(&value, MAX_LABEL_VALUE_LEN)))
        .collect();
    labels.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    labels
}

/// The `k8s-uid` tag for `uid`
pub fn uid_tag(uid: &str) -> String {
    format!("{UID_KEY}:{uid}")
}

/// UID recorded in a remote tag set, if any
pub fn uid_from_tags(tags: &[String]) -> Option<&str> {
    tags.iter().find_map(|tag| {
        tag.strip_prefix(UID_KEY)
            .and_then(|rest| rest.strip_prefix(':'))
    })
}

/// UID recorded in a remote label map, if any
pub fn uid_from_labels(labels: &BTreeMap<String, String>) -> Option<&str> {
    labels.get(UID_KEY).map(String::as_str)
}

/// UID of the local object, empty when unset
pub fn local_uid<K: Resource>(obj: &K) -> &str {
    obj.meta().uid.as_deref().unwrap_or_default()
}

fn coordinates<K>(obj: &K) -> Vec<(&'static str, String)>
where
    K: Resource<DynamicType = ()>,
{
    let meta = obj.meta();
    let mut out = Vec::with_capacity(7);
    if let Some(namespace) = meta.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        out.push((NAMESPACE_KEY, namespace.to_string()));
    }
    out.push((NAME_KEY, meta.name.clone().unwrap_or_default()));
    out.push((UID_KEY, meta.uid.clone().unwrap_or_default()));
    out.push((KIND_KEY, K::kind(&()).to_string()));
    out.push((GROUP_KEY, K::group(&()).to_string()));
    out.push((VERSION_KEY, K::version(&()).to_string()));
    out.push((GENERATION_KEY, meta.generation.unwrap_or_default().to_string()));
    out
}

fn annotation_tags<K: Resource>(obj: &K) -> Vec<String> {
    obj.meta()
        .annotations
        .as_ref()
        .and_then(|a| a.get(TAGS_ANNOTATION))
        .map(|raw| raw.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
