//! Per-kind adapters
//!
//! Each adapter validates parent IDs before any remote call, builds the
//! request deterministically from the spec and identity tags, rejects 2xx
//! answers without an ID, and returns SDK failures already classified.

mod certificate;
mod cloud_gateway;
mod consumer;
mod control_plane;
mod credentials;
mod key;
mod plugin;
mod service;
mod upstream;
mod vault;

use serde::Serialize;
use serde_json::Value;

use crate::entity::{EntityKind, KonnectEntity};
use crate::error::{Op, OpError, OpResult};
use crate::normalize;

/// Control plane ID from status, or a missing parent error
pub(crate) fn control_plane_id<T: KonnectEntity>(entity: &T) -> OpResult<String> {
    parent_id(entity, entity.control_plane_id(), "control plane")
}

/// A parent ID, or a missing parent error naming the relationship
pub(crate) fn parent_id<T: KonnectEntity>(
    entity: &T,
    id: Option<&str>,
    parent: &'static str,
) -> OpResult<String> {
    id.filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| OpError::missing_parent(T::KIND, entity.coordinates(), parent))
}

/// The entity's own remote ID, required for update and delete
pub(crate) fn konnect_id<T: KonnectEntity>(entity: &T, op: Op) -> OpResult<String> {
    entity
        .konnect_id()
        .map(str::to_string)
        .ok_or_else(|| OpError::MissingKonnectId {
            kind: T::KIND,
            entity: entity.coordinates(),
            op,
        })
}

/// ID assigned by a create, rejecting empty answers
pub(crate) fn assigned_id(kind: EntityKind, op: Op, id: Option<String>) -> OpResult<String> {
    id.filter(|id| !id.is_empty())
        .ok_or(OpError::NilResponse { kind, op })
}

/// First non-empty ID in a lookup result
pub(crate) fn first_id(ids: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    ids.into_iter().flatten().find(|id| !id.is_empty())
}

/// Compare two request bodies, ignoring their tags
///
/// Tags carry the generation and are rewritten on every update, so they
/// never take part in adoption matching.
pub(crate) fn matches_ignoring_tags<L, R>(local: &L, remote: &R) -> OpResult<bool>
where
    L: Serialize,
    R: Serialize,
{
    let strip = |value: Value| match value {
        Value::Object(mut map) => {
            map.remove("tags");
            Value::Object(map)
        }
        other => other,
    };
    let local = serde_json::to_value(local).map_err(|e| OpError::normalization(e.to_string()))?;
    let remote =
        serde_json::to_value(remote).map_err(|e| OpError::normalization(e.to_string()))?;
    normalize::matches(&strip(local), &strip(remote))
}
