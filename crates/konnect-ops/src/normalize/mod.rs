//! Structural comparison of local specs and remote entities
//!
//! Both sides are serialized to JSON and normalized: nulls, empty arrays and
//! empty objects are dropped, and arrays are compared as multisets.
//!
//! [`matches`] checks the local side against the remote side field by field;
//! fields absent from the local side are not compared, since Konnect fills
//! defaults the spec never named. Array elements are paired one to one by a
//! maximum bipartite matching, so a partial local record never claims a
//! remote element another local record needs.
//!
//! [`equal`] is strict: both sides must normalize to the same canonical form.
//! Nested one-of configuration is projected into explicit records by the
//! kind-specific modules, which fail on variants they do not understand, and
//! those records are compared with [`equal`] so that an empty local list
//! still has to match an empty remote one.

pub mod cloud_gateway;

use serde::Serialize;
use serde_json::Value;

use crate::error::{OpError, OpResult};

/// Serialize and normalize
pub fn to_normalized<T: Serialize + ?Sized>(value: &T) -> OpResult<Value> {
    let value = serde_json::to_value(value).map_err(|e| OpError::normalization(e.to_string()))?;
    Ok(normalize(value))
}

/// Drop empty members and sort arrays by canonical form
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => {
            let mut items: Vec<Value> = items
                .into_iter()
                .map(normalize)
                .filter(|v| !is_empty(v))
                .collect();
            items.sort_by_cached_key(canonical);
            Value::Array(items)
        }
        other => other,
    }
}

/// Canonical string form: object keys sorted, no whitespace
pub fn canonical(value: &Value) -> String {
    // serde_json's default map is ordered by key.
    value.to_string()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Whether every field set in `local` has the same value in `remote`
///
/// Both inputs are normalized first; neither is mutated.
pub fn matches<L, R>(local: &L, remote: &R) -> OpResult<bool>
where
    L: Serialize + ?Sized,
    R: Serialize + ?Sized,
{
    let local = to_normalized(local)?;
    let remote = to_normalized(remote)?;
    Ok(covers(&local, &remote))
}

/// Strict structural equality after normalization
pub fn equal<L, R>(left: &L, right: &R) -> OpResult<bool>
where
    L: Serialize + ?Sized,
    R: Serialize + ?Sized,
{
    Ok(canonical(&to_normalized(left)?) == canonical(&to_normalized(right)?))
}

fn covers(local: &Value, remote: &Value) -> bool {
    match (local, remote) {
        (Value::Object(l), Value::Object(r)) => l
            .iter()
            .all(|(key, lv)| r.get(key).is_some_and(|rv| covers(lv, rv))),
        (Value::Array(l), Value::Array(r)) => l.len() == r.len() && pairs_all(l, r),
        (l, r) => l == r,
    }
}

/// Whether every local element can be paired with a distinct remote element
/// it covers
fn pairs_all(local: &[Value], remote: &[Value]) -> bool {
    let candidates: Vec<Vec<usize>> = local
        .iter()
        .map(|lv| {
            remote
                .iter()
                .enumerate()
                .filter(|(_, rv)| covers(lv, rv))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    // owner[r] is the local element currently paired with remote element r
    let mut owner: Vec<Option<usize>> = vec![None; remote.len()];
    (0..local.len()).all(|l| {
        let mut visited = vec![false; remote.len()];
        augment(l, &candidates, &mut owner, &mut visited)
    })
}

/// Find an augmenting path from local element `l`, re-pairing earlier local
/// elements where needed
fn augment(
    l: usize,
    candidates: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &r in &candidates[l] {
        if visited[r] {
            continue;
        }
        visited[r] = true;
        let free = match owner[r] {
            None => true,
            Some(other) => augment(other, candidates, owner, visited),
        };
        if free {
            owner[r] = Some(l);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_order_is_not_significant() {
        let local = json!({ "zones": ["b", "a", "c"], "env": [{"name": "X", "value": "1"}, {"name": "A", "value": "2"}] });
        let remote = json!({ "zones": ["c", "a", "b"], "env": [{"name": "A", "value": "2"}, {"name": "X", "value": "1"}] });
        assert!(matches(&local, &remote).unwrap());
        assert!(matches(&remote, &local).unwrap());
        assert!(equal(&local, &remote).unwrap());
    }

    #[test]
    fn scalar_difference_is_a_mismatch() {
        let local = json!({ "name": "net", "cidr": "10.0.0.0/16" });
        let remote = json!({ "name": "net", "cidr": "10.1.0.0/16" });
        assert!(!matches(&local, &remote).unwrap());
    }

    #[test]
    fn list_length_difference_is_a_mismatch() {
        let local = json!({ "zones": ["a", "b"] });
        let remote = json!({ "zones": ["a", "b", "b"] });
        assert!(!matches(&local, &remote).unwrap());
    }

    #[test]
    fn duplicates_must_match_one_to_one() {
        let local = json!({ "zones": ["a", "a"] });
        let remote = json!({ "zones": ["a", "b"] });
        assert!(!matches(&local, &remote).unwrap());
    }

    #[test]
    fn fields_unset_locally_are_not_compared() {
        let local = json!({ "host": "example.com", "port": null, "paths": [] });
        let remote = json!({ "host": "example.com", "port": 80, "paths": ["/"], "retries": 5 });
        assert!(matches(&local, &remote).unwrap());
        assert!(!equal(&local, &remote).unwrap());
    }

    #[test]
    fn field_missing_remotely_is_a_mismatch() {
        let local = json!({ "host": "example.com", "path": "/api" });
        let remote = json!({ "host": "example.com" });
        assert!(!matches(&local, &remote).unwrap());
    }

    #[test]
    fn nested_records_in_lists_match_by_content() {
        let local = json!({ "groups": [{ "region": "us", "scale": { "n": 2 } }, { "region": "eu", "scale": { "n": 1 } }] });
        let remote = json!({ "groups": [{ "region": "eu", "scale": { "n": 1 }, "state": "ready" }, { "region": "us", "scale": { "n": 2 }, "state": "ready" }] });
        assert!(matches(&local, &remote).unwrap());

        let drifted = json!({ "groups": [{ "region": "eu", "scale": { "n": 3 } }, { "region": "us", "scale": { "n": 2 } }] });
        assert!(!matches(&local, &drifted).unwrap());
    }

    #[test]
    fn partial_records_are_paired_without_stealing() {
        // The first local record also covers the second remote one; pairing
        // it there would leave the second local record without a partner.
        let local = json!({ "groups": [{ "a": 1 }, { "b": 1, "c": 1 }] });
        let remote = json!({ "groups": [{ "a": 1, "z": 1 }, { "a": 1, "b": 1, "c": 1 }] });
        assert!(matches(&local, &remote).unwrap());

        let remote = json!({ "groups": [{ "a": 1, "b": 1, "c": 1 }, { "a": 1, "z": 1 }] });
        assert!(matches(&local, &remote).unwrap());
    }

    #[test]
    fn records_competing_for_one_remote_element_do_not_match() {
        let local = json!({ "groups": [{ "a": 1 }, { "a": 1, "b": 1 }] });
        let remote = json!({ "groups": [{ "a": 1, "b": 1 }, { "c": 1 }] });
        assert!(!matches(&local, &remote).unwrap());
    }

    #[test]
    fn empty_local_list_is_ignored_by_matches_but_not_by_equal() {
        let local = json!({ "name": "group", "environment": [] });
        let remote = json!({ "name": "group", "environment": [{ "name": "A", "value": "1" }] });
        assert!(matches(&local, &remote).unwrap());
        assert!(!equal(&local, &remote).unwrap());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let local = json!({ "zones": ["b", "a"] });
        let before = local.clone();
        let _ = matches(&local, &json!({ "zones": ["a", "b"] })).unwrap();
        assert_eq!(local, before);
    }

    #[test]
    fn normalize_sorts_arrays_and_drops_empties() {
        let value = normalize(json!({ "b": [3, 1, 2], "a": null, "c": {}, "d": [[], "x"] }));
        assert_eq!(value, json!({ "b": [1, 2, 3], "d": ["x"] }));
        assert_eq!(canonical(&value), r#"{"b":[1,2,3],"d":["x"]}"#);
    }
}
