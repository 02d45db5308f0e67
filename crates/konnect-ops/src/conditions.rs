//! Programmed / Adopted / Mirrored conditions
//!
//! Writes are generation-aware: re-applying a condition with the same status,
//! reason, message and observed generation is a no-op, so a reconcile that
//! changes nothing does not produce a status patch.

use std::time::Duration;

use chrono::{DateTime, Utc};
use konnect_common::crd::{Condition, ConditionStatus};

/// Remote convergence of the entity
pub const PROGRAMMED: &str = "Programmed";
/// Outcome of binding to a pre-existing remote entity
pub const ADOPTED: &str = "Adopted";
/// Outcome of read-only mirroring
pub const MIRRORED: &str = "Mirrored";

/// Condition reasons
pub mod reason {
    /// Entity converged
    pub const PROGRAMMED: &str = "Programmed";
    /// Remote create failed
    pub const FAILED_TO_CREATE: &str = "FailedToCreate";
    /// Remote update failed
    pub const FAILED_TO_UPDATE: &str = "FailedToUpdate";
    /// Consumer created but group memberships could not be written
    pub const FAILED_TO_ATTACH_CONSUMER_TO_CONSUMER_GROUP: &str =
        "FailedToAttachConsumerToConsumerGroup";
    /// Control plane group created but members could not be written
    pub const FAILED_TO_SET_CONTROL_PLANE_GROUP_MEMBERS: &str =
        "FailedToSetControlPlaneGroupMembers";

    /// Adoption succeeded
    pub const ADOPTED: &str = "Adopted";
    /// No adopt options on the spec
    pub const ADOPTION_OPTIONS_MISSING: &str = "AdoptionOptionsMissing";
    /// Unsupported `adopt.from`
    pub const ADOPTION_SOURCE_NOT_SUPPORTED: &str = "AdoptionSourceNotSupported";
    /// Unsupported `adopt.mode`
    pub const ADOPTION_MODE_NOT_SUPPORTED: &str = "AdoptionModeNotSupported";
    /// Empty `adopt.konnect.id`
    pub const ADOPTION_ID_MISSING: &str = "AdoptionIDMissing";
    /// Parent entity not programmed
    pub const ADOPTION_PARENT_MISSING: &str = "AdoptionParentMissing";
    /// Remote entity could not be read
    pub const ADOPTION_FETCH_FAILED: &str = "AdoptionFetchFailed";
    /// Match mode found a difference
    pub const ADOPTION_NOT_MATCH: &str = "AdoptionNotMatch";
    /// Remote entity tagged with another UID
    pub const ADOPTION_UID_TAG_CONFLICT: &str = "AdoptionUIDTagConflict";
    /// Override mode write failed
    pub const ADOPTION_UPDATE_FAILED: &str = "AdoptionUpdateFailed";
    /// The remote entity could not be projected for comparison
    pub const ADOPTION_NOT_COMPARABLE: &str = "AdoptionNotComparable";

    /// Mirror bound
    pub const MIRRORED: &str = "Mirrored";
    /// Mirrored entity does not exist remotely
    pub const MIRROR_NOT_FOUND: &str = "MirrorNotFound";
    /// Mirrored entity could not be read
    pub const MIRROR_FETCH_FAILED: &str = "MirrorFetchFailed";
}

/// Access to the condition list and generation of a local declaration
pub trait ConditionsAware {
    /// Current conditions
    fn conditions(&self) -> &[Condition];
    /// Mutable condition list
    fn conditions_mut(&mut self) -> &mut Vec<Condition>;
    /// `metadata.generation`, 0 when unset
    fn generation(&self) -> i64;
}

/// Look up a condition by type
pub fn find_condition<'a, T: ConditionsAware + ?Sized>(
    obj: &'a T,
    type_: &str,
) -> Option<&'a Condition> {
    obj.conditions().iter().find(|c| c.type_ == type_)
}

/// Set a condition at the object's current generation
///
/// Returns false when an identical condition was already present; its
/// transition time is then left untouched.
pub fn set_condition<T: ConditionsAware + ?Sized>(
    obj: &mut T,
    type_: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
) -> bool {
    let generation = obj.generation();
    if let Some(existing) = find_condition(obj, type_) {
        if existing.status == status
            && existing.reason == reason
            && existing.message == message
            && existing.observed_generation == generation
        {
            return false;
        }
    }
    replace(obj, Condition::new(type_, status, reason, message, generation));
    true
}

/// Set a condition and always stamp a fresh transition time
///
/// Used after a performed remote update so the resync backoff window starts
/// from the last write.
pub fn refresh_condition<T: ConditionsAware + ?Sized>(
    obj: &mut T,
    type_: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
) {
    let generation = obj.generation();
    replace(obj, Condition::new(type_, status, reason, message, generation));
}

fn replace<T: ConditionsAware + ?Sized>(obj: &mut T, condition: Condition) {
    let conditions = obj.conditions_mut();
    conditions.retain(|c| c.type_ != condition.type_);
    conditions.push(condition);
}

/// Programmed=True
pub fn set_programmed<T: ConditionsAware + ?Sized>(obj: &mut T) -> bool {
    set_condition(obj, PROGRAMMED, ConditionStatus::True, reason::PROGRAMMED, "")
}

/// Programmed=False with a reason and message
pub fn set_not_programmed<T: ConditionsAware + ?Sized>(
    obj: &mut T,
    reason: &str,
    message: &str,
) -> bool {
    set_condition(obj, PROGRAMMED, ConditionStatus::False, reason, message)
}

/// Adopted=True
pub fn set_adopted<T: ConditionsAware + ?Sized>(obj: &mut T, message: &str) -> bool {
    set_condition(obj, ADOPTED, ConditionStatus::True, reason::ADOPTED, message)
}

/// Adopted=False and Programmed=False, both with the same reason
pub fn set_adoption_failed<T: ConditionsAware + ?Sized>(obj: &mut T, reason: &str, message: &str) {
    set_condition(obj, ADOPTED, ConditionStatus::False, reason, message);
    set_not_programmed(obj, reason, message);
}

/// Mirrored=True
pub fn set_mirrored<T: ConditionsAware + ?Sized>(obj: &mut T) -> bool {
    set_condition(obj, MIRRORED, ConditionStatus::True, reason::MIRRORED, "")
}

/// Mirrored=False and Programmed=False, both with the same reason
pub fn set_mirror_failed<T: ConditionsAware + ?Sized>(obj: &mut T, reason: &str, message: &str) {
    set_condition(obj, MIRRORED, ConditionStatus::False, reason, message);
    set_not_programmed(obj, reason, message);
}

/// Time left before a converged entity may be updated again
///
/// Some when Programmed is True with reason Programmed for the current
/// generation and less than `sync_period` has passed since it was written.
pub fn backoff_remaining<T: ConditionsAware + ?Sized>(
    obj: &T,
    sync_period: Duration,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let programmed = find_condition(obj, PROGRAMMED)?;
    if !programmed.is_true()
        || programmed.reason != reason::PROGRAMMED
        || programmed.observed_generation != obj.generation()
    {
        return None;
    }

    let elapsed = now
        .signed_duration_since(programmed.last_transition_time)
        .to_std()
        // Transition time in the future: treat as just written.
        .unwrap_or(Duration::ZERO);

    sync_period.checked_sub(elapsed).filter(|d| !d.is_zero())
}
