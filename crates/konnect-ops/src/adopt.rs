//! Binding local declarations to pre-existing remote entities
//!
//! Adoption runs through validate, fetch, UID check, compare or override,
//! then bind. Every rejection is terminal: it sets `Adopted=False` and
//! `Programmed=False` with the same reason and is returned as
//! [`OpError::Adoption`] wrapped with the object's coordinates.

use tracing::{info, instrument, warn};

use konnect_common::crd::{AdoptMode, AdoptSource};

use crate::conditions::{set_adopted, set_adoption_failed, set_programmed};
use crate::dispatch::{Outcome, SyncContext};
use crate::entity::{Adoptable, KonnectEntity};
use crate::error::{AdoptionError, Op, OpError, OpResult};
use crate::tags::local_uid;

/// Adopt the remote entity named by the declaration's adopt options
///
/// In match mode the remote entity must already equal the spec and is never
/// written. In override mode (the default) the spec is written over it with
/// the kind's ordinary update.
#[instrument(skip(ctx, entity), fields(kind = %T::KIND, entity = %entity.coordinates()))]
pub async fn adopt<T: Adoptable>(ctx: &SyncContext, entity: &mut T) -> OpResult<Outcome> {
    match try_adopt(ctx, entity).await {
        Ok(id) => {
            info!(konnect_id = %id, "adopted remote entity");
            entity.set_konnect_id(id);
            set_adopted(entity, "");
            set_programmed(entity);
            Ok(Outcome::Done)
        }
        Err(err) => {
            warn!(reason = err.reason(), error = %err, "adoption rejected");
            set_adoption_failed(entity, err.reason(), &err.to_string());
            Err(OpError::from(err).wrap(Op::Adopt, T::KIND, entity.coordinates()))
        }
    }
}

/// Validated adopt options
struct Plan {
    id: String,
    mode: AdoptMode,
}

fn plan<T: KonnectEntity>(entity: &T) -> Result<Plan, AdoptionError> {
    let options = entity
        .adopt_options()
        .ok_or(AdoptionError::OptionsMissing)?;

    if options.from != AdoptSource::Konnect {
        return Err(AdoptionError::SourceNotSupported);
    }

    let mode = options.mode.unwrap_or(AdoptMode::Override);
    if mode == AdoptMode::Unsupported {
        return Err(AdoptionError::ModeNotSupported {
            mode: mode.to_string(),
        });
    }

    let id = options
        .external_id()
        .ok_or(AdoptionError::IdMissing)?
        .to_string();

    Ok(Plan { id, mode })
}

/// Run adoption up to the point of binding; returns the ID to bind
async fn try_adopt<T: Adoptable>(ctx: &SyncContext, entity: &mut T) -> Result<String, AdoptionError> {
    let Plan { id, mode } = plan(entity)?;
    let sdk = ctx.sdk.as_ref();

    entity.bind_parents();
    let remote = match entity.fetch(sdk, &id).await {
        Ok(Some(remote)) => remote,
        Ok(None) => {
            return Err(AdoptionError::FetchFailed {
                id,
                message: "empty response".to_string(),
            })
        }
        Err(OpError::MissingParentId { parent, .. }) => {
            return Err(AdoptionError::ParentMissing { id, parent })
        }
        Err(err) => {
            return Err(AdoptionError::FetchFailed {
                id,
                message: err.to_string(),
            })
        }
    };

    let local = local_uid(entity);
    if let Some(remote_uid) = T::remote_uid(&remote) {
        if !local.is_empty() && remote_uid != local {
            return Err(AdoptionError::UidTagConflict {
                id,
                remote_uid,
                local_uid: local.to_string(),
            });
        }
    }

    match mode {
        AdoptMode::Match => match entity.matches(&remote) {
            Ok(true) => Ok(id),
            Ok(false) => Err(AdoptionError::NotMatch { id }),
            Err(err) => Err(AdoptionError::NotComparable {
                id,
                message: err.to_string(),
            }),
        },
        _ => {
            let mut candidate = entity.clone();
            candidate.set_konnect_id(id.clone());
            if let Err(err) = candidate.update(sdk).await {
                return Err(AdoptionError::UpdateFailed {
                    id,
                    message: err.to_string(),
                });
            }
            Ok(candidate.konnect_id().map(str::to_string).unwrap_or(id))
        }
    }
}
