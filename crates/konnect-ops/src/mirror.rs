//! Read-only binding of mirrored control planes and networks

use tracing::{info, instrument, warn};

use crate::conditions::{reason, set_mirror_failed, set_mirrored, set_programmed};
use crate::dispatch::{Outcome, SyncContext};
use crate::entity::{KonnectEntity, Mirrorable};
use crate::error::{Op, OpError, OpResult};

/// Bind a mirrored declaration to the remote entity named in its mirror spec
///
/// The remote entity is only read. On success the ID is bound and both
/// `Mirrored` and `Programmed` are True. Failures are returned as
/// [`OpError::Mirror`] wrapped with the object's coordinates.
#[instrument(skip(ctx, entity), fields(kind = %T::KIND, entity = %entity.coordinates()))]
pub async fn mirror<T: Mirrorable>(ctx: &SyncContext, entity: &mut T) -> OpResult<Outcome> {
    let Some(id) = entity.mirror_id().map(str::to_string) else {
        let message = format!("{} {} has no mirror ID", T::KIND, entity.coordinates());
        return Err(fail(entity, reason::MIRROR_NOT_FOUND, message));
    };

    match entity.fetch(ctx.sdk.as_ref(), &id).await {
        Ok(Some(_)) => {
            info!(konnect_id = %id, "mirrored remote entity");
            entity.set_konnect_id(id);
            set_mirrored(entity);
            set_programmed(entity);
            Ok(Outcome::Done)
        }
        Ok(None) => Err(fail(
            entity,
            reason::MIRROR_NOT_FOUND,
            format!("{} {id} does not exist", T::KIND),
        )),
        Err(err) if err.is_not_found() => Err(fail(
            entity,
            reason::MIRROR_NOT_FOUND,
            format!("{} {id} does not exist: {err}", T::KIND),
        )),
        Err(err) => Err(fail(
            entity,
            reason::MIRROR_FETCH_FAILED,
            format!("failed to fetch {} {id}: {err}", T::KIND),
        )),
    }
}

fn fail<T: KonnectEntity>(entity: &mut T, reason: &'static str, message: String) -> OpError {
    warn!(reason, message = %message, "mirroring failed");
    set_mirror_failed(entity, reason, &message);
    OpError::Mirror { reason, message }.wrap(Op::Mirror, T::KIND, entity.coordinates())
}
