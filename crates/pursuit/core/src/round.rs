//! Round resolution.
//!
//! The pursuers close the gap by their best result and the quarry opens it by
//! its worst: `new = distance - (max(pursuer SL) - min(quarry SL))`.

use crate::error::PursuitError;
use crate::state::{PursuitState, ResultList, Side};
use crate::user::User;

/// Amount by which the distance shrinks this round (negative when it grows).
///
/// Fails when either side has no results, since there is no best or worst
/// result to compare. Any pair of success levels gives a finite change.
pub fn distance_change(quarry: &ResultList, pursuers: &ResultList) -> Result<f64, PursuitError> {
    let lowest_quarry = quarry
        .lowest()
        .ok_or(PursuitError::MissingRolls { side: Side::Quarry })?;
    let highest_pursuer = pursuers.highest().ok_or(PursuitError::MissingRolls {
        side: Side::Pursuers,
    })?;

    let change = i64::from(highest_pursuer.get()) - i64::from(lowest_quarry.get());
    Ok(change as f64)
}

/// Resolves `state`'s round on behalf of `user` and returns the next round's
/// record. `state` itself is left as it was.
pub fn resolve_round(user: &User, state: &PursuitState) -> Result<PursuitState, PursuitError> {
    if !user.is_gm() {
        return Err(PursuitError::NotGameMaster {
            user: user.id.clone(),
        });
    }

    let change = distance_change(&state.quarry, &state.pursuers)?;
    Ok(state.next_round(state.distance - change))
}
