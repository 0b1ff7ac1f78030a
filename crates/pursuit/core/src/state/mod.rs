//! Pursuit records and the identifiers they are keyed by.
//!
//! [`PursuitState`] is write-once per round: results are merged by producing
//! a new value through [`PursuitState::with_result`], and resolving a round
//! produces a fresh record instead of touching the old one.

mod participant;
mod pursuit;
mod results;

pub use participant::{Participant, ParticipantId, SuccessLevel};
pub use pursuit::{ContestType, PursuitState, Side, Skill};
pub use results::{ResultList, RollResult};
