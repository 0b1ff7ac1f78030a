//! Pure rules for the pursuit contest.
//!
//! `pursuit-core` defines the canonical records (pursuit state, roll results,
//! chat payloads) and the stateless functions that validate commands, merge
//! roll results and resolve rounds. Nothing here performs I/O; the runtime
//! crate decides where records live and who is allowed to write them.
pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod roll;
pub mod round;
pub mod state;
pub mod user;

pub use command::{DistanceArg, PursuitCommand, initiate};
pub use config::PursuitDefaults;
pub use error::{ErrorSeverity, PursuitError, PursuitFault};
pub use message::{ChatMessage, MessageId, OwnershipLevel, UnknownOwnershipLevel};
pub use roll::{PcgRng, RngOracle, SkillTest, compute_seed, participant_key};
pub use round::{distance_change, resolve_round};
pub use state::{
    ContestType, Participant, ParticipantId, PursuitState, ResultList, RollResult, Side, Skill,
    SuccessLevel,
};
pub use user::{User, UserId, UserRole};
