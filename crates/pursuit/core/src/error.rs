//! Error infrastructure for pursuit rules.
//!
//! Every rejection a user can trigger is a [`PursuitError`]. Errors carry a
//! severity, used by the runtime to pick the notification level, and an error
//! code that doubles as the localization key shown to the user.

use crate::message::MessageId;
use crate::state::Side;
use crate::user::UserId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed once the table state changes
/// - **Validation**: invalid input that should be rejected without retry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retry after something else happens.
    ///
    /// Examples: nobody targeted, one side has not rolled yet
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: distance out of bounds, player issuing a GM command
    Validation,
}

/// Common classification for pursuit errors.
pub trait PursuitFault: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the localization key identifying this error variant.
    fn error_code(&self) -> &'static str;
}

/// Errors raised while validating pursuit commands and roll updates.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PursuitError {
    /// A non-GM user tried a GM-only operation.
    #[error("user {user} is not a game master")]
    NotGameMaster { user: UserId },

    /// Distance missing, not a number, or outside `0 < d < 10`.
    #[error("pursuit distance must be a number between 0 and 10 exclusive (got {})", .raw.as_deref().unwrap_or("nothing"))]
    InvalidDistance { raw: Option<String> },

    #[error("unknown pursuit type '{raw}'")]
    InvalidContestType { raw: String },

    #[error("fallback must be true or false (got '{raw}')")]
    InvalidFallback { raw: String },

    #[error("unexpected pursuit argument '{raw}'")]
    UnexpectedArgument { raw: String },

    /// A roll was requested with nobody targeted.
    #[error("no participants targeted for the {side} roll")]
    NoTargets { side: Side },

    /// Round resolution needs at least one result on each side.
    #[error("cannot resolve round: no {side} results recorded")]
    MissingRolls { side: Side },

    /// The card's round was already resolved.
    #[error("round {round} is already resolved; the pursuit continues on {superseded_by}")]
    RoundClosed {
        round: u32,
        superseded_by: MessageId,
    },
}

impl PursuitFault for PursuitError {
    fn severity(&self) -> ErrorSeverity {
        use PursuitError::*;
        match self {
            NotGameMaster { .. } | InvalidDistance { .. } => ErrorSeverity::Validation,
            InvalidContestType { .. } | InvalidFallback { .. } | UnexpectedArgument { .. } => {
                ErrorSeverity::Validation
            }
            RoundClosed { .. } => ErrorSeverity::Validation,
            NoTargets { .. } | MissingRolls { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        use PursuitError::*;
        match self {
            NotGameMaster { .. } => "MARKET.GMOnlyCommand",
            InvalidDistance { .. } => "ERROR.Distance",
            InvalidContestType { .. } => "PURSUIT.InvalidType",
            InvalidFallback { .. } => "PURSUIT.InvalidFallback",
            UnexpectedArgument { .. } => "PURSUIT.UnexpectedArgument",
            NoTargets { .. } => "PURSUIT.NoTarget",
            MissingRolls { .. } => "PURSUIT.MissingRolls",
            RoundClosed { .. } => "PURSUIT.RoundClosed",
        }
    }
}
