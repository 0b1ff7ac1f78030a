//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule rejections, authority coordination failures and repository
//! errors so clients can bubble them up with consistent context.
use std::time::Duration;

use pursuit_core::{MessageId, PursuitError, UserId};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Pursuit(#[from] PursuitError),

    #[error("pursuit message {0} not found")]
    MessageNotFound(MessageId),

    #[error("user {user} does not own message {message}")]
    NotOwner { user: UserId, message: MessageId },

    #[error("unknown user {0}")]
    UnknownUser(UserId),

    #[error("runtime requires at least one game master")]
    MissingGameMaster,

    #[error("authority command channel closed")]
    CommandChannelClosed,

    #[error("authority reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    /// The reply did not arrive in time. The request may still be applied by
    /// the authority afterwards, so the outcome is unknown; query the message
    /// to find out.
    #[error("relay to the game master timed out after {timeout:?}")]
    RelayTimeout { timeout: Duration },

    #[error("authority worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("roll provider failed: {0}")]
    RollFailed(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
