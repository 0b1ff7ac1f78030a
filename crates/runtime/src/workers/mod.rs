//! Worker tasks that back the runtime orchestration.
//!
//! The authority worker is the only writer of pursuit messages; handles talk
//! to it through a command channel.

mod authority;

pub use authority::{AuthorityWorker, Command, UpdateRequest};
