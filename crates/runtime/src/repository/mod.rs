//! Repository layer for pursuit chat messages.
//!
//! Only the authority worker writes through a repository; every other party
//! reads messages by asking the authority.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileMessageRepository;
pub use memory::InMemoryMessageRepository;
pub use traits::MessageRepository;
