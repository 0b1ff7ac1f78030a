//! File-based repository implementations.

mod messages;

pub use messages::FileMessageRepository;
