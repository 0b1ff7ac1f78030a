//! In-memory repository implementations for testing and local runs.

mod messages;

pub use messages::InMemoryMessageRepository;
