//! Runtime orchestration for pursuit contests at a shared table.
//!
//! The game master's side runs an authority worker that owns every persisted
//! pursuit message. Users interact through [`PursuitHandle`]: a game master's
//! handle talks to the authority directly, while a player's handle relays its
//! updates and waits for the reply with a bounded timeout.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`repository`] stores chat messages
//! - `workers` keeps the authority task internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    PursuitHandle, Result, RollProvider, RollRequest, RuntimeError, SeededRollProvider,
};
pub use events::{ChatEvent, Event, EventBus, NotificationEvent, NotificationLevel, Topic};
pub use repository::{
    FileMessageRepository, InMemoryMessageRepository, MessageRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::UpdateRequest;
