//! High-level runtime orchestrator.
//!
//! The runtime owns the authority worker, wires up the command channel and
//! event bus, and hands out per-user [`PursuitHandle`]s.

use std::env;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use pursuit_core::{PursuitDefaults, User, UserId};

use crate::api::{PursuitHandle, Result, RuntimeError, SeededRollProvider};
use crate::events::{Event, EventBus, Topic};
use crate::repository::{InMemoryMessageRepository, MessageRepository};
use crate::workers::{AuthorityWorker, Command};

/// Runtime configuration shared across the orchestrator and handles.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub defaults: PursuitDefaults,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// How long a player's handle waits for the game master's reply.
    pub relay_timeout: Duration,
    /// Seed for [`SeededRollProvider`]s handed out by [`Runtime::roll_provider`].
    pub seed: u64,
}

impl RuntimeConfig {
    pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(10);

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PURSUIT_COMMAND_BUFFER` - Authority command queue size (default: 32)
    /// - `PURSUIT_EVENT_BUFFER` - Event buffer per topic (default: 100)
    /// - `PURSUIT_RELAY_TIMEOUT_MS` - Player relay timeout in ms (default: 10000)
    /// - `PURSUIT_SEED` - Session dice seed (default: 0)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    /// Unparsable values are ignored and zero sizes are raised to one.
    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(size) = parse_var::<usize>(lookup("PURSUIT_COMMAND_BUFFER")) {
            config.command_buffer_size = size.max(1);
        }

        if let Some(size) = parse_var::<usize>(lookup("PURSUIT_EVENT_BUFFER")) {
            config.event_buffer_size = size.max(1);
        }

        if let Some(ms) = parse_var::<u64>(lookup("PURSUIT_RELAY_TIMEOUT_MS")) {
            config.relay_timeout = Duration::from_millis(ms.max(1));
        }

        if let Some(seed) = parse_var::<u64>(lookup("PURSUIT_SEED")) {
            config.seed = seed;
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            defaults: PursuitDefaults::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            relay_timeout: Self::DEFAULT_RELAY_TIMEOUT,
            seed: 0,
        }
    }
}

fn parse_var<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

/// Main runtime that owns the authority worker
pub struct Runtime {
    config: RuntimeConfig,
    users: Vec<User>,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    authority_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Handle acting for the registered user `user_id`
    pub fn handle_for(&self, user_id: &UserId) -> Result<PursuitHandle> {
        let user = self
            .users
            .iter()
            .find(|user| &user.id == user_id)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownUser(user_id.clone()))?;

        Ok(PursuitHandle::new(
            user,
            self.command_tx.clone(),
            self.event_bus.clone(),
            self.config.defaults.clone(),
            self.config.relay_timeout,
        ))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Dice seeded from the runtime configuration
    pub fn roll_provider(&self) -> SeededRollProvider {
        SeededRollProvider::new(self.config.seed)
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Stop the authority once it has drained the commands queued so far.
    pub async fn shutdown(self) -> Result<()> {
        // If the worker already exited the send fails; joining below still
        // reports how it ended.
        let _ = self.command_tx.send(Command::Shutdown).await;

        self.authority_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    users: Vec<User>,
    repository: Option<Box<dyn MessageRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            users: Vec::new(),
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a user at the table
    pub fn user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Register several users at once
    pub fn users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users);
        self
    }

    /// Message storage (in-memory when not set)
    pub fn repository(mut self, repository: impl MessageRepository + 'static) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    /// Build the runtime and spawn the authority worker
    pub async fn build(self) -> Result<Runtime> {
        if !self.users.iter().any(User::is_gm) {
            return Err(RuntimeError::MissingGameMaster);
        }

        let repository = self
            .repository
            .unwrap_or_else(|| Box::new(InMemoryMessageRepository::new()));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let worker = AuthorityWorker::new(
            self.users.clone(),
            repository,
            command_rx,
            event_bus.clone(),
        );
        let authority_handle = tokio::spawn(async move {
            worker.run().await;
        });

        tracing::info!(
            users = self.users.len(),
            relay_timeout = ?self.config.relay_timeout,
            "pursuit runtime started"
        );

        Ok(Runtime {
            config: self.config,
            users: self.users,
            command_tx,
            event_bus,
            authority_handle,
        })
    }
}
