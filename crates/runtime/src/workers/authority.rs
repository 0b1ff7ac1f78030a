//! Authority worker that owns every persisted pursuit message.
//!
//! Runs on the game master's side. Receives commands from [`PursuitHandle`]s,
//! applies pursuit rules through `pursuit-core`, persists the result and
//! publishes chat events. Commands are applied one at a time in arrival order.
//!
//! [`PursuitHandle`]: crate::api::PursuitHandle

use pursuit_core::{
    ChatMessage, MessageId, OwnershipLevel, PursuitError, PursuitState, RollResult, Side, User,
    UserId, resolve_round,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::api::{Result, RuntimeError};
use crate::events::{ChatEvent, Event, EventBus};
use crate::repository::MessageRepository;

/// A single roll result to merge into a pursuit message.
///
/// Carries one entry rather than a whole list so the authority merges it into
/// whatever the message holds when the request arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub message_id: MessageId,
    pub side: Side,
    pub result: RollResult,
    pub requested_by: UserId,
    /// Set when the request came through the player relay.
    pub relayed: bool,
}

/// Commands that can be sent to the authority worker
pub enum Command {
    /// Post the first-round card of a new pursuit.
    CreatePursuit {
        requested_by: User,
        state: PursuitState,
        reply: oneshot::Sender<Result<ChatMessage>>,
    },
    /// Upsert a roll result into an existing card.
    RecordResult {
        request: UpdateRequest,
        reply: oneshot::Sender<Result<ChatMessage>>,
    },
    /// Resolve a card's round and post the next round as a new card.
    ResolveRound {
        requested_by: User,
        message_id: MessageId,
        reply: oneshot::Sender<Result<ChatMessage>>,
    },
    QueryMessage {
        message_id: MessageId,
        reply: oneshot::Sender<Result<ChatMessage>>,
    },
    ListMessages {
        reply: oneshot::Sender<Result<Vec<ChatMessage>>>,
    },
    /// Stop the worker after the commands already queued ahead of this one.
    Shutdown,
}

/// Background task that processes pursuit commands.
pub struct AuthorityWorker {
    users: Vec<User>,
    repository: Box<dyn MessageRepository>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl AuthorityWorker {
    pub fn new(
        users: Vec<User>,
        repository: Box<dyn MessageRepository>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!("AuthorityWorker initialized with {} users", users.len());

        Self {
            users,
            repository,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, Command::Shutdown) {
                break;
            }
            self.handle_command(cmd);
        }
        info!("AuthorityWorker stopped");
    }

    fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::CreatePursuit {
                requested_by,
                state,
                reply,
            } => {
                let result = self.create_pursuit(&requested_by, state);
                if reply.send(result).is_err() {
                    debug!("CreatePursuit reply channel closed (caller dropped)");
                }
            }
            Command::RecordResult { request, reply } => {
                let result = self.record_result(request);
                if reply.send(result).is_err() {
                    debug!("RecordResult reply channel closed (caller dropped)");
                }
            }
            Command::ResolveRound {
                requested_by,
                message_id,
                reply,
            } => {
                let result = self.resolve_round(&requested_by, message_id);
                if reply.send(result).is_err() {
                    debug!("ResolveRound reply channel closed (caller dropped)");
                }
            }
            Command::QueryMessage { message_id, reply } => {
                if reply.send(self.load(message_id)).is_err() {
                    debug!("QueryMessage reply channel closed (caller dropped)");
                }
            }
            Command::ListMessages { reply } => {
                let result = self.repository.list().map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("ListMessages reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    fn create_pursuit(&self, requested_by: &User, state: PursuitState) -> Result<ChatMessage> {
        if !requested_by.is_gm() {
            return Err(PursuitError::NotGameMaster {
                user: requested_by.id.clone(),
            }
            .into());
        }

        let message = self.post(state, &requested_by.id)?;
        info!(
            message = %message.id,
            distance = message.system.distance,
            skill = %message.system.skill,
            "pursuit started"
        );
        Ok(message)
    }

    fn record_result(&self, request: UpdateRequest) -> Result<ChatMessage> {
        let mut message = self.load(request.message_id)?;

        if message.ownership_of(&request.requested_by) < OwnershipLevel::Owner {
            return Err(RuntimeError::NotOwner {
                user: request.requested_by,
                message: request.message_id,
            });
        }
        message.ensure_open()?;

        message.system = message
            .system
            .with_result(request.side, request.result.clone());
        self.repository.save(&message)?;

        debug!(
            message = %message.id,
            side = %request.side,
            participant = %request.result.participant_id,
            sl = %request.result.success_level,
            relayed = request.relayed,
            "roll recorded"
        );

        self.event_bus.publish(Event::Chat(ChatEvent::MessageUpdated {
            message: Box::new(message.clone()),
            side: request.side,
            result: request.result,
            requested_by: request.requested_by,
            relayed: request.relayed,
        }));

        Ok(message)
    }

    fn resolve_round(&self, requested_by: &User, message_id: MessageId) -> Result<ChatMessage> {
        let mut previous = self.load(message_id)?;
        previous.ensure_open()?;
        let next = resolve_round(requested_by, &previous.system)?;

        let message = self.post(next, &requested_by.id)?;
        previous.close(message.id);
        self.repository.save(&previous)?;
        info!(
            from = %previous.id,
            to = %message.id,
            round = message.system.round,
            distance = message.system.distance,
            "pursuit round resolved"
        );
        Ok(message)
    }

    /// Persists `state` as a new card and announces it.
    fn post(&self, state: PursuitState, requested_by: &UserId) -> Result<ChatMessage> {
        let id = self.repository.next_id()?;
        let message = ChatMessage::pursuit(id, state, &self.users);
        self.repository.save(&message)?;

        self.event_bus.publish(Event::Chat(ChatEvent::MessageCreated {
            message: Box::new(message.clone()),
            requested_by: requested_by.clone(),
        }));

        Ok(message)
    }

    fn load(&self, message_id: MessageId) -> Result<ChatMessage> {
        self.repository
            .load(message_id)?
            .ok_or(RuntimeError::MessageNotFound(message_id))
    }
}
