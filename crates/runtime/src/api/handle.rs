//! Cloneable per-user façade for issuing pursuit commands.
//!
//! [`PursuitHandle`] hides channel plumbing. A game master's handle awaits
//! the authority directly; a player's handle relays writes and gives up after
//! the configured relay timeout.
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};

use pursuit_core::{
    ChatMessage, MessageId, Participant, PursuitCommand, PursuitDefaults, PursuitError,
    RollResult, Side, User, initiate,
};

use super::errors::{Result, RuntimeError};
use super::providers::{RollProvider, RollRequest};
use crate::events::{Event, EventBus, NotificationEvent, Topic};
use crate::workers::{Command, UpdateRequest};

/// Client-facing handle bound to one user
#[derive(Clone)]
pub struct PursuitHandle {
    user: User,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    defaults: PursuitDefaults,
    relay_timeout: Duration,
}

impl PursuitHandle {
    pub(crate) fn new(
        user: User,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        defaults: PursuitDefaults,
        relay_timeout: Duration,
    ) -> Self {
        Self {
            user,
            command_tx,
            event_bus,
            defaults,
            relay_timeout,
        }
    }

    /// The user this handle acts for
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Start a pursuit from a parsed chat command.
    ///
    /// Returns `Ok(None)` when the command names a contest type that has no
    /// rules yet; nothing is posted in that case.
    pub async fn start_pursuit(&self, command: &PursuitCommand) -> Result<Option<ChatMessage>> {
        let state = match initiate(&self.user, command, &self.defaults) {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::warn!(
                    user = %self.user.id,
                    "complex pursuits are not supported yet; command ignored"
                );
                return Ok(None);
            }
            Err(error) => return Err(self.reject(error)),
        };

        let requested_by = self.user.clone();
        self.request(|reply| Command::CreatePursuit {
            requested_by,
            state,
            reply,
        })
        .await
        .map(Some)
    }

    /// Roll for every targeted participant and record each result on `side`.
    ///
    /// Results are recorded one participant at a time; the returned message
    /// reflects the last recorded result.
    pub async fn roll(
        &self,
        message_id: MessageId,
        side: Side,
        targets: &[Participant],
        provider: &dyn RollProvider,
    ) -> Result<ChatMessage> {
        if targets.is_empty() {
            return Err(self.reject(PursuitError::NoTargets { side }));
        }

        let mut message = self.message(message_id).await?;
        let (round, skill, fallback) = (
            message.system.round,
            message.system.skill.clone(),
            message.system.fallback,
        );

        for participant in targets {
            let test = provider
                .roll(RollRequest {
                    message_id,
                    round,
                    side,
                    participant,
                    skill: &skill,
                    fallback,
                })
                .await?;

            let result = RollResult::new(
                participant.id.clone(),
                participant.name.clone(),
                test.success_level(),
            );
            message = self.record_result(message_id, side, result).await?;
        }

        Ok(message)
    }

    /// Upsert one result into a pursuit message.
    ///
    /// A game master writes directly; anyone else relays the request to the
    /// authority and waits at most the relay timeout for the reply. Cards whose
    /// round was already resolved reject the write.
    pub async fn record_result(
        &self,
        message_id: MessageId,
        side: Side,
        result: RollResult,
    ) -> Result<ChatMessage> {
        let relayed = !self.user.is_gm();
        let request = UpdateRequest {
            message_id,
            side,
            result,
            requested_by: self.user.id.clone(),
            relayed,
        };
        let result = self
            .dispatch(|reply| Command::RecordResult { request, reply })
            .await;
        self.notify_rejection(result)
    }

    /// Resolve the round shown on `message_id` and post the next round.
    pub async fn resolve_round(&self, message_id: MessageId) -> Result<ChatMessage> {
        if !self.user.is_gm() {
            return Err(self.reject(PursuitError::NotGameMaster {
                user: self.user.id.clone(),
            }));
        }

        let requested_by = self.user.clone();
        let result = self
            .request(|reply| Command::ResolveRound {
                requested_by,
                message_id,
                reply,
            })
            .await;
        self.notify_rejection(result)
    }

    /// Fetch the current version of a pursuit message
    pub async fn message(&self, message_id: MessageId) -> Result<ChatMessage> {
        self.dispatch(|reply| Command::QueryMessage { message_id, reply })
            .await
    }

    /// Fetch every pursuit message in posting order
    pub async fn messages(&self) -> Result<Vec<ChatMessage>> {
        self.dispatch(|reply| Command::ListMessages { reply }).await
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Send a command to the authority and wait for its reply.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Direct request for a game master, relay for everyone else.
    async fn dispatch<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        if self.user.is_gm() {
            self.request(build).await
        } else {
            self.relay(build).await
        }
    }

    /// [`Self::request`] bounded by the relay timeout.
    async fn relay<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        match tokio::time::timeout(self.relay_timeout, self.request(build)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    user = %self.user.id,
                    timeout = ?self.relay_timeout,
                    "relay to game master timed out"
                );
                Err(RuntimeError::RelayTimeout {
                    timeout: self.relay_timeout,
                })
            }
        }
    }

    /// Forward rule rejections coming back from the authority to [`Self::reject`].
    fn notify_rejection<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Err(RuntimeError::Pursuit(error)) => Err(self.reject(error)),
            other => other,
        }
    }

    /// Notify this handle's user about a rejected request.
    fn reject(&self, error: PursuitError) -> RuntimeError {
        self.event_bus
            .publish(Event::Notification(NotificationEvent::from_error(
                self.user.id.clone(),
                &error,
            )));
        RuntimeError::Pursuit(error)
    }
}
