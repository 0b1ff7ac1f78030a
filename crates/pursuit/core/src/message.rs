//! Chat message payloads carrying pursuit records.
use std::collections::BTreeMap;
use std::fmt;

use crate::error::PursuitError;
use crate::state::PursuitState;
use crate::user::{User, UserId};

/// Template the chat card is rendered from.
pub const PURSUIT_TEMPLATE: &str = "systems/wfrp4e/templates/chat/pursuit.hbs";
/// Speaker alias shown on pursuit cards.
pub const PURSUIT_SPEAKER: &str = "Pursuit";
/// Message type tag.
pub const PURSUIT_KIND: &str = "pursuit";

/// Identifier of a persisted chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MessageId(pub u64);

impl MessageId {
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Document permission level granted to a user.
///
/// Serialized as the host's numeric level (`0..=3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[repr(u8)]
pub enum OwnershipLevel {
    None = 0,
    Limited = 1,
    Observer = 2,
    Owner = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown ownership level {0}")]
pub struct UnknownOwnershipLevel(pub u8);

impl From<OwnershipLevel> for u8 {
    fn from(level: OwnershipLevel) -> Self {
        level as u8
    }
}

impl TryFrom<u8> for OwnershipLevel {
    type Error = UnknownOwnershipLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Limited),
            2 => Ok(Self::Observer),
            3 => Ok(Self::Owner),
            other => Err(UnknownOwnershipLevel(other)),
        }
    }
}

/// A pursuit chat card: one round's record plus everything needed to render
/// and permission it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChatMessage {
    pub id: MessageId,
    pub kind: String,
    pub speaker_alias: String,
    pub template: String,
    pub system: PursuitState,
    pub ownership: BTreeMap<UserId, OwnershipLevel>,
    /// Card holding the next round once this round has been resolved.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub superseded_by: Option<MessageId>,
}

impl ChatMessage {
    /// Builds a pursuit card owned by every user in `users`.
    pub fn pursuit(id: MessageId, system: PursuitState, users: &[User]) -> Self {
        let ownership = users
            .iter()
            .map(|user| (user.id.clone(), OwnershipLevel::Owner))
            .collect();

        Self {
            id,
            kind: PURSUIT_KIND.to_owned(),
            speaker_alias: PURSUIT_SPEAKER.to_owned(),
            template: PURSUIT_TEMPLATE.to_owned(),
            system,
            ownership,
            superseded_by: None,
        }
    }

    /// Fails once the round has been resolved; a resolved card is history.
    pub fn ensure_open(&self) -> Result<(), PursuitError> {
        match self.superseded_by {
            Some(next) => Err(PursuitError::RoundClosed {
                round: self.system.round,
                superseded_by: next,
            }),
            None => Ok(()),
        }
    }

    /// Marks this card as resolved into `next`. The round record is kept as is.
    pub fn close(&mut self, next: MessageId) {
        self.superseded_by = Some(next);
    }

    pub fn ownership_of(&self, user: &UserId) -> OwnershipLevel {
        self.ownership
            .get(user)
            .copied()
            .unwrap_or(OwnershipLevel::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_user_owns_the_card() {
        let users = [User::game_master("gm", "GM"), User::player("p1", "Anna")];
        let message = ChatMessage::pursuit(MessageId(1), PursuitState::default(), &users);

        for user in &users {
            assert_eq!(message.ownership_of(&user.id), OwnershipLevel::Owner);
        }
        assert_eq!(
            message.ownership_of(&UserId::new("stranger")),
            OwnershipLevel::None
        );
        assert_eq!(message.template, PURSUIT_TEMPLATE);
    }

    #[test]
    fn closed_card_rejects_further_play() {
        let users = [User::game_master("gm", "GM")];
        let mut message = ChatMessage::pursuit(MessageId(1), PursuitState::default(), &users);
        assert_eq!(message.ensure_open(), Ok(()));

        let before = message.system.clone();
        message.close(MessageId(2));

        assert_eq!(
            message.ensure_open(),
            Err(PursuitError::RoundClosed {
                round: 1,
                superseded_by: MessageId(2)
            })
        );
        assert_eq!(message.system, before);
    }

    #[test]
    fn ownership_levels_match_host_numbers() {
        for level in [
            OwnershipLevel::None,
            OwnershipLevel::Limited,
            OwnershipLevel::Observer,
            OwnershipLevel::Owner,
        ] {
            assert_eq!(OwnershipLevel::try_from(u8::from(level)), Ok(level));
        }
        assert_eq!(u8::from(OwnershipLevel::Owner), 3);
        assert_eq!(OwnershipLevel::try_from(4), Err(UnknownOwnershipLevel(4)));
    }
}
