//! Users at the table and the role that decides what they may write.
use std::fmt;

/// Identifier of a connected user.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permission role of a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum UserRole {
    Player,
    /// Holds write authority over every pursuit message.
    GameMaster,
}

/// A user issuing commands or rolls.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            role,
        }
    }

    pub fn game_master(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, UserRole::GameMaster)
    }

    pub fn player(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, UserRole::Player)
    }

    #[inline]
    pub fn is_gm(&self) -> bool {
        self.role == UserRole::GameMaster
    }
}
