use std::fmt;

use super::results::{ResultList, RollResult};
use crate::config::PursuitDefaults;

/// Contest variant chosen when a pursuit starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ContestType {
    Simple,
    /// Accepted as input but has no rules yet.
    Complex,
}

/// Which group a roll or result list belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    /// The pursued group.
    Quarry,
    /// The chasing group.
    Pursuers,
}

/// Skill every participant tests during the pursuit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Skill(String);

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with the first letter upper-cased, as shown in chat.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// One round of a pursuit.
///
/// Values are never edited in place by the rules: merging a result yields a
/// new value for the same round, and [`PursuitState::next_round`] yields the
/// record for the following round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PursuitState {
    /// Steps separating quarry and pursuers.
    pub distance: f64,
    pub contest_type: ContestType,
    pub skill: Skill,
    pub fallback: bool,
    pub round: u32,
    pub quarry: ResultList,
    pub pursuers: ResultList,
}

impl PursuitState {
    /// Creates the first-round record with no results.
    pub fn new(distance: f64, contest_type: ContestType, skill: Skill, fallback: bool) -> Self {
        Self {
            distance,
            contest_type,
            skill,
            fallback,
            round: PursuitDefaults::FIRST_ROUND,
            quarry: ResultList::new(),
            pursuers: ResultList::new(),
        }
    }

    pub fn results(&self, side: Side) -> &ResultList {
        match side {
            Side::Quarry => &self.quarry,
            Side::Pursuers => &self.pursuers,
        }
    }

    /// Returns this record with `result` upserted into `side`'s list.
    #[must_use]
    pub fn with_result(&self, side: Side, result: RollResult) -> Self {
        let mut next = self.clone();
        match side {
            Side::Quarry => next.quarry = self.quarry.upsert(result),
            Side::Pursuers => next.pursuers = self.pursuers.upsert(result),
        }
        next
    }

    /// Record for the following round at `distance`, with empty result lists.
    #[must_use]
    pub fn next_round(&self, distance: f64) -> Self {
        Self {
            distance,
            contest_type: self.contest_type,
            skill: self.skill.clone(),
            fallback: self.fallback,
            round: self.round + 1,
            quarry: ResultList::new(),
            pursuers: ResultList::new(),
        }
    }
}

impl fmt::Display for PursuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} pursuit, round {} - distance {} ({}{})",
            self.contest_type,
            self.round,
            self.distance,
            self.skill,
            if self.fallback { ", fallback" } else { "" }
        )?;
        for side in [Side::Quarry, Side::Pursuers] {
            write!(f, "  {side}:")?;
            let results = self.results(side);
            if results.is_empty() {
                write!(f, " -")?;
            }
            for r in results.iter() {
                write!(f, " {} ({})", r.participant_name, r.success_level)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Default for PursuitState {
    fn default() -> Self {
        let defaults = PursuitDefaults::default();
        Self::new(1.0, defaults.contest_type, defaults.skill, defaults.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ParticipantId, SuccessLevel};

    #[test]
    fn skill_display_capitalizes_first_letter() {
        assert_eq!(Skill::new("athletics").display_name(), "Athletics");
        assert_eq!(Skill::new("  ride ").as_str(), "ride");
        assert_eq!(Skill::new("").display_name(), "");
    }

    #[test]
    fn contest_type_parses_case_insensitively() {
        assert_eq!("simple".parse::<ContestType>(), Ok(ContestType::Simple));
        assert_eq!("COMPLEX".parse::<ContestType>(), Ok(ContestType::Complex));
        assert!("sprint".parse::<ContestType>().is_err());
    }

    #[test]
    fn next_round_starts_clean_and_leaves_previous_intact() {
        let first = PursuitState::new(4.0, ContestType::Simple, Skill::new("Athletics"), true)
            .with_result(
                Side::Quarry,
                RollResult::new(ParticipantId::new("q"), "Quarry", SuccessLevel(2)),
            );
        let snapshot = first.clone();

        let second = first.next_round(2.0);

        assert_eq!(second.round, 2);
        assert_eq!(second.distance, 2.0);
        assert!(second.quarry.is_empty());
        assert!(second.pursuers.is_empty());
        assert_eq!(first, snapshot);
    }
}
