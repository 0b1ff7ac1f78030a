use crate::state::{ContestType, Skill};

/// Defaults applied to pursuit command arguments that were left unset.
///
/// An argument is only replaced when it is absent; an explicit `false`
/// fallback stays `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PursuitDefaults {
    /// Contest variant used when the command names none.
    pub contest_type: ContestType,
    /// Skill tested by every participant when the command names none.
    pub skill: Skill,
    /// Whether a participant without the skill falls back to the
    /// characteristic test.
    pub fallback: bool,
}

impl PursuitDefaults {
    // ===== distance bounds (exclusive) =====
    pub const MIN_DISTANCE: f64 = 0.0;
    pub const MAX_DISTANCE: f64 = 10.0;

    /// Round number of a freshly started pursuit.
    pub const FIRST_ROUND: u32 = 1;

    pub const DEFAULT_SKILL: &'static str = "Athletics";

    pub fn new() -> Self {
        Self {
            contest_type: ContestType::Simple,
            skill: Skill::new(Self::DEFAULT_SKILL),
            fallback: true,
        }
    }

    /// Returns true when `distance` lies strictly between the bounds.
    pub fn distance_in_bounds(distance: f64) -> bool {
        distance > Self::MIN_DISTANCE && distance < Self::MAX_DISTANCE
    }
}

impl Default for PursuitDefaults {
    fn default() -> Self {
        Self::new()
    }
}
