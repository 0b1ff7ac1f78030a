//! The pursuit chat command and its validation.
//!
//! The command takes positional arguments `distance [type] [skill] [fallback]`.
//! Only a game master may start a pursuit, and the distance must lie strictly
//! between [`PursuitDefaults::MIN_DISTANCE`] and
//! [`PursuitDefaults::MAX_DISTANCE`].

use crate::config::PursuitDefaults;
use crate::error::PursuitError;
use crate::state::{ContestType, PursuitState, Skill};
use crate::user::User;

/// Command word accepted in front of the arguments.
pub const COMMAND_WORD: &str = "/pursuit";

/// Distance argument as typed by the user.
#[derive(Clone, Debug, PartialEq)]
pub enum DistanceArg {
    /// No distance was given.
    Missing,
    /// Something that is not a finite number.
    NotANumber(String),
    Value(f64),
}

impl DistanceArg {
    fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Value(value),
            _ => Self::NotANumber(raw.to_owned()),
        }
    }

    /// Returns the distance if it is a finite number within bounds.
    pub fn validate(&self) -> Result<f64, PursuitError> {
        match self {
            Self::Value(d) if PursuitDefaults::distance_in_bounds(*d) => Ok(*d),
            Self::Value(d) => Err(PursuitError::InvalidDistance {
                raw: Some(d.to_string()),
            }),
            Self::NotANumber(raw) => Err(PursuitError::InvalidDistance {
                raw: Some(raw.clone()),
            }),
            Self::Missing => Err(PursuitError::InvalidDistance { raw: None }),
        }
    }
}

/// A pursuit command with each optional argument left unset until defaults
/// are applied.
#[derive(Clone, Debug, PartialEq)]
pub struct PursuitCommand {
    pub distance: DistanceArg,
    pub contest_type: Option<ContestType>,
    pub skill: Option<Skill>,
    pub fallback: Option<bool>,
}

impl PursuitCommand {
    pub fn new(distance: impl Into<f64>) -> Self {
        Self {
            distance: DistanceArg::Value(distance.into()),
            contest_type: None,
            skill: None,
            fallback: None,
        }
    }

    pub fn with_contest_type(mut self, contest_type: ContestType) -> Self {
        self.contest_type = Some(contest_type);
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(Skill::new(skill));
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Parses `[/pursuit] distance [type] [skill] [fallback]`.
    ///
    /// A bad distance is kept as [`DistanceArg`] so that the permission check
    /// in [`initiate`] still runs first; the other arguments fail here.
    pub fn parse(input: &str) -> Result<Self, PursuitError> {
        let mut args = input.split_whitespace().peekable();
        if args.peek().is_some_and(|word| word.eq_ignore_ascii_case(COMMAND_WORD)) {
            args.next();
        }

        let distance = args.next().map_or(DistanceArg::Missing, DistanceArg::parse);

        let contest_type = args
            .next()
            .map(|raw| {
                raw.parse::<ContestType>()
                    .map_err(|_| PursuitError::InvalidContestType { raw: raw.to_owned() })
            })
            .transpose()?;

        let skill = args.next().map(Skill::new);

        let fallback = args
            .next()
            .map(|raw| {
                raw.to_ascii_lowercase()
                    .parse::<bool>()
                    .map_err(|_| PursuitError::InvalidFallback { raw: raw.to_owned() })
            })
            .transpose()?;

        if let Some(extra) = args.next() {
            return Err(PursuitError::UnexpectedArgument {
                raw: extra.to_owned(),
            });
        }

        Ok(Self {
            distance,
            contest_type,
            skill,
            fallback,
        })
    }
}

/// Validates `command` on behalf of `user` and builds the first-round record.
///
/// Returns `Ok(None)` for [`ContestType::Complex`], which is accepted but has
/// no rules yet.
pub fn initiate(
    user: &User,
    command: &PursuitCommand,
    defaults: &PursuitDefaults,
) -> Result<Option<PursuitState>, PursuitError> {
    if !user.is_gm() {
        return Err(PursuitError::NotGameMaster {
            user: user.id.clone(),
        });
    }

    let distance = command.distance.validate()?;

    let contest_type = command.contest_type.unwrap_or(defaults.contest_type);
    let skill = command
        .skill
        .clone()
        .filter(|skill| !skill.as_str().is_empty())
        .unwrap_or_else(|| defaults.skill.clone());
    let fallback = command.fallback.unwrap_or(defaults.fallback);

    match contest_type {
        ContestType::Complex => Ok(None),
        ContestType::Simple => Ok(Some(PursuitState::new(
            distance,
            contest_type,
            skill,
            fallback,
        ))),
    }
}
