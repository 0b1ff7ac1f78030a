//! Asynchronous abstraction for sourcing skill tests.
//!
//! Runtime users plug in [`RollProvider`] implementations so pursuits can run
//! with seeded dice, dice rolled at the table, or scripted fixtures.
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use pursuit_core::{
    MessageId, Participant, PcgRng, RngOracle, Side, Skill, SkillTest, compute_seed,
    participant_key,
};

use super::errors::Result;

/// Everything a provider may consult when rolling for one participant.
#[derive(Clone, Copy, Debug)]
pub struct RollRequest<'a> {
    pub message_id: MessageId,
    pub round: u32,
    pub side: Side,
    pub participant: &'a Participant,
    pub skill: &'a Skill,
    pub fallback: bool,
}

/// Trait for producing a skill test for a targeted participant.
///
/// Different implementations can handle:
/// - Seeded dice for reproducible sessions
/// - Results typed in by players rolling physical dice
/// - Testing fixtures
#[async_trait]
pub trait RollProvider: Send + Sync {
    async fn roll(&self, request: RollRequest<'_>) -> Result<SkillTest>;
}

/// Rolls a d100 against the participant's characteristic using a seeded PCG
/// generator.
///
/// Each draw advances an internal counter, so re-rolling the same participant
/// in the same round gives a fresh result while the whole session stays
/// reproducible from its seed.
#[derive(Debug, Default)]
pub struct SeededRollProvider {
    seed: u64,
    rng: PcgRng,
    draws: AtomicU64,
}

impl SeededRollProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: PcgRng,
            draws: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl RollProvider for SeededRollProvider {
    async fn roll(&self, request: RollRequest<'_>) -> Result<SkillTest> {
        // TODO: test the skill's advance instead of the bare characteristic once
        // participants carry skill lists, and use `fallback` when they lack it.
        let attempt = self.draws.fetch_add(1, Ordering::Relaxed);
        let seed = compute_seed(
            self.seed,
            request.message_id.0,
            request.round,
            participant_key(&request.participant.id),
            attempt as u32,
        );
        let roll = self.rng.roll_d100(seed);

        tracing::debug!(
            participant = %request.participant.id,
            side = %request.side,
            roll,
            target = request.participant.characteristic,
            "rolled pursuit test"
        );

        Ok(SkillTest::new(request.participant.characteristic, roll))
    }
}
