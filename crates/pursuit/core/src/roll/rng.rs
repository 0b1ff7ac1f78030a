//! RNG oracle for reproducible pursuit rolls.
//!
//! Given the same seed, every implementation must produce the same value, so
//! a session replayed with the same seed yields the same chase.

use crate::state::ParticipantId;

/// Deterministic random number source.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }
}

/// PCG-XSH-RR generator: 32-bit output from 64-bit state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Stable 32-bit key for a participant id (FNV-1a).
pub fn participant_key(id: &ParticipantId) -> u32 {
    id.as_str().bytes().fold(0x811c9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x01000193)
    })
}

/// Compute the seed for one participant's roll.
///
/// * `session_seed` - base seed chosen when the session starts
/// * `message` - id of the pursuit message being rolled on
/// * `round` - round number of that message
/// * `participant` - key from [`participant_key`]
/// * `attempt` - distinguishes re-rolls within the same round
pub fn compute_seed(
    session_seed: u64,
    message: u64,
    round: u32,
    participant: u32,
    attempt: u32,
) -> u64 {
    let mut hash = session_seed;

    hash ^= message.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (u64::from(participant) << 32 | u64::from(round)).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(attempt).wrapping_mul(0x85ebca6b);

    // avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
