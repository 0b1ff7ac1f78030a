//! Percentile skill tests and the deterministic generator behind them.

mod check;
mod rng;

pub use check::SkillTest;
pub use rng::{PcgRng, RngOracle, compute_seed, participant_key};
