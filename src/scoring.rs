//! Score rules: a cleared group of `n` tiles is worth `n² × 5`, and clears
//! paid for by a booster or a super tile earn a third of that, rounded down.
//! Scores saturate at `u64::MAX` instead of wrapping.

pub const SCORE_MULTIPLIER: u64 = 5;
pub const BOOSTER_DIVISOR: u64 = 3;

pub fn group_score(size: usize) -> u64 {
    let n = size as u64;
    n.saturating_mul(n).saturating_mul(SCORE_MULTIPLIER)
}

pub fn booster_score(size: usize) -> u64 {
    group_score(size) / BOOSTER_DIVISOR
}
