//! Uniform random source used by every roll in the engine.

use rand::{Rng, RngCore};

/// Inclusive uniform integer sampler.
///
/// The engine never touches a concrete RNG directly; anything that can roll
/// a number in `[low, high]` can drive it. Every [`RngCore`] gets this for
/// free, and [`crate::testing::ScriptedDice`] lets tests pick the outcomes.
pub trait Dice {
    /// Roll a value in `low..=high`. Callers guarantee `low <= high`.
    fn roll(&mut self, low: i64, high: i64) -> i64;
}

impl<R: RngCore> Dice for R {
    fn roll(&mut self, low: i64, high: i64) -> i64 {
        self.gen_range(low..=high)
    }
}

/// Roll a non-negative amount, for ranges that never dip below zero.
pub(crate) fn roll_amount(dice: &mut dyn Dice, low: u32, high: u32) -> u32 {
    dice.roll(i64::from(low), i64::from(high))
        .clamp(i64::from(low), i64::from(high)) as u32
}

/// Pick one element of a non-empty slice uniformly.
pub(crate) fn pick<'a, T>(dice: &mut dyn Dice, items: &'a [T]) -> &'a T {
    let last = items.len().saturating_sub(1) as i64;
    let index = dice.roll(0, last).clamp(0, last) as usize;
    &items[index]
}
