//! Focus session countdown.
//!
//! The timer is a single countdown with a configured length in minutes. It
//! moves between idle, running and paused; reaching zero while running is the
//! only way to complete a session, and completion is the only thing that pays
//! out a [`SessionReward`].

use crate::dice::{roll_amount, Dice};
use crate::ledger::Resources;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 180;

/// Clamp a numeric minute count into the accepted session length range.
pub fn clamp_minutes(minutes: i64) -> u32 {
    minutes.clamp(i64::from(MIN_MINUTES), i64::from(MAX_MINUTES)) as u32
}

/// Interpret free-form minute input.
///
/// Non-digit characters are dropped before parsing, empty input counts as
/// the minimum and anything too large to parse clamps to the maximum.
pub fn parse_minutes(raw: &str) -> u32 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return MIN_MINUTES;
    }
    match digits.parse::<i64>() {
        Ok(n) => clamp_minutes(n),
        Err(_) => MAX_MINUTES,
    }
}

/// What one completed session pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReward {
    pub resources: Resources,
    pub focus_tokens: u32,
}

impl SessionReward {
    /// Wood 5-9, stone 2-5, food 1-4, one focus token.
    pub fn roll(dice: &mut dyn Dice) -> Self {
        let wood = roll_amount(dice, 5, 9);
        let stone = roll_amount(dice, 2, 5);
        let food = roll_amount(dice, 1, 4);
        Self {
            resources: Resources::new(wood, stone, food),
            focus_tokens: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerState {
    pub configured_minutes: u32,
    pub seconds_remaining: u32,
    pub running: bool,
}

impl TimerState {
    pub fn new(minutes: u32) -> Self {
        let configured_minutes = clamp_minutes(i64::from(minutes));
        Self {
            configured_minutes,
            seconds_remaining: configured_minutes * 60,
            running: false,
        }
    }

    pub fn full_length(&self) -> u32 {
        self.configured_minutes * 60
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.seconds_remaining == self.full_length() {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// Change the session length. While stopped the countdown is reloaded
    /// straight away; a running countdown keeps its remaining time and picks
    /// up the new length on its next reload.
    pub fn set_minutes(&mut self, minutes: u32) {
        self.configured_minutes = clamp_minutes(i64::from(minutes));
        if !self.running {
            self.seconds_remaining = self.full_length();
        }
    }

    pub fn start(&mut self) {
        if self.seconds_remaining == 0 {
            self.seconds_remaining = self.full_length();
        }
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.seconds_remaining = self.full_length();
    }

    /// Advance one second. Returns `true` when this tick finished the
    /// session; the timer is then stopped and reloaded for the next one.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return false;
        }
        self.running = false;
        self.seconds_remaining = self.full_length();
        true
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(25)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds_remaining / 60;
        let seconds = self.seconds_remaining % 60;
        write!(f, "{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDice;

    #[test]
    fn minute_input_is_clamped() {
        assert_eq!(parse_minutes("25"), 25);
        assert_eq!(parse_minutes("0"), 1);
        assert_eq!(parse_minutes("999"), 180);
        assert_eq!(parse_minutes("abc"), 1);
        assert_eq!(parse_minutes(""), 1);
        assert_eq!(parse_minutes("4x5"), 45);
        assert_eq!(parse_minutes("99999999999999999999999"), 180);
        assert_eq!(clamp_minutes(-3), 1);
    }

    #[test]
    fn editing_minutes_while_stopped_reloads_countdown() {
        let mut timer = TimerState::new(25);
        timer.set_minutes(10);
        assert_eq!(timer.seconds_remaining, 600);
    }

    #[test]
    fn editing_minutes_while_running_keeps_countdown() {
        let mut timer = TimerState::new(25);
        timer.start();
        timer.tick();
        timer.set_minutes(10);
        assert_eq!(timer.seconds_remaining, 25 * 60 - 1);
        assert_eq!(timer.configured_minutes, 10);
    }

    #[test]
    fn pause_preserves_remaining_time() {
        let mut timer = TimerState::new(1);
        timer.start();
        for _ in 0..15 {
            timer.tick();
        }
        timer.pause();
        assert_eq!(timer.seconds_remaining, 45);
        assert_eq!(timer.phase(), TimerPhase::Paused);
        assert!(!timer.tick());
        assert_eq!(timer.seconds_remaining, 45);
    }

    #[test]
    fn full_countdown_completes_once_and_reloads() {
        let mut timer = TimerState::new(1);
        timer.start();
        let completions = (0..60).filter(|_| timer.tick()).count();
        assert_eq!(completions, 1);
        assert!(!timer.running);
        assert_eq!(timer.seconds_remaining, 60);
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn start_from_zero_reloads_first() {
        let mut timer = TimerState::new(2);
        timer.seconds_remaining = 0;
        timer.start();
        assert_eq!(timer.seconds_remaining, 120);
        assert!(timer.running);
    }

    #[test]
    fn reset_stops_and_reloads() {
        let mut timer = TimerState::new(5);
        timer.start();
        timer.tick();
        timer.reset();
        assert!(!timer.running);
        assert_eq!(timer.seconds_remaining, 300);
    }

    #[test]
    fn display_is_minutes_and_padded_seconds() {
        let mut timer = TimerState::new(25);
        assert_eq!(timer.to_string(), "25:00");
        timer.seconds_remaining = 65;
        assert_eq!(timer.to_string(), "1:05");
    }

    #[test]
    fn reward_uses_rolled_amounts() {
        let mut dice = ScriptedDice::new([9, 2, 4]);
        let reward = SessionReward::roll(&mut dice);
        assert_eq!(reward.resources, Resources::new(9, 2, 4));
        assert_eq!(reward.focus_tokens, 1);
    }
}
