//! Deterministic stand-ins for the random source and the clock.
//!
//! Both are cheap handles over shared state: clone one, hand the clone to an
//! [`crate::Engine`], and keep steering it from the test.

use crate::clock::Clock;
use crate::dice::Dice;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Replays queued outcomes in order.
///
/// Each queued value is clamped into the range being rolled, and an empty
/// queue rolls the low end of the range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    queue: Rc<RefCell<VecDeque<i64>>>,
}

impl ScriptedDice {
    pub fn new(outcomes: impl IntoIterator<Item = i64>) -> Self {
        let dice = Self::default();
        dice.extend(outcomes);
        dice
    }

    pub fn extend(&self, outcomes: impl IntoIterator<Item = i64>) {
        self.queue.borrow_mut().extend(outcomes);
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, low: i64, high: i64) -> i64 {
        self.queue
            .borrow_mut()
            .pop_front()
            .map_or(low, |value| value.clamp(low, high))
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Noon UTC on the given date.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(now)
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}
