//! Raid resolution, the raid log and the once-a-day gate.

use crate::dice::{roll_amount, Dice};
use crate::ledger::{ResourceKind, ResourceLedger, Resources};
use crate::perks::DefenderPerks;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

pub const MIN_ENEMY_POWER: u32 = 10;
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Largest share of each stock a single breach can take, before shields.
const MAX_LOSS_NUM: u64 = 3;
const MAX_LOSS_DEN: u64 = 10;
/// Floor for the loss-fraction denominator.
const MIN_LOSS_BASIS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RaidOutcome {
    Victory,
    Breached,
}

impl fmt::Display for RaidOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaidOutcome::Victory => write!(f, "victory"),
            RaidOutcome::Breached => write!(f, "breached"),
        }
    }
}

/// Raiders scale with the fortress: 90% of its power, give or take 30%,
/// and never weaker than [`MIN_ENEMY_POWER`].
pub fn roll_enemy_power(fortress_power: u32, dice: &mut dyn Dice) -> u32 {
    let power = i64::from(fortress_power);
    let floor = i64::from(MIN_ENEMY_POWER);
    let base = (power * 9 / 10).max(floor);
    let swing = (power * 3 / 10).max(floor);
    let roll = dice.roll(-swing, swing).clamp(-swing, swing);
    (base + roll).max(floor) as u32
}

/// Fraction of each stock lost in a breach, as `(numerator, denominator)`.
///
/// `min(0.3, gap / max(20, enemy)) * (1 - shield)`, kept as an exact ratio.
pub fn loss_fraction(own_effective: u32, enemy_effective: u32, shield_pct: u32) -> (u64, u64) {
    let gap = u64::from(enemy_effective.saturating_sub(own_effective));
    let basis = u64::from(enemy_effective.max(MIN_LOSS_BASIS));
    let (num, den) = if gap * MAX_LOSS_DEN > basis * MAX_LOSS_NUM {
        (MAX_LOSS_NUM, MAX_LOSS_DEN)
    } else {
        (gap, basis)
    };
    let kept = u64::from(100u32.saturating_sub(shield_pct));
    (num * kept, den * 100)
}

fn jitter_ceiling(kind: ResourceKind) -> u32 {
    match kind {
        ResourceKind::Wood => 3,
        ResourceKind::Stone | ResourceKind::Food => 2,
    }
}

/// Losses for a breach: the scaled share of each stock plus a little jitter,
/// never more than what is held.
pub fn breach_losses(
    stock: &Resources,
    fraction: (u64, u64),
    dice: &mut dyn Dice,
) -> Resources {
    let (num, den) = fraction;
    let mut amounts = [0u32; 3];
    for (slot, kind) in amounts.iter_mut().zip(ResourceKind::ALL) {
        let held = stock.get(kind);
        let share = (u64::from(held) * num / den) as u32;
        let jitter = roll_amount(dice, 0, jitter_ceiling(kind));
        *slot = held.min(share + jitter);
    }
    Resources::new(amounts[0], amounts[1], amounts[2])
}

/// Loot for a repelled raid. Spinosaurus rend adds to the food roll.
pub fn victory_loot(perks: &DefenderPerks, dice: &mut dyn Dice) -> Resources {
    let wood = roll_amount(dice, 3, 7);
    let stone = roll_amount(dice, 2, 5);
    let food = roll_amount(dice, 1, 3) + perks.rend_food;
    Resources::new(wood, stone, food)
}

/// The numbers behind one raid, before it is written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RaidResult {
    pub raw_enemy_power: u32,
    pub raw_own_power: u32,
    pub effective_own_power: u32,
    pub effective_enemy_power: u32,
    pub outcome: RaidOutcome,
    pub loot: Resources,
    pub losses: Resources,
}

/// Roll raiders, compare effective powers and settle the ledger.
///
/// Loot is credited in full on a victory; losses on a breach are capped by
/// what the ledger holds.
pub fn resolve(
    ledger: &mut ResourceLedger,
    fortress_power: u32,
    perks: &DefenderPerks,
    dice: &mut dyn Dice,
) -> RaidResult {
    let raw_enemy_power = roll_enemy_power(fortress_power, dice);
    let raw_own_power = fortress_power;
    let effective_own_power = perks.effective_own_power(raw_own_power);
    let effective_enemy_power = perks.effective_enemy_power(raw_enemy_power);

    let mut result = RaidResult {
        raw_enemy_power,
        raw_own_power,
        effective_own_power,
        effective_enemy_power,
        outcome: RaidOutcome::Victory,
        loot: Resources::default(),
        losses: Resources::default(),
    };

    if effective_own_power >= effective_enemy_power {
        result.loot = victory_loot(perks, dice);
        ledger.credit(&result.loot);
    } else {
        let fraction = loss_fraction(effective_own_power, effective_enemy_power, perks.shield_pct);
        let losses = breach_losses(&ledger.stock, fraction, dice);
        result.losses = ledger.drain(&losses);
        result.outcome = RaidOutcome::Breached;
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaidLogEntry {
    pub day: NaiveDate,
    pub raw_enemy_power: u32,
    pub raw_own_power: u32,
    pub effective_own_power: u32,
    pub effective_enemy_power: u32,
    pub outcome: RaidOutcome,
    /// Stock removed by a breach. Zero on a victory.
    pub losses: Resources,
    pub loot: Resources,
    pub daily: bool,
    pub timestamp: DateTime<Utc>,
    pub perks: DefenderPerks,
}

impl RaidLogEntry {
    pub fn record(
        result: RaidResult,
        perks: DefenderPerks,
        daily: bool,
        day: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            day,
            raw_enemy_power: result.raw_enemy_power,
            raw_own_power: result.raw_own_power,
            effective_own_power: result.effective_own_power,
            effective_enemy_power: result.effective_enemy_power,
            outcome: result.outcome,
            losses: result.losses,
            loot: result.loot,
            daily,
            timestamp,
            perks,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.daily {
            "📅 Daily Raid"
        } else {
            "⚔️ Practice Raid"
        }
    }

    pub fn describe(&self) -> String {
        let settlement = match self.outcome {
            RaidOutcome::Victory => format!("Loot: +{}", self.loot),
            RaidOutcome::Breached => format!("Losses: -{}", self.losses),
        };
        let mut text = format!(
            "{} ({}): Enemy {} vs. Fortress {} -> {}. {}",
            self.label(),
            self.day,
            self.effective_enemy_power,
            self.effective_own_power,
            self.outcome.to_string().to_uppercase(),
            settlement
        );
        let notes = self.perks.notes();
        if !notes.is_empty() {
            text.push_str(". Perks: ");
            text.push_str(&notes.join(" • "));
        }
        text
    }
}

/// Newest-first raid history, bounded to a fixed number of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaidLog {
    entries: VecDeque<RaidLogEntry>,
    #[serde(skip)]
    capacity: usize,
}

impl RaidLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, entry: RaidLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&RaidLogEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RaidLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RaidLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

/// Remembers the calendar day of the last daily raid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyRaidGate {
    pub last_daily: Option<NaiveDate>,
}

impl DailyRaidGate {
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.last_daily != Some(today)
    }

    pub fn stamp(&mut self, today: NaiveDate) {
        self.last_daily = Some(today);
    }
}
