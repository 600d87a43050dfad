//! Resource stock tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three stock resources a fortress runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Wood,
    Stone,
    Food,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Food,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ResourceKind::Wood => "🪵",
            ResourceKind::Stone => "🪨",
            ResourceKind::Food => "🍖",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Wood => write!(f, "wood"),
            ResourceKind::Stone => write!(f, "stone"),
            ResourceKind::Food => write!(f, "food"),
        }
    }
}

/// A bundle of wood, stone and food. Used for stock, costs, loot and losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub wood: u32,
    pub stone: u32,
    pub food: u32,
}

impl Resources {
    pub const fn new(wood: u32, stone: u32, food: u32) -> Self {
        Self { wood, stone, food }
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Food => self.food,
        }
    }

    fn slot(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Food => &mut self.food,
        }
    }

    /// Non-zero entries, in wood/stone/food order.
    pub fn entries(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
            .filter(|(_, amount)| *amount > 0)
    }

    /// Whether every entry here is covered by `stock`.
    pub fn covered_by(&self, stock: &Resources) -> bool {
        ResourceKind::ALL
            .into_iter()
            .all(|kind| stock.get(kind) >= self.get(kind))
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries()
            .map(|(kind, amount)| format!("{} {}", amount, kind))
            .collect();
        if parts.is_empty() {
            write!(f, "nothing")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Stock on hand plus the focus token counter.
///
/// Nothing here can go negative: [`ResourceLedger::spend`] refuses an
/// overdraft outright and [`ResourceLedger::drain`] caps at what is held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceLedger {
    pub stock: Resources,
    pub focus_tokens: u32,
}

impl ResourceLedger {
    pub fn new(stock: Resources, focus_tokens: u32) -> Self {
        Self {
            stock,
            focus_tokens,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.stock.get(kind)
    }

    pub fn can_afford(&self, cost: &Resources) -> bool {
        cost.covered_by(&self.stock)
    }

    /// Add every entry of `amounts` to the stock.
    pub fn credit(&mut self, amounts: &Resources) {
        for kind in ResourceKind::ALL {
            let slot = self.stock.slot(kind);
            *slot = slot.saturating_add(amounts.get(kind));
        }
    }

    /// Deduct `cost` if every entry is covered. Returns `false` and leaves
    /// the stock untouched otherwise.
    pub fn spend(&mut self, cost: &Resources) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for kind in ResourceKind::ALL {
            *self.stock.slot(kind) -= cost.get(kind);
        }
        true
    }

    /// Remove up to `amount` of one resource, returning what was actually taken.
    pub fn take_up_to(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let slot = self.stock.slot(kind);
        let taken = amount.min(*slot);
        *slot -= taken;
        taken
    }

    /// Remove up to each entry of `losses`, returning what was actually taken.
    pub fn drain(&mut self, losses: &Resources) -> Resources {
        let mut taken = Resources::default();
        for kind in ResourceKind::ALL {
            *taken.slot(kind) = self.take_up_to(kind, losses.get(kind));
        }
        taken
    }

    pub fn add_tokens(&mut self, count: u32) {
        self.focus_tokens = self.focus_tokens.saturating_add(count);
    }

    /// Consume one focus token if any is held.
    pub fn use_token(&mut self) -> bool {
        if self.focus_tokens == 0 {
            return false;
        }
        self.focus_tokens -= 1;
        true
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {}  {} {}  {} {}  🎟️ {}",
            ResourceKind::Wood.symbol(),
            self.stock.wood,
            ResourceKind::Stone.symbol(),
            self.stock.stone,
            ResourceKind::Food.symbol(),
            self.stock.food,
            self.focus_tokens
        )
    }
}
