//! Fortress structures, their upgrade costs and the power they grant.

use crate::error::ActionError;
use crate::ledger::{ResourceLedger, Resources};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three upgradable structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Wall,
    Tower,
    Hatchery,
}

impl StructureKind {
    pub const ALL: [StructureKind; 3] = [
        StructureKind::Wall,
        StructureKind::Tower,
        StructureKind::Hatchery,
    ];

    /// Cost of reaching `level` (1-indexed).
    pub fn cost(self, level: u32) -> Resources {
        match self {
            StructureKind::Wall => Resources::new(20 * level, 10 * level, 0),
            StructureKind::Tower => Resources::new(15 * level, 20 * level, 0),
            StructureKind::Hatchery => Resources::new(10 * level, 0, 15 * level),
        }
    }

    /// Power granted for reaching `level`.
    pub fn power_gain(self, level: u32) -> u32 {
        match self {
            StructureKind::Wall => 5 * level,
            StructureKind::Tower => 8 * level,
            StructureKind::Hatchery => 6 * level,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StructureKind::Wall => "Walls",
            StructureKind::Tower => "Watchtower",
            StructureKind::Hatchery => "Hatchery",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            StructureKind::Wall => "🧱",
            StructureKind::Tower => "🏹",
            StructureKind::Hatchery => "🥚",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureKind::Wall => write!(f, "wall"),
            StructureKind::Tower => write!(f, "tower"),
            StructureKind::Hatchery => write!(f, "hatchery"),
        }
    }
}

impl std::str::FromStr for StructureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" | "walls" => Ok(StructureKind::Wall),
            "tower" | "watchtower" => Ok(StructureKind::Tower),
            "hatchery" => Ok(StructureKind::Hatchery),
            other => Err(format!("unknown structure '{}'", other)),
        }
    }
}

/// Result of a successful upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub kind: StructureKind,
    pub level: u32,
    pub cost: Resources,
    pub power_gain: u32,
}

/// Structure levels and the fortress's raid strength.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FortressState {
    pub wall_level: u32,
    pub tower_level: u32,
    pub hatchery_level: u32,
    pub power: u32,
}

impl FortressState {
    pub fn level(&self, kind: StructureKind) -> u32 {
        match kind {
            StructureKind::Wall => self.wall_level,
            StructureKind::Tower => self.tower_level,
            StructureKind::Hatchery => self.hatchery_level,
        }
    }

    fn level_mut(&mut self, kind: StructureKind) -> &mut u32 {
        match kind {
            StructureKind::Wall => &mut self.wall_level,
            StructureKind::Tower => &mut self.tower_level,
            StructureKind::Hatchery => &mut self.hatchery_level,
        }
    }

    pub fn next_cost(&self, kind: StructureKind) -> Resources {
        kind.cost(self.level(kind) + 1)
    }

    pub fn can_afford(&self, kind: StructureKind, ledger: &ResourceLedger) -> bool {
        ledger.can_afford(&self.next_cost(kind))
    }

    pub fn add_power(&mut self, amount: u32) {
        self.power = self.power.saturating_add(amount);
    }

    /// Upgrade `kind` by one level, paying from `ledger`.
    ///
    /// Cost, level and power move together: either all three change or, on
    /// [`ActionError::InsufficientResources`], none do.
    pub fn build(
        &mut self,
        kind: StructureKind,
        ledger: &mut ResourceLedger,
    ) -> Result<BuildReport, ActionError> {
        let level = self.level(kind) + 1;
        let cost = kind.cost(level);
        if !ledger.spend(&cost) {
            return Err(ActionError::InsufficientResources {
                kind,
                cost,
                available: ledger.stock,
            });
        }
        *self.level_mut(kind) = level;
        let power_gain = kind.power_gain(level);
        self.add_power(power_gain);
        Ok(BuildReport {
            kind,
            level,
            cost,
            power_gain,
        })
    }
}
