//! Defender perks granted by tamed creatures during raids.
//!
//! Every perk is a whole-number percentage or a flat amount, so effective
//! powers are computed exactly: `floor((own + bulwark) * (100 + ambush) / 100)`
//! for the fortress and `floor(enemy * (100 - scout) / 100)` for the raiders.

use crate::creatures::{Species, TamedCreature};
use serde::Serialize;

pub const AMBUSH_PCT_PER_LEVEL: u32 = 3;
pub const AMBUSH_PCT_CAP: u32 = 30;
pub const SHIELD_PCT_PER_CREATURE: u32 = 20;
pub const SHIELD_PCT_CAP: u32 = 60;
pub const SCOUT_PCT_PER_CREATURE: u32 = 5;
pub const SCOUT_PCT_CAP: u32 = 25;
pub const BULWARK_PER_LEVEL: u32 = 2;
pub const REND_FOOD_PER_LEVEL: u32 = 1;

/// The per-species quantities that drive each perk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerkDrivers {
    pub raptor_levels: u32,
    pub triceratops_count: u32,
    pub pteranodon_count: u32,
    pub ankylosaurus_levels: u32,
    pub spinosaurus_levels: u32,
}

impl PerkDrivers {
    pub fn tally<'a>(stable: impl IntoIterator<Item = &'a TamedCreature>) -> Self {
        let mut drivers = PerkDrivers::default();
        for creature in stable.into_iter().filter(|c| c.tamed) {
            let level = u32::from(creature.level.max(1));
            match creature.species {
                Species::Raptor => drivers.raptor_levels += level,
                Species::Triceratops => drivers.triceratops_count += 1,
                Species::Pteranodon => drivers.pteranodon_count += 1,
                Species::Ankylosaurus => drivers.ankylosaurus_levels += level,
                Species::Spinosaurus => drivers.spinosaurus_levels += level,
            }
        }
        drivers
    }
}

/// Modifiers applied to one raid. Also stored on the raid log as the perk
/// notes for that raid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefenderPerks {
    /// Raptor: percent added to own power.
    pub ambush_pct: u32,
    /// Triceratops: percent shaved off raid losses.
    pub shield_pct: u32,
    /// Pteranodon: percent removed from enemy power.
    pub scout_pct: u32,
    /// Ankylosaurus: flat power added before the ambush bonus.
    pub bulwark_flat: u32,
    /// Spinosaurus: extra food on victory.
    pub rend_food: u32,
    pub drivers: PerkDrivers,
}

impl DefenderPerks {
    pub fn from_drivers(drivers: PerkDrivers) -> Self {
        Self {
            ambush_pct: (AMBUSH_PCT_PER_LEVEL * drivers.raptor_levels).min(AMBUSH_PCT_CAP),
            shield_pct: (SHIELD_PCT_PER_CREATURE * drivers.triceratops_count).min(SHIELD_PCT_CAP),
            scout_pct: (SCOUT_PCT_PER_CREATURE * drivers.pteranodon_count).min(SCOUT_PCT_CAP),
            bulwark_flat: BULWARK_PER_LEVEL * drivers.ankylosaurus_levels,
            rend_food: REND_FOOD_PER_LEVEL * drivers.spinosaurus_levels,
            drivers,
        }
    }

    /// Recompute from the whole stable.
    pub fn from_stable<'a>(stable: impl IntoIterator<Item = &'a TamedCreature>) -> Self {
        Self::from_drivers(PerkDrivers::tally(stable))
    }

    pub fn effective_own_power(&self, raw: u32) -> u32 {
        let boosted = u64::from(raw) + u64::from(self.bulwark_flat);
        let scaled = boosted * u64::from(100 + self.ambush_pct) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    pub fn effective_enemy_power(&self, raw: u32) -> u32 {
        let scaled = u64::from(raw) * u64::from(100 - self.scout_pct) / 100;
        // never larger than `raw`
        scaled as u32
    }

    pub fn is_empty(&self) -> bool {
        self.ambush_pct == 0
            && self.shield_pct == 0
            && self.scout_pct == 0
            && self.bulwark_flat == 0
            && self.rend_food == 0
    }

    /// One line per active perk, for the raid notice.
    pub fn notes(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.ambush_pct > 0 {
            lines.push(format!("Raptor Ambush: +{}% power", self.ambush_pct));
        }
        if self.bulwark_flat > 0 {
            lines.push(format!("Anky Bulwark: +{} flat power", self.bulwark_flat));
        }
        if self.scout_pct > 0 {
            lines.push(format!("Pteranodon Scout: -{}% enemy", self.scout_pct));
        }
        if self.shield_pct > 0 {
            lines.push(format!("Trike Shield: -{}% losses", self.shield_pct));
        }
        if self.rend_food > 0 {
            lines.push(format!("Spino Rend: +{} 🍖 on victory", self.rend_food));
        }
        lines
    }
}
