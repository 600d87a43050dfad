//! Wild encounters, taming actions and the stable of tamed creatures.
//!
//! Encounters live in the wild collection until their taming progress reaches
//! the target. [`Menagerie::promote_tamed`] then moves them into the stable in
//! one pass; callers run it at the end of every action that touches progress.

use crate::dice::{pick, roll_amount, Dice};
use crate::error::ActionError;
use crate::ledger::{ResourceKind, ResourceLedger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The five species that can turn up in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Raptor,
    Triceratops,
    Pteranodon,
    Ankylosaurus,
    Spinosaurus,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Raptor,
        Species::Triceratops,
        Species::Pteranodon,
        Species::Ankylosaurus,
        Species::Spinosaurus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::Raptor => "Raptor",
            Species::Triceratops => "Triceratops",
            Species::Pteranodon => "Pteranodon",
            Species::Ankylosaurus => "Ankylosaurus",
            Species::Spinosaurus => "Spinosaurus",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Species::Raptor => "🦖",
            Species::Triceratops => "🐲",
            Species::Pteranodon => "🪽",
            Species::Ankylosaurus => "🛡️",
            Species::Spinosaurus => "🦕",
        }
    }

    pub fn temperament(self) -> &'static str {
        match self {
            Species::Raptor => "Skittish",
            Species::Triceratops => "Stubborn",
            Species::Pteranodon => "Alert",
            Species::Ankylosaurus => "Calm",
            Species::Spinosaurus => "Aggressive",
        }
    }

    /// Name of the raid perk this species contributes as a defender.
    pub fn perk(self) -> &'static str {
        match self {
            Species::Raptor => "Ambush",
            Species::Triceratops => "Shield",
            Species::Pteranodon => "Scout",
            Species::Ankylosaurus => "Bulwark",
            Species::Spinosaurus => "Rend",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Process-unique creature identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u64);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::str::FromStr for CreatureId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(CreatureId)
    }
}

/// Taming target for a difficulty tier: 100, 140 or 180.
pub fn taming_target(tier: u8) -> u32 {
    100 + 40 * u32::from(tier.saturating_sub(1))
}

/// Progress each unit of food buys. Harder tiers resist feeding.
pub fn feed_rate(tier: u8) -> u32 {
    match tier {
        3 => 6,
        2 => 8,
        _ => 10,
    }
}

pub const MAX_FOOD_PER_FEED: u32 = 2;
pub const WALK_DISTANCE: u32 = 200;
pub const WALK_PROGRESS: u32 = 6;

/// Progress granted by calming, from the hostility before it drops.
pub fn calm_progress(hostility_before: u8) -> u32 {
    12 + 2 * u32::from(3u8.saturating_sub(hostility_before))
}

/// A creature that is still being tamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildEncounter {
    pub id: CreatureId,
    pub species: Species,
    pub difficulty: u8,
    pub taming_progress: u32,
    pub taming_target: u32,
    pub hostility: u8,
    pub walked_distance: u32,
    pub level: u8,
}

impl WildEncounter {
    pub fn new(id: CreatureId, species: Species, difficulty: u8, level: u8) -> Self {
        let difficulty = difficulty.clamp(1, 3);
        Self {
            id,
            species,
            difficulty,
            taming_progress: 0,
            taming_target: taming_target(difficulty),
            hostility: difficulty,
            walked_distance: 0,
            level: level.clamp(1, 3),
        }
    }

    pub fn is_tamed(&self) -> bool {
        self.taming_progress >= self.taming_target
    }

    /// Taming progress as a rounded percentage of the target.
    pub fn progress_percent(&self) -> u32 {
        (self.taming_progress * 100 + self.taming_target / 2) / self.taming_target
    }

    fn advance(&mut self, amount: u32) -> u32 {
        let before = self.taming_progress;
        self.taming_progress = (before + amount).min(self.taming_target);
        self.taming_progress - before
    }
}

/// A creature living in the stable. Created only by promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TamedCreature {
    pub id: CreatureId,
    pub species: Species,
    pub difficulty: u8,
    pub level: u8,
    pub walked_distance: u32,
    pub tamed: bool,
    pub tamed_at: DateTime<Utc>,
    /// Reserved; nothing grows or reads it yet.
    pub experience: u32,
}

impl TamedCreature {
    fn from_wild(wild: WildEncounter, tamed_at: DateTime<Utc>) -> Self {
        Self {
            id: wild.id,
            species: wild.species,
            difficulty: wild.difficulty,
            level: wild.level,
            walked_distance: wild.walked_distance,
            tamed: true,
            tamed_at,
            experience: 0,
        }
    }

    /// Fortress power this creature adds when it joins.
    pub fn power_gain(&self) -> u32 {
        10 + 5 * u32::from(self.level)
    }
}

/// What a feed, calm or walk did to one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub id: CreatureId,
    pub progress_gained: u32,
    pub food_used: u32,
    pub tokens_used: u32,
}

/// Both creature collections plus the id counter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Menagerie {
    pub wild: Vec<WildEncounter>,
    pub stable: Vec<TamedCreature>,
    #[serde(skip)]
    next_id: u64,
}

impl Menagerie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll a new encounter and put it at the front of the wild list.
    pub fn generate(&mut self, dice: &mut dyn Dice) -> &WildEncounter {
        let species = *pick(dice, &Species::ALL);
        let difficulty = roll_amount(dice, 1, 3) as u8;
        let level = roll_amount(dice, 1, 3) as u8;
        self.next_id += 1;
        let encounter = WildEncounter::new(CreatureId(self.next_id), species, difficulty, level);
        debug!(
            "Encountered {} {} (tier {}, Lv.{})",
            encounter.species, encounter.id, encounter.difficulty, encounter.level
        );
        self.wild.insert(0, encounter);
        &self.wild[0]
    }

    pub fn wild_mut(&mut self, id: CreatureId) -> Option<&mut WildEncounter> {
        self.wild.iter_mut().find(|c| c.id == id)
    }

    /// Spend up to two food on an encounter.
    pub fn feed(
        &mut self,
        id: CreatureId,
        ledger: &mut ResourceLedger,
    ) -> Result<ProgressReport, ActionError> {
        let creature = self
            .wild_mut(id)
            .ok_or(ActionError::UnknownCreature(id))?;
        if ledger.get(ResourceKind::Food) == 0 {
            return Err(ActionError::NoFood);
        }
        let food_used = ledger.take_up_to(ResourceKind::Food, MAX_FOOD_PER_FEED);
        let progress_gained = creature.advance(food_used * feed_rate(creature.difficulty));
        Ok(ProgressReport {
            id,
            progress_gained,
            food_used,
            tokens_used: 0,
        })
    }

    /// Spend one focus token to lower hostility and gain progress.
    pub fn calm(
        &mut self,
        id: CreatureId,
        ledger: &mut ResourceLedger,
    ) -> Result<ProgressReport, ActionError> {
        let creature = self
            .wild_mut(id)
            .ok_or(ActionError::UnknownCreature(id))?;
        if !ledger.use_token() {
            return Err(ActionError::NoFocusTokens);
        }
        let hostility_before = creature.hostility;
        creature.hostility = hostility_before.saturating_sub(1);
        let progress_gained = creature.advance(calm_progress(hostility_before));
        Ok(ProgressReport {
            id,
            progress_gained,
            food_used: 0,
            tokens_used: 1,
        })
    }

    /// Free action: a little progress and some distance.
    pub fn walk(&mut self, id: CreatureId) -> Result<ProgressReport, ActionError> {
        let creature = self
            .wild_mut(id)
            .ok_or(ActionError::UnknownCreature(id))?;
        creature.walked_distance += WALK_DISTANCE;
        let progress_gained = creature.advance(WALK_PROGRESS);
        Ok(ProgressReport {
            id,
            progress_gained,
            food_used: 0,
            tokens_used: 0,
        })
    }

    /// Move every fully tamed encounter into the stable, returning the
    /// newcomers. Running it again with nothing ready returns an empty list.
    pub fn promote_tamed(&mut self, tamed_at: DateTime<Utc>) -> Vec<TamedCreature> {
        if !self.wild.iter().any(WildEncounter::is_tamed) {
            return Vec::new();
        }
        let (ready, still_wild): (Vec<_>, Vec<_>) = std::mem::take(&mut self.wild)
            .into_iter()
            .partition(WildEncounter::is_tamed);
        self.wild = still_wild;

        let promoted: Vec<TamedCreature> = ready
            .into_iter()
            .map(|wild| TamedCreature::from_wild(wild, tamed_at))
            .collect();
        self.stable.extend(promoted.iter().cloned());
        promoted
    }

    /// Tamed creature count per species, in catalogue order.
    pub fn stable_breakdown(&self) -> Vec<(Species, usize)> {
        Species::ALL
            .into_iter()
            .map(|species| {
                let count = self.stable.iter().filter(|c| c.species == species).count();
                (species, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Resources;
    use crate::testing::ScriptedDice;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn menagerie_with(encounter: WildEncounter) -> Menagerie {
        let mut menagerie = Menagerie::new();
        menagerie.next_id = encounter.id.0;
        menagerie.wild.push(encounter);
        menagerie
    }

    #[test]
    fn targets_follow_difficulty() {
        assert_eq!(taming_target(1), 100);
        assert_eq!(taming_target(2), 140);
        assert_eq!(taming_target(3), 180);
    }

    #[test]
    fn generate_uses_rolls_and_inserts_at_front() {
        let mut menagerie = Menagerie::new();
        // species index, tier, level
        let mut dice = ScriptedDice::new([0, 1, 1, 3, 2, 3]);
        menagerie.generate(&mut dice);
        let second = menagerie.generate(&mut dice).clone();

        assert_eq!(second.species, Species::Ankylosaurus);
        assert_eq!(second.difficulty, 2);
        assert_eq!(second.taming_target, 140);
        assert_eq!(second.hostility, 2);
        assert_eq!(second.level, 3);
        assert_eq!(menagerie.wild[0].id, second.id);
        assert_eq!(menagerie.wild[1].species, Species::Raptor);
        assert_ne!(menagerie.wild[0].id, menagerie.wild[1].id);
    }

    #[test]
    fn feed_uses_at_most_two_food() {
        let mut menagerie =
            menagerie_with(WildEncounter::new(CreatureId(1), Species::Raptor, 2, 1));
        let mut ledger = ResourceLedger::new(Resources::new(0, 0, 5), 0);

        let report = menagerie.feed(CreatureId(1), &mut ledger).unwrap();

        assert_eq!(report.food_used, 2);
        assert_eq!(report.progress_gained, 16);
        assert_eq!(ledger.stock.food, 3);
    }

    #[test]
    fn feed_with_single_food_uses_it() {
        let mut menagerie =
            menagerie_with(WildEncounter::new(CreatureId(1), Species::Raptor, 3, 1));
        let mut ledger = ResourceLedger::new(Resources::new(0, 0, 1), 0);

        let report = menagerie.feed(CreatureId(1), &mut ledger).unwrap();

        assert_eq!(report.food_used, 1);
        assert_eq!(report.progress_gained, 6);
        assert_eq!(ledger.stock.food, 0);
    }

    #[test]
    fn feed_without_food_is_rejected() {
        let mut menagerie =
            menagerie_with(WildEncounter::new(CreatureId(1), Species::Raptor, 1, 1));
        let mut ledger = ResourceLedger::default();

        assert_eq!(
            menagerie.feed(CreatureId(1), &mut ledger),
            Err(ActionError::NoFood)
        );
        assert_eq!(menagerie.wild[0].taming_progress, 0);
    }

    #[test]
    fn unknown_id_consumes_nothing() {
        let mut menagerie = Menagerie::new();
        let mut ledger = ResourceLedger::new(Resources::new(0, 0, 4), 2);

        assert_eq!(
            menagerie.feed(CreatureId(9), &mut ledger),
            Err(ActionError::UnknownCreature(CreatureId(9)))
        );
        assert_eq!(
            menagerie.calm(CreatureId(9), &mut ledger),
            Err(ActionError::UnknownCreature(CreatureId(9)))
        );
        assert_eq!(ledger, ResourceLedger::new(Resources::new(0, 0, 4), 2));
    }

    #[test]
    fn calm_bonus_shrinks_with_hostility() {
        let mut menagerie =
            menagerie_with(WildEncounter::new(CreatureId(1), Species::Spinosaurus, 3, 2));
        let mut ledger = ResourceLedger::new(Resources::default(), 4);

        let gains: Vec<u32> = (0..4)
            .map(|_| {
                menagerie
                    .calm(CreatureId(1), &mut ledger)
                    .unwrap()
                    .progress_gained
            })
            .collect();

        assert_eq!(gains, vec![12, 14, 16, 18]);
        assert_eq!(menagerie.wild[0].hostility, 0);
        assert_eq!(ledger.focus_tokens, 0);
    }

    #[test]
    fn calm_without_tokens_is_rejected() {
        let mut menagerie =
            menagerie_with(WildEncounter::new(CreatureId(1), Species::Raptor, 2, 1));
        let mut ledger = ResourceLedger::default();

        assert_eq!(
            menagerie.calm(CreatureId(1), &mut ledger),
            Err(ActionError::NoFocusTokens)
        );
        assert_eq!(menagerie.wild[0].hostility, 2);
    }

    #[test]
    fn walk_progress_is_capped_at_target() {
        let mut encounter = WildEncounter::new(CreatureId(1), Species::Pteranodon, 1, 1);
        encounter.taming_progress = 97;
        let mut menagerie = menagerie_with(encounter);

        let report = menagerie.walk(CreatureId(1)).unwrap();

        assert_eq!(report.progress_gained, 3);
        assert_eq!(menagerie.wild[0].taming_progress, 100);
        assert_eq!(menagerie.wild[0].walked_distance, 200);
    }

    #[test]
    fn promotion_moves_each_creature_exactly_once() {
        let mut ready = WildEncounter::new(CreatureId(1), Species::Triceratops, 1, 2);
        ready.taming_progress = 100;
        let mut menagerie = menagerie_with(ready);
        menagerie
            .wild
            .push(WildEncounter::new(CreatureId(2), Species::Raptor, 1, 1));

        let promoted = menagerie.promote_tamed(at());
        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted[0].id, CreatureId(1));
        assert!(promoted[0].tamed);
        assert_eq!(promoted[0].power_gain(), 20);
        assert_eq!(promoted[0].experience, 0);

        assert!(menagerie.promote_tamed(at()).is_empty());
        assert_eq!(menagerie.stable.len(), 1);
        assert_eq!(menagerie.wild.len(), 1);
        assert_eq!(menagerie.wild[0].id, CreatureId(2));
    }

    #[test]
    fn progress_percent_rounds() {
        let mut encounter = WildEncounter::new(CreatureId(1), Species::Raptor, 2, 1);
        encounter.taming_progress = 70;
        assert_eq!(encounter.progress_percent(), 50);
        encounter.taming_progress = 1;
        assert_eq!(encounter.progress_percent(), 1);
    }

    #[test]
    fn creature_ids_parse_with_or_without_hash() {
        assert_eq!("#12".parse::<CreatureId>(), Ok(CreatureId(12)));
        assert_eq!("3".parse::<CreatureId>(), Ok(CreatureId(3)));
        assert!("raptor".parse::<CreatureId>().is_err());
    }
}
