//! The single application-state aggregate and its transitions.
//!
//! Every transition either completes in full or returns an [`ActionError`]
//! with nothing changed. Taming actions finish with the promotion sweep and
//! its power gain inside the same call, so a fully tamed creature is never
//! missing from both collections.

use crate::config::EngineConfig;
use crate::creatures::{CreatureId, Menagerie, ProgressReport, TamedCreature, WildEncounter};
use crate::dice::Dice;
use crate::error::ActionError;
use crate::fortress::{BuildReport, FortressState, StructureKind};
use crate::ledger::ResourceLedger;
use crate::perks::DefenderPerks;
use crate::raid::{self, DailyRaidGate, RaidLog, RaidLogEntry};
use crate::timer::{parse_minutes, SessionReward, TimerState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Result of a feed, calm or walk, including anything it finished taming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TamingOutcome {
    pub progress: ProgressReport,
    pub promoted: Vec<TamedCreature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub ledger: ResourceLedger,
    pub timer: TimerState,
    pub fortress: FortressState,
    pub creatures: Menagerie,
    pub raids: RaidLog,
    pub daily_gate: DailyRaidGate,
}

impl GameState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ledger: ResourceLedger::new(config.starting_stock, config.starting_tokens),
            timer: TimerState::new(config.default_minutes),
            fortress: FortressState::default(),
            creatures: Menagerie::new(),
            raids: RaidLog::with_capacity(config.raid_log_capacity),
            daily_gate: DailyRaidGate::default(),
        }
    }

    pub fn set_minutes(&mut self, input: &str) -> u32 {
        self.timer.set_minutes(parse_minutes(input));
        self.timer.configured_minutes
    }

    /// Advance the countdown by one second, paying out if it completes.
    pub fn tick(&mut self, dice: &mut dyn Dice) -> Option<SessionReward> {
        if !self.timer.tick() {
            return None;
        }
        let reward = SessionReward::roll(dice);
        self.ledger.credit(&reward.resources);
        self.ledger.add_tokens(reward.focus_tokens);
        Some(reward)
    }

    pub fn build(&mut self, kind: StructureKind) -> Result<BuildReport, ActionError> {
        self.fortress.build(kind, &mut self.ledger)
    }

    pub fn find_creature(&mut self, dice: &mut dyn Dice) -> WildEncounter {
        self.creatures.generate(dice).clone()
    }

    pub fn feed(
        &mut self,
        id: CreatureId,
        at: DateTime<Utc>,
    ) -> Result<TamingOutcome, ActionError> {
        let progress = self.creatures.feed(id, &mut self.ledger)?;
        Ok(self.settle_taming(progress, at))
    }

    pub fn calm(
        &mut self,
        id: CreatureId,
        at: DateTime<Utc>,
    ) -> Result<TamingOutcome, ActionError> {
        let progress = self.creatures.calm(id, &mut self.ledger)?;
        Ok(self.settle_taming(progress, at))
    }

    pub fn walk(
        &mut self,
        id: CreatureId,
        at: DateTime<Utc>,
    ) -> Result<TamingOutcome, ActionError> {
        let progress = self.creatures.walk(id)?;
        Ok(self.settle_taming(progress, at))
    }

    fn settle_taming(&mut self, progress: ProgressReport, at: DateTime<Utc>) -> TamingOutcome {
        let promoted = self.creatures.promote_tamed(at);
        for creature in &promoted {
            self.fortress.add_power(creature.power_gain());
        }
        TamingOutcome { progress, promoted }
    }

    /// Perks from the current stable. Never cached.
    pub fn defender_perks(&self) -> DefenderPerks {
        DefenderPerks::from_stable(&self.creatures.stable)
    }

    pub fn daily_raid_available(&self, today: NaiveDate) -> bool {
        self.daily_gate.is_open(today)
    }

    /// Resolve one raid and log it. A daily raid is refused if one already
    /// ran on `today`; practice raids are never gated.
    pub fn raid(
        &mut self,
        daily: bool,
        dice: &mut dyn Dice,
        today: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<RaidLogEntry, ActionError> {
        if daily && !self.daily_gate.is_open(today) {
            return Err(ActionError::DailyRaidSpent { day: today });
        }
        let perks = self.defender_perks();
        let result = raid::resolve(&mut self.ledger, self.fortress.power, &perks, dice);
        let entry = RaidLogEntry::record(result, perks, daily, today, at);
        self.raids.push(entry.clone());
        if daily {
            self.daily_gate.stamp(today);
        }
        Ok(entry)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creatures::Species;
    use crate::ledger::Resources;
    use crate::raid::RaidOutcome;
    use crate::testing::ScriptedDice;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    fn today() -> NaiveDate {
        at().date_naive()
    }

    #[test]
    fn completed_session_credits_reward_and_token() {
        let mut state = GameState::default();
        state.set_minutes("1");
        state.timer.start();
        let mut dice = ScriptedDice::new([6, 3, 2]);

        let rewards: Vec<_> = (0..60).filter_map(|_| state.tick(&mut dice)).collect();

        assert_eq!(rewards.len(), 1);
        assert_eq!(state.ledger.stock, Resources::new(6, 3, 2));
        assert_eq!(state.ledger.focus_tokens, 1);
    }

    #[test]
    fn paused_session_pays_nothing() {
        let mut state = GameState::default();
        state.set_minutes("1");
        state.timer.start();
        let mut dice = ScriptedDice::default();
        for _ in 0..59 {
            state.tick(&mut dice);
        }
        state.timer.pause();
        assert!(state.tick(&mut dice).is_none());
        state.timer.reset();
        assert_eq!(state.ledger, ResourceLedger::default());
    }

    #[test]
    fn taming_promotes_and_adds_power_in_one_step() {
        let mut state = GameState::default();
        // Raptor, tier 1, level 2
        let mut dice = ScriptedDice::new([0, 1, 2]);
        let encounter = state.find_creature(&mut dice);
        state.creatures.wild[0].taming_progress = 95;

        let outcome = state.walk(encounter.id, at()).unwrap();

        assert_eq!(outcome.promoted.len(), 1);
        assert_eq!(outcome.promoted[0].species, Species::Raptor);
        assert!(state.creatures.wild.is_empty());
        assert_eq!(state.creatures.stable.len(), 1);
        assert_eq!(state.fortress.power, 20);
    }

    #[test]
    fn rejected_feed_leaves_state_alone() {
        let mut state = GameState::default();
        let mut dice = ScriptedDice::new([2, 3, 1]);
        let encounter = state.find_creature(&mut dice);

        assert_eq!(state.feed(encounter.id, at()), Err(ActionError::NoFood));
        assert_eq!(state.creatures.wild[0].taming_progress, 0);
    }

    #[test]
    fn daily_raid_runs_once_per_day() {
        let mut state = GameState::default();
        state.fortress.power = 100;
        let mut dice = ScriptedDice::new([5, 3, 2, 1]);

        let first = state.raid(true, &mut dice, today(), at()).unwrap();
        assert_eq!(first.raw_enemy_power, 95);
        assert_eq!(first.effective_own_power, 100);
        assert_eq!(first.effective_enemy_power, 95);
        assert_eq!(first.outcome, RaidOutcome::Victory);
        assert_eq!(first.loot, Resources::new(3, 2, 1));
        assert!(!state.daily_raid_available(today()));

        let stock_after_first = state.ledger.stock;
        assert_eq!(
            state.raid(true, &mut dice, today(), at()),
            Err(ActionError::DailyRaidSpent { day: today() })
        );
        assert_eq!(state.raids.len(), 1);
        assert_eq!(state.ledger.stock, stock_after_first);

        assert!(state.raid(false, &mut dice, today(), at()).is_ok());
        assert_eq!(state.raids.len(), 2);
        assert_eq!(state.daily_gate.last_daily, Some(today()));

        let tomorrow = today().succ_opt().unwrap();
        assert!(state.daily_raid_available(tomorrow));
    }
}
