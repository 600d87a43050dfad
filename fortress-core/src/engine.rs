//! The controller the presentation layer talks to.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::creatures::{CreatureId, Species, TamedCreature, WildEncounter};
use crate::dice::Dice;
use crate::error::ActionError;
use crate::fortress::{BuildReport, FortressState, StructureKind};
use crate::input::Action;
use crate::ledger::{ResourceLedger, Resources};
use crate::notify::Notification;
use crate::perks::DefenderPerks;
use crate::raid::{RaidLog, RaidLogEntry};
use crate::state::{GameState, TamingOutcome};
use crate::timer::{SessionReward, TimerState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::mem;
use tracing::{debug, info};

/// Owns the game state, the random source, the clock and the outbox of
/// pending notifications.
///
/// Each method is one discrete player action (or one elapsed second) and runs
/// to completion before returning. Successes and soft rejections both leave a
/// [`Notification`] in the outbox; the only silent case is asking for a daily
/// raid that has already run today.
pub struct Engine {
    state: GameState,
    dice: Box<dyn Dice>,
    clock: Box<dyn Clock>,
    outbox: Vec<Notification>,
}

impl Engine {
    /// Build an engine on the system clock, seeding the RNG from the config
    /// (or from entropy when no seed is set).
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_sources(config, Box::new(rng), Box::new(SystemClock))
    }

    pub fn with_sources(
        config: &EngineConfig,
        dice: Box<dyn Dice>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let config = config.clone().normalized();
        Self {
            state: GameState::new(&config),
            dice,
            clock,
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.state.ledger
    }

    pub fn timer(&self) -> &TimerState {
        &self.state.timer
    }

    pub fn fortress(&self) -> &FortressState {
        &self.state.fortress
    }

    pub fn wild(&self) -> &[WildEncounter] {
        &self.state.creatures.wild
    }

    pub fn stable(&self) -> &[TamedCreature] {
        &self.state.creatures.stable
    }

    pub fn stable_breakdown(&self) -> Vec<(Species, usize)> {
        self.state.creatures.stable_breakdown()
    }

    pub fn raid_log(&self) -> &RaidLog {
        &self.state.raids
    }

    pub fn defender_perks(&self) -> DefenderPerks {
        self.state.defender_perks()
    }

    pub fn next_cost(&self, kind: StructureKind) -> Resources {
        self.state.fortress.next_cost(kind)
    }

    pub fn can_afford(&self, kind: StructureKind) -> bool {
        self.state.fortress.can_afford(kind, &self.state.ledger)
    }

    pub fn daily_raid_available(&self) -> bool {
        self.state.daily_raid_available(self.clock.today())
    }

    /// Take every notification raised since the last call, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.outbox)
    }

    fn reject(&mut self, err: &ActionError) {
        debug!("Rejected: {}", err);
        self.outbox.push(Notification::rejected(err));
    }

    pub fn dispatch(&mut self, action: &Action) {
        match action {
            Action::SetMinutes { input } => {
                self.set_minutes(input);
            }
            Action::Start => self.start(),
            Action::Pause => self.pause(),
            Action::Reset => self.reset(),
            Action::Tick => {
                self.tick();
            }
            Action::Build { kind } => {
                let _ = self.build(*kind);
            }
            Action::FindCreature => {
                self.find_creature();
            }
            Action::Feed { id } => {
                let _ = self.feed(*id);
            }
            Action::Calm { id } => {
                let _ = self.calm(*id);
            }
            Action::Walk { id } => {
                let _ = self.walk(*id);
            }
            Action::Raid { daily } => {
                let _ = self.resolve_raid(*daily);
            }
        }
    }

    /// Set the session length from raw input. Returns the clamped minutes.
    pub fn set_minutes(&mut self, input: &str) -> u32 {
        let minutes = self.state.set_minutes(input);
        debug!("Session length set to {} min", minutes);
        minutes
    }

    pub fn start(&mut self) {
        self.state.timer.start();
        debug!("Timer started at {}", self.state.timer);
    }

    pub fn pause(&mut self) {
        self.state.timer.pause();
        debug!("Timer paused at {}", self.state.timer);
    }

    pub fn reset(&mut self) {
        self.state.timer.reset();
    }

    /// One elapsed second.
    pub fn tick(&mut self) -> Option<SessionReward> {
        let reward = self.state.tick(self.dice.as_mut())?;
        info!(
            "Session complete: +{} +{} token",
            reward.resources, reward.focus_tokens
        );
        self.outbox.push(Notification::SessionComplete { reward });
        Some(reward)
    }

    pub fn build(&mut self, kind: StructureKind) -> Result<BuildReport, ActionError> {
        match self.state.build(kind) {
            Ok(report) => {
                info!(
                    "Built {} Lv.{} for {} (power +{})",
                    kind, report.level, report.cost, report.power_gain
                );
                self.outbox.push(Notification::Built { report });
                Ok(report)
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    pub fn find_creature(&mut self) -> WildEncounter {
        let encounter = self.state.find_creature(self.dice.as_mut());
        self.outbox.push(Notification::Encounter {
            encounter: encounter.clone(),
        });
        encounter
    }

    pub fn feed(&mut self, id: CreatureId) -> Result<TamingOutcome, ActionError> {
        let at = self.clock.now();
        let result = self.state.feed(id, at);
        self.after_taming(result)
    }

    pub fn calm(&mut self, id: CreatureId) -> Result<TamingOutcome, ActionError> {
        let at = self.clock.now();
        let result = self.state.calm(id, at);
        self.after_taming(result)
    }

    pub fn walk(&mut self, id: CreatureId) -> Result<TamingOutcome, ActionError> {
        let at = self.clock.now();
        let result = self.state.walk(id, at);
        self.after_taming(result)
    }

    fn after_taming(
        &mut self,
        result: Result<TamingOutcome, ActionError>,
    ) -> Result<TamingOutcome, ActionError> {
        match &result {
            Ok(outcome) => {
                debug!(
                    "{} gained {} progress",
                    outcome.progress.id, outcome.progress.progress_gained
                );
                for creature in &outcome.promoted {
                    info!(
                        "Tamed {} {} (Lv.{}), power now {}",
                        creature.species, creature.id, creature.level, self.state.fortress.power
                    );
                    self.outbox.push(Notification::Tamed {
                        species: creature.species,
                        level: creature.level,
                        power_gain: creature.power_gain(),
                    });
                }
            }
            Err(err) => self.reject(err),
        }
        result
    }

    /// Run a daily or practice raid. A second daily raid on the same day is
    /// refused without a notification.
    pub fn resolve_raid(&mut self, daily: bool) -> Result<RaidLogEntry, ActionError> {
        let today = self.clock.today();
        let at = self.clock.now();
        match self.state.raid(daily, self.dice.as_mut(), today, at) {
            Ok(entry) => {
                info!(
                    "{} raid: enemy {} vs fortress {} -> {}",
                    if daily { "Daily" } else { "Practice" },
                    entry.effective_enemy_power,
                    entry.effective_own_power,
                    entry.outcome
                );
                self.outbox.push(Notification::Raid(Box::new(entry.clone())));
                Ok(entry)
            }
            Err(err) => {
                debug!("Raid skipped: {}", err);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("pending_notifications", &self.outbox.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, ScriptedDice};

    fn engine_with(dice: &ScriptedDice, config: EngineConfig) -> Engine {
        Engine::with_sources(
            &config,
            Box::new(dice.clone()),
            Box::new(FixedClock::on(2024, 7, 1)),
        )
    }

    #[test]
    fn build_failure_notifies_and_changes_nothing() {
        let dice = ScriptedDice::default();
        let mut engine = engine_with(&dice, EngineConfig::default());

        assert!(engine.build(StructureKind::Wall).is_err());

        let notes = engine.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title(), "Not enough resources");
        assert_eq!(engine.fortress().wall_level, 0);
        assert!(engine.drain_notifications().is_empty());
    }

    #[test]
    fn dispatch_routes_to_the_matching_action() {
        let dice = ScriptedDice::default();
        let config = EngineConfig {
            starting_stock: Resources::new(20, 10, 0),
            ..EngineConfig::default()
        };
        let mut engine = engine_with(&dice, config);

        engine.dispatch(&Action::Build {
            kind: StructureKind::Wall,
        });
        engine.dispatch(&Action::SetMinutes {
            input: "0".to_string(),
        });

        assert_eq!(engine.fortress().wall_level, 1);
        assert_eq!(engine.fortress().power, 5);
        assert_eq!(engine.ledger().stock, Resources::default());
        assert_eq!(engine.timer().configured_minutes, 1);
    }

    #[test]
    fn spent_daily_raid_is_silent() {
        let dice = ScriptedDice::default();
        let mut engine = engine_with(&dice, EngineConfig::default());

        assert!(engine.resolve_raid(true).is_ok());
        engine.drain_notifications();
        assert!(!engine.daily_raid_available());

        assert!(engine.resolve_raid(true).is_err());
        assert!(engine.drain_notifications().is_empty());
        assert_eq!(engine.raid_log().len(), 1);
    }

    #[test]
    fn seeded_engines_agree() {
        let config = EngineConfig {
            seed: Some(11),
            ..EngineConfig::default()
        };
        let mut a = Engine::new(&config);
        let mut b = Engine::new(&config);
        let ea = a.find_creature();
        let eb = b.find_creature();
        assert_eq!(ea.species, eb.species);
        assert_eq!(ea.difficulty, eb.difficulty);
        assert_eq!(ea.level, eb.level);
    }
}
