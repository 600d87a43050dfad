//! Reward and economy engine for a focus-timer fortress game.
//!
//! Completing a timed focus session pays out wood, stone, food and a focus
//! token. Those fund fortress upgrades and creature taming, both of which
//! raise fortress power, and power is tested against randomly rolled raiders.
//!
//! The presentation layer drives an [`Engine`] with discrete inputs (see
//! [`Action`]), reads back snapshots, and drains [`Notification`]s to show
//! the player. Randomness and time come in through the [`Dice`] and [`Clock`]
//! traits so every scenario can be replayed exactly in tests; see
//! [`testing`].

pub mod clock;
pub mod config;
pub mod creatures;
pub mod dice;
pub mod engine;
pub mod error;
pub mod fortress;
pub mod input;
pub mod ledger;
pub mod notify;
pub mod perks;
pub mod raid;
pub mod state;
pub mod testing;
pub mod timer;

pub use clock::{Clock, SystemClock};
pub use config::EngineConfig;
pub use creatures::{CreatureId, Menagerie, Species, TamedCreature, WildEncounter};
pub use dice::Dice;
pub use engine::Engine;
pub use error::ActionError;
pub use fortress::{BuildReport, FortressState, StructureKind};
pub use input::Action;
pub use ledger::{ResourceKind, ResourceLedger, Resources};
pub use notify::Notification;
pub use perks::{DefenderPerks, PerkDrivers};
pub use raid::{DailyRaidGate, RaidLog, RaidLogEntry, RaidOutcome};
pub use state::{GameState, TamingOutcome};
pub use timer::{SessionReward, TimerPhase, TimerState};
