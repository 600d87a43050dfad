//! One-shot notices the engine hands to the presentation layer.

use crate::creatures::{Species, WildEncounter};
use crate::error::ActionError;
use crate::fortress::BuildReport;
use crate::raid::{RaidLogEntry, RaidOutcome};
use crate::timer::SessionReward;
use serde::Serialize;
use std::fmt;

/// Something the player should be told about. Each variant carries enough to
/// build its summary; the presentation layer decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    SessionComplete {
        reward: SessionReward,
    },
    Built {
        report: BuildReport,
    },
    Encounter {
        encounter: WildEncounter,
    },
    Tamed {
        species: Species,
        level: u8,
        power_gain: u32,
    },
    Raid(Box<RaidLogEntry>),
    Rejected {
        title: String,
        message: String,
        hint: String,
    },
}

impl Notification {
    pub fn rejected(err: &ActionError) -> Self {
        Notification::Rejected {
            title: err.title().to_string(),
            message: err.to_string(),
            hint: err.hint().to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Notification::SessionComplete { .. } => "✅ Session Complete!".to_string(),
            Notification::Built { .. } => "🏗️ Built!".to_string(),
            Notification::Encounter { .. } => "🔍 Creature found".to_string(),
            Notification::Tamed { .. } => "🦖 Tamed!".to_string(),
            Notification::Raid(entry) => match entry.outcome {
                RaidOutcome::Victory => "🛡️ Raid Repelled!".to_string(),
                RaidOutcome::Breached => "💥 Breach!".to_string(),
            },
            Notification::Rejected { title, .. } => title.clone(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Notification::SessionComplete { reward } => format!(
                "You earned {} and +{} Focus Token",
                reward.resources, reward.focus_tokens
            ),
            Notification::Built { report } => format!(
                "{} upgraded to Lv.{}. Power +{}",
                report.kind.title(),
                report.level,
                report.power_gain
            ),
            Notification::Encounter { encounter } => format!(
                "{} {} {} (Lv.{}, {}) appeared. Taming target {}",
                encounter.species.emoji(),
                encounter.species,
                encounter.id,
                encounter.level,
                encounter.species.temperament(),
                encounter.taming_target
            ),
            Notification::Tamed {
                species,
                level,
                power_gain,
            } => format!(
                "{} {} (Lv.{}) joined your fortress! Power +{}",
                species.emoji(),
                species,
                level,
                power_gain
            ),
            Notification::Raid(entry) => {
                let settlement = match entry.outcome {
                    RaidOutcome::Victory => format!("Loot: +{}", entry.loot),
                    RaidOutcome::Breached => format!("Losses: -{}", entry.losses),
                };
                let notes = entry.perks.notes();
                let perks = if notes.is_empty() {
                    "None".to_string()
                } else {
                    notes.join("; ")
                };
                format!(
                    "Enemy {} vs. Fortress {}. {}. Defender perks: {}",
                    entry.effective_enemy_power, entry.effective_own_power, settlement, perks
                )
            }
            Notification::Rejected { message, hint, .. } => format!("{}. {}", message, hint),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.summary())
    }
}
