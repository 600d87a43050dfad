//! Soft rejections raised by engine actions.

use crate::creatures::CreatureId;
use crate::fortress::StructureKind;
use crate::ledger::Resources;
use chrono::NaiveDate;
use thiserror::Error;

/// Why an action was turned down. State is never modified when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not enough resources to upgrade {kind}: need {cost}, have {available}")]
    InsufficientResources {
        kind: StructureKind,
        cost: Resources,
        available: Resources,
    },
    #[error("no food in the stores")]
    NoFood,
    #[error("no focus tokens left")]
    NoFocusTokens,
    #[error("no wild creature with id {0}")]
    UnknownCreature(CreatureId),
    #[error("today's raid already ran on {day}")]
    DailyRaidSpent { day: NaiveDate },
}

impl ActionError {
    /// Short guidance shown to the player alongside the rejection.
    pub fn hint(&self) -> &'static str {
        match self {
            ActionError::InsufficientResources { .. } => {
                "Finish a focus session to earn more!"
            }
            ActionError::NoFood => "Complete sessions to earn 🍖.",
            ActionError::NoFocusTokens => "Finish a Pomodoro to earn one.",
            ActionError::UnknownCreature(_) => "Find a creature first.",
            ActionError::DailyRaidSpent { .. } => "Come back tomorrow, or run a practice raid.",
        }
    }

    /// Title for the rejection notice.
    pub fn title(&self) -> &'static str {
        match self {
            ActionError::InsufficientResources { .. } => "Not enough resources",
            ActionError::NoFood => "No food",
            ActionError::NoFocusTokens => "No Focus Tokens",
            ActionError::UnknownCreature(_) => "No such creature",
            ActionError::DailyRaidSpent { .. } => "Today's raid done",
        }
    }
}
