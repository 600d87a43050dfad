//! The inputs the presentation layer can send to the engine.

use crate::creatures::CreatureId;
use crate::fortress::StructureKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Free-form minute input; clamped, never rejected.
    SetMinutes { input: String },
    Start,
    Pause,
    Reset,
    /// One elapsed second.
    Tick,
    Build { kind: StructureKind },
    FindCreature,
    Feed { id: CreatureId },
    Calm { id: CreatureId },
    Walk { id: CreatureId },
    Raid { daily: bool },
}

impl Action {
    /// Whether this action can move taming progress.
    pub fn affects_taming(&self) -> bool {
        matches!(
            self,
            Action::Feed { .. } | Action::Calm { .. } | Action::Walk { .. }
        )
    }
}
