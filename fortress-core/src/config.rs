use crate::ledger::Resources;
use crate::raid::DEFAULT_LOG_CAPACITY;
use crate::timer::clamp_minutes;
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Session length the timer starts with, in minutes (clamped to 1-180).
    pub default_minutes: u32,
    /// How many raids the log keeps before dropping the oldest.
    pub raid_log_capacity: usize,
    /// Stock the ledger opens with.
    pub starting_stock: Resources,
    /// Focus tokens the ledger opens with.
    pub starting_tokens: u32,
    /// Seed for a reproducible random source. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_minutes: 25,
            raid_log_capacity: DEFAULT_LOG_CAPACITY,
            starting_stock: Resources::default(),
            starting_tokens: 0,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Pull out-of-range values back into range.
    pub fn normalized(mut self) -> Self {
        self.default_minutes = clamp_minutes(i64::from(self.default_minutes));
        self.raid_log_capacity = self.raid_log_capacity.max(1);
        self
    }
}
