use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration from pitstop.toml. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub undo: UndoConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Date reminders due within this many days are "due soon"
    #[serde(default = "default_soon_days")]
    pub soon_days: i64,
    /// Mileage reminders due within this many miles are "due soon"
    #[serde(default = "default_soon_miles")]
    pub soon_miles: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            soon_days: default_soon_days(),
            soon_miles: default_soon_miles(),
        }
    }
}

fn default_soon_days() -> i64 {
    30
}

fn default_soon_miles() -> u32 {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoConfig {
    /// How long a deleted record can be restored
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for UndoConfig {
    fn default() -> Self {
        UndoConfig {
            window_secs: default_window_secs(),
        }
    }
}

impl UndoConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn default_window_secs() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Symbol prefixed to amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "$".to_string()
}
