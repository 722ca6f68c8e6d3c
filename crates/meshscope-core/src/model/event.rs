// ── Connection event types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::bssid::Bssid;

/// Signal value reported when the link's signal could not be read.
pub const NO_SIGNAL_DBM: i32 = -100;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Connect,
    Disconnect,
    AuthTimeout,
}

impl EventType {
    /// Disconnects and auth timeouts count as problems.
    pub fn is_problem(self) -> bool {
        matches!(self, Self::Disconnect | Self::AuthTimeout)
    }
}

/// One association-state change observed on the scanning interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub timestamp: DateTime<Utc>,
    pub bssid: Bssid,
    pub event_type: EventType,
    #[serde(default = "default_signal")]
    pub signal: i32,
    /// Seconds the link was up (disconnect events only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn default_signal() -> i32 {
    NO_SIGNAL_DBM
}
