// ── Core error types ──
//
// Analysis itself never fails: degenerate scans produce degenerate but
// valid results. These errors only surface at the parsing boundary, where
// text or JSON becomes typed domain values.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Identifier errors ────────────────────────────────────────────
    #[error("Invalid BSSID '{value}': expected XX:XX:XX:XX:XX:XX")]
    InvalidBssid { value: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    pub(crate) fn invalid_bssid(value: impl Into<String>) -> Self {
        Self::InvalidBssid {
            value: value.into(),
        }
    }
}
