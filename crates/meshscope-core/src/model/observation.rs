// ── Scan observation types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};

use super::bssid::Bssid;

/// SSID literal used for networks that do not broadcast a name.
pub const HIDDEN_SSID: &str = "<hidden>";

/// Frequency band, derived from a radio's center frequency.
///
/// Declaration order is the sort order used whenever bands are emitted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    #[strum(serialize = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    #[strum(serialize = "5GHz")]
    Ghz5,
    #[serde(rename = "6GHz")]
    #[strum(serialize = "6GHz")]
    Ghz6,
    #[serde(rename = "other")]
    #[strum(serialize = "other")]
    Other,
}

impl Band {
    pub fn from_frequency(mhz: u32) -> Self {
        match mhz {
            2400..=2500 => Self::Ghz2_4,
            5000..=5999 => Self::Ghz5,
            6000..=7125 => Self::Ghz6,
            _ => Self::Other,
        }
    }
}

/// One scanned radio at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApObservation {
    pub ssid: String,
    pub bssid: Bssid,
    #[serde(rename = "freq")]
    pub frequency_mhz: u32,
    #[serde(rename = "signal")]
    pub signal_dbm: i32,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    pub last_seen: DateTime<Utc>,
}

impl ApObservation {
    pub fn band(&self) -> Band {
        Band::from_frequency(self.frequency_mhz)
    }

    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty() || self.ssid == HIDDEN_SSID
    }
}

/// The link the scanning interface is currently associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConnection {
    pub ssid: String,
    pub bssid: Bssid,
    #[serde(rename = "freq")]
    pub frequency_mhz: u32,
    #[serde(rename = "signal")]
    pub signal_dbm: i32,
}

impl CurrentConnection {
    pub fn band(&self) -> Band {
        Band::from_frequency(self.frequency_mhz)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn band_ranges_are_inclusive() {
        assert_eq!(Band::from_frequency(2400), Band::Ghz2_4);
        assert_eq!(Band::from_frequency(2437), Band::Ghz2_4);
        assert_eq!(Band::from_frequency(2500), Band::Ghz2_4);
        assert_eq!(Band::from_frequency(2501), Band::Other);
        assert_eq!(Band::from_frequency(5000), Band::Ghz5);
        assert_eq!(Band::from_frequency(5999), Band::Ghz5);
        assert_eq!(Band::from_frequency(6000), Band::Ghz6);
        assert_eq!(Band::from_frequency(7125), Band::Ghz6);
        assert_eq!(Band::from_frequency(7126), Band::Other);
        assert_eq!(Band::from_frequency(0), Band::Other);
    }

    #[test]
    fn band_labels() {
        assert_eq!(Band::Ghz2_4.to_string(), "2.4GHz");
        assert_eq!("6GHz".parse::<Band>().unwrap(), Band::Ghz6);
        assert_eq!(serde_json::to_string(&Band::Ghz5).unwrap(), "\"5GHz\"");
    }

    #[test]
    fn observation_deserializes_from_scanner_json() {
        let json = r#"{
            "ssid": "Home",
            "bssid": "AA:BB:CC:11:22:30",
            "freq": 5180,
            "signal": -52,
            "capabilities": ["Privacy", "ESS"],
            "last_seen": "2026-01-01T12:00:00Z"
        }"#;
        let obs: ApObservation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.band(), Band::Ghz5);
        assert_eq!(obs.signal_dbm, -52);
        let back = serde_json::to_value(&obs).unwrap();
        assert_eq!(back["capabilities"], serde_json::json!(["ESS", "Privacy"]));
    }

    #[test]
    fn observation_rejects_malformed_bssid() {
        let json = r#"{"ssid":"Home","bssid":"aa-bb-cc-11-22-30","freq":2412,"signal":-40,"last_seen":"2026-01-01T12:00:00Z"}"#;
        assert!(serde_json::from_str::<ApObservation>(json).is_err());
    }
}
