//! Scanner output parsing.
//!
//! Understands the text printed by `iw dev <if> scan` and `iw dev <if> link`,
//! and the JSON forms of the same records. Nothing here runs the scanner.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{ApObservation, Bssid, ConnectionEvent, CurrentConnection, HIDDEN_SSID, NO_SIGNAL_DBM};

// ── iw scan ─────────────────────────────────────────────────────────

/// Fields collected for one `BSS` block.
#[derive(Debug)]
struct BlockBuilder {
    bssid: Bssid,
    ssid: Option<String>,
    frequency_mhz: Option<u32>,
    signal_dbm: Option<i32>,
    capabilities: BTreeSet<String>,
}

impl BlockBuilder {
    fn new(bssid: Bssid) -> Self {
        Self {
            bssid,
            ssid: None,
            frequency_mhz: None,
            signal_dbm: None,
            capabilities: BTreeSet::new(),
        }
    }

    fn apply(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix("SSID:") {
            let ssid = rest.trim();
            self.ssid = Some(if ssid.is_empty() {
                HIDDEN_SSID.to_owned()
            } else {
                ssid.to_owned()
            });
        } else if let Some(rest) = line.strip_prefix("freq:") {
            if let Some(freq) = leading_number(rest).and_then(|n| n.parse::<f64>().ok()) {
                self.frequency_mhz = Some(truncate_to::<u32>(freq));
            }
        } else if let Some(rest) = line.strip_prefix("signal:") {
            if let Some(signal) = leading_number(rest).and_then(|n| n.parse::<f64>().ok()) {
                self.signal_dbm = Some(truncate_to::<i32>(signal));
            }
        } else if let Some(rest) = line.strip_prefix("capability:") {
            self.capabilities.extend(
                rest.split_whitespace()
                    .take_while(|flag| !flag.starts_with('('))
                    .map(str::to_owned),
            );
        }
    }

    fn finish(self, seen_at: DateTime<Utc>) -> ApObservation {
        ApObservation {
            ssid: self.ssid.unwrap_or_else(|| HIDDEN_SSID.to_owned()),
            bssid: self.bssid,
            frequency_mhz: self.frequency_mhz.unwrap_or(0),
            signal_dbm: self.signal_dbm.unwrap_or(NO_SIGNAL_DBM),
            capabilities: self.capabilities,
            last_seen: seen_at,
        }
    }
}

/// Leading `-?digits[.digits]` of a field value.
fn leading_number(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(value.len(), |(i, _)| i);
    let number = &value[..end];
    (!number.is_empty() && number != "-").then_some(number)
}

/// Truncate toward zero, saturating at the target's bounds.
fn truncate_to<T>(value: f64) -> T
where
    T: TryFrom<i64> + Default,
{
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let whole = value.trunc() as i64;
    T::try_from(whole).unwrap_or_default()
}

/// First 17 characters after `BSS `, uppercased, as a BSSID.
fn block_bssid(header: &str) -> Option<Bssid> {
    let candidate: String = header.trim().chars().take(17).collect();
    candidate.to_ascii_uppercase().parse().ok()
}

/// Parse `iw dev <if> scan` output into observations stamped `seen_at`.
///
/// Blocks with a malformed BSSID are skipped, as are hidden networks. When a
/// BSSID appears twice the later block wins but keeps the earlier position.
pub fn parse_iw_scan(text: &str, seen_at: DateTime<Utc>) -> Vec<ApObservation> {
    let mut seen: IndexMap<Bssid, ApObservation> = IndexMap::new();
    let mut current: Option<BlockBuilder> = None;
    let mut skipped = 0_usize;

    let flush = |block: Option<BlockBuilder>, seen: &mut IndexMap<Bssid, ApObservation>| {
        if let Some(block) = block {
            let obs = block.finish(seen_at);
            if obs.is_hidden() {
                debug!(bssid = %obs.bssid, "dropping hidden network");
            } else {
                seen.insert(obs.bssid, obs);
            }
        }
    };

    for raw in text.lines() {
        let line = raw.trim();
        // Headers start at column 0; indented `BSS Load:` lines are fields.
        if let Some(header) = raw.strip_prefix("BSS ") {
            flush(current.take(), &mut seen);
            current = block_bssid(header).map(BlockBuilder::new);
            if current.is_none() {
                skipped += 1;
                debug!(header, "skipping block with malformed BSSID");
            }
        } else if let Some(block) = current.as_mut() {
            block.apply(line);
        }
    }
    flush(current.take(), &mut seen);

    info!(networks = seen.len(), skipped, "parsed iw scan output");
    seen.into_values().collect()
}

// ── iw link ─────────────────────────────────────────────────────────

/// Parse `iw dev <if> link` output.
///
/// Returns `None` when not associated or when the BSSID, SSID or frequency
/// is missing or malformed. A missing signal reads as −100 dBm.
pub fn parse_iw_link(text: &str) -> Option<CurrentConnection> {
    let mut bssid = None;
    let mut ssid = None;
    let mut frequency_mhz = None;
    let mut signal_dbm = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Connected to ") {
            bssid = block_bssid(rest);
            if bssid.is_none() {
                debug!(line, "malformed BSSID in link output");
                return None;
            }
        } else if let Some(rest) = line.strip_prefix("SSID:") {
            ssid = Some(rest.trim().to_owned());
        } else if let Some(rest) = line.strip_prefix("freq:") {
            frequency_mhz = leading_number(rest)
                .and_then(|n| n.parse::<f64>().ok())
                .map(truncate_to::<u32>);
        } else if let Some(rest) = line.strip_prefix("signal:") {
            signal_dbm = leading_number(rest)
                .and_then(|n| n.parse::<f64>().ok())
                .map(truncate_to::<i32>);
        }
    }

    Some(CurrentConnection {
        ssid: ssid?,
        bssid: bssid?,
        frequency_mhz: frequency_mhz?,
        signal_dbm: signal_dbm.unwrap_or(NO_SIGNAL_DBM),
    })
}

// ── Grouping and JSON ───────────────────────────────────────────────

/// Group observations by SSID (sorted), dropping hidden networks.
pub fn group_by_ssid(observations: &[ApObservation]) -> BTreeMap<String, Vec<ApObservation>> {
    let mut groups: BTreeMap<String, Vec<ApObservation>> = BTreeMap::new();
    for obs in observations.iter().filter(|o| !o.is_hidden()) {
        groups.entry(obs.ssid.clone()).or_default().push(obs.clone());
    }
    groups
}

fn decode<T: DeserializeOwned>(what: &'static str, json: &str) -> Result<T, CoreError> {
    serde_json::from_str(json).map_err(|source| CoreError::Decode { what, source })
}

/// Decode a JSON array of scan observations.
pub fn observations_from_json(json: &str) -> Result<Vec<ApObservation>, CoreError> {
    decode("scan observations", json)
}

/// Decode a JSON array of connection events.
pub fn events_from_json(json: &str) -> Result<Vec<ConnectionEvent>, CoreError> {
    decode("connection events", json)
}

/// Decode a single current-connection object.
pub fn connection_from_json(json: &str) -> Result<CurrentConnection, CoreError> {
    decode("current connection", json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const SCAN: &str = "\
BSS aa:bb:cc:11:22:30(on wlan0)
\tlast seen: 120 ms ago
\tfreq: 2412
\tbeacon interval: 100 TUs
\tcapability: ESS Privacy ShortSlotTime (0x0431)
\tBSS Load:
\t\t * station count: 3
\tsignal: -41.00 dBm
\tSSID: Home
BSS zz:bb:cc:11:22:31(on wlan0)
\tfreq: 5180
\tsignal: -44.00 dBm
\tSSID: Home
BSS aa:bb:cc:11:22:40(on wlan0)
\tfreq: 5500
\tsignal: -67.50 dBm
\tSSID:
BSS 11:22:33:44:55:66(on wlan0)
\tfreq: 2437
\tsignal: -70.00 dBm
\tSSID: Neighbor
BSS aa:bb:cc:11:22:30(on wlan0)
\tfreq: 2412
\tsignal: -39.00 dBm
\tSSID: Home
";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn scan_skips_malformed_and_hidden_blocks() {
        let observations = parse_iw_scan(SCAN, now());
        let bssids: Vec<String> = observations.iter().map(|o| o.bssid.to_string()).collect();
        assert_eq!(bssids, ["AA:BB:CC:11:22:30", "11:22:33:44:55:66"]);
    }

    #[test]
    fn duplicate_bssid_keeps_last_block_in_first_position() {
        let observations = parse_iw_scan(SCAN, now());
        let home = &observations[0];
        assert_eq!(home.signal_dbm, -39);
        assert_eq!(home.ssid, "Home");
        // The later block carried no capability line.
        assert!(home.capabilities.is_empty());
        assert_eq!(home.last_seen, now());
    }

    #[test]
    fn scan_fields_and_defaults() {
        let text = "BSS aa:bb:cc:00:00:01(on wlan0)\n\tcapability: ESS Privacy (0x0011)\n\tsignal: -67.90 dBm\n\tSSID: Lab\nBSS aa:bb:cc:00:00:02\n\tfreq: 5745.0\n\tSSID: Lab\n";
        let observations = parse_iw_scan(text, now());
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].frequency_mhz, 0);
        assert_eq!(observations[0].signal_dbm, -67);
        assert_eq!(
            observations[0].capabilities.iter().collect::<Vec<_>>(),
            ["ESS", "Privacy"]
        );
        assert_eq!(observations[1].frequency_mhz, 5745);
        assert_eq!(observations[1].signal_dbm, NO_SIGNAL_DBM);
    }

    #[test]
    fn block_without_ssid_is_hidden() {
        let observations = parse_iw_scan("BSS aa:bb:cc:00:00:01\n\tfreq: 2412\n", now());
        assert!(observations.is_empty());
        assert!(parse_iw_scan("", now()).is_empty());
    }

    #[test]
    fn link_output_parses() {
        let text = "Connected to aa:bb:cc:11:22:31 (on wlan0)\n\tSSID: Home\n\tfreq: 5180\n\tRX: 1 bytes\n\tsignal: -52 dBm\n";
        let link = parse_iw_link(text).unwrap();
        assert_eq!(link.bssid.to_string(), "AA:BB:CC:11:22:31");
        assert_eq!(link.ssid, "Home");
        assert_eq!(link.frequency_mhz, 5180);
        assert_eq!(link.signal_dbm, -52);
    }

    #[test]
    fn link_output_rejects_incomplete_records() {
        assert!(parse_iw_link("Not connected.\n").is_none());
        assert!(parse_iw_link("Connected to aa:bb:cc:11:22:31\n\tSSID: Home\n").is_none());
        assert!(parse_iw_link("Connected to aa-bb-cc-11-22-31\n\tSSID: Home\n\tfreq: 2412\n").is_none());
        let no_signal = parse_iw_link("Connected to aa:bb:cc:11:22:31\n\tSSID: Home\n\tfreq: 2412\n").unwrap();
        assert_eq!(no_signal.signal_dbm, NO_SIGNAL_DBM);
    }

    #[test]
    fn grouping_sorts_ssids_and_drops_hidden() {
        let mut observations = parse_iw_scan(SCAN, now());
        let mut hidden = observations[0].clone();
        hidden.ssid = HIDDEN_SSID.to_owned();
        observations.push(hidden);
        let groups = group_by_ssid(&observations);
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["Home", "Neighbor"]);
        assert_eq!(groups["Home"].len(), 1);
    }

    #[test]
    fn json_decode_errors_name_the_payload() {
        let err = observations_from_json("{\"not\": \"a list\"}").unwrap_err();
        assert!(err.to_string().contains("scan observations"));
        let events = events_from_json(
            r#"[{"timestamp":"2026-01-01T00:00:00Z","bssid":"AA:BB:CC:11:22:30","event_type":"connect"}]"#,
        )
        .unwrap();
        assert_eq!(events[0].signal, NO_SIGNAL_DBM);
    }
}
