//! Roaming candidate ranking for the current connection.

use serde::Serialize;
use strum::{Display, EnumString};
use tracing::debug;

use crate::history::HistoryTracker;
use crate::model::{ApObservation, Band, Bssid, CurrentConnection};

/// Candidates returned when no limit is configured.
pub const DEFAULT_ALTERNATIVE_LIMIT: usize = 5;

const BASE_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// One scored roaming candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub bssid: Bssid,
    pub signal: i32,
    pub freq: u32,
    pub band: Band,
    pub score: f64,
    pub recommendation: Verdict,
    pub reasons: Vec<String>,
    /// Candidate signal minus current signal, in dB.
    pub signal_diff: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability_score: Option<f64>,
    /// Whether any case strong enough to justify a switch applied.
    pub compelling_reason: bool,
}

fn score_candidate(
    current: &CurrentConnection,
    ap: &ApObservation,
    history: &HistoryTracker,
) -> Alternative {
    let current_band = current.band();
    let current_signal = current.signal_dbm;
    let alt_band = ap.band();
    let diff = ap.signal_dbm.saturating_sub(current_signal);

    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    let stability = history.history(ap.bssid).map(|h| h.stability_score);
    match stability {
        Some(s) if s > 0.0 => {
            score += (s * 0.3).min(30.0);
            reasons.push(format!("Stability: {s:.0}%"));
        }
        _ => reasons.push("No historical data".to_owned()),
    }

    // First matching case wins.
    let mut compelling = true;
    if diff > 15 {
        score += 25.0;
        reasons.push(format!("Major signal boost ({diff:+}dB)"));
    } else if current_signal < -70 && diff > 5 {
        score += 20.0;
        reasons.push(format!("Escape weak signal zone ({diff:+}dB)"));
    } else if current_band == Band::Ghz2_4 && alt_band == Band::Ghz5 && ap.signal_dbm > -65 {
        score += 15.0;
        reasons.push(format!("5GHz upgrade opportunity ({}dBm)", ap.signal_dbm));
    } else if current_band == Band::Ghz6 && current_signal < -60 && diff > 10 {
        score += 10.0;
        reasons.push(format!(
            "6GHz signal marginal, better alternative ({diff:+}dB)"
        ));
    } else {
        compelling = false;
        let downgrade = match (current_band, alt_band) {
            (Band::Ghz6, Band::Ghz2_4 | Band::Ghz5) if current_signal > -60 => Some(30.0),
            (Band::Ghz5, Band::Ghz2_4) if current_signal > -65 => Some(20.0),
            _ => None,
        };
        if let Some(penalty) = downgrade {
            score -= penalty;
            reasons.push(format!("Potential speed downgrade from {current_band}"));
        } else {
            reasons.push(format!("Minimal benefit ({diff:+}dB)"));
        }
    }

    if alt_band == Band::Ghz5
        && (current_band == Band::Ghz2_4 || (current_band == Band::Ghz6 && current_signal < -65))
    {
        score += 5.0;
        reasons.push("Good speed/range balance".to_owned());
    } else if alt_band == Band::Ghz6 && current_band != Band::Ghz6 && ap.signal_dbm > -55 {
        score += 10.0;
        reasons.push("Maximum speed potential".to_owned());
    } else if alt_band == Band::Ghz2_4 && current_signal < -75 {
        score += 5.0;
        reasons.push("Better range/penetration".to_owned());
    }

    let signal = ap.signal_dbm;
    if signal > -50 {
        reasons.push(format!("Excellent signal ({signal}dBm)"));
    } else if signal > -60 {
        reasons.push(format!("Good signal ({signal}dBm)"));
    } else if signal > -70 {
        reasons.push(format!("Fair signal ({signal}dBm)"));
    } else {
        reasons.push(format!("Weak signal ({signal}dBm)"));
        score -= 15.0;
    }

    let recommendation = if compelling && score >= 120.0 {
        Verdict::Excellent
    } else if compelling && score >= 100.0 {
        Verdict::Good
    } else if score >= 90.0 {
        Verdict::Fair
    } else {
        Verdict::Poor
    };

    Alternative {
        bssid: ap.bssid,
        signal,
        freq: ap.frequency_mhz,
        band: alt_band,
        score,
        recommendation,
        reasons,
        signal_diff: diff,
        stability_score: stability,
        compelling_reason: compelling,
    }
}

/// Rank the other BSSIDs of the connected SSID, best first.
///
/// Equal scores keep scan order. At most `limit` candidates are returned.
pub fn rank_alternatives(
    current: &CurrentConnection,
    scan: &[ApObservation],
    history: &HistoryTracker,
    limit: usize,
) -> Vec<Alternative> {
    let mut ranked: Vec<Alternative> = scan
        .iter()
        .filter(|ap| ap.ssid == current.ssid && ap.bssid != current.bssid)
        .map(|ap| score_candidate(current, ap, history))
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(
        ssid = %current.ssid,
        candidates = ranked.len(),
        limit,
        "ranked roaming alternatives"
    );
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Moderate,
}

/// Whether switching to the best candidate is worth it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchAdvice {
    pub action_recommended: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bssid: Option<Bssid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_improvement: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl SwitchAdvice {
    fn stay(reason: &str) -> Self {
        Self {
            action_recommended: false,
            reason: reason.to_owned(),
            target_bssid: None,
            signal_improvement: None,
            priority: None,
        }
    }
}

/// Recommend a switch only for a compelling, high-scoring candidate that
/// improves signal or escapes a weak current link.
pub fn switch_advice(current: &CurrentConnection, ranked: &[Alternative]) -> SwitchAdvice {
    let Some(best) = ranked.first() else {
        return SwitchAdvice::stay("No beneficial alternatives found");
    };
    let worthwhile = best.compelling_reason
        && best.score > 110.0
        && (best.signal_diff > 5 || current.signal_dbm < -70);
    if !worthwhile {
        return SwitchAdvice::stay("Current connection is optimal");
    }
    SwitchAdvice {
        action_recommended: true,
        reason: "Switch to stronger radio/node".to_owned(),
        target_bssid: Some(best.bssid),
        signal_improvement: Some(best.signal_diff),
        priority: Some(if best.signal_diff > 15 {
            Priority::High
        } else {
            Priority::Moderate
        }),
    }
}
