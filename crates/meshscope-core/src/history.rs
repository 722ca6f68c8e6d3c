//! Per-BSSID connection history and stability scoring.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::trace;

use crate::model::{Bssid, ConnectionEvent, EventType, NO_SIGNAL_DBM};

/// Signal samples retained per BSSID.
pub const MAX_SIGNAL_SAMPLES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalSample {
    pub timestamp: DateTime<Utc>,
    pub signal: i32,
}

/// Aggregated history of one BSSID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BssidHistory {
    pub bssid: Bssid,
    pub total_connections: u32,
    pub successful_connections: u32,
    /// Seconds of link uptime reported by disconnect events.
    pub total_duration: f64,
    pub avg_signal: f64,
    pub signal_samples: VecDeque<SignalSample>,
    pub auth_failures: u32,
    pub disconnects: u32,
    pub last_seen: Option<DateTime<Utc>>,
    /// 0–100, higher is better.
    pub stability_score: f64,
}

impl BssidHistory {
    pub fn new(bssid: Bssid) -> Self {
        Self {
            bssid,
            total_connections: 0,
            successful_connections: 0,
            total_duration: 0.0,
            avg_signal: 0.0,
            signal_samples: VecDeque::new(),
            auth_failures: 0,
            disconnects: 0,
            last_seen: None,
            stability_score: 0.0,
        }
    }

    fn apply(&mut self, event: &ConnectionEvent) {
        self.last_seen = Some(event.timestamp);
        match event.event_type {
            EventType::Connect => {
                self.total_connections += 1;
                self.successful_connections += 1;
            }
            EventType::AuthTimeout => self.auth_failures += 1,
            EventType::Disconnect => {
                self.disconnects += 1;
                if let Some(duration) = event.duration {
                    self.total_duration += duration;
                }
            }
        }

        if event.signal != NO_SIGNAL_DBM {
            if self.signal_samples.len() == MAX_SIGNAL_SAMPLES {
                self.signal_samples.pop_front();
            }
            self.signal_samples.push_back(SignalSample {
                timestamp: event.timestamp,
                signal: event.signal,
            });
            let sum: f64 = self
                .signal_samples
                .iter()
                .map(|s| f64::from(s.signal))
                .sum();
            #[allow(clippy::cast_precision_loss)]
            let count = self.signal_samples.len() as f64;
            self.avg_signal = sum / count;
        }

        self.stability_score = self.compute_stability();
    }

    /// Score from 100, penalizing auth failures, frequent disconnects,
    /// erratic signal and short sessions.
    fn compute_stability(&self) -> f64 {
        let mut score = 100.0;

        if self.total_connections > 0 {
            let attempts = f64::from(self.total_connections + self.auth_failures);
            score -= f64::from(self.auth_failures) / attempts * 50.0;
        }

        if self.successful_connections > 0 {
            let rate = f64::from(self.disconnects) / f64::from(self.successful_connections);
            score -= (rate * 30.0).min(30.0);
        }

        if self.signal_samples.len() > 5 {
            let recent = self.signal_samples.iter().rev().take(10).map(|s| s.signal);
            let (lo, hi) = recent.fold((i32::MAX, i32::MIN), |(lo, hi), s| (lo.min(s), hi.max(s)));
            let spread = hi.saturating_sub(lo);
            if spread < 10 {
                score += 10.0;
            } else if spread > 30 {
                score -= 20.0;
            }
        }

        if self.successful_connections > 0 && self.total_duration > 0.0 {
            let mean = self.total_duration / f64::from(self.successful_connections);
            if mean > 3600.0 {
                score += 15.0;
            } else if mean < 300.0 {
                score -= 15.0;
            }
        }

        score.clamp(0.0, 100.0)
    }
}

/// Event log plus per-BSSID aggregates.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    events: Vec<ConnectionEvent>,
    histories: BTreeMap<Bssid, BssidHistory>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay events in the order given.
    pub fn from_events(events: impl IntoIterator<Item = ConnectionEvent>) -> Self {
        let mut tracker = Self::new();
        for event in events {
            tracker.record_event(event);
        }
        tracker
    }

    pub fn record_event(&mut self, event: ConnectionEvent) {
        let history = self
            .histories
            .entry(event.bssid)
            .or_insert_with(|| BssidHistory::new(event.bssid));
        history.apply(&event);
        trace!(
            bssid = %event.bssid,
            event = %event.event_type,
            stability = history.stability_score,
            "recorded connection event"
        );
        self.events.push(event);
    }

    pub fn history(&self, bssid: Bssid) -> Option<&BssidHistory> {
        self.histories.get(&bssid)
    }

    /// All histories, ordered by BSSID.
    pub fn histories(&self) -> impl Iterator<Item = &BssidHistory> {
        self.histories.values()
    }

    pub fn events(&self) -> &[ConnectionEvent] {
        &self.events
    }

    /// Events strictly newer than `now - window`, in recorded order.
    pub fn recent_events(&self, window: TimeDelta, now: DateTime<Utc>) -> Vec<ConnectionEvent> {
        let cutoff = now - window;
        self.events
            .iter()
            .filter(|e| e.timestamp > cutoff)
            .cloned()
            .collect()
    }
}
