//! Problem pattern detection over connection events.
//!
//! Every detector reads the events in the order given, which is expected to
//! be chronological. Output lists are ordered deterministically: detections
//! in event order, per-BSSID and per-hour summaries sorted by key.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::Serialize;
use tracing::debug;

use crate::model::{Bssid, ConnectionEvent, EventType};

/// Seconds within which an A-B-A-B connect sequence counts as a loop.
const ROAMING_LOOP_SECS: i64 = 300;
/// Auth timeouts this close together belong to one cluster.
const AUTH_CLUSTER_GAP_SECS: i64 = 300;
const RAPID_RECONNECT_SECS: i64 = 60;
const MIN_CLUSTER_SIZE: usize = 3;
const MIN_HOURLY_PROBLEMS: usize = 5;
const MIN_BSSID_PROBLEMS: usize = 3;

#[allow(clippy::cast_precision_loss)]
fn seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Client bouncing A → B → A → B between two BSSIDs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoamingLoop {
    pub bssids: [Bssid; 2],
    pub time_span: f64,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthFailureCluster {
    pub bssid: Bssid,
    pub failure_count: usize,
    pub time_span: f64,
    pub start_time: DateTime<Utc>,
}

/// Disconnect followed almost immediately by a connect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RapidReconnect {
    pub bssid: Bssid,
    pub cycle_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyIssue {
    /// UTC hour of day, 0–23.
    pub hour: u32,
    pub problem_count: usize,
    pub problem_types: Vec<EventType>,
    pub affected_bssids: Vec<Bssid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BssidProblem {
    pub bssid: Bssid,
    pub total_problems: usize,
    pub auth_failures: usize,
    pub disconnects: usize,
    /// Share of this BSSID's events that were problems.
    pub problem_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectionPatterns {
    pub roaming_loops: Vec<RoamingLoop>,
    pub auth_failure_clusters: Vec<AuthFailureCluster>,
    pub rapid_disconnects: Vec<RapidReconnect>,
    pub time_based_issues: Vec<HourlyIssue>,
    pub bssid_specific_problems: Vec<BssidProblem>,
}

impl ConnectionPatterns {
    pub fn is_empty(&self) -> bool {
        self.roaming_loops.is_empty()
            && self.auth_failure_clusters.is_empty()
            && self.rapid_disconnects.is_empty()
            && self.time_based_issues.is_empty()
            && self.bssid_specific_problems.is_empty()
    }
}

/// Run every detector over `events`.
pub fn detect_patterns(events: &[ConnectionEvent]) -> ConnectionPatterns {
    let patterns = ConnectionPatterns {
        roaming_loops: roaming_loops(events),
        auth_failure_clusters: auth_failure_clusters(events),
        rapid_disconnects: rapid_reconnects(events),
        time_based_issues: hourly_issues(events),
        bssid_specific_problems: bssid_problems(events),
    };
    debug!(
        events = events.len(),
        loops = patterns.roaming_loops.len(),
        auth_clusters = patterns.auth_failure_clusters.len(),
        rapid = patterns.rapid_disconnects.len(),
        "connection patterns analyzed"
    );
    patterns
}

fn roaming_loops(events: &[ConnectionEvent]) -> Vec<RoamingLoop> {
    let window = TimeDelta::seconds(ROAMING_LOOP_SECS);
    let connects: Vec<&ConnectionEvent> = events
        .iter()
        .filter(|e| e.event_type == EventType::Connect)
        .collect();

    connects
        .windows(4)
        .filter_map(|w| {
            let (a, b) = (w[0].bssid, w[1].bssid);
            let span = w[3].timestamp - w[0].timestamp;
            (a != b && w[2].bssid == a && w[3].bssid == b && span < window).then(|| {
                RoamingLoop {
                    bssids: [a, b],
                    time_span: seconds(span),
                    start_time: w[0].timestamp,
                }
            })
        })
        .collect()
}

fn auth_failure_clusters(events: &[ConnectionEvent]) -> Vec<AuthFailureCluster> {
    let mut by_bssid: BTreeMap<Bssid, Vec<DateTime<Utc>>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.event_type == EventType::AuthTimeout) {
        by_bssid.entry(event.bssid).or_default().push(event.timestamp);
    }

    let max_gap = TimeDelta::seconds(AUTH_CLUSTER_GAP_SECS);
    let mut clusters = Vec::new();
    for (bssid, mut times) in by_bssid {
        if times.len() < MIN_CLUSTER_SIZE {
            continue;
        }
        times.sort_unstable();

        let mut run_start = 0;
        for i in 1..=times.len() {
            let breaks = i == times.len() || times[i] - times[i - 1] >= max_gap;
            if !breaks {
                continue;
            }
            let run = &times[run_start..i];
            if run.len() >= MIN_CLUSTER_SIZE {
                clusters.push(AuthFailureCluster {
                    bssid,
                    failure_count: run.len(),
                    time_span: seconds(run[run.len() - 1] - run[0]),
                    start_time: run[0],
                });
            }
            run_start = i;
        }
    }
    clusters
}

fn rapid_reconnects(events: &[ConnectionEvent]) -> Vec<RapidReconnect> {
    let window = TimeDelta::seconds(RAPID_RECONNECT_SECS);
    events
        .windows(2)
        .filter_map(|w| {
            let gap = w[1].timestamp - w[0].timestamp;
            (w[0].event_type == EventType::Disconnect
                && w[1].event_type == EventType::Connect
                && gap < window)
                .then(|| RapidReconnect {
                    bssid: w[0].bssid,
                    cycle_duration: seconds(gap),
                })
        })
        .collect()
}

fn hourly_issues(events: &[ConnectionEvent]) -> Vec<HourlyIssue> {
    let mut by_hour: BTreeMap<u32, Vec<&ConnectionEvent>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.event_type.is_problem()) {
        by_hour.entry(event.timestamp.hour()).or_default().push(event);
    }

    by_hour
        .into_iter()
        .filter(|(_, list)| list.len() >= MIN_HOURLY_PROBLEMS)
        .map(|(hour, list)| HourlyIssue {
            hour,
            problem_count: list.len(),
            problem_types: list
                .iter()
                .map(|e| e.event_type)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            affected_bssids: list
                .iter()
                .map(|e| e.bssid)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        })
        .collect()
}

fn bssid_problems(events: &[ConnectionEvent]) -> Vec<BssidProblem> {
    #[derive(Default)]
    struct Tally {
        total: usize,
        auth_failures: usize,
        disconnects: usize,
    }

    let mut tallies: BTreeMap<Bssid, Tally> = BTreeMap::new();
    for event in events {
        let tally = tallies.entry(event.bssid).or_default();
        tally.total += 1;
        match event.event_type {
            EventType::AuthTimeout => tally.auth_failures += 1,
            EventType::Disconnect => tally.disconnects += 1,
            EventType::Connect => {}
        }
    }

    tallies
        .into_iter()
        .filter_map(|(bssid, t)| {
            let problems = t.auth_failures + t.disconnects;
            #[allow(clippy::cast_precision_loss)]
            let rate = problems as f64 / t.total as f64;
            (problems >= MIN_BSSID_PROBLEMS).then_some(BssidProblem {
                bssid,
                total_problems: problems,
                auth_failures: t.auth_failures,
                disconnects: t.disconnects,
                problem_rate: rate,
            })
        })
        .collect()
}
