//! Connection pattern handler.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tabled::Tabled;

use meshscope_core::{BssidHistory, ConnectionPatterns, HistoryTracker, detect_patterns};

use crate::cli::{OutputFormat, PatternsArgs};
use crate::config::{Config, OutputSettings};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

#[derive(Debug, Serialize)]
pub struct PatternsReport {
    pub window_hours: u32,
    pub now: DateTime<Utc>,
    pub events_in_window: usize,
    pub patterns: ConnectionPatterns,
    pub histories: Vec<BssidHistory>,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "Connects")]
    connects: u32,
    #[tabled(rename = "Auth Fail")]
    auth_failures: u32,
    #[tabled(rename = "Disconnects")]
    disconnects: u32,
    #[tabled(rename = "Avg Signal")]
    avg_signal: String,
    #[tabled(rename = "Stability")]
    stability: String,
}

impl HistoryRow {
    fn new(h: &BssidHistory, color: bool) -> Self {
        Self {
            bssid: h.bssid.to_string(),
            connects: h.successful_connections,
            auth_failures: h.auth_failures,
            disconnects: h.disconnects,
            avg_signal: if h.signal_samples.is_empty() {
                "-".into()
            } else {
                format!("{:.1} dBm", h.avg_signal)
            },
            stability: output::paint(
                &format!("{:.0}", h.stability_score),
                output::score_tone(h.stability_score),
                color,
            ),
        }
    }
}

fn pattern_lines(p: &ConnectionPatterns) -> Vec<String> {
    let mut lines = Vec::new();
    for l in &p.roaming_loops {
        lines.push(format!(
            "roaming loop      {} <-> {} within {:.0}s from {}",
            l.bssids[0],
            l.bssids[1],
            l.time_span,
            l.start_time.to_rfc3339()
        ));
    }
    for c in &p.auth_failure_clusters {
        lines.push(format!(
            "auth failures     {}: {} in {:.0}s from {}",
            c.bssid,
            c.failure_count,
            c.time_span,
            c.start_time.to_rfc3339()
        ));
    }
    for r in &p.rapid_disconnects {
        lines.push(format!(
            "rapid reconnect   {}: back after {:.0}s",
            r.bssid, r.cycle_duration
        ));
    }
    for h in &p.time_based_issues {
        let kinds: Vec<String> = h.problem_types.iter().map(ToString::to_string).collect();
        lines.push(format!(
            "busy hour         {:02}:00 UTC: {} problems ({}) on {} BSSIDs",
            h.hour,
            h.problem_count,
            kinds.join(", "),
            h.affected_bssids.len()
        ));
    }
    for b in &p.bssid_specific_problems {
        lines.push(format!(
            "problem BSSID     {}: {} problems ({} auth, {} disconnect), {:.0}% of events",
            b.bssid,
            b.total_problems,
            b.auth_failures,
            b.disconnects,
            b.problem_rate * 100.0
        ));
    }
    lines
}

fn detail(report: &PatternsReport, color: bool) -> String {
    let mut lines = vec![format!(
        "{} events in the {}h before {}",
        report.events_in_window,
        report.window_hours,
        report.now.to_rfc3339()
    )];
    if !report.histories.is_empty() {
        let rows: Vec<HistoryRow> = report
            .histories
            .iter()
            .map(|h| HistoryRow::new(h, color))
            .collect();
        lines.push(output::render_table(&rows));
    }
    if report.patterns.is_empty() {
        lines.push(output::paint("No problem patterns detected.", Tone::Good, color));
    } else {
        lines.push(output::paint("Patterns:", Tone::Warn, color));
        lines.extend(pattern_lines(&report.patterns).into_iter().map(|l| format!("  {l}")));
    }
    lines.join("\n")
}

fn plain(report: &PatternsReport) -> String {
    pattern_lines(&report.patterns).join("\n")
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, CliError> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: "now".into(),
            reason: format!("expected an RFC 3339 timestamp: {e}"),
        })
}

pub fn handle(args: &PatternsArgs, cfg: &Config, settings: OutputSettings) -> Result<(), CliError> {
    let window_hours = args.window_hours.unwrap_or(cfg.patterns.window_hours);
    if window_hours == 0 {
        return Err(CliError::Validation {
            field: "window-hours".into(),
            reason: "must be at least 1".into(),
        });
    }
    let now = parse_now(args.now.as_deref())?;

    let all = HistoryTracker::from_events(util::load_events(&args.events)?);
    let recent = all.recent_events(TimeDelta::hours(i64::from(window_hours)), now);
    let patterns = detect_patterns(&recent);
    let window = HistoryTracker::from_events(recent);
    tracing::info!(
        total = all.events().len(),
        in_window = window.events().len(),
        "analyzed connection events"
    );

    let report = PatternsReport {
        window_hours,
        now,
        events_in_window: window.events().len(),
        patterns,
        histories: window.histories().cloned().collect(),
    };
    let rendered = match settings.format {
        OutputFormat::Table => detail(&report, settings.color),
        format => output::render_single(format, &report, |r| detail(r, false), plain)?,
    };
    output::print_output(&rendered, settings.quiet);
    Ok(())
}
