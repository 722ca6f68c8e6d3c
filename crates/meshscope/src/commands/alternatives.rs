//! Roaming candidate handler.

use serde::Serialize;
use tabled::Tabled;

use meshscope_core::{
    Alternative, CurrentConnection, HistoryTracker, SwitchAdvice, Verdict, rank_alternatives,
    switch_advice,
};

use crate::cli::{AlternativesArgs, OutputFormat};
use crate::config::{Config, OutputSettings};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

/// Everything the command reports.
#[derive(Debug, Serialize)]
pub struct AlternativesReport {
    pub current: CurrentConnection,
    pub alternatives: Vec<Alternative>,
    pub advice: SwitchAdvice,
}

#[derive(Tabled)]
struct AlternativeRow {
    #[tabled(rename = "BSSID")]
    bssid: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Diff")]
    diff: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Verdict")]
    verdict: String,
    #[tabled(rename = "Reasons")]
    reasons: String,
}

impl AlternativeRow {
    fn new(alt: &Alternative, color: bool) -> Self {
        let tone = match alt.recommendation {
            Verdict::Excellent | Verdict::Good => Tone::Good,
            Verdict::Fair => Tone::Warn,
            Verdict::Poor => Tone::Bad,
        };
        Self {
            bssid: alt.bssid.to_string(),
            band: alt.band.to_string(),
            signal: format!("{} dBm", alt.signal),
            diff: format!("{:+}", alt.signal_diff),
            score: format!("{:.1}", alt.score),
            verdict: output::paint(&alt.recommendation.to_string(), tone, color),
            reasons: alt.reasons.join("; "),
        }
    }
}

fn detail(report: &AlternativesReport, color: bool) -> String {
    let current = &report.current;
    let mut lines = vec![format!(
        "Connected: {} ({}) on {} at {} dBm",
        current.ssid,
        current.bssid,
        current.band(),
        current.signal_dbm
    )];

    if report.alternatives.is_empty() {
        lines.push("No other radios of this SSID in the scan.".into());
    } else {
        let rows: Vec<AlternativeRow> = report
            .alternatives
            .iter()
            .map(|a| AlternativeRow::new(a, color))
            .collect();
        lines.push(output::render_table(&rows));
    }

    let advice = &report.advice;
    let verdict = if advice.action_recommended {
        output::paint("switch", Tone::Good, color)
    } else {
        output::paint("stay", Tone::Neutral, color)
    };
    let mut advice_line = format!("Advice: {verdict} ({})", advice.reason);
    if let (Some(target), Some(gain)) = (advice.target_bssid, advice.signal_improvement) {
        advice_line.push_str(&format!(" -> {target}, {gain:+} dB"));
    }
    if let Some(priority) = advice.priority {
        advice_line.push_str(&format!(" [{priority}]"));
    }
    lines.push(advice_line);
    lines.join("\n")
}

fn plain(report: &AlternativesReport) -> String {
    report
        .alternatives
        .iter()
        .map(|a| format!("{}\t{:.1}\t{}", a.bssid, a.score, a.recommendation))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle(
    args: &AlternativesArgs,
    cfg: &Config,
    settings: OutputSettings,
) -> Result<(), CliError> {
    let limit = args.limit.unwrap_or(cfg.alternatives.limit);
    if limit == 0 {
        return Err(CliError::Validation {
            field: "limit".into(),
            reason: "must be at least 1".into(),
        });
    }

    let scan = util::load_scan(&args.scan, args.input_format)?;
    let current = util::load_link(&args.link, args.input_format)?;
    let history = match &args.events {
        Some(path) => HistoryTracker::from_events(util::load_events(path)?),
        None => HistoryTracker::new(),
    };

    let alternatives = rank_alternatives(&current, &scan, &history, limit);
    let advice = switch_advice(&current, &alternatives);
    tracing::info!(
        ssid = %current.ssid,
        candidates = alternatives.len(),
        switch = advice.action_recommended,
        "ranked alternatives"
    );

    let report = AlternativesReport {
        current,
        alternatives,
        advice,
    };
    let rendered = match settings.format {
        OutputFormat::Table => detail(&report, settings.color),
        format => output::render_single(format, &report, |r| detail(r, false), plain)?,
    };
    output::print_output(&rendered, settings.quiet);
    Ok(())
}
