//! Topology analysis handler.

use serde::Serialize;
use tabled::Tabled;

use meshscope_core::scan::group_by_ssid;
use meshscope_core::{
    BrandTable, MeshReport, OverlapGrade, Severity, SignalQuality, TopologyClass,
    TopologyClassifier, TopologyResult,
};

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::config::{Config, OutputSettings};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

/// One analyzed SSID.
#[derive(Debug, Serialize)]
pub struct SsidTopology {
    pub ssid: String,
    pub topology: TopologyResult,
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Nodes")]
    nodes: usize,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Score")]
    score: String,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    label: String,
    #[tabled(rename = "Bands")]
    bands: String,
    #[tabled(rename = "Radios")]
    radios: usize,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Radius")]
    radius: String,
}

fn summary_row(entry: &SsidTopology, color: bool) -> SummaryRow {
    let (brand, health, score) = match &entry.topology {
        TopologyResult::SingleAp(r) => (
            "-".to_owned(),
            r.signal_quality
                .map_or_else(|| "-".to_owned(), |q| paint_quality(q, color)),
            "-".to_owned(),
        ),
        TopologyResult::MultipleAps(r) => (
            "-".to_owned(),
            paint_quality(r.signal_quality, color),
            "-".to_owned(),
        ),
        TopologyResult::Mesh(r) => {
            let score = r.coverage_analysis.coverage_quality_score;
            (
                r.brand.clone(),
                paint_class(r.topology_health, color),
                output::paint(
                    &score.to_string(),
                    output::score_tone(f64::from(score)),
                    color,
                ),
            )
        }
    };
    SummaryRow {
        ssid: entry.ssid.clone(),
        kind: entry.topology.kind().to_string(),
        nodes: entry.topology.node_count(),
        brand,
        health,
        score,
    }
}

fn paint_quality(quality: SignalQuality, color: bool) -> String {
    let tone = match quality {
        SignalQuality::Excellent | SignalQuality::Good => Tone::Good,
        SignalQuality::Fair => Tone::Warn,
        SignalQuality::Poor => Tone::Bad,
    };
    output::paint(&quality.to_string(), tone, color)
}

fn paint_class(class: TopologyClass, color: bool) -> String {
    let tone = match class {
        TopologyClass::ExcellentTopology | TopologyClass::GoodTopology => Tone::Good,
        TopologyClass::BasicTopology => Tone::Warn,
        TopologyClass::TopologyIssues => Tone::Bad,
    };
    output::paint(&class.to_string(), tone, color)
}

fn paint_severity(severity: Severity, color: bool) -> String {
    let tone = match severity {
        Severity::High => Tone::Bad,
        Severity::Medium => Tone::Warn,
        Severity::Low => Tone::Neutral,
    };
    output::paint(&severity.to_string(), tone, color)
}

fn node_rows(report: &MeshReport) -> Vec<NodeRow> {
    let venn_nodes = &report.venn_analysis.venn_diagram.nodes;
    report
        .mesh_nodes
        .iter()
        .enumerate()
        .map(|(i, node)| NodeRow {
            label: node.label(),
            bands: node
                .bands()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            radios: node.radios().len(),
            signal: format!("{} dBm", node.strongest_signal()),
            radius: venn_nodes
                .get(i)
                .map_or_else(|| "-".into(), |v| v.radius.to_string()),
        })
        .collect()
}

// ── Detail view ─────────────────────────────────────────────────────

fn mesh_detail(ssid: &str, report: &MeshReport, color: bool) -> String {
    let coverage = &report.coverage_analysis;
    let overlap = &report.venn_analysis.overlap_quality;
    let overlap_tone = match overlap.quality {
        OverlapGrade::Excellent | OverlapGrade::Good => Tone::Good,
        OverlapGrade::Fair => Tone::Warn,
        OverlapGrade::Poor => Tone::Bad,
        OverlapGrade::SingleNode | OverlapGrade::NoData => Tone::Neutral,
    };

    let mut lines = vec![
        String::new(),
        format!("── {ssid} ──"),
        format!("Brand:        {}", report.brand),
        format!("Mesh type:    {}", report.mesh_type),
        format!(
            "Nodes:        {} ({} radios)",
            report.total_nodes, report.total_radios
        ),
        format!("Signal range: {} dB", report.signal_range),
        format!("Health:       {}", paint_class(report.topology_health, color)),
        format!("Coverage:     {}", report.coverage_reason),
        format!(
            "Overlap:      {} ({})",
            output::paint(&overlap.quality.to_string(), overlap_tone, color),
            overlap.description
        ),
        format!("Distribution: {}", coverage.spatial_distribution),
        String::new(),
        output::render_table(&node_rows(report)),
    ];

    if !coverage.coverage_issues.is_empty() {
        lines.push(String::new());
        lines.push("Issues:".into());
        for issue in &coverage.coverage_issues {
            lines.push(format!(
                "  [{}] {}: {}",
                paint_severity(issue.severity, color),
                issue.kind,
                issue.details
            ));
            lines.push(format!("         {}", issue.impact));
        }
    }

    lines.push(String::new());
    lines.push("Recommendations:".into());
    for rec in &coverage.recommendations {
        lines.push(format!("  - {rec}"));
    }
    lines.join("\n")
}

fn table_view(entries: &[SsidTopology], color: bool) -> String {
    let rows: Vec<SummaryRow> = entries.iter().map(|e| summary_row(e, color)).collect();
    let mut out = output::render_table(&rows);
    for entry in entries {
        if let Some(mesh) = entry.topology.as_mesh() {
            out.push('\n');
            out.push_str(&mesh_detail(&entry.ssid, mesh, color));
        }
    }
    out
}

fn plain_line(entry: &SsidTopology) -> String {
    format!(
        "{}\t{}\t{}",
        entry.ssid,
        entry.topology.kind(),
        entry.topology.node_count()
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &AnalyzeArgs, cfg: &Config, settings: OutputSettings) -> Result<(), CliError> {
    let venn = cfg.venn.to_calculator()?;
    let classifier = TopologyClassifier::new(BrandTable::builtin()).with_venn(venn);

    let observations = util::load_scan(&args.input, args.input_format)?;
    let mut groups = group_by_ssid(&observations);

    if let Some(ssid) = &args.ssid {
        if !groups.contains_key(ssid) {
            return Err(CliError::SsidNotFound {
                ssid: ssid.clone(),
                available: if groups.is_empty() {
                    "(none)".into()
                } else {
                    groups.keys().cloned().collect::<Vec<_>>().join(", ")
                },
            });
        }
        groups.retain(|name, _| name == ssid);
    }

    let entries: Vec<SsidTopology> = groups
        .into_iter()
        .map(|(ssid, aps)| SsidTopology {
            topology: classifier.classify(&aps),
            ssid,
        })
        .collect();
    tracing::info!(ssids = entries.len(), "analyzed scan");

    let rendered = match settings.format {
        OutputFormat::Table if entries.is_empty() => "No visible networks in scan.".to_owned(),
        OutputFormat::Table => table_view(&entries, settings.color),
        format => output::render_list(format, &entries, |e| summary_row(e, false), plain_line)?,
    };
    output::print_output(&rendered, settings.quiet);
    Ok(())
}
