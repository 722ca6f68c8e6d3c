//! Spatial coverage analysis over per-node signal strengths.
//!
//! Signals stand in for distance: a node heard at −35 dBm is assumed to be
//! close, one at −85 dBm far away. Gaps between consecutive nodes (strongest
//! first) suggest holes in coverage. None of this models RF propagation.

use serde::Serialize;
use strum::{Display, EnumString};

// ── Zones ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoverageZone {
    /// Above −50 dBm.
    Primary,
    /// −65 (exclusive) to −50 (inclusive).
    Secondary,
    /// −80 (exclusive) to −65 (inclusive).
    Tertiary,
    /// −80 dBm and below.
    Fringe,
}

impl CoverageZone {
    pub fn classify(signal_dbm: i32) -> Self {
        if signal_dbm > -50 {
            Self::Primary
        } else if signal_dbm > -65 {
            Self::Secondary
        } else if signal_dbm > -80 {
            Self::Tertiary
        } else {
            Self::Fringe
        }
    }
}

/// Node signals bucketed by zone, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageZones {
    pub primary: Vec<i32>,
    pub secondary: Vec<i32>,
    pub tertiary: Vec<i32>,
    pub fringe: Vec<i32>,
}

impl CoverageZones {
    pub fn from_signals(signals: &[i32]) -> Self {
        let mut zones = Self::default();
        for &signal in signals {
            let bucket = match CoverageZone::classify(signal) {
                CoverageZone::Primary => &mut zones.primary,
                CoverageZone::Secondary => &mut zones.secondary,
                CoverageZone::Tertiary => &mut zones.tertiary,
                CoverageZone::Fringe => &mut zones.fringe,
            };
            bucket.push(signal);
        }
        zones
    }
}

/// Rough location wording for a signal level.
pub fn distance_estimate(signal_dbm: i32) -> &'static str {
    if signal_dbm > -40 {
        "very close (same room)"
    } else if signal_dbm > -50 {
        "close (adjacent room)"
    } else if signal_dbm > -65 {
        "medium range (different floor/far room)"
    } else if signal_dbm > -80 {
        "extended range (distant area)"
    } else {
        "maximum range (basement/garage/far areas)"
    }
}

// ── Issues ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IssueKind {
    LargeCoverageGap,
    MissingIntermediateCoverage,
    NodeClustering,
    IsolatedDistantNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    fn penalty(self) -> i32 {
        match self {
            Self::High => 25,
            Self::Medium => 15,
            Self::Low => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub details: String,
    pub impact: String,
    pub location: String,
}

impl CoverageIssue {
    fn new(
        kind: IssueKind,
        severity: Severity,
        details: impl Into<String>,
        impact: &str,
        location: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            details: details.into(),
            impact: impact.to_owned(),
            location: location.into(),
        }
    }

    fn recommendation(&self) -> String {
        match self.kind {
            IssueKind::LargeCoverageGap => format!(
                "Consider adding a node in {} to eliminate coverage gap",
                self.location
            ),
            IssueKind::MissingIntermediateCoverage => {
                "Add intermediate nodes for smoother coverage transitions".to_owned()
            }
            IssueKind::NodeClustering => {
                "Consider relocating some nodes for better spatial distribution".to_owned()
            }
            IssueKind::IsolatedDistantNode => {
                "Add intermediate nodes to bridge coverage to distant areas".to_owned()
            }
        }
    }
}

fn detect_issues(sorted: &[i32], gaps: &[i32], zones: &CoverageZones) -> Vec<CoverageIssue> {
    let mut issues = Vec::new();

    for (i, (&gap, pair)) in gaps.iter().zip(sorted.windows(2)).enumerate() {
        if gap <= 25 {
            continue;
        }
        let (near, far) = (pair[0], pair[1]);
        issues.push(CoverageIssue::new(
            IssueKind::LargeCoverageGap,
            if gap > 35 { Severity::High } else { Severity::Medium },
            format!(
                "{gap}dB gap between node {} ({near}dBm) and node {} ({far}dBm)",
                i + 1,
                i + 2
            ),
            "Potential dead zone or weak coverage area",
            format!(
                "Between {} and {}",
                distance_estimate(near),
                distance_estimate(far)
            ),
        ));
    }

    if zones.secondary.is_empty() && !zones.primary.is_empty() && !zones.tertiary.is_empty() {
        issues.push(CoverageIssue::new(
            IssueKind::MissingIntermediateCoverage,
            Severity::Medium,
            "No medium-range coverage detected",
            "May have coverage gaps between close and distant areas",
            "Medium-range areas (adjacent rooms/floors)",
        ));
    }

    // More than 60% of nodes in the primary zone.
    if zones.primary.len() * 5 > sorted.len() * 3 {
        issues.push(CoverageIssue::new(
            IssueKind::NodeClustering,
            Severity::Low,
            format!(
                "{} of {} nodes in primary zone",
                zones.primary.len(),
                sorted.len()
            ),
            "Possible over-concentration of nodes in small area",
            "Primary coverage area",
        ));
    }

    if !zones.fringe.is_empty() && zones.tertiary.is_empty() {
        let weakest = sorted.last().copied().unwrap_or_default();
        issues.push(CoverageIssue::new(
            IssueKind::IsolatedDistantNode,
            Severity::Medium,
            format!("Distant node at {weakest}dBm without intermediate coverage"),
            "Isolated coverage with potential gap to main mesh",
            format!("~{}", distance_estimate(weakest)),
        ));
    }

    issues
}

// ── Assessment ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TopologyClass {
    ExcellentTopology,
    GoodTopology,
    BasicTopology,
    TopologyIssues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DistributionQuality {
    ExcellentDistribution,
    GoodDistribution,
    UnevenDistribution,
    PoorDistribution,
}

impl DistributionQuality {
    pub fn from_max_gap(max_gap: i32) -> Self {
        if max_gap > 30 {
            Self::PoorDistribution
        } else if max_gap > 20 {
            Self::UnevenDistribution
        } else if max_gap > 10 {
            Self::GoodDistribution
        } else {
            Self::ExcellentDistribution
        }
    }

    fn describe(self, max_gap: i32) -> String {
        match self {
            Self::PoorDistribution => format!(
                "Large signal gaps detected (max {max_gap}dB) - potential coverage holes"
            ),
            Self::UnevenDistribution => format!(
                "Moderate signal gaps (max {max_gap}dB) - some coverage irregularities"
            ),
            Self::GoodDistribution => format!(
                "Well-spaced nodes (max gap {max_gap}dB) - good coverage continuity"
            ),
            Self::ExcellentDistribution => format!(
                "Smooth signal transitions (max gap {max_gap}dB) - excellent spatial distribution"
            ),
        }
    }
}

fn node_assessment(count: usize) -> String {
    match count {
        0 | 1 => format!("{count} node detected - not a true mesh"),
        2 => format!("{count} nodes detected - basic mesh configuration"),
        3 => format!("{count} nodes detected - good for most home sizes"),
        _ => format!("{count} nodes detected - excellent for comprehensive coverage"),
    }
}

/// Full coverage assessment of one mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageAnalysis {
    /// Node signals, strongest first.
    pub sorted_signals: Vec<i32>,
    pub signal_gaps: Vec<i32>,
    pub max_signal_gap: i32,
    pub avg_signal_gap: f64,
    pub coverage_zones: CoverageZones,
    pub coverage_issues: Vec<CoverageIssue>,
    pub topology_classification: TopologyClass,
    pub summary: String,
    pub spatial_distribution: String,
    pub distribution_quality: DistributionQuality,
    pub node_assessment: String,
    pub recommendations: Vec<String>,
    pub coverage_quality_score: u8,
}

/// Analyze per-node strongest signals (any order).
///
/// Never fails: an empty slice yields a zero-gap analysis of zero nodes.
pub fn analyze_coverage(node_signals: &[i32]) -> CoverageAnalysis {
    let mut sorted = node_signals.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let gaps: Vec<i32> = sorted.windows(2).map(|w| w[0].saturating_sub(w[1])).collect();
    let max_gap = gaps.iter().copied().max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let avg_gap = if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().copied().map(f64::from).sum::<f64>() / gaps.len() as f64
    };

    let zones = CoverageZones::from_signals(&sorted);
    let issues = detect_issues(&sorted, &gaps, &zones);

    // Raw score drives classification; only the emitted value is clamped.
    let mut raw_score: i32 = 100 - issues.iter().map(|i| i.severity.penalty()).sum::<i32>();
    if !zones.secondary.is_empty() {
        raw_score += 10;
    }
    if max_gap < 20 {
        raw_score += 15;
    }

    let node_count = sorted.len();
    let assessment = node_assessment(node_count);
    let has_high = issues.iter().any(|i| i.severity == Severity::High);
    let has_medium = issues.iter().any(|i| i.severity == Severity::Medium);

    let (classification, suffix) = if has_high {
        (
            TopologyClass::TopologyIssues,
            " but significant coverage gaps detected",
        )
    } else if has_medium && node_count < 3 {
        (TopologyClass::BasicTopology, " with some coverage limitations")
    } else if has_medium {
        (TopologyClass::GoodTopology, " with minor coverage irregularities")
    } else if node_count >= 4 && raw_score > 85 {
        (
            TopologyClass::ExcellentTopology,
            " with excellent spatial distribution",
        )
    } else if node_count >= 3 && raw_score > 75 {
        (TopologyClass::GoodTopology, " with good spatial coverage")
    } else {
        (
            TopologyClass::BasicTopology,
            " - adequate but could be optimized",
        )
    };

    let mut recommendations: Vec<String> =
        issues.iter().map(CoverageIssue::recommendation).collect();
    if recommendations.is_empty() {
        recommendations.push(if raw_score > 90 {
            "Excellent mesh topology - no improvements needed".to_owned()
        } else {
            "Good mesh topology - minor optimizations possible".to_owned()
        });
    }

    let distribution = DistributionQuality::from_max_gap(max_gap);
    let score = u8::try_from(raw_score.clamp(0, 100)).unwrap_or(0);

    CoverageAnalysis {
        summary: format!("{assessment}{suffix}"),
        spatial_distribution: distribution.describe(max_gap),
        distribution_quality: distribution,
        node_assessment: assessment,
        sorted_signals: sorted,
        signal_gaps: gaps,
        max_signal_gap: max_gap,
        avg_signal_gap: avg_gap,
        coverage_zones: zones,
        coverage_issues: issues,
        topology_classification: classification,
        recommendations,
        coverage_quality_score: score,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(analysis: &CoverageAnalysis) -> Vec<(IssueKind, Severity)> {
        analysis
            .coverage_issues
            .iter()
            .map(|i| (i.kind, i.severity))
            .collect()
    }

    #[test]
    fn zones_partition_every_signal_exactly_once() {
        for signal in -120..=0 {
            let zones = CoverageZones::from_signals(&[signal]);
            let hits = [
                zones.primary.len(),
                zones.secondary.len(),
                zones.tertiary.len(),
                zones.fringe.len(),
            ];
            assert_eq!(hits.iter().sum::<usize>(), 1, "signal {signal}");
        }
        assert_eq!(CoverageZone::classify(-49), CoverageZone::Primary);
        assert_eq!(CoverageZone::classify(-50), CoverageZone::Secondary);
        assert_eq!(CoverageZone::classify(-65), CoverageZone::Tertiary);
        assert_eq!(CoverageZone::classify(-80), CoverageZone::Fringe);
    }

    #[test]
    fn large_gap_between_two_nodes_is_high_severity() {
        let analysis = analyze_coverage(&[-85, -30]);
        assert_eq!(analysis.sorted_signals, vec![-30, -85]);
        assert_eq!(analysis.max_signal_gap, 55);
        assert_eq!(
            kinds(&analysis),
            vec![
                (IssueKind::LargeCoverageGap, Severity::High),
                (IssueKind::IsolatedDistantNode, Severity::Medium),
            ]
        );
        let gap = &analysis.coverage_issues[0];
        assert_eq!(
            gap.details,
            "55dB gap between node 1 (-30dBm) and node 2 (-85dBm)"
        );
        assert_eq!(
            gap.location,
            "Between very close (same room) and maximum range (basement/garage/far areas)"
        );
        assert_eq!(
            analysis.topology_classification,
            TopologyClass::TopologyIssues
        );
        assert_eq!(analysis.coverage_quality_score, 60);
        assert_eq!(
            analysis.summary,
            "2 nodes detected - basic mesh configuration but significant coverage gaps detected"
        );
        assert_eq!(
            analysis.distribution_quality,
            DistributionQuality::PoorDistribution
        );
    }

    #[test]
    fn clustered_nodes_clamp_score_to_100() {
        let analysis = analyze_coverage(&[-45; 5]);
        assert_eq!(analysis.max_signal_gap, 0);
        assert_eq!(
            kinds(&analysis),
            vec![(IssueKind::NodeClustering, Severity::Low)]
        );
        assert_eq!(
            analysis.coverage_issues[0].details,
            "5 of 5 nodes in primary zone"
        );
        assert_eq!(analysis.coverage_quality_score, 100);
        assert_eq!(
            analysis.topology_classification,
            TopologyClass::ExcellentTopology
        );
        assert_eq!(
            analysis.recommendations,
            vec!["Consider relocating some nodes for better spatial distribution"]
        );
    }

    #[test]
    fn fringe_node_without_tertiary_is_isolated() {
        let analysis = analyze_coverage(&[-40, -55, -90]);
        assert_eq!(analysis.signal_gaps, vec![15, 35]);
        assert_eq!(
            kinds(&analysis),
            vec![
                (IssueKind::LargeCoverageGap, Severity::Medium),
                (IssueKind::IsolatedDistantNode, Severity::Medium),
            ]
        );
        let isolated = &analysis.coverage_issues[1];
        assert_eq!(
            isolated.details,
            "Distant node at -90dBm without intermediate coverage"
        );
        assert_eq!(
            isolated.location,
            "~maximum range (basement/garage/far areas)"
        );
        assert_eq!(analysis.coverage_quality_score, 80);
        assert_eq!(analysis.topology_classification, TopologyClass::GoodTopology);
    }

    #[test]
    fn missing_secondary_zone_is_flagged() {
        let analysis = analyze_coverage(&[-45, -70]);
        assert_eq!(
            kinds(&analysis),
            vec![(IssueKind::MissingIntermediateCoverage, Severity::Medium)]
        );
        assert_eq!(analysis.topology_classification, TopologyClass::BasicTopology);
    }

    #[test]
    fn score_never_drops_below_zero() {
        let analysis = analyze_coverage(&[0, -40, -80, -120, -160, -200]);
        assert_eq!(analysis.coverage_quality_score, 0);
        assert_eq!(
            analysis.topology_classification,
            TopologyClass::TopologyIssues
        );
        assert_eq!(analysis.recommendations.len(), analysis.coverage_issues.len());
    }

    #[test]
    fn smooth_three_node_mesh_is_good() {
        let analysis = analyze_coverage(&[-52, -60, -58]);
        assert!(analysis.coverage_issues.is_empty());
        // 100 + 10 secondary + 15 smooth, clamped.
        assert_eq!(analysis.coverage_quality_score, 100);
        assert_eq!(analysis.topology_classification, TopologyClass::GoodTopology);
        assert_eq!(
            analysis.recommendations,
            vec!["Excellent mesh topology - no improvements needed"]
        );
        assert!((analysis.avg_signal_gap - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let empty = analyze_coverage(&[]);
        assert_eq!(empty.max_signal_gap, 0);
        assert_eq!(empty.node_assessment, "0 node detected - not a true mesh");

        let single = analyze_coverage(&[-70]);
        assert!(single.signal_gaps.is_empty());
        assert_eq!(single.topology_classification, TopologyClass::BasicTopology);
    }

    #[test]
    fn distance_labels_follow_thresholds() {
        assert_eq!(distance_estimate(-39), "very close (same room)");
        assert_eq!(distance_estimate(-40), "close (adjacent room)");
        assert_eq!(distance_estimate(-64), "medium range (different floor/far room)");
        assert_eq!(distance_estimate(-79), "extended range (distant area)");
        assert_eq!(
            distance_estimate(-80),
            "maximum range (basement/garage/far areas)"
        );
    }
}
