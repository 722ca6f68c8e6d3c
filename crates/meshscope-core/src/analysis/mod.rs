// ── Topology analysis ──
//
// Clustering, classification, coverage scoring and overlap layout for the
// radios of one SSID. Every stage is a pure function of its input.

pub mod classify;
pub mod cluster;
pub mod coverage;
pub mod venn;

pub use classify::TopologyClassifier;
pub use cluster::{Clustering, cluster_nodes, is_likely_same_mesh_system};
pub use coverage::{
    CoverageAnalysis, CoverageIssue, CoverageZone, CoverageZones, DistributionQuality, IssueKind,
    Severity, TopologyClass, analyze_coverage, distance_estimate,
};
pub use venn::{
    Overlap, OverlapGrade, OverlapQuality, Position, VennAnalysis, VennCalculator, VennDiagram,
    VennNode,
};
