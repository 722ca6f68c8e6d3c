//! Mesh topology classification and spatial coverage scoring for WiFi scans.
//!
//! Everything in this crate is synchronous, pure computation over values
//! handed in by the caller:
//!
//! - **[`scan`]**: Parses `iw` scan/link text (or JSON) into
//!   [`ApObservation`]s and a [`CurrentConnection`], and groups observations
//!   by SSID.
//!
//! - **[`TopologyClassifier`]**: Clusters one SSID's radios into
//!   [`MeshNode`]s and produces a [`TopologyResult`]: a single AP, several
//!   standalone APs, or a mesh with coverage analysis and overlap layout.
//!   Brands come from the embedded, immutable [`BrandTable`].
//!
//! - **[`HistoryTracker`]**: Per-BSSID connection history and stability
//!   scores, fed by [`ConnectionEvent`]s.
//!
//! - **[`detect_patterns`]**: Roaming loops, auth-failure clusters, rapid
//!   reconnects, busy hours and problem BSSIDs.
//!
//! - **[`rank_alternatives`]**: Scores the other radios of the connected
//!   SSID as roaming candidates.
//!
//! Analysis never fails. Only the parsing boundary returns [`CoreError`].

pub mod alternatives;
pub mod analysis;
pub mod error;
pub mod history;
pub mod model;
pub mod oui;
pub mod patterns;
pub mod scan;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alternatives::{
    Alternative, DEFAULT_ALTERNATIVE_LIMIT, Priority, SwitchAdvice, Verdict, rank_alternatives,
    switch_advice,
};
pub use analysis::{
    CoverageAnalysis, CoverageIssue, IssueKind, OverlapGrade, Severity, TopologyClass,
    TopologyClassifier, VennAnalysis, VennCalculator, analyze_coverage,
};
pub use error::CoreError;
pub use history::{BssidHistory, HistoryTracker};
pub use oui::BrandTable;
pub use patterns::{ConnectionPatterns, detect_patterns};

pub use model::{
    ApObservation, Band, BaseId, Bssid, ConnectionEvent, CurrentConnection, EventType, MeshNode,
    MeshReport, MeshType, MultipleApsReport, NetworkKind, Oui, Radio, SignalQuality,
    SingleApReport, TopologyResult,
};
