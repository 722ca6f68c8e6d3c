// ── Topology result types ──
//
// The classifier's output is a tagged sum type: each network shape carries
// exactly the fields that make sense for it. Everything here serializes to
// plain strings, numbers, lists and objects.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::bssid::{BaseId, Bssid};
use super::observation::{ApObservation, Band};
use crate::analysis::coverage::{CoverageAnalysis, TopologyClass};
use crate::analysis::venn::VennAnalysis;

/// One radio (band/VAP) hosted by a mesh node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radio {
    pub bssid: Bssid,
    #[serde(rename = "freq")]
    pub frequency_mhz: u32,
    #[serde(rename = "signal")]
    pub signal_dbm: i32,
    pub band: Band,
}

impl From<&ApObservation> for Radio {
    fn from(obs: &ApObservation) -> Self {
        Self {
            bssid: obs.bssid,
            frequency_mhz: obs.frequency_mhz,
            signal_dbm: obs.signal_dbm,
            band: obs.band(),
        }
    }
}

/// A physical device inferred from radios sharing a base identifier.
///
/// Only built by the clustering builder, which guarantees at least one
/// radio and keeps `strongest_signal` equal to the best radio signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeshNode {
    base_id: BaseId,
    radios: Vec<Radio>,
    bands: Vec<Band>,
    strongest_signal: i32,
}

impl MeshNode {
    pub(crate) fn from_parts(
        base_id: BaseId,
        radios: Vec<Radio>,
        bands: Vec<Band>,
        strongest_signal: i32,
    ) -> Self {
        Self {
            base_id,
            radios,
            bands,
            strongest_signal,
        }
    }

    pub fn base_id(&self) -> BaseId {
        self.base_id
    }

    pub fn radios(&self) -> &[Radio] {
        &self.radios
    }

    /// Bands hosted by this node, sorted.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn strongest_signal(&self) -> i32 {
        self.strongest_signal
    }

    /// Display label used by the overlap layout (`Node CC:11:22`).
    pub fn label(&self) -> String {
        format!("Node {}", self.base_id.short_label())
    }
}

/// Four-tier signal quality used for single and standalone APs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SignalQuality {
    pub fn from_signal(dbm: i32) -> Self {
        if dbm > -50 {
            Self::Excellent
        } else if dbm > -60 {
            Self::Good
        } else if dbm > -75 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeshType {
    SingleBand,
    DualBand,
    TriBand,
}

impl MeshType {
    pub fn from_band_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::SingleBand,
            2 => Self::DualBand,
            _ => Self::TriBand,
        }
    }
}

/// Coarse network shape, mirrored by the `type` tag of [`TopologyResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum NetworkKind {
    SingleAp,
    MultipleAps,
    Mesh,
}

// ── Result variants ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleApReport {
    /// 0 when the scan had no observation for this SSID, else 1.
    pub nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_quality: Option<SignalQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleApsReport {
    pub nodes: usize,
    pub signal_quality: SignalQuality,
    pub signal_reason: String,
    pub strongest_signal: i32,
    pub ap_list: Vec<ApObservation>,
}

/// Per-node signal spread summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageDetails {
    pub signal_range: i32,
    pub strongest_node: i32,
    pub weakest_node: i32,
    pub total_nodes: usize,
    pub radios_per_node: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshReport {
    /// Brand key from the OUI table, or `"unknown"`.
    pub brand: String,
    pub mesh_type: MeshType,
    pub total_nodes: usize,
    pub total_radios: usize,
    pub bands: Vec<Band>,
    pub signal_range: i32,
    pub mesh_nodes: Vec<MeshNode>,
    pub signal_distribution: Vec<i32>,
    pub coverage_analysis: CoverageAnalysis,
    pub venn_analysis: VennAnalysis,
    pub topology_health: TopologyClass,
    pub coverage_reason: String,
    pub coverage_health: String,
    pub coverage_details: CoverageDetails,
}

/// Classification of one SSID's scan results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TopologyResult {
    SingleAp(SingleApReport),
    MultipleAps(MultipleApsReport),
    Mesh(Box<MeshReport>),
}

impl TopologyResult {
    pub fn kind(&self) -> NetworkKind {
        match self {
            Self::SingleAp(_) => NetworkKind::SingleAp,
            Self::MultipleAps(_) => NetworkKind::MultipleAps,
            Self::Mesh(_) => NetworkKind::Mesh,
        }
    }

    /// Physical nodes (mesh) or APs (otherwise) in the result.
    pub fn node_count(&self) -> usize {
        match self {
            Self::SingleAp(r) => r.nodes,
            Self::MultipleAps(r) => r.nodes,
            Self::Mesh(r) => r.total_nodes,
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshReport> {
        match self {
            Self::Mesh(r) => Some(&**r),
            _ => None,
        }
    }
}
