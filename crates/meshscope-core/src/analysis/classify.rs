//! Per-SSID topology classification.

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::cluster::cluster_nodes;
use super::coverage::analyze_coverage;
use super::venn::VennCalculator;
use crate::model::{
    ApObservation, Band, CoverageDetails, MeshNode, MeshReport, MeshType, MultipleApsReport,
    SignalQuality, SingleApReport, TopologyResult,
};
use crate::oui::BrandTable;

/// Brand reported when no observed prefix is in the table.
pub const UNKNOWN_BRAND: &str = "unknown";

/// Classifies one SSID's observations as a single AP, several standalone
/// APs, or a mesh system.
///
/// Holds only borrowed, immutable configuration; one classifier can be
/// shared across any number of analyses.
#[derive(Debug, Clone, Copy)]
pub struct TopologyClassifier<'a> {
    brands: &'a BrandTable,
    venn: VennCalculator,
}

impl Default for TopologyClassifier<'static> {
    fn default() -> Self {
        Self::new(BrandTable::builtin())
    }
}

impl<'a> TopologyClassifier<'a> {
    pub fn new(brands: &'a BrandTable) -> Self {
        Self {
            brands,
            venn: VennCalculator::default(),
        }
    }

    /// Use custom radius tunables for the overlap layout.
    pub fn with_venn(mut self, venn: VennCalculator) -> Self {
        self.venn = venn;
        self
    }

    pub fn venn(&self) -> &VennCalculator {
        &self.venn
    }

    /// Classify observations that share one SSID, in scan order.
    pub fn classify(&self, observations: &[ApObservation]) -> TopologyResult {
        match observations {
            [] => TopologyResult::SingleAp(SingleApReport {
                nodes: 0,
                signal_quality: None,
                signal_reason: None,
                signal_strength: None,
            }),
            [only] => Self::single_ap(only),
            _ => {
                let clustering = cluster_nodes(observations);
                if clustering.is_mesh() {
                    TopologyResult::Mesh(Box::new(self.mesh(&clustering.nodes, observations)))
                } else {
                    Self::multiple_aps(observations)
                }
            }
        }
    }

    fn single_ap(obs: &ApObservation) -> TopologyResult {
        let signal = obs.signal_dbm;
        let quality = SignalQuality::from_signal(signal);
        let reason = match quality {
            SignalQuality::Excellent => format!("Strong signal ({signal}dBm) indicates good placement"),
            SignalQuality::Good => format!("Good signal strength ({signal}dBm)"),
            SignalQuality::Fair => format!(
                "Moderate signal ({signal}dBm) - consider moving closer or improving placement"
            ),
            SignalQuality::Poor => {
                format!("Weak signal ({signal}dBm) - poor placement or too far from AP")
            }
        };
        debug!(bssid = %obs.bssid, signal, %quality, "single AP");
        TopologyResult::SingleAp(SingleApReport {
            nodes: 1,
            signal_quality: Some(quality),
            signal_reason: Some(reason),
            signal_strength: Some(signal),
        })
    }

    fn multiple_aps(observations: &[ApObservation]) -> TopologyResult {
        let strongest = observations
            .iter()
            .map(|o| o.signal_dbm)
            .max()
            .unwrap_or(crate::model::NO_SIGNAL_DBM);
        let count = observations.len();
        let quality = SignalQuality::from_signal(strongest);
        let reason = match quality {
            SignalQuality::Excellent => {
                format!("Strong signals available ({strongest}dBm) from multiple APs")
            }
            SignalQuality::Good => {
                format!("Good signal options ({strongest}dBm) from {count} APs")
            }
            SignalQuality::Fair => {
                format!("Moderate signals ({strongest}dBm) - consider moving closer to APs")
            }
            SignalQuality::Poor => {
                format!("Weak signals from all APs ({strongest}dBm) - poor coverage area")
            }
        };
        debug!(count, strongest, %quality, "multiple standalone APs");
        TopologyResult::MultipleAps(MultipleApsReport {
            nodes: count,
            signal_quality: quality,
            signal_reason: reason,
            strongest_signal: strongest,
            ap_list: observations.to_vec(),
        })
    }

    fn mesh(&self, nodes: &[MeshNode], observations: &[ApObservation]) -> MeshReport {
        let brand = self
            .brands
            .identify(observations.iter().map(|o| &o.bssid))
            .unwrap_or(UNKNOWN_BRAND)
            .to_owned();

        let bands: Vec<Band> = nodes
            .iter()
            .flat_map(|n| n.bands().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mesh_type = MeshType::from_band_count(bands.len());

        let signals: Vec<i32> = nodes.iter().map(MeshNode::strongest_signal).collect();
        let strongest = signals.iter().copied().max().unwrap_or_default();
        let weakest = signals.iter().copied().min().unwrap_or_default();
        let signal_range = strongest.saturating_sub(weakest);

        let coverage = analyze_coverage(&signals);
        let venn = self.venn.analyze(nodes);

        #[allow(clippy::cast_precision_loss)]
        let radios_per_node = if nodes.is_empty() {
            0.0
        } else {
            observations.len() as f64 / nodes.len() as f64
        };

        info!(
            brand = %brand,
            nodes = nodes.len(),
            radios = observations.len(),
            %mesh_type,
            health = %coverage.topology_classification,
            score = coverage.coverage_quality_score,
            "mesh topology classified"
        );

        MeshReport {
            brand,
            mesh_type,
            total_nodes: nodes.len(),
            total_radios: observations.len(),
            bands,
            signal_range,
            mesh_nodes: nodes.to_vec(),
            signal_distribution: coverage.sorted_signals.clone(),
            topology_health: coverage.topology_classification,
            coverage_reason: coverage.summary.clone(),
            coverage_health: coverage.spatial_distribution.clone(),
            coverage_details: CoverageDetails {
                signal_range,
                strongest_node: strongest,
                weakest_node: weakest,
                total_nodes: nodes.len(),
                radios_per_node,
            },
            coverage_analysis: coverage,
            venn_analysis: venn,
        }
    }
}
