//! Grouping same-SSID radios into physical mesh nodes.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{ApObservation, BaseId, Band, MeshNode, Radio};

/// Outcome of clustering one SSID's observations.
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    /// Nodes in first-seen order.
    pub nodes: Vec<MeshNode>,
    /// Observations that could not be attributed to any node.
    pub standalone: Vec<ApObservation>,
}

impl Clustering {
    pub fn is_mesh(&self) -> bool {
        !self.nodes.is_empty()
    }
}

/// Heuristic: two base identifiers from the same vendor belong to one mesh.
///
/// Deliberately permissive. Two independent systems of the same brand in
/// one scan are merged into a single mesh; this is a known false-merge risk.
pub fn is_likely_same_mesh_system(a: BaseId, b: BaseId) -> bool {
    a.oui() == b.oui()
}

/// Accumulates radios for one base identifier until finalized.
#[derive(Debug)]
struct MeshNodeBuilder {
    base_id: BaseId,
    radios: Vec<Radio>,
    bands: BTreeSet<Band>,
    strongest_signal: i32,
}

impl MeshNodeBuilder {
    fn new(base_id: BaseId, first: &ApObservation) -> Self {
        Self {
            base_id,
            radios: vec![Radio::from(first)],
            bands: BTreeSet::from([first.band()]),
            strongest_signal: first.signal_dbm,
        }
    }

    fn push(&mut self, obs: &ApObservation) {
        self.radios.push(Radio::from(obs));
        self.bands.insert(obs.band());
        self.strongest_signal = self.strongest_signal.max(obs.signal_dbm);
    }

    fn finish(self) -> MeshNode {
        MeshNode::from_parts(
            self.base_id,
            self.radios,
            self.bands.into_iter().collect(),
            self.strongest_signal,
        )
    }
}

/// Partition observations into mesh nodes and standalone APs.
///
/// Observations are walked in input order. An observation joins the node
/// for its base identifier if one exists; otherwise it opens a new node when
/// its base identifier is shared by another observation, or when it looks
/// like part of the same system as an already-open node. Anything else is
/// standalone. Fewer than two observations never form a node.
pub fn cluster_nodes(observations: &[ApObservation]) -> Clustering {
    if observations.len() < 2 {
        return Clustering {
            nodes: Vec::new(),
            standalone: observations.to_vec(),
        };
    }

    let mut base_counts: HashMap<BaseId, usize> = HashMap::new();
    for obs in observations {
        *base_counts.entry(obs.bssid.base_id()).or_default() += 1;
    }

    let mut builders: IndexMap<BaseId, MeshNodeBuilder> = IndexMap::new();
    let mut standalone = Vec::new();

    for obs in observations {
        let base_id = obs.bssid.base_id();
        if let Some(builder) = builders.get_mut(&base_id) {
            builder.push(obs);
            continue;
        }

        let shares_base = base_counts.get(&base_id).copied().unwrap_or(0) > 1;
        let same_system = builders
            .keys()
            .any(|&existing| is_likely_same_mesh_system(base_id, existing));

        if shares_base || same_system {
            debug!(base_id = %base_id, shares_base, same_system, "opening mesh node");
            builders.insert(base_id, MeshNodeBuilder::new(base_id, obs));
        } else {
            debug!(bssid = %obs.bssid, "treating as standalone AP");
            standalone.push(obs.clone());
        }
    }

    Clustering {
        nodes: builders.into_values().map(MeshNodeBuilder::finish).collect(),
        standalone,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analysis::test_support::obs;

    #[test]
    fn single_observation_never_clusters() {
        let result = cluster_nodes(&[obs("AA:BB:CC:11:22:30", 2412, -40)]);
        assert!(!result.is_mesh());
        assert_eq!(result.standalone.len(), 1);
        assert!(cluster_nodes(&[]).standalone.is_empty());
    }

    #[test]
    fn radios_sharing_base_form_one_node() {
        let result = cluster_nodes(&[
            obs("AA:BB:CC:11:22:30", 2412, -40),
            obs("AA:BB:CC:11:22:31", 5180, -45),
            obs("AA:BB:CC:11:22:40", 2437, -68),
            obs("AA:BB:CC:11:22:41", 5200, -70),
        ]);
        // All four share base AA:BB:CC:11:22.
        assert_eq!(result.nodes.len(), 1);
        let node = &result.nodes[0];
        assert_eq!(node.radios().len(), 4);
        assert_eq!(node.bands(), [Band::Ghz2_4, Band::Ghz5]);
        assert_eq!(node.strongest_signal(), -40);
    }

    #[test]
    fn strongest_signal_tracks_later_radios() {
        let result = cluster_nodes(&[
            obs("AA:BB:CC:11:22:30", 2412, -70),
            obs("AA:BB:CC:11:22:31", 5180, -42),
        ]);
        assert_eq!(result.nodes[0].strongest_signal(), -42);
    }

    #[test]
    fn same_vendor_base_joins_open_mesh() {
        let result = cluster_nodes(&[
            obs("AA:BB:CC:01:00:10", 2412, -40),
            obs("AA:BB:CC:01:00:11", 5180, -44),
            obs("AA:BB:CC:02:00:10", 5180, -66),
        ]);
        assert_eq!(result.nodes.len(), 2);
        assert!(result.standalone.is_empty());
        assert_eq!(result.nodes[1].radios().len(), 1);
    }

    #[test]
    fn same_vendor_seen_before_any_node_stays_standalone() {
        // The lone radio precedes the node it would match, so it cannot join.
        let result = cluster_nodes(&[
            obs("AA:BB:CC:02:00:10", 5180, -66),
            obs("AA:BB:CC:01:00:10", 2412, -40),
            obs("AA:BB:CC:01:00:11", 5180, -44),
        ]);
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.standalone.len(), 1);
    }

    #[test]
    fn unrelated_bases_are_standalone() {
        let result = cluster_nodes(&[
            obs("AA:BB:CC:01:00:10", 2412, -40),
            obs("11:22:33:01:00:10", 2412, -55),
        ]);
        assert!(!result.is_mesh());
        assert_eq!(result.standalone.len(), 2);
    }

    #[test]
    fn node_order_follows_first_appearance() {
        let result = cluster_nodes(&[
            obs("AA:BB:CC:02:00:10", 2412, -60),
            obs("AA:BB:CC:01:00:10", 2412, -40),
            obs("AA:BB:CC:02:00:11", 5180, -62),
            obs("AA:BB:CC:01:00:11", 5180, -41),
        ]);
        let bases: Vec<String> = result.nodes.iter().map(|n| n.base_id().to_string()).collect();
        assert_eq!(bases, ["AA:BB:CC:02:00", "AA:BB:CC:01:00"]);
    }

    #[test]
    fn same_mesh_predicate_compares_vendor_prefix() {
        let a: BaseId = "AA:BB:CC:01:02".parse().unwrap();
        let b: BaseId = "AA:BB:CC:09:09".parse().unwrap();
        let c: BaseId = "AA:BB:CD:01:02".parse().unwrap();
        assert!(is_likely_same_mesh_system(a, b));
        assert!(!is_likely_same_mesh_system(a, c));
    }
}
