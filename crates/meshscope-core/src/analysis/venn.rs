//! Synthetic overlap layout for mesh nodes.
//!
//! Each node becomes a circle whose radius grows with signal strength. Node
//! positions are fixed layout slots on a 100×100 canvas chosen by signal
//! rank, not measured positions. Pairwise overlap percentages and an overall
//! overlap grade are derived from that layout.

use std::f64::consts::PI;

use serde::Serialize;
use strum::{Display, EnumString};

use crate::model::{BaseId, Band, MeshNode};

/// Canvas units to radius units.
const DISTANCE_SCALE: f64 = 4.0;
/// Overlaps at or below this percentage are not reported.
const SIGNIFICANT_OVERLAP_PCT: f64 = 5.0;

// ── Output types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennNode {
    /// Index of the node in mesh order.
    pub id: usize,
    pub label: String,
    pub signal: i32,
    pub bssid: BaseId,
    pub radios: usize,
    pub bands: Vec<Band>,
    pub position: Position,
    pub radius: u32,
    pub coverage_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub node1_id: usize,
    pub node2_id: usize,
    pub overlap_percentage: f64,
    pub node1_label: String,
    pub node2_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VennDiagram {
    pub nodes: Vec<VennNode>,
    pub overlaps: Vec<Overlap>,
    /// Sum of node circle areas, overlaps counted twice.
    pub total_coverage: f64,
    pub overlap_count: usize,
    pub avg_overlap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverlapGrade {
    Excellent,
    Good,
    Fair,
    Poor,
    SingleNode,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapQuality {
    pub quality: OverlapGrade,
    pub score: u8,
    pub description: String,
    /// `"overlapping/possible"` pairs; absent below two nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_overlap_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennAnalysis {
    pub venn_diagram: VennDiagram,
    pub overlap_quality: OverlapQuality,
    pub total_nodes: usize,
    pub overlap_count: usize,
    /// Same value as the overlap quality score.
    pub coverage_efficiency: u8,
}

// ── Calculator ──────────────────────────────────────────────────────

/// Radius tunables for the overlap layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VennCalculator {
    pub min_radius: u32,
    pub max_radius: u32,
    /// Radius units gained per dB above −100 dBm.
    pub coverage_multiplier: f64,
}

impl Default for VennCalculator {
    fn default() -> Self {
        Self {
            min_radius: 40,
            max_radius: 120,
            coverage_multiplier: 3.5,
        }
    }
}

impl VennCalculator {
    /// Coverage radius for a signal, truncated and bounded to
    /// `[min_radius, max_radius]`.
    pub fn coverage_radius(&self, signal_dbm: i32) -> u32 {
        let normalized = f64::from(signal_dbm.saturating_add(100).max(0));
        let raw = f64::from(self.min_radius) + normalized * self.coverage_multiplier;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::as_conversions
        )]
        let truncated = raw.trunc().clamp(0.0, f64::from(u32::MAX)) as u32;
        truncated.max(self.min_radius).min(self.max_radius)
    }

    /// Canvas positions for nodes with the given signals, in input order.
    ///
    /// Slots are handed out strongest-first (ties keep input order) and then
    /// mapped back, so `positions[i]` always belongs to `signals[i]`.
    pub fn layout(&self, signals: &[i32]) -> Vec<Position> {
        let n = signals.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| signals[b].cmp(&signals[a]));

        let slots: Vec<Position> = match n {
            0 => return Vec::new(),
            1 => vec![Position::new(50.0, 50.0)],
            2 => {
                let r_strong = f64::from(self.coverage_radius(signals[order[0]]));
                let r_weak = f64::from(self.coverage_radius(signals[order[1]]));
                let spacing = (r_strong + r_weak) * 0.6;
                vec![
                    Position::new(40.0, 50.0),
                    Position::new(40.0 + spacing / DISTANCE_SCALE, 50.0),
                ]
            }
            3 => vec![
                Position::new(35.0, 35.0),
                Position::new(65.0, 35.0),
                Position::new(50.0, 65.0),
            ],
            4 => vec![
                Position::new(40.0, 35.0),
                Position::new(60.0, 35.0),
                Position::new(35.0, 55.0),
                Position::new(65.0, 55.0),
            ],
            _ => spiral_slots(n),
        };

        let mut positions = vec![Position::new(0.0, 0.0); n];
        for (slot, &node) in order.iter().enumerate() {
            positions[node] = slots[slot];
        }
        positions
    }

    /// Percentage overlap of two circles: intersection over union, or the
    /// area ratio when one circle contains the other.
    pub fn overlap_percentage(a: Position, r1: u32, b: Position, r2: u32) -> f64 {
        let d = a.distance_to(b) * DISTANCE_SCALE;
        let (r1, r2) = (f64::from(r1), f64::from(r2));

        if d >= r1 + r2 {
            return 0.0;
        }
        if d <= (r1 - r2).abs() {
            let (small, large) = (r1.min(r2), r1.max(r2));
            if large <= 0.0 {
                return 0.0;
            }
            return 100.0 * (small * small) / (large * large);
        }

        let cos1 = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0);
        let cos2 = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0);
        let kite = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2)).max(0.0);

        let intersection = r1 * r1 * cos1.acos() + r2 * r2 * cos2.acos() - 0.5 * kite.sqrt();
        let union = PI * r1 * r1 + PI * r2 * r2 - intersection;
        if union > 0.0 {
            intersection / union * 100.0
        } else {
            0.0
        }
    }

    /// Lay out the mesh nodes and grade their pairwise overlap.
    pub fn analyze(&self, nodes: &[MeshNode]) -> VennAnalysis {
        let diagram = self.diagram(nodes);
        let quality = grade(diagram.nodes.len(), &diagram.overlaps, diagram.avg_overlap);
        VennAnalysis {
            total_nodes: diagram.nodes.len(),
            overlap_count: diagram.overlap_count,
            coverage_efficiency: quality.score,
            overlap_quality: quality,
            venn_diagram: diagram,
        }
    }

    fn diagram(&self, nodes: &[MeshNode]) -> VennDiagram {
        if nodes.is_empty() {
            return VennDiagram::default();
        }

        let signals: Vec<i32> = nodes.iter().map(MeshNode::strongest_signal).collect();
        let positions = self.layout(&signals);

        let venn_nodes: Vec<VennNode> = nodes
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(id, (node, position))| {
                let radius = self.coverage_radius(node.strongest_signal());
                let r = f64::from(radius);
                VennNode {
                    id,
                    label: node.label(),
                    signal: node.strongest_signal(),
                    bssid: node.base_id(),
                    radios: node.radios().len(),
                    bands: node.bands().to_vec(),
                    position,
                    radius,
                    coverage_area: PI * r * r,
                }
            })
            .collect();

        let mut overlaps = Vec::new();
        for (i, first) in venn_nodes.iter().enumerate() {
            for second in &venn_nodes[i + 1..] {
                let pct = Self::overlap_percentage(
                    first.position,
                    first.radius,
                    second.position,
                    second.radius,
                );
                if pct > SIGNIFICANT_OVERLAP_PCT {
                    overlaps.push(Overlap {
                        node1_id: first.id,
                        node2_id: second.id,
                        overlap_percentage: pct,
                        node1_label: first.label.clone(),
                        node2_label: second.label.clone(),
                    });
                }
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let avg_overlap = if overlaps.is_empty() {
            0.0
        } else {
            overlaps.iter().map(|o| o.overlap_percentage).sum::<f64>() / overlaps.len() as f64
        };

        VennDiagram {
            total_coverage: venn_nodes.iter().map(|n| n.coverage_area).sum(),
            overlap_count: overlaps.len(),
            avg_overlap,
            nodes: venn_nodes,
            overlaps,
        }
    }
}

/// Strongest node in the center, the rest on a widening ring.
///
/// Slots are ranked by signal like the fixed layouts, so the center goes to
/// the strongest node rather than the first one scanned. Overlap figures for
/// five or more nodes therefore depend on signal order, not scan order.
fn spiral_slots(n: usize) -> Vec<Position> {
    let mut slots = vec![Position::new(50.0, 50.0)];
    #[allow(clippy::cast_precision_loss)]
    let step = 2.0 * PI / (n - 1) as f64;
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        let ring = (i - 1) as f64;
        let angle = ring * step;
        let offset = 15.0 + ring * 5.0;
        slots.push(Position::new(
            (50.0 + offset * angle.cos()).clamp(20.0, 80.0),
            (50.0 + offset * angle.sin()).clamp(20.0, 80.0),
        ));
    }
    slots
}

fn grade(node_count: usize, overlaps: &[Overlap], avg_overlap: f64) -> OverlapQuality {
    match node_count {
        0 => {
            return OverlapQuality {
                quality: OverlapGrade::NoData,
                score: 0,
                description: "No mesh nodes available for overlap analysis".to_owned(),
                overlap_ratio: None,
                avg_overlap_pct: None,
            };
        }
        1 => {
            return OverlapQuality {
                quality: OverlapGrade::SingleNode,
                score: 100,
                description: "Single node - no overlap analysis needed".to_owned(),
                overlap_ratio: None,
                avg_overlap_pct: None,
            };
        }
        _ => {}
    }

    let possible = node_count * (node_count - 1) / 2;
    let actual = overlaps.len();
    let has_high = overlaps.iter().any(|o| o.overlap_percentage > 30.0);
    let has_medium = overlaps
        .iter()
        .any(|o| (15.0..=30.0).contains(&o.overlap_percentage));

    let mut score: u32 = if actual * 10 > possible * 7 {
        30
    } else if actual * 2 > possible {
        20
    } else {
        10
    };
    if has_high && has_medium {
        score += 25;
    } else if has_medium {
        score += 15;
    }
    if actual > 0 {
        score += 20;
    }
    if avg_overlap > 25.0 {
        score += 25;
    } else if avg_overlap > 15.0 {
        score += 15;
    } else if avg_overlap > 5.0 {
        score += 10;
    }

    let (quality, description) = if score >= 80 {
        (
            OverlapGrade::Excellent,
            format!("Excellent mesh overlap - {actual}/{possible} node pairs overlapping"),
        )
    } else if score >= 60 {
        (
            OverlapGrade::Good,
            format!("Good mesh overlap - {actual}/{possible} node pairs with coverage overlap"),
        )
    } else if score >= 40 {
        (
            OverlapGrade::Fair,
            "Fair mesh overlap - some coverage gaps possible".to_owned(),
        )
    } else {
        (
            OverlapGrade::Poor,
            "Poor mesh overlap - significant coverage gaps likely".to_owned(),
        )
    };

    OverlapQuality {
        quality,
        score: u8::try_from(score.min(100)).unwrap_or(100),
        description,
        overlap_ratio: Some(format!("{actual}/{possible}")),
        avg_overlap_pct: Some((avg_overlap * 10.0).round() / 10.0),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analysis::cluster::cluster_nodes;
    use crate::analysis::test_support::obs;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn overlap(pct: f64) -> Overlap {
        Overlap {
            node1_id: 0,
            node2_id: 1,
            overlap_percentage: pct,
            node1_label: String::new(),
            node2_label: String::new(),
        }
    }

    #[test]
    fn radius_is_monotone_and_bounded() {
        let calc = VennCalculator::default();
        let mut previous = 0;
        for signal in -130..=10 {
            let r = calc.coverage_radius(signal);
            assert!((40..=120).contains(&r), "signal {signal} radius {r}");
            assert!(r >= previous);
            previous = r;
        }
        assert_eq!(calc.coverage_radius(-100), 40);
        assert_eq!(calc.coverage_radius(-95), 57);
        assert_eq!(calc.coverage_radius(-78), 117);
        assert_eq!(calc.coverage_radius(-40), 120);
    }

    #[test]
    fn disjoint_circles_do_not_overlap() {
        let a = Position::new(0.0, 0.0);
        // 25 canvas units = 100 radius units = 50 + 50.
        assert!(close(VennCalculator::overlap_percentage(a, 50, Position::new(25.0, 0.0), 50), 0.0, 1e-12));
        assert!(close(VennCalculator::overlap_percentage(a, 50, Position::new(40.0, 0.0), 50), 0.0, 1e-12));
    }

    #[test]
    fn contained_circle_uses_area_ratio() {
        let a = Position::new(50.0, 50.0);
        assert!(close(VennCalculator::overlap_percentage(a, 40, a, 80), 25.0, 1e-9));
        assert!(close(VennCalculator::overlap_percentage(a, 60, a, 60), 100.0, 1e-9));
        // Offset by 10 radius units, still fully inside.
        let b = Position::new(52.5, 50.0);
        assert!(close(VennCalculator::overlap_percentage(a, 40, b, 80), 25.0, 1e-9));
    }

    #[test]
    fn overlap_is_continuous_at_both_boundaries() {
        let a = Position::new(0.0, 0.0);
        let eps = 1e-6;
        // Containment boundary at d = 40 radius units = 10 canvas units.
        let inside = VennCalculator::overlap_percentage(a, 40, Position::new(10.0 + eps, 0.0), 80);
        assert!(close(inside, 25.0, 1e-3), "got {inside}");
        // Separation boundary at d = 120 radius units = 30 canvas units.
        let touching = VennCalculator::overlap_percentage(a, 40, Position::new(30.0 - eps, 0.0), 80);
        assert!(close(touching, 0.0, 1e-3), "got {touching}");
    }

    #[test]
    fn two_node_layout_maps_slots_back_to_input_order() {
        let calc = VennCalculator::default();
        let positions = calc.layout(&[-90, -40]);
        // The stronger second node takes the anchor slot.
        assert_eq!(positions[1], Position::new(40.0, 50.0));
        let r_strong = f64::from(calc.coverage_radius(-40));
        let r_weak = f64::from(calc.coverage_radius(-90));
        assert!(close(
            positions[0].x,
            40.0 + 0.6 * (r_strong + r_weak) / 4.0,
            1e-9
        ));
    }

    #[test]
    fn three_node_triangle_slots_follow_signal_rank() {
        let positions = VennCalculator::default().layout(&[-70, -40, -55]);
        assert_eq!(positions[1], Position::new(35.0, 35.0));
        assert_eq!(positions[2], Position::new(65.0, 35.0));
        assert_eq!(positions[0], Position::new(50.0, 65.0));
    }

    #[test]
    fn four_node_diamond_slots_follow_signal_rank() {
        let positions = VennCalculator::default().layout(&[-80, -40, -70, -50]);
        assert_eq!(positions[1], Position::new(40.0, 35.0));
        assert_eq!(positions[3], Position::new(60.0, 35.0));
        assert_eq!(positions[2], Position::new(35.0, 55.0));
        assert_eq!(positions[0], Position::new(65.0, 55.0));
    }

    #[test]
    fn many_node_layout_centers_strongest() {
        let calc = VennCalculator::default();
        let positions = calc.layout(&[-70, -60, -40, -80, -75, -65]);
        assert_eq!(positions[2], Position::new(50.0, 50.0));
        for p in &positions {
            assert!((20.0..=80.0).contains(&p.x) && (20.0..=80.0).contains(&p.y));
        }
        // First ring slot sits at angle 0, offset 15.
        assert_eq!(positions[1], Position::new(65.0, 50.0));
    }

    #[test]
    fn equal_twin_nodes_grade_excellent() {
        let nodes = cluster_nodes(&[
            obs("AA:BB:CC:01:00:10", 2412, -45),
            obs("AA:BB:CC:01:00:11", 5180, -50),
            obs("AA:BB:CC:02:00:10", 2412, -45),
            obs("AA:BB:CC:02:00:11", 5180, -60),
        ])
        .nodes;
        let analysis = VennCalculator::default().analyze(&nodes);
        assert_eq!(analysis.total_nodes, 2);
        assert_eq!(analysis.overlap_count, 1);
        let pct = analysis.venn_diagram.overlaps[0].overlap_percentage;
        assert!(close(pct, 16.6, 0.05), "got {pct}");
        assert_eq!(analysis.overlap_quality.quality, OverlapGrade::Excellent);
        assert_eq!(analysis.coverage_efficiency, 80);
        assert_eq!(
            analysis.overlap_quality.description,
            "Excellent mesh overlap - 1/1 node pairs overlapping"
        );
        assert_eq!(analysis.overlap_quality.avg_overlap_pct, Some(16.6));
        assert_eq!(analysis.venn_diagram.nodes[0].label, "Node CC:01:00");
    }

    #[test]
    fn degenerate_node_counts() {
        let calc = VennCalculator::default();
        let none = calc.analyze(&[]);
        assert_eq!(none.overlap_quality.quality, OverlapGrade::NoData);
        assert_eq!(none.coverage_efficiency, 0);
        assert!(none.venn_diagram.nodes.is_empty());

        let nodes = cluster_nodes(&[
            obs("AA:BB:CC:01:00:10", 2412, -45),
            obs("AA:BB:CC:01:00:11", 5180, -50),
        ])
        .nodes;
        let one = calc.analyze(&nodes);
        assert_eq!(one.overlap_quality.quality, OverlapGrade::SingleNode);
        assert_eq!(one.coverage_efficiency, 100);
        assert_eq!(one.venn_diagram.nodes[0].position, Position::new(50.0, 50.0));
    }

    #[test]
    fn grading_rewards_balanced_overlap() {
        let q = grade(3, &[overlap(40.0), overlap(20.0), overlap(35.0)], 31.7);
        // 30 + 25 + 20 + 25, capped.
        assert_eq!(q.score, 100);
        assert_eq!(q.overlap_ratio.as_deref(), Some("3/3"));

        let q = grade(4, &[overlap(8.0)], 8.0);
        // 10 + 0 + 20 + 10.
        assert_eq!(q.score, 40);
        assert_eq!(q.quality, OverlapGrade::Fair);

        let q = grade(3, &[], 0.0);
        assert_eq!(q.score, 10);
        assert_eq!(q.quality, OverlapGrade::Poor);
        assert_eq!(
            q.description,
            "Poor mesh overlap - significant coverage gaps likely"
        );
    }
}
