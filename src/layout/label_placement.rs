//! Greedy label collision avoidance for timeline bars.
//!
//! Labels are processed once each, in the order given. Every label is compared
//! with every earlier label's *original* centre; those within the threshold are
//! its neighbours, and the label is nudged until its final centre clears the
//! neighbours' final centres. Labels that are not neighbours are never
//! consulted, so a label pushed far enough can still land on a non-neighbour in
//! a dense cluster. That overlap is accepted and reported through
//! [`overlapping_pairs`], never iterated away.
//!
//! The pass performs exactly `n * (n - 1) / 2` neighbour comparisons.

use serde::Serialize;

/// Upper bound on candidate steps tried for one label.
pub const MAX_SEARCH_STEPS: usize = 1 << 14;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementStats {
    /// Pairwise original-centre comparisons made.
    pub comparisons: usize,
    /// Labels that received a non-zero offset.
    pub nudged: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelResolution {
    /// Signed offsets, parallel to the input centres.
    pub offsets: Vec<f32>,
    pub stats: PlacementStats,
}

/// Resolves label offsets for `centers` (already in processing order).
///
/// Candidate offsets are `0`, then `±nudge * k` for growing `k`; the first sign
/// tried alternates with the parity of the neighbour count so successive
/// members of a cluster fan out above and below.
pub fn resolve_label_offsets(centers: &[f32], threshold: f32, nudge: f32) -> LabelResolution {
    let mut offsets: Vec<f32> = Vec::with_capacity(centers.len());
    let mut stats = PlacementStats::default();

    for (idx, &center) in centers.iter().enumerate() {
        let mut neighbors = Vec::new();
        for (prev, &other) in centers[..idx].iter().enumerate() {
            stats.comparisons += 1;
            if (center - other).abs() < threshold {
                neighbors.push(prev);
            }
        }
        if neighbors.is_empty() {
            offsets.push(0.0);
            continue;
        }

        let clears = |offset: f32| {
            neighbors.iter().all(|&n| {
                let placed = centers[n] + offsets[n];
                (center + offset - placed).abs() >= threshold
            })
        };

        let direction = if neighbors.len() % 2 == 1 { 1.0 } else { -1.0 };
        let offset = if clears(0.0) {
            0.0
        } else {
            candidate_offsets(direction, nudge, max_steps(neighbors.len(), threshold, nudge))
                .find(|&offset| clears(offset))
                .unwrap_or(direction * nudge)
        };
        if offset != 0.0 {
            stats.nudged += 1;
        }
        offsets.push(offset);
    }

    LabelResolution { offsets, stats }
}

fn candidate_offsets(direction: f32, nudge: f32, steps: usize) -> impl Iterator<Item = f32> {
    (1..=steps).flat_map(move |step| {
        let magnitude = nudge * step as f32;
        [direction * magnitude, -direction * magnitude]
    })
}

// Each neighbour blocks an open window of width 2 * threshold, which covers at
// most ceil(2 * threshold / nudge) grid points; searching past that many
// points per neighbour always reaches a free slot. Capped at MAX_SEARCH_STEPS,
// past which the label takes the single-nudge fallback.
fn max_steps(neighbors: usize, threshold: f32, nudge: f32) -> usize {
    if nudge <= 0.0 || !nudge.is_finite() {
        return 0;
    }
    let per_neighbor = (2.0 * threshold / nudge)
        .ceil()
        .clamp(1.0, MAX_SEARCH_STEPS as f32) as usize;
    neighbors
        .saturating_mul(per_neighbor)
        .div_ceil(2)
        .saturating_add(1)
        .min(MAX_SEARCH_STEPS)
}

/// Index pairs whose final centres are still closer than `threshold`.
pub fn overlapping_pairs(centers: &[f32], offsets: &[f32], threshold: f32) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..centers.len() {
        for j in (i + 1)..centers.len() {
            let a = centers[i] + offsets[i];
            let b = centers[j] + offsets[j];
            if (a - b).abs() < threshold {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
