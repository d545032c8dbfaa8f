//! Rank discovery: rows of pads inferred from duplicated coordinate values.
//!
//! Detection and membership are separate steps. [`detect_rank_values`]
//! finds the canonical axis values, the caller orders them for the winding
//! direction, then [`assign_members`] collects each row's wires. An
//! optional single-pass merge folds rows closer than the tolerance.

use crate::types::{Axis, End, Wire, rnd};

/// A row of pads: the shared coordinate value and its wires.
#[derive(Debug, Clone)]
pub struct Rank {
    pub value: f64,
    pub wires: Vec<Wire>,
}

/// Distinct coordinate values occurring more than `min_row` times, in
/// first-occurrence order.
///
/// Exact float equality on purpose: duplicated pads in one export repeat
/// bit-identical numbers, and a tolerance here would conflate detection
/// with the later merge step.
pub fn detect_rank_values(wires: &[Wire], end: End, axis: Axis, min_row: usize) -> Vec<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for wire in wires {
        let v = wire.coord(end, axis);
        match counts.iter_mut().find(|(c, _)| *c == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }
    counts
        .into_iter()
        .filter(|&(_, n)| n > min_row)
        .map(|(v, _)| v)
        .collect()
}

/// Spacing between successive rank values, rounded.
pub fn rank_gaps(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| rnd((w[0] - w[1]).abs())).collect()
}

/// Collect each rank's wires by exact equality with its canonical value.
/// Wires keep their input order within a rank.
pub fn assign_members(wires: &[Wire], end: End, axis: Axis, values: &[f64]) -> Vec<Rank> {
    values
        .iter()
        .map(|&value| Rank {
            value,
            wires: wires
                .iter()
                .filter(|w| w.coord(end, axis) == value)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Merge adjacent ranks whose spacing is under `tolerance`.
///
/// One pass over the gap list computed up front: each under-tolerance gap
/// appends the right-hand rank's wires (as they stood at that step) to the
/// left-hand rank, and the absorbed entries are removed afterwards. The
/// pass never re-examines merged results, so chains of near ranks do not
/// collapse transitively.
pub fn merge_adjacent(ranks: &mut Vec<Rank>, tolerance: f64) {
    let values: Vec<f64> = ranks.iter().map(|r| r.value).collect();
    let gaps = rank_gaps(&values);

    let mut absorbed = Vec::new();
    for (j, gap) in gaps.iter().enumerate() {
        if *gap < tolerance {
            let moved = ranks[j + 1].wires.clone();
            ranks[j].wires.extend(moved);
            absorbed.push(j + 1);
        }
    }
    for &j in absorbed.iter().rev() {
        ranks.remove(j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn wire_sy(pin: u32, sy: f64) -> Wire {
        Wire::new(
            Some(pin),
            DVec2::new(pin as f64, sy),
            DVec2::new(pin as f64, sy + 40.0),
        )
    }

    #[test]
    fn detect_keeps_first_occurrence_order() {
        let wires = vec![wire_sy(1, 5.0), wire_sy(2, -5.0), wire_sy(3, 5.0), wire_sy(4, -5.0)];
        let values = detect_rank_values(&wires, End::Srce, Axis::Y, 0);
        assert_eq!(values, vec![5.0, -5.0]);
    }

    #[test]
    fn detect_min_row_requires_duplicates() {
        let wires = vec![wire_sy(1, 5.0), wire_sy(2, 5.0), wire_sy(3, 7.0)];
        // min_row 1: a value must occur at least twice
        let values = detect_rank_values(&wires, End::Srce, Axis::Y, 1);
        assert_eq!(values, vec![5.0]);
        // min_row 0: every distinct value qualifies
        let values = detect_rank_values(&wires, End::Srce, Axis::Y, 0);
        assert_eq!(values, vec![5.0, 7.0]);
    }

    #[test]
    fn gaps_are_rounded_absolute_differences() {
        assert_eq!(rank_gaps(&[10.0, 5.0, 5.0104]), vec![5.0, 0.01]);
        assert!(rank_gaps(&[1.0]).is_empty());
    }

    #[test]
    fn members_keep_input_order() {
        let wires = vec![wire_sy(3, 5.0), wire_sy(1, 5.0), wire_sy(2, -5.0)];
        let ranks = assign_members(&wires, End::Srce, Axis::Y, &[5.0, -5.0]);
        assert_eq!(ranks.len(), 2);
        let pins: Vec<_> = ranks[0].wires.iter().map(|w| w.pin).collect();
        assert_eq!(pins, vec![Some(3), Some(1)]);
        assert_eq!(ranks[1].wires.len(), 1);
    }

    #[test]
    fn merge_folds_near_ranks() {
        let wires = vec![wire_sy(1, 10.0), wire_sy(2, 10.0), wire_sy(3, 10.01)];
        let mut ranks = assign_members(&wires, End::Srce, Axis::Y, &[10.0, 10.01]);
        merge_adjacent(&mut ranks, 0.02);
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks[0].value, 10.0);
        assert_eq!(ranks[0].wires.len(), 3);
    }

    #[test]
    fn merge_leaves_distant_ranks_alone() {
        let wires = vec![wire_sy(1, 10.0), wire_sy(2, 10.05)];
        let mut ranks = assign_members(&wires, End::Srce, Axis::Y, &[10.0, 10.05]);
        merge_adjacent(&mut ranks, 0.02);
        assert_eq!(ranks.len(), 2);
    }

    #[test]
    fn merge_is_single_pass_not_transitive() {
        // A, B, C each within tolerance of their neighbour: A absorbs B's
        // original wires, B absorbs C's, then both B and C entries drop.
        // C's wires leave with B. Pinned so a change here is deliberate.
        let wires = vec![wire_sy(1, 10.0), wire_sy(2, 10.01), wire_sy(3, 10.02)];
        let mut ranks = assign_members(&wires, End::Srce, Axis::Y, &[10.0, 10.01, 10.02]);
        merge_adjacent(&mut ranks, 0.02);
        assert_eq!(ranks.len(), 1);
        let pins: Vec<_> = ranks[0].wires.iter().map(|w| w.pin).collect();
        assert_eq!(pins, vec![Some(1), Some(2)]);
    }
}
