//! Split each source rank into destination-row groups.
//!
//! Destination rows are discovered once per side; nesting only assigns
//! membership. A wire joins the first destination value within tolerance
//! of its destination coordinate. Wires matching none are kept in a
//! trailing implicit group rather than dropped, so rank coverage holds.

use super::ranks::Rank;
use crate::types::{End, Side, Wire, eqls};

/// A destination-row grouping inside a source rank. `dest` indexes the
/// side's global destination-value list; `None` marks an implicit group
/// (no-split mode, no destination rows, or unmatched wires).
#[derive(Debug, Clone)]
pub struct Group {
    pub dest: Option<usize>,
    pub wires: Vec<Wire>,
}

/// A source rank split into destination groups. `value` is `None` for a
/// side's single implicit rank.
#[derive(Debug, Clone)]
pub struct NestedRank {
    pub value: Option<f64>,
    pub groups: Vec<Group>,
}

impl NestedRank {
    pub fn wire_count(&self) -> usize {
        self.groups.iter().map(|g| g.wires.len()).sum()
    }
}

/// Nest one source rank. `dest_values` must already be in winding order;
/// groups come out in that order, empty combinations omitted.
pub fn nest_rank(
    mut wires: Vec<Wire>,
    value: Option<f64>,
    side: Side,
    dest_values: &[f64],
    tolerance: f64,
    no_split: bool,
) -> NestedRank {
    if no_split {
        // each source row is already one bondable unit; order its pads
        // along the row
        let axis = side.spread_axis();
        wires.sort_by(|a, b| {
            a.coord(End::Srce, axis)
                .total_cmp(&b.coord(End::Srce, axis))
        });
        return NestedRank {
            value,
            groups: vec![Group { dest: None, wires }],
        };
    }

    if dest_values.is_empty() {
        return NestedRank {
            value,
            groups: vec![Group { dest: None, wires }],
        };
    }

    let axis = side.cluster_axis();
    let mut split: Vec<Vec<Wire>> = vec![Vec::new(); dest_values.len()];
    let mut unmatched: Vec<Wire> = Vec::new();

    for wire in wires {
        let coord = wire.coord(End::Dest, axis);
        match dest_values.iter().position(|&v| eqls(v, coord, tolerance)) {
            Some(m) => split[m].push(wire),
            None => unmatched.push(wire),
        }
    }

    let mut groups: Vec<Group> = split
        .into_iter()
        .enumerate()
        .filter(|(_, wires)| !wires.is_empty())
        .map(|(m, wires)| Group {
            dest: Some(m),
            wires,
        })
        .collect();
    if !unmatched.is_empty() {
        groups.push(Group {
            dest: None,
            wires: unmatched,
        });
    }

    NestedRank { value, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn wire(pin: u32, sx: f64, sy: f64, dx: f64, dy: f64) -> Wire {
        Wire::new(Some(pin), DVec2::new(sx, sy), DVec2::new(dx, dy))
    }

    #[test]
    fn splits_by_destination_rows() {
        let wires = vec![
            wire(1, -2.0, 5.0, -2.0, 50.0),
            wire(2, -1.0, 5.0, -1.0, 60.0),
            wire(3, 1.0, 5.0, 1.0, 50.0),
        ];
        let nested = nest_rank(wires, Some(5.0), Side::North, &[60.0, 50.0], 0.02, false);
        assert_eq!(nested.groups.len(), 2);
        assert_eq!(nested.groups[0].dest, Some(0));
        assert_eq!(nested.groups[0].wires[0].pin, Some(2));
        assert_eq!(nested.groups[1].dest, Some(1));
        assert_eq!(nested.groups[1].wires.len(), 2);
        assert_eq!(nested.wire_count(), 3);
    }

    #[test]
    fn first_matching_destination_wins() {
        // both values are within tolerance of dy = 50.005
        let wires = vec![wire(1, 0.0, 5.0, 0.0, 50.005)];
        let nested = nest_rank(wires, Some(5.0), Side::North, &[50.0, 50.01], 0.02, false);
        assert_eq!(nested.groups.len(), 1);
        assert_eq!(nested.groups[0].dest, Some(0));
    }

    #[test]
    fn unmatched_wires_form_trailing_implicit_group() {
        let wires = vec![
            wire(1, 0.0, 5.0, 0.0, 50.0),
            wire(2, 1.0, 5.0, 1.0, 99.0),
        ];
        let nested = nest_rank(wires, Some(5.0), Side::North, &[50.0], 0.02, false);
        assert_eq!(nested.groups.len(), 2);
        assert_eq!(nested.groups[1].dest, None);
        assert_eq!(nested.groups[1].wires[0].pin, Some(2));
    }

    #[test]
    fn no_destination_rows_means_one_group() {
        let wires = vec![wire(1, 0.0, 5.0, 0.0, 50.0)];
        let nested = nest_rank(wires, Some(5.0), Side::North, &[], 0.02, false);
        assert_eq!(nested.groups.len(), 1);
        assert_eq!(nested.groups[0].dest, None);
    }

    #[test]
    fn no_split_sorts_along_the_row() {
        let wires = vec![
            wire(1, 2.0, 5.0, 2.0, 50.0),
            wire(2, -2.0, 5.0, -2.0, 60.0),
            wire(3, 0.0, 5.0, 0.0, 55.0),
        ];
        let nested = nest_rank(wires, Some(5.0), Side::North, &[50.0, 55.0, 60.0], 0.02, true);
        assert_eq!(nested.groups.len(), 1);
        let pins: Vec<_> = nested.groups[0].wires.iter().map(|w| w.pin).collect();
        assert_eq!(pins, vec![Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn no_split_on_vertical_side_sorts_by_y() {
        let wires = vec![
            wire(1, 5.0, 3.0, 50.0, 3.0),
            wire(2, 5.0, -3.0, 50.0, -3.0),
        ];
        let nested = nest_rank(wires, Some(5.0), Side::East, &[], 0.02, true);
        let pins: Vec<_> = nested.groups[0].wires.iter().map(|w| w.pin).collect();
        assert_eq!(pins, vec![Some(2), Some(1)]);
    }
}
