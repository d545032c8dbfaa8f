//! Bond-layout reconstruction pipeline.
//!
//! This module is organized into submodules:
//! - `classify`: bucket wires into the four sides by approach angle
//! - `ranks`: discover pad rows from duplicated coordinate values
//! - `order`: side-dependent winding order for rank values
//! - `nest`: split source ranks by destination-row membership
//! - `transform`: rotate/scale/translate wires about the layout pivot
//! - `refsys`: reference-system numbering and calibration points
//!
//! [`Layout::build`] runs the stages in that order as one deterministic
//! pass over an immutable wire list and configuration.

pub mod classify;
pub mod nest;
pub mod order;
pub mod ranks;
pub mod refsys;
pub mod transform;

pub use nest::{Group, NestedRank};
pub use ranks::Rank;
pub use refsys::{Bond, BondGroup, Counters, ReferenceSystem, SideLayout, SrceRank};

use glam::DVec2;

use crate::errors::LayoutError;
use crate::log::debug;
use crate::types::{BondingDirection, End, Settings, Side, Wire, mid_value};

/// The fully reconstructed bond layout: the annotated rank tree and the
/// reference-system table, ready for the serializers.
#[derive(Debug, Clone)]
pub struct Layout {
    /// One entry per side in emission order; sides without wires carry an
    /// empty rank list.
    pub sides: Vec<SideLayout>,
    /// All reference systems in ID order.
    pub references: Vec<ReferenceSystem>,
    /// Total bonds numbered.
    pub wire_count: u32,
}

impl Layout {
    /// Run the whole pipeline over `wires`.
    pub fn build(wires: Vec<Wire>, settings: &Settings) -> Result<Layout, LayoutError> {
        settings.validate()?;
        if wires.is_empty() {
            return Err(LayoutError::NoWires);
        }

        // The pivot is the centre of the source extents, taken before any
        // transform; the origin must already be corrected by the parser.
        let pivot = DVec2::new(
            mid_value(wires.iter().map(|w| w.srce.x)),
            mid_value(wires.iter().map(|w| w.srce.y)),
        );
        debug!(pivot.x, pivot.y, wires = wires.len(), "pipeline start");

        let buckets = classify::classify(wires, settings.quadrant_angle)?;

        // the no-split option belongs to whichever role is the inner
        // component
        let no_split = match settings.bonding {
            BondingDirection::Out => settings.srce.no_split,
            BondingDirection::In => settings.dest.no_split,
        };

        let mut nested: Vec<(Side, Vec<NestedRank>)> = Vec::new();
        for side in Side::ALL {
            let side_wires = buckets.get(side);
            let axis = side.cluster_axis();

            // detect canonical row values, then order them for the winding
            let mut srce_values =
                ranks::detect_rank_values(side_wires, End::Srce, axis, settings.min_row);
            let mut dest_values =
                ranks::detect_rank_values(side_wires, End::Dest, axis, settings.min_row);
            order::order_values(
                &mut srce_values,
                order::rank_sort_dir(side, End::Srce, settings.bonding),
            );
            order::order_values(
                &mut dest_values,
                order::rank_sort_dir(side, End::Dest, settings.bonding),
            );

            let mut srce_ranks =
                ranks::assign_members(side_wires, End::Srce, axis, &srce_values);
            ranks::merge_adjacent(&mut srce_ranks, settings.tolerance);

            debug!(
                side = %side,
                wires = side_wires.len(),
                srce_ranks = srce_ranks.len(),
                dest_rows = dest_values.len(),
                "side discovered"
            );

            let mut side_nested = Vec::new();
            if srce_ranks.is_empty() {
                if !side_wires.is_empty() {
                    // zero qualifying rows: the side is one implicit rank
                    side_nested.push(nest::nest_rank(
                        side_wires.to_vec(),
                        None,
                        side,
                        &dest_values,
                        settings.tolerance,
                        no_split,
                    ));
                }
            } else {
                for rank in srce_ranks {
                    side_nested.push(nest::nest_rank(
                        rank.wires,
                        Some(rank.value),
                        side,
                        &dest_values,
                        settings.tolerance,
                        no_split,
                    ));
                }
            }
            nested.push((side, side_nested));
        }

        // functional update of every wire: rotate, scale, translate
        for (_, side_ranks) in nested.iter_mut() {
            for rank in side_ranks.iter_mut() {
                for group in rank.groups.iter_mut() {
                    for wire in group.wires.iter_mut() {
                        *wire = transform::transform(
                            wire,
                            pivot,
                            settings.rotation,
                            settings.srce.scale,
                            settings.dest.scale,
                            settings.table,
                        );
                    }
                }
            }
        }

        let mut counters = Counters::new();
        let (sides, references) = refsys::build_references(nested, &mut counters)?;
        let wire_count = counters.bonds_assigned();
        debug!(references = references.len(), wires = wire_count, "layout complete");

        Ok(Layout {
            sides,
            references,
            wire_count,
        })
    }

    /// All bonds in machine order.
    pub fn bonds(&self) -> impl Iterator<Item = &Bond> {
        self.sides
            .iter()
            .flat_map(|s| &s.ranks)
            .flat_map(|r| &r.groups)
            .flat_map(|g| &g.bonds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn wire(pin: u32, sx: f64, sy: f64, dx: f64, dy: f64) -> Wire {
        Wire::new(Some(pin), DVec2::new(sx, sy), DVec2::new(dx, dy))
    }

    /// Settings whose transform stage is the identity for a layout centred
    /// on the origin.
    fn plain_settings() -> Settings {
        let mut settings = Settings::default();
        settings.dest.scale = 1.0;
        settings.table = DVec2::ZERO;
        settings
    }

    fn four_sided_input() -> Vec<Wire> {
        vec![
            wire(1, -2.0, 5.0, -2.0, 50.0),
            wire(2, 2.0, 5.0, 2.0, 50.0),
            wire(3, -2.0, -5.0, -2.0, -50.0),
            wire(4, 2.0, -5.0, 2.0, -50.0),
        ]
    }

    #[test]
    fn two_sides_four_reference_systems() {
        let layout = Layout::build(four_sided_input(), &plain_settings()).unwrap();

        assert_eq!(layout.references.len(), 4);
        let ids: Vec<_> = layout.references.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let roles: Vec<_> = layout.references.iter().map(|r| r.role).collect();
        assert_eq!(roles, vec![End::Dest, End::Srce, End::Dest, End::Srce]);

        // north first, then south; two wires each
        assert_eq!(layout.sides[0].side, Side::North);
        assert_eq!(layout.sides[0].ranks.len(), 1);
        assert_eq!(layout.sides[1].ranks.len(), 0); // west
        assert_eq!(layout.sides[2].ranks.len(), 1); // south
        assert_eq!(layout.wire_count, 4);

        let seqs: Vec<_> = layout.bonds().map(|b| b.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn rank_coverage_holds() {
        let layout = Layout::build(four_sided_input(), &plain_settings()).unwrap();
        let total: usize = layout
            .sides
            .iter()
            .flat_map(|s| &s.ranks)
            .flat_map(|r| &r.groups)
            .map(|g| g.bonds.len())
            .sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn north_ranks_descend_for_outward_bonding() {
        let wires = vec![
            wire(1, -2.0, 0.0, -2.0, 50.0),
            wire(2, 2.0, 0.0, 2.0, 50.0),
            wire(3, -2.0, 5.0, -2.0, 50.0),
            wire(4, 2.0, 5.0, 2.0, 50.0),
            wire(5, -2.0, 10.0, -2.0, 50.0),
            wire(6, 2.0, 10.0, 2.0, 50.0),
        ];
        let layout = Layout::build(wires, &plain_settings()).unwrap();
        let north = &layout.sides[0];
        let values: Vec<_> = north.ranks.iter().map(|r| r.value.unwrap()).collect();
        assert_eq!(values, vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn near_ranks_merge_within_tolerance() {
        let wires = vec![
            wire(1, -2.0, 10.0, -2.0, 50.0),
            wire(2, 2.0, 10.0, 2.0, 50.0),
            wire(3, 0.0, 10.01, 0.0, 50.0),
        ];
        let layout = Layout::build(wires, &plain_settings()).unwrap();
        let north = &layout.sides[0];
        assert_eq!(north.ranks.len(), 1);
        assert_eq!(north.ranks[0].groups.iter().map(|g| g.bonds.len()).sum::<usize>(), 3);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = Layout::build(Vec::new(), &plain_settings()).unwrap_err();
        assert!(matches!(err, LayoutError::NoWires));
    }

    #[test]
    fn bad_quadrant_angle_is_rejected_before_processing() {
        let mut settings = plain_settings();
        settings.quadrant_angle = 2.0;
        let err = Layout::build(four_sided_input(), &settings).unwrap_err();
        assert!(matches!(err, LayoutError::QuadrantAngle { .. }));
    }

    #[test]
    fn transform_applies_to_all_endpoints() {
        let mut settings = plain_settings();
        settings.table = DVec2::new(-196.0, 10.0);
        let layout = Layout::build(four_sided_input(), &settings).unwrap();
        let first = layout.bonds().next().unwrap();
        assert_eq!(first.wire.srce, DVec2::new(-198.0, 15.0));
        assert_eq!(first.wire.dest, DVec2::new(-198.0, 60.0));
    }
}
