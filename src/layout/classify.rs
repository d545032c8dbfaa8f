//! Classify wires into the four die sides by approach angle.
//!
//! With `q` the quadrant split angle, the sectors are:
//!
//! ```text
//!        \nw_____/ne
//!    +    |      |
//!   pi ---|      |--- 0
//!    -    |______|
//!        /sw      \se
//! ```
//!
//! north = [q, pi-q), west = [pi-q, pi] u (-pi, -pi+q), south = [-pi+q, -q),
//! east = [-q, q). Sides are tested north, west, south, east; the first
//! match wins, which fixes the owner of every boundary angle.

use std::f64::consts::PI;

use crate::errors::LayoutError;
use crate::types::{Side, Wire};

/// Wires bucketed per side. For a valid quadrant angle the buckets
/// partition the input exactly.
#[derive(Debug, Default)]
pub struct SideBuckets {
    north: Vec<Wire>,
    west: Vec<Wire>,
    south: Vec<Wire>,
    east: Vec<Wire>,
}

impl SideBuckets {
    pub fn get(&self, side: Side) -> &[Wire] {
        match side {
            Side::North => &self.north,
            Side::West => &self.west,
            Side::South => &self.south,
            Side::East => &self.east,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut Vec<Wire> {
        match side {
            Side::North => &mut self.north,
            Side::West => &mut self.west,
            Side::South => &mut self.south,
            Side::East => &mut self.east,
        }
    }

    pub fn total(&self) -> usize {
        Side::ALL.iter().map(|&s| self.get(s).len()).sum()
    }
}

/// The side owning `angle`, or `None` if no sector test matches.
pub fn side_of(angle: f64, quadrant: f64) -> Option<Side> {
    let ne = quadrant;
    let nw = PI - quadrant;
    let sw = -PI + quadrant;
    let se = -quadrant;

    if angle >= ne && angle < nw {
        Some(Side::North)
    } else if angle >= nw || angle < sw {
        Some(Side::West)
    } else if angle >= sw && angle < se {
        Some(Side::South)
    } else if angle >= se && angle < ne {
        Some(Side::East)
    } else {
        None
    }
}

/// Bucket every wire by the direction of its source-to-destination vector.
///
/// Wires matching no sector are a data-quality failure: they are listed in
/// the error, never silently dropped.
pub fn classify(wires: Vec<Wire>, quadrant: f64) -> Result<SideBuckets, LayoutError> {
    let mut buckets = SideBuckets::default();
    let mut unmatched: Vec<Wire> = Vec::new();

    for wire in wires {
        match side_of(wire.angle(), quadrant) {
            Some(side) => buckets.get_mut(side).push(wire),
            None => unmatched.push(wire),
        }
    }

    if !unmatched.is_empty() {
        let listed = unmatched
            .iter()
            .map(|w| {
                format!(
                    "{}({}, {}) -> ({}, {})",
                    w.pin.map(|p| format!("pin {p} ")).unwrap_or_default(),
                    w.srce.x,
                    w.srce.y,
                    w.dest.x,
                    w.dest.y
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        return Err(LayoutError::ClassificationGap {
            count: unmatched.len(),
            quadrant,
            wires: listed,
        });
    }

    Ok(buckets)
}
