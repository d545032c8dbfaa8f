//! Side-dependent rank ordering for the bonder's winding direction.
//!
//! The bonder executes bonds in strict machine order, so ranks must be
//! visited along the head's travel around the part. The inner component's
//! rows run opposite to the outer substrate's; which role is inner depends
//! on the bonding direction.

use crate::types::{BondingDirection, End, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Ascending,
    Descending,
}

/// Sort direction for one side's rank values, resolved from
/// {side, role, bonding direction} in one table.
pub fn rank_sort_dir(side: Side, end: End, bonding: BondingDirection) -> SortDir {
    let inner = match bonding {
        BondingDirection::Out => end == End::Srce,
        BondingDirection::In => end == End::Dest,
    };
    match (side, inner) {
        (Side::North | Side::East, true) => SortDir::Descending,
        (Side::West | Side::South, true) => SortDir::Ascending,
        (Side::North | Side::East, false) => SortDir::Ascending,
        (Side::West | Side::South, false) => SortDir::Descending,
    }
}

pub fn order_values(values: &mut [f64], dir: SortDir) {
    match dir {
        SortDir::Ascending => values.sort_by(f64::total_cmp),
        SortDir::Descending => values.sort_by(|a, b| f64::total_cmp(b, a)),
    }
}
