//! Reference-system numbering and calibration points.
//!
//! Every destination row gets one reference system, shared by all source
//! ranks that bond into it; every source rank gets its own. IDs come from
//! the caller's counter, assigned in emission order:
//! side (north, west, south, east), then source rank, with a rank's newly
//! reached destination references immediately before its own source
//! reference. Calibration points are the first and last wire's relevant
//! endpoint under the final order.

use std::collections::HashMap;

use glam::DVec2;

use super::nest::NestedRank;
use crate::errors::LayoutError;
use crate::types::{End, Side, Wire, rnd2};

/// A bonder reference system: numbered coordinate frame plus the two
/// calibration points the machine uses to locate a row of pads.
#[derive(Debug, Clone)]
pub struct ReferenceSystem {
    pub id: u32,
    /// Which role's pads this system calibrates.
    pub role: End,
    pub first: DVec2,
    pub second: DVec2,
}

/// One bonded wire with its machine sequence number.
#[derive(Debug, Clone)]
pub struct Bond {
    pub seq: u32,
    pub wire: Wire,
}

/// The wires of one source rank bonding into one destination row.
#[derive(Debug, Clone)]
pub struct BondGroup {
    pub dest_ref: u32,
    pub bonds: Vec<Bond>,
}

/// A source rank annotated with its reference system.
#[derive(Debug, Clone)]
pub struct SrceRank {
    pub value: Option<f64>,
    pub srce_ref: u32,
    pub groups: Vec<BondGroup>,
}

/// One side's annotated rank tree.
#[derive(Debug, Clone)]
pub struct SideLayout {
    pub side: Side,
    pub ranks: Vec<SrceRank>,
}

/// Explicit counters threaded through the builder, so numbering state is
/// never global and the builder stays reentrant.
#[derive(Debug)]
pub struct Counters {
    next_ref: u32,
    next_seq: u32,
}

impl Counters {
    pub fn new() -> Counters {
        Counters {
            next_ref: 1,
            next_seq: 1,
        }
    }

    fn take_ref(&mut self) -> u32 {
        let id = self.next_ref;
        self.next_ref += 1;
        id
    }

    fn take_seq(&mut self) -> u32 {
        let id = self.next_seq;
        self.next_seq += 1;
        id
    }

    /// Bond sequence numbers handed out so far.
    pub fn bonds_assigned(&self) -> u32 {
        self.next_seq - 1
    }
}

impl Default for Counters {
    fn default() -> Self {
        Counters::new()
    }
}

/// A reference system still collecting its member wires.
struct PendingSystem {
    id: u32,
    role: End,
    wires: Vec<Wire>,
    side: Side,
    rank: usize,
}

/// Assign reference IDs and bond sequence numbers, and derive calibration
/// points from the extremal wires of each rank.
pub fn build_references(
    nested: Vec<(Side, Vec<NestedRank>)>,
    counters: &mut Counters,
) -> Result<(Vec<SideLayout>, Vec<ReferenceSystem>), LayoutError> {
    let mut pending: Vec<PendingSystem> = Vec::new();
    // IDs come from the caller's counter, which need not start at 1, so
    // pending entries are found by ID rather than position
    let mut pending_index: HashMap<u32, usize> = HashMap::new();
    let mut sides = Vec::new();

    for (side, ranks) in nested {
        // destination references are shared by identity within a side
        let mut dest_ids: HashMap<usize, u32> = HashMap::new();
        let mut out_ranks = Vec::new();

        for (rank_no, rank) in ranks.into_iter().enumerate() {
            if rank.wire_count() == 0 {
                return Err(LayoutError::EmptyRank {
                    side,
                    rank: rank_no,
                });
            }

            // newly reached destination rows first, then the source rank
            let mut group_refs = Vec::with_capacity(rank.groups.len());
            for group in &rank.groups {
                let dest_ref = match group.dest.and_then(|d| dest_ids.get(&d).copied()) {
                    Some(id) => {
                        pending[pending_index[&id]].wires.extend(group.wires.iter().cloned());
                        id
                    }
                    None => {
                        let id = counters.take_ref();
                        if let Some(d) = group.dest {
                            dest_ids.insert(d, id);
                        }
                        pending_index.insert(id, pending.len());
                        pending.push(PendingSystem {
                            id,
                            role: End::Dest,
                            wires: group.wires.clone(),
                            side,
                            rank: rank_no,
                        });
                        id
                    }
                };
                group_refs.push(dest_ref);
            }

            let srce_ref = counters.take_ref();
            pending.push(PendingSystem {
                id: srce_ref,
                role: End::Srce,
                wires: rank.groups.iter().flat_map(|g| g.wires.iter().cloned()).collect(),
                side,
                rank: rank_no,
            });

            let groups = rank
                .groups
                .into_iter()
                .zip(group_refs)
                .map(|(group, dest_ref)| BondGroup {
                    dest_ref,
                    bonds: group
                        .wires
                        .into_iter()
                        .map(|wire| Bond {
                            seq: counters.take_seq(),
                            wire,
                        })
                        .collect(),
                })
                .collect();

            out_ranks.push(SrceRank {
                value: rank.value,
                srce_ref,
                groups,
            });
        }

        sides.push(SideLayout {
            side,
            ranks: out_ranks,
        });
    }

    let mut references = Vec::with_capacity(pending.len());
    for system in pending {
        let (Some(first), Some(last)) = (system.wires.first(), system.wires.last()) else {
            return Err(LayoutError::EmptyRank {
                side: system.side,
                rank: system.rank,
            });
        };
        references.push(ReferenceSystem {
            id: system.id,
            role: system.role,
            first: rnd2(first.end(system.role)),
            second: rnd2(last.end(system.role)),
        });
    }

    Ok((sides, references))
}
