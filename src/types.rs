//! Domain types for bond-layout reconstruction, plus the numeric helpers
//! the whole pipeline shares.
//!
//! Coordinates are millimetres in the instrument's frame, held as `DVec2`.
//! The bonder resolves 1 µm, so every value that reaches an output file is
//! rounded to 3 decimal places via [`rnd`].

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use glam::DVec2;

use crate::errors::LayoutError;

/// Round to the bonder's 3-decimal (µm) resolution.
#[inline]
pub fn rnd(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Round both components of a point.
#[inline]
pub fn rnd2(p: DVec2) -> DVec2 {
    DVec2::new(rnd(p.x), rnd(p.y))
}

/// Midpoint of the value range, rounded.
pub fn mid_value<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (min, max) = min_max(values);
    rnd((min + max) / 2.0)
}

/// Smallest and largest of a sequence of values.
pub fn min_max<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

/// True when `comp` lies strictly within `band` of `value`.
#[inline]
pub fn eqls(value: f64, comp: f64, band: f64) -> bool {
    value - band < comp && comp < value + band
}

/// Which coordinate a clustering step reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Which end of a wire a computation reads: the component being bonded
/// from (`Srce`) or the substrate being bonded to (`Dest`). The terms are
/// direction-neutral on purpose; "chip" and "pcb" depend on the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Srce,
    Dest,
}

/// The side of the source component a wire leaves from, named after the
/// compass direction of its travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    North,
    West,
    South,
    East,
}

impl Side {
    /// Emission order: clockwise starting north, matching the bonder's
    /// expected bond sequence.
    pub const ALL: [Side; 4] = [Side::North, Side::West, Side::South, Side::East];

    /// North and south rows run horizontally; west and east vertically.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::North | Side::South)
    }

    /// The axis whose duplicated values reveal pad rows on this side.
    /// Horizontal rows share a Y value, vertical rows an X value.
    pub fn cluster_axis(self) -> Axis {
        if self.is_horizontal() { Axis::Y } else { Axis::X }
    }

    /// The axis pads are spread along within a row.
    pub fn spread_axis(self) -> Axis {
        if self.is_horizontal() { Axis::X } else { Axis::Y }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::North => "north",
            Side::West => "west",
            Side::South => "south",
            Side::East => "east",
        };
        f.write_str(name)
    }
}

/// A single wire bond: an optional pin number and the two pad centres it
/// connects. Immutable once classified; transforms produce new values.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    /// Pin number from the export's first column, kept for diagram labels.
    pub pin: Option<u32>,
    pub srce: DVec2,
    pub dest: DVec2,
}

impl Wire {
    pub fn new(pin: Option<u32>, srce: DVec2, dest: DVec2) -> Wire {
        Wire { pin, srce, dest }
    }

    /// Direction of travel from source to destination, in (-pi, pi].
    pub fn angle(&self) -> f64 {
        let d = self.dest - self.srce;
        d.y.atan2(d.x)
    }

    pub fn end(&self, end: End) -> DVec2 {
        match end {
            End::Srce => self.srce,
            End::Dest => self.dest,
        }
    }

    /// One coordinate of one endpoint.
    pub fn coord(&self, end: End, axis: Axis) -> f64 {
        let p = self.end(end);
        match axis {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// Whether the source component sits inside (`Out`) or outside (`In`) the
/// destination substrate's footprint. This decides which role's rows get
/// the inner winding order.
///
/// `In` (component in package, srce and dest reversed) has never been
/// exercised against real bond data; its ordering polarity is carried
/// as-is from the reference jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondingDirection {
    Out,
    In,
}

/// Per-role bonder parameters. Power, force and time are opaque strings
/// copied verbatim into the reference headers.
#[derive(Debug, Clone)]
pub struct EndSettings {
    /// Ultrasonic power (`refuspower`).
    pub power: String,
    /// Bond force (`refforce`).
    pub force: String,
    /// Ultrasonic time (`refustime`).
    pub time: String,
    /// Scale applied to this role's endpoints about the pivot. Substrates
    /// shrink; 0.1% has been seen on large designs.
    pub scale: f64,
    /// Skip splitting this role's rows by the opposite role's rows.
    pub no_split: bool,
}

/// Hesse BJ820 table origin.
pub const BJ820_TABLE: DVec2 = DVec2::new(-196.0, 10.0);
/// Hesse BJ715 table origin.
pub const BJ715_TABLE: DVec2 = DVec2::new(-126.0, -10.0);

/// Immutable run configuration. Validated once before the pipeline runs,
/// never mutated by it.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Quadrant split angle in radians; must satisfy `0 < q < pi/2`.
    pub quadrant_angle: f64,
    pub srce: EndSettings,
    pub dest: EndSettings,
    /// Rotation applied to the whole layout, degrees counter-clockwise.
    pub rotation: f64,
    /// Where the pivot (source centre) lands after translation.
    pub table: DVec2,
    /// Row spacing below which adjacent ranks merge, and the band used to
    /// match wires against destination rows. Millimetres.
    pub tolerance: f64,
    pub bonding: BondingDirection,
    /// A coordinate value must occur more than this many times to count
    /// as a row. 0 accepts every distinct value.
    pub min_row: usize,
    /// Instrument origin offset subtracted from every parsed endpoint.
    pub origin: DVec2,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quadrant_angle: std::f64::consts::FRAC_PI_4,
            srce: EndSettings {
                power: "26.000".into(),
                force: "20.000".into(),
                time: "0.060".into(),
                scale: 1.0,
                no_split: false,
            },
            dest: EndSettings {
                power: "24.000".into(),
                force: "20.000".into(),
                time: "0.060".into(),
                scale: 0.99975,
                no_split: false,
            },
            rotation: 0.0,
            table: BJ820_TABLE,
            tolerance: 0.02,
            bonding: BondingDirection::Out,
            min_row: 0,
            origin: DVec2::ZERO,
        }
    }
}

impl Settings {
    /// Reject configurations whose side sectors would overlap or gap.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.quadrant_angle > 0.0 && self.quadrant_angle < FRAC_PI_2) {
            return Err(LayoutError::QuadrantAngle {
                value: self.quadrant_angle,
            });
        }
        Ok(())
    }

    /// The parameter set for one role.
    pub fn end(&self, end: End) -> &EndSettings {
        match end {
            End::Srce => &self.srce,
            End::Dest => &self.dest,
        }
    }
}
