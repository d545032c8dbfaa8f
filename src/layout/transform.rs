//! Rotate, scale and translate wire endpoints about a pivot.
//!
//! Pure functions; each stage rounds its outputs to the bonder's
//! 3-decimal resolution so downstream comparisons see stable values.

use glam::DVec2;

use crate::types::{Wire, rnd2};

/// Rotate a point counter-clockwise about an origin, `degrees` in degrees.
pub fn rotate_point(origin: DVec2, pt: DVec2, degrees: f64) -> DVec2 {
    let rad = degrees.to_radians();
    let (sn, cs) = rad.sin_cos();
    let c = pt - origin;
    DVec2::new(origin.x + cs * c.x - sn * c.y, origin.y + sn * c.x + cs * c.y)
}

/// Rotate both endpoints of a wire about the pivot.
pub fn rotate(wire: &Wire, pivot: DVec2, degrees: f64) -> Wire {
    Wire::new(
        wire.pin,
        rnd2(rotate_point(pivot, wire.srce, degrees)),
        rnd2(rotate_point(pivot, wire.dest, degrees)),
    )
}

/// Scale the two endpoints about the pivot, each by its own role's factor.
/// Source and destination substrates shrink at different rates.
pub fn scale(wire: &Wire, pivot: DVec2, srce_scale: f64, dest_scale: f64) -> Wire {
    Wire::new(
        wire.pin,
        rnd2((wire.srce - pivot) * srce_scale + pivot),
        rnd2((wire.dest - pivot) * dest_scale + pivot),
    )
}

/// Shift both endpoints so the pivot maps onto `target`.
pub fn translate(wire: &Wire, pivot: DVec2, target: DVec2) -> Wire {
    let shift = target - pivot;
    Wire::new(wire.pin, rnd2(wire.srce + shift), rnd2(wire.dest + shift))
}

/// The full transform: rotate, then scale, then translate.
pub fn transform(
    wire: &Wire,
    pivot: DVec2,
    degrees: f64,
    srce_scale: f64,
    dest_scale: f64,
    target: DVec2,
) -> Wire {
    let w = rotate(wire, pivot, degrees);
    let w = scale(&w, pivot, srce_scale, dest_scale);
    translate(&w, pivot, target)
}
