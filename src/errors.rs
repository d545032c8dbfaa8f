//! Error types with rich diagnostics using miette
//!
//! Parse errors carry source spans so the offending record is shown in
//! context; layout errors carry the side/rank that produced them.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::Side;

/// Errors raised while reading wire records from the input text.
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("line {line}: expected 5 or 6 comma-separated fields, found {found}")]
    #[diagnostic(
        code(wirecad::parse::bad_record),
        help("records are `pin, sx, sy, dx, dy` or `user, sx, sy, user, dx, dy`")
    )]
    BadRecord {
        line: usize,
        found: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this record")]
        span: SourceSpan,
    },

    #[error("line {line}: invalid coordinate `{field}`")]
    #[diagnostic(code(wirecad::parse::bad_coordinate))]
    BadCoordinate {
        line: usize,
        field: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a finite number")]
        span: SourceSpan,
    },
}

/// Errors raised by configuration checks or the layout pipeline itself.
#[derive(Error, Diagnostic, Debug)]
pub enum LayoutError {
    #[error("quadrant split angle {value} rad is out of range")]
    #[diagnostic(
        code(wirecad::config::quadrant_angle),
        help("the quadrant split angle must satisfy 0 < q < pi/2")
    )]
    QuadrantAngle { value: f64 },

    #[error("no wires in input")]
    #[diagnostic(code(wirecad::layout::no_wires))]
    NoWires,

    /// A wire whose angle matched no side sector. With a valid quadrant
    /// angle the four sectors tile the full circle, so this indicates bad
    /// data (NaN coordinates) rather than a tuning problem; either way the
    /// wires are listed, never dropped.
    #[error("{count} wire(s) match no side at quadrant angle {quadrant} rad: {wires}")]
    #[diagnostic(
        code(wirecad::layout::classification_gap),
        help("check the listed wires for degenerate coordinates")
    )]
    ClassificationGap {
        count: usize,
        quadrant: f64,
        wires: String,
    },

    /// A rank with no wires cannot yield calibration points, and skipping
    /// it would corrupt the reference numbering consumed downstream.
    #[error("empty rank on {side} side (source rank {rank}) cannot yield calibration points")]
    #[diagnostic(code(wirecad::layout::empty_rank))]
    EmptyRank { side: Side, rank: usize },
}
