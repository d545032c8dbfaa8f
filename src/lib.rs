//! wirecad converts wire-bond coordinate exports into a Hesse wire-bonder
//! control file (.CAD) plus an SVG/HTML diagram of the bond layout.
//!
//! The input is an unordered list of (source, destination) point pairs,
//! one per wire, exported by a CAD or metrology tool. The interesting work
//! is reconstructing the physical pad rows on both components from
//! nothing but those coordinates:
//!
//! 1. classify each wire into one of four sides by its approach angle,
//! 2. discover pad rows ("ranks") from duplicated coordinate values,
//! 3. split each source row by the destination rows it bonds into,
//! 4. order rows for the bonder head's winding direction,
//! 5. derive a numbered reference system with two calibration points from
//!    the extremal wires of every row.
//!
//! [`convert`] runs all of that in one deterministic pass; [`Layout`]
//! exposes the annotated rank tree for callers that want the structure
//! rather than the files.

pub mod cad;
pub mod errors;
pub mod layout;
pub mod log;
pub mod parse;
pub mod svg;
pub mod types;

pub use errors::{LayoutError, ParseError};
pub use layout::{Layout, ReferenceSystem};
pub use svg::SvgOptions;
pub use types::{BondingDirection, End, Settings, Side, Wire};

/// Everything one run produces.
pub struct Conversion {
    pub layout: Layout,
    /// The bonder control file.
    pub cad: String,
    /// The HTML diagram page.
    pub html: String,
}

/// Convert CSV wire records into the control file and diagram.
///
/// `name` is used for error reporting and the diagram title.
pub fn convert(
    input: &str,
    name: &str,
    settings: &Settings,
) -> Result<Conversion, miette::Report> {
    let wires = parse::parse_wires(input, name, settings)?;
    let layout = Layout::build(wires, settings)?;
    let cad = cad::write_cad(&layout, settings);
    let html = svg::write_html(&layout, name, &SvgOptions::default());
    Ok(Conversion { layout, cad, html })
}
