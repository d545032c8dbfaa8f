//! Serialization to the bonder's .CAD control file.
//!
//! The format is a fixed contract: one five-line reference header per
//! reference system in ID order, a blank line, then two `bondpnt` lines
//! per wire in bond-sequence order (line 1 = source point against the
//! source reference, line 2 = destination point against the destination
//! reference). Column spacing is exactly what the machine accepts.

use crate::layout::{Layout, ReferenceSystem};
use crate::types::{EndSettings, Settings};

/// Format a millimetre value: shortest decimal of the 3 dp-rounded value
/// with at least one fractional digit, so `2` prints as `2.0` and
/// `-17.682` stays `-17.682`.
pub fn fmt_mm(v: f64) -> String {
    let s = format!("{v:.3}");
    let trimmed = s.trim_end_matches('0');
    let out = if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    };
    if out == "-0.0" { "0.0".to_string() } else { out }
}

/// The five-line paragraph required for each reference system at the top
/// of the file.
fn refheader(system: &ReferenceSystem, params: &EndSettings) -> String {
    format!(
        "refpnt         {id},         1,   {x1},    {y1}\n\
         refpnt         {id},         2,   {x2},    {y2}\n\
         refuspower     {id},         1,    {usp}\n\
         refforce       {id},         1,    {bf}\n\
         refustime      {id},         1,    {ust}",
        id = system.id,
        x1 = fmt_mm(system.first.x),
        y1 = fmt_mm(system.first.y),
        x2 = fmt_mm(system.second.x),
        y2 = fmt_mm(system.second.y),
        usp = params.power,
        bf = params.force,
        ust = params.time,
    )
}

/// Serialize the whole layout.
pub fn write_cad(layout: &Layout, settings: &Settings) -> String {
    let mut out = String::new();

    for system in &layout.references {
        out.push_str(&refheader(system, settings.end(system.role)));
        out.push('\n');
    }
    out.push('\n');

    for side in &layout.sides {
        for rank in &side.ranks {
            for group in &rank.groups {
                for bond in &group.bonds {
                    let w = &bond.wire;
                    out.push_str(&format!(
                        "bondpnt {n},    1,    {r},    {x},    {y}\n",
                        n = bond.seq,
                        r = rank.srce_ref,
                        x = fmt_mm(w.srce.x),
                        y = fmt_mm(w.srce.y),
                    ));
                    out.push_str(&format!(
                        "bondpnt {n},    2,    {r},    {x},    {y}\n",
                        n = bond.seq,
                        r = group.dest_ref,
                        x = fmt_mm(w.dest.x),
                        y = fmt_mm(w.dest.y),
                    ));
                }
            }
        }
    }

    out
}
