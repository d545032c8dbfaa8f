//! Command-line front end.
//!
//! `wirecad <wires.csv> [output-stem]` writes `<stem>.CAD` and
//! `<stem>.html` into the working directory; the stem defaults to the
//! input file name.

use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr, miette};
use wirecad::{Settings, convert};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or_else(|| miette!("usage: wirecad <wires.csv> [output-stem]"))?;
    let stem = args.next().unwrap_or_else(|| {
        Path::new(&input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wirecad".to_string())
    });

    let text = fs::read_to_string(&input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {input}"))?;

    let settings = Settings::default();
    let result = convert(&text, &input, &settings)?;

    let cad_path = format!("{stem}.CAD");
    let html_path = format!("{stem}.html");
    fs::write(&cad_path, &result.cad)
        .into_diagnostic()
        .wrap_err_with(|| format!("writing {cad_path}"))?;
    fs::write(&html_path, &result.html)
        .into_diagnostic()
        .wrap_err_with(|| format!("writing {html_path}"))?;

    println!(
        "{} wires allocated, {} reference systems",
        result.layout.wire_count,
        result.layout.references.len()
    );
    println!("{cad_path} and {html_path} created");
    Ok(())
}
