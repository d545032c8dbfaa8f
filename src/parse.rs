//! Wire-record reader for comma-separated coordinate exports.
//!
//! One wire per line, blank lines skipped. Two layouts are recognised:
//!
//! - 5 fields: `pin, sx, sy, dx, dy`
//! - 6+ fields: `user, sx, sy, user, dx, dy`: only columns 2, 3, 5, 6 are
//!   coordinates; the first column becomes the pin number when it parses
//!   as an integer, otherwise it is the user's to keep.
//!
//! The instrument's origin offset is subtracted from both endpoints here,
//! before anything looks at wire angles.

use glam::DVec2;
use miette::{NamedSource, SourceSpan};

use crate::errors::ParseError;
use crate::types::{Settings, Wire};

fn named(name: &str, input: &str) -> NamedSource<String> {
    NamedSource::new(name, input.to_string())
}

/// Parse every record in `input`. The first malformed record aborts the
/// run; NaNs must not reach the pipeline.
pub fn parse_wires(input: &str, name: &str, settings: &Settings) -> Result<Vec<Wire>, ParseError> {
    let mut wires = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        // byte offset of the line within the input; `lines` strips `\r\n`
        // as well as `\n`, so counting lengths would drift on CRLF input
        let offset = line.as_ptr() as usize - input.as_ptr() as usize;
        let span: SourceSpan = (offset, line.len()).into();

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let coords: [&str; 4] = match fields.len() {
            5 => [fields[1], fields[2], fields[3], fields[4]],
            n if n >= 6 => [fields[1], fields[2], fields[4], fields[5]],
            n => {
                return Err(ParseError::BadRecord {
                    line: idx + 1,
                    found: n,
                    src: named(name, input),
                    span,
                });
            }
        };
        let pin = fields[0].parse::<u32>().ok();

        let mut vals = [0f64; 4];
        for (i, field) in coords.iter().enumerate() {
            let v = field.parse::<f64>().ok().filter(|v| v.is_finite());
            match v {
                Some(v) => vals[i] = v,
                None => {
                    return Err(ParseError::BadCoordinate {
                        line: idx + 1,
                        field: (*field).to_string(),
                        src: named(name, input),
                        span,
                    });
                }
            }
        }

        wires.push(Wire::new(
            pin,
            DVec2::new(vals[0], vals[1]) - settings.origin,
            DVec2::new(vals[2], vals[3]) - settings.origin,
        ));
    }

    Ok(wires)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_five_column_record() {
        let settings = Settings::default();
        let wires = parse_wires("7, 1.5, 2.5, 10.0, 20.0\n", "<input>", &settings).unwrap();
        assert_eq!(wires.len(), 1);
        assert_eq!(wires[0].pin, Some(7));
        assert_eq!(wires[0].srce, DVec2::new(1.5, 2.5));
        assert_eq!(wires[0].dest, DVec2::new(10.0, 20.0));
    }

    #[test]
    fn parse_six_column_record_skips_user_columns() {
        let settings = Settings::default();
        let wires = parse_wires("x, 1.0, 2.0, y, 3.0, 4.0", "<input>", &settings).unwrap();
        assert_eq!(wires[0].pin, None);
        assert_eq!(wires[0].srce, DVec2::new(1.0, 2.0));
        assert_eq!(wires[0].dest, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn parse_applies_origin_offset() {
        let settings = Settings {
            origin: DVec2::new(125000.0, 131000.0),
            ..Settings::default()
        };
        let wires = parse_wires("1, 125001, 131002, 125003, 131004", "<input>", &settings).unwrap();
        assert_eq!(wires[0].srce, DVec2::new(1.0, 2.0));
        assert_eq!(wires[0].dest, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn parse_skips_blank_lines() {
        let settings = Settings::default();
        let input = "1, 0, 1, 0, 2\n\n2, 0, 3, 0, 4\n";
        let wires = parse_wires(input, "<input>", &settings).unwrap();
        assert_eq!(wires.len(), 2);
    }

    #[test]
    fn parse_rejects_short_record() {
        let settings = Settings::default();
        let err = parse_wires("1, 2, 3\n", "<input>", &settings).unwrap_err();
        assert!(matches!(err, ParseError::BadRecord { line: 1, found: 3, .. }));
    }

    #[test]
    fn parse_spans_account_for_crlf_endings() {
        let settings = Settings::default();
        let input = "1, 0, 1, 0, 2\r\n2, oops, 3, 0, 4\r\n";
        let err = parse_wires(input, "<input>", &settings).unwrap_err();
        let ParseError::BadCoordinate { line, span, .. } = err else {
            panic!("expected a coordinate error");
        };
        assert_eq!(line, 2);
        // the second record starts after the 13-byte first line plus \r\n
        assert_eq!(span.offset(), 15);
        assert_eq!(span.len(), input.lines().nth(1).unwrap().len());
    }

    #[test]
    fn parse_rejects_non_finite_coordinate() {
        let settings = Settings::default();
        let err = parse_wires("1, NaN, 2, 3, 4", "<input>", &settings).unwrap_err();
        assert!(matches!(err, ParseError::BadCoordinate { line: 1, .. }));
        let err = parse_wires("1, oops, 2, 3, 4", "<input>", &settings).unwrap_err();
        assert!(matches!(err, ParseError::BadCoordinate { .. }));
    }
}
