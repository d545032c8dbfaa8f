//! HTML/SVG diagram of the reconstructed layout.
//!
//! Another fixed output contract: an HTML page holding one SVG of the
//! whole layout plus four corner-detail views that reuse the main group.
//! Wires are paths labelled with pin numbers and bond sequence numbers on
//! text paths; reference points are crosses labelled `n.k`. Physical Y
//! grows upward, SVG Y grows downward, so every Y is negated on the way
//! out.

use crate::cad::fmt_mm;
use crate::layout::Layout;
use crate::types::min_max;

/// Presentation knobs with the reference defaults. Geometry is not
/// affected; only stroke widths, font sizes and magnification.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Pixels per millimetre; up to 60 for readable text on A3 prints.
    pub magnification: f64,
    /// Margin around the destination extents, mm.
    pub border: f64,
    pub text_size: f64,
    pub ref_text_size: f64,
    pub stroke_width: f64,
    pub ref_stroke_width: f64,
    /// How far along its wire a bond-sequence number sits.
    pub num_offset: f64,
    /// Fraction of the full view shown in each corner detail.
    pub detail_scale: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        SvgOptions {
            magnification: 20.0,
            border: 0.2,
            text_size: 0.15,
            ref_text_size: 0.2,
            stroke_width: 0.05,
            ref_stroke_width: 0.02,
            num_offset: 3.0,
            detail_scale: 0.1,
        }
    }
}

const WIRE_COLORS: [&str; 2] = ["red", "purple"];

/// Label offsets per side, tuned so reference labels clear the crosses.
const REF_LABEL_OFFSETS: [(f64, f64); 4] =
    [(-0.1, 0.15), (0.0, -0.02), (-0.1, -0.02), (-0.3, -0.02)];

fn html_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         \t<head>\n\
         \t\t<title>{title}</title>\n\
         \t\t<meta charset=\"utf-8\">\n\
         \t\t<meta name=\"viewport\" content=\"width=device-width, user-scalable=no,\n\
         \t\t\tminimum-scale=1.0, maximum-scale=1.0\">\n\
         \t\t<link rel=\"stylesheet\" type=\"text/css\" href=\"svg.css\" media=\"screen\">\n\
         \t</head>\n\
         <body>\n\
         <h2>{title}</h2>"
    )
}

fn svg_head(scale: f64, x_size: f64, y_size: f64, x_abs: f64, y_abs: f64) -> String {
    format!(
        "<svg id=\"svg\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         ev=\"http://www.w3.org/2001/xml-events\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"{xa} {ya} {xs} {ys}\">",
        w = fmt_mm(x_size * scale),
        h = fmt_mm(y_size * scale),
        xa = fmt_mm(x_abs),
        ya = fmt_mm(y_abs),
        xs = fmt_mm(x_size),
        ys = fmt_mm(y_size),
    )
}

/// SVG rect element in a bond-pad shape.
fn svg_square(name: &str, size: f64) -> String {
    let d = fmt_mm(size / 2.0);
    let s = fmt_mm(size);
    format!("<rect id=\"{name}\" x=\"-{d}\" y=\"-{d}\" height=\"{s}\" width=\"{s}\"/>")
}

/// SVG path element in a cross shape.
fn svg_cross(name: &str, size: f64) -> String {
    let s = fmt_mm(size);
    format!("<path id=\"{name}\" d=\"M-{s} 0L{s} 0 M0 -{s}L0 {s}\"/>")
}

fn svg_use(name: &str, x: f64, y: f64) -> String {
    format!(
        "\t<use xlink:href=\"#{name}\" x=\"{}\" y=\"{}\" />",
        fmt_mm(x),
        fmt_mm(y)
    )
}

fn svg_text(content: &str, x: &str, y: &str, dx: &str, dy: &str) -> String {
    format!("\t<text dx=\"{dx}\" dy=\"{dy}\" x=\"{x}\" y=\"{y}\">{content}</text>")
}

fn svg_tspan(font_size: f64, content: &str, dx: &str) -> String {
    format!(
        "<tspan dx=\"{dx}\" dy=\"0\" font-size=\"{}\">{content}</tspan>",
        fmt_mm(font_size)
    )
}

fn svg_text_path(href: &str, content: &str) -> String {
    format!("<textPath xlink:href=\"#{href}\">{content}</textPath>")
}

/// Shapes for re-use in the SVG.
fn svg_defs() -> String {
    format!(
        "<defs>\n\t{}\n\t{}\n\t{}\n\t{}\n</defs>",
        svg_square("chip", 0.08),
        svg_square("pcb", 0.15),
        svg_cross("cross", 0.2),
        svg_cross("centre", 0.9),
    )
}

/// Wrap a list of elements in a styled `g` element.
fn to_grp(group: &mut Vec<String>, opener: &str) {
    group.insert(0, opener.to_string());
    group.push("</g>".to_string());
}

/// A corner-detail SVG derived from the whole via the shared group.
fn detail_corner(viewbox: &str, px: f64, py: f64) -> String {
    format!(
        "<svg class=\"pagebreak\" viewBox=\"{viewbox}\">\n{}\n</svg>",
        svg_use("everything", px, py)
    )
}

/// Render the layout diagram as a standalone HTML page.
pub fn write_html(layout: &Layout, title: &str, opts: &SvgOptions) -> String {
    let mut wire_grps: Vec<Vec<String>> = Vec::new();
    let mut pins: Vec<String> = Vec::new();
    let mut wirenums: Vec<String> = Vec::new();
    let mut chip_pads: Vec<String> = Vec::new();
    let mut pcb_pads: Vec<String> = Vec::new();

    for side in &layout.sides {
        for rank in &side.ranks {
            for group in &rank.groups {
                let mut grp = Vec::new();
                for bond in &group.bonds {
                    let w = &bond.wire;
                    let wid = match w.pin {
                        Some(pin) => format!("w{pin}"),
                        None => format!("w{}", bond.seq),
                    };
                    grp.push(format!(
                        "\t<path id=\"{wid}\" d=\"M {} {} L {} {} z\"/>",
                        fmt_mm(w.srce.x),
                        fmt_mm(-w.srce.y),
                        fmt_mm(w.dest.x),
                        fmt_mm(-w.dest.y),
                    ));
                    chip_pads.push(svg_use("chip", w.srce.x, -w.srce.y));
                    pcb_pads.push(svg_use("pcb", w.dest.x, -w.dest.y));

                    if let Some(pin) = w.pin {
                        let label = svg_tspan(opts.text_size, &pin.to_string(), "0");
                        pins.push(svg_text(&svg_text_path(&wid, &label), "0", "0", "0", "0"));
                    }
                    let num = svg_tspan(
                        opts.text_size,
                        &bond.seq.to_string(),
                        &fmt_mm(opts.num_offset),
                    );
                    wirenums.push(svg_text(&svg_text_path(&wid, &num), "0", "0", "0", "0"));
                }
                wire_grps.push(grp);
            }
        }
    }

    // crosses and labels at every reference point, per side so the label
    // offsets can differ
    let mut ref_marks: Vec<String> = Vec::new();
    let mut ref_text: Vec<String> = Vec::new();
    for (i, side) in layout.sides.iter().enumerate() {
        let (offx, offy) = REF_LABEL_OFFSETS[i];
        let mut seen: Vec<u32> = Vec::new();
        for rank in &side.ranks {
            for group in &rank.groups {
                if !seen.contains(&group.dest_ref) {
                    seen.push(group.dest_ref);
                }
            }
            seen.push(rank.srce_ref);
        }
        for id in seen {
            let system = &layout.references[(id - 1) as usize];
            for (k, pt) in [(1, system.first), (2, system.second)] {
                ref_marks.push(svg_use("cross", pt.x, -pt.y));
                ref_text.push(svg_text(
                    &format!("{id}.{k}"),
                    &fmt_mm(pt.x),
                    &fmt_mm(-pt.y),
                    &fmt_mm(offx),
                    &fmt_mm(offy),
                ));
            }
        }
    }

    // viewBox from the destination extents; Y negated for SVG
    let (x_min, x_max) = min_max(layout.bonds().map(|b| b.wire.dest.x));
    let (y_min, y_max) = min_max(layout.bonds().map(|b| b.wire.dest.y));
    let x_size = x_max - x_min + 2.0 * opts.border;
    let y_size = y_max - y_min + 2.0 * opts.border;
    let x_abs = x_min - opts.border;
    let y_abs = -y_max - opts.border;

    for (i, grp) in wire_grps.iter_mut().enumerate() {
        let col = WIRE_COLORS[i % WIRE_COLORS.len()];
        let opener = format!(
            "<g stroke-opacity=\"0.3\" stroke=\"{col}\" stroke-width=\"{sw}\" id=\"wires{n}\">",
            sw = fmt_mm(opts.stroke_width),
            n = i + 1,
        );
        to_grp(grp, &opener);
    }
    to_grp(&mut chip_pads, "<g id=\"chipPads\" fill=\"#ddd\">");
    to_grp(&mut pcb_pads, "<g id=\"pcbPads\" fill=\"#fda\">");
    to_grp(&mut pins, "<g id=\"pins\" fill=\"#a42\">");
    let num_opener = format!(
        "<g id=\"wirenums\" font-size=\"{}\" fill=\"#089\">",
        fmt_mm(opts.ref_text_size)
    );
    to_grp(&mut wirenums, &num_opener);
    let ref_text_opener = format!(
        "<g id=\"reftext\" font-size=\"{}\" fill=\"#089\">",
        fmt_mm(opts.ref_text_size)
    );
    to_grp(&mut ref_text, &ref_text_opener);
    let ref_marks_opener = format!(
        "<g id=\"refmarks\" stroke=\"#089\" stroke-width=\"{}\">",
        fmt_mm(opts.ref_stroke_width)
    );
    to_grp(&mut ref_marks, &ref_marks_opener);

    let mut out = String::new();
    let mut line = |s: &str| {
        out.push_str(s);
        out.push('\n');
    };

    line(&html_head(title));
    line("<div class=\"svgcont\">");
    line(&svg_head(opts.magnification, x_size, y_size, x_abs, y_abs));
    line(&svg_defs());
    line("<g id=\"everything\">");
    for grp in &wire_grps {
        for el in grp {
            line(el);
        }
    }
    for list in [&chip_pads, &pcb_pads, &pins, &wirenums, &ref_marks, &ref_text] {
        for el in list {
            line(el);
        }
    }
    line("</g>");
    line("</svg>");
    line("</div>");

    // corner details separated from the main diagram
    let viewbox = format!(
        "0 0 {} {}",
        fmt_mm(x_size * opts.detail_scale),
        fmt_mm(y_size * opts.detail_scale)
    );
    let pict_x = -x_abs - x_size * 0.9;
    let pict_y = -y_abs - y_size * 0.9;
    for (heading, px, py) in [
        ("Top Left", -x_abs, -y_abs),
        ("Top Right", pict_x, -y_abs),
        ("Bottom Left", -x_abs, pict_y),
        ("Bottom Right", pict_x, pict_y),
    ] {
        line(&format!("<h2>{heading}</h2>"));
        line(&detail_corner(&viewbox, px, py));
    }

    line("</body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Settings, Wire};
    use glam::DVec2;

    fn layout() -> Layout {
        let wires = vec![
            Wire::new(Some(1), DVec2::new(-2.0, 5.0), DVec2::new(-2.0, 50.0)),
            Wire::new(Some(2), DVec2::new(2.0, 5.0), DVec2::new(2.0, 50.0)),
            Wire::new(Some(3), DVec2::new(-2.0, -5.0), DVec2::new(-2.0, -50.0)),
            Wire::new(Some(4), DVec2::new(2.0, -5.0), DVec2::new(2.0, -50.0)),
        ];
        let mut settings = Settings::default();
        settings.dest.scale = 1.0;
        settings.table = DVec2::ZERO;
        Layout::build(wires, &settings).unwrap()
    }

    #[test]
    fn html_contains_viewbox_from_dest_extents() {
        let html = write_html(&layout(), "test", &SvgOptions::default());
        // x: -2..2, y: -50..50, border 0.2
        assert!(html.contains("viewBox=\"-2.2 -50.2 4.4 100.4\""));
    }

    #[test]
    fn wires_render_as_paths_with_pin_ids() {
        let html = write_html(&layout(), "test", &SvgOptions::default());
        assert!(html.contains("<path id=\"w1\" d=\"M -2.0 -5.0 L -2.0 -50.0 z\"/>"));
        assert!(html.contains("xlink:href=\"#w1\""));
    }

    #[test]
    fn reference_labels_present_for_all_systems() {
        let html = write_html(&layout(), "test", &SvgOptions::default());
        for label in ["1.1", "1.2", "2.1", "2.2", "3.1", "3.2", "4.1", "4.2"] {
            assert!(html.contains(&format!(">{label}</text>")), "missing {label}");
        }
    }

    #[test]
    fn four_corner_details_reuse_the_main_group() {
        let html = write_html(&layout(), "test", &SvgOptions::default());
        assert_eq!(html.matches("xlink:href=\"#everything\"").count(), 4);
        assert!(html.contains("<h2>Bottom Right</h2>"));
    }
}
