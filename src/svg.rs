//! SVG serialization of a poster drawing.

use std::fmt::Write;

use crate::geometry::Point;
use crate::primitive::{
    Alignment, Drawing, FontWeight, Justification, MarkerKind, Paint, Primitive, TextPlacement,
};

pub fn to_svg(drawing: &Drawing) -> String {
    let page = drawing.page;
    let mut svg = String::new();
    let flip = |p: Point| Point::new(p.x, page.height - p.y);

    // fmt::Write into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}pt" height="{h:.2}pt" viewBox="0 0 {w:.3} {h:.3}">"#,
        w = page.width,
        h = page.height
    );

    for primitive in &drawing.primitives {
        match primitive {
            Primitive::Path {
                points,
                closed,
                style,
            } => {
                if points.is_empty() {
                    continue;
                }
                let mut d = String::with_capacity(points.len() * 16);
                for (i, p) in points.iter().map(|&p| flip(p)).enumerate() {
                    let cmd = if i == 0 { 'M' } else { 'L' };
                    let _ = write!(d, "{}{:.3},{:.3} ", cmd, p.x, p.y);
                }
                if *closed {
                    d.push('Z');
                }
                let fill = match style.paint {
                    Paint::Stroke => "none".to_string(),
                    Paint::Fill | Paint::FillAndStroke => style.fill.to_hex(),
                };
                let stroke = match style.paint {
                    Paint::Fill => "none".to_string(),
                    Paint::Stroke | Paint::FillAndStroke => style.stroke.to_hex(),
                };
                let _ = writeln!(
                    svg,
                    r#"<path d="{}" fill="{}" fill-rule="evenodd" stroke="{}" stroke-width="{}"/>"#,
                    d.trim_end(),
                    fill,
                    stroke,
                    style.line_width
                );
            }
            Primitive::Text(text) => write_text(&mut svg, text, flip(text.at)),
            Primitive::Marker {
                at,
                kind: MarkerKind::Asterisk,
                size,
                color,
            } => {
                let p = flip(*at);
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.3}" y="{:.3}" font-size="{:.2}" fill="{}" text-anchor="middle" dominant-baseline="central">*</text>"#,
                    p.x,
                    p.y,
                    size * 2.0,
                    color.to_hex()
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_text(svg: &mut String, text: &TextPlacement, at: Point) {
    let anchor = match text.justification {
        Justification::Left => "start",
        Justification::Centered => "middle",
        Justification::Right => "end",
    };
    let baseline = match text.alignment {
        Alignment::Top => "hanging",
        Alignment::MidHeight => "central",
    };
    let style = match text.weight {
        FontWeight::Regular => "",
        FontWeight::Bold => r#" font-weight="bold""#,
        FontWeight::Swash => r#" font-style="italic""#,
    };
    let _ = writeln!(
        svg,
        r#"<text x="{:.3}" y="{:.3}" font-family="serif" font-size="{:.2}" fill="{}" text-anchor="{}" dominant-baseline="{}"{}>{}</text>"#,
        at.x,
        at.y,
        text.size,
        text.color.to_hex(),
        anchor,
        baseline,
        style,
        escape(&text.text)
    );
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Page, PathStyle, Rgb};

    fn drawing(primitives: Vec<Primitive>) -> Drawing {
        Drawing {
            page: Page {
                width: 100.0,
                height: 50.0,
            },
            primitives,
        }
    }

    #[test]
    fn paths_are_flipped_into_svg_space() {
        let svg = to_svg(&drawing(vec![Primitive::Path {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 50.0)],
            closed: true,
            style: PathStyle::fill(Rgb::new(1.0, 0.0, 0.0)),
        }]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"d="M0.000,50.000 L10.000,0.000 Z""#));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r#"stroke="none""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_is_anchored_and_escaped() {
        let svg = to_svg(&drawing(vec![Primitive::Text(TextPlacement {
            text: "a<b & c".into(),
            at: Point::new(5.0, 10.0),
            alignment: Alignment::Top,
            justification: Justification::Right,
            size: 12.0,
            weight: FontWeight::Bold,
            color: Rgb::new(0.0, 0.0, 0.0),
        })]));
        assert!(svg.contains("a&lt;b &amp; c"));
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(r#"dominant-baseline="hanging""#));
        assert!(svg.contains(r#"y="40.000""#));
    }

    #[test]
    fn empty_paths_are_skipped() {
        let svg = to_svg(&drawing(vec![Primitive::Path {
            points: Vec::new(),
            closed: false,
            style: PathStyle::stroke(Rgb::new(0.0, 0.0, 0.0), 1.0),
        }]));
        assert!(!svg.contains("<path"));
    }
}
