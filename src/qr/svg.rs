//! SVG document construction for styled symbols

use super::layout::{FINDER_MODULES, Geometry, LogoArea};
use super::options::{CornerDotType, CornerSquareType, DotType, StyleOptions};
use crate::error::Result;
use qrcode::{Color, QrCode};
use std::fmt::Write as _;

/// Logo ready to be composited
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedLogo {
    /// Self-contained `data:` URI of the logo
    pub data_uri: String,
    /// Height divided by width
    pub aspect: f64,
}

/// Render a complete SVG document for the given options.
pub(crate) fn render_document(
    options: &StyleOptions,
    logo: Option<&EmbeddedLogo>,
) -> Result<String> {
    let code = QrCode::with_error_correction_level(
        options.data.as_bytes(),
        options.qr_options.error_correction_level.into(),
    )?;
    let count = code.width();
    let modules = code.to_colors();
    let geometry = Geometry::fit(count, options.width, options.height, options.qr_options.margin)?;

    let cut_out = logo.and_then(|logo| {
        LogoArea::compute(
            &geometry,
            options.image_options.image_size,
            options.image_options.margin,
            logo.aspect,
        )
        .map(|area| (logo, area))
    });
    let hidden = cut_out
        .as_ref()
        .filter(|_| options.image_options.hide_background_dots)
        .map(|(_, area)| *area);

    let (width, height) = (options.width, options.height);
    let mut doc = String::with_capacity(count * count * 48);
    let _ = write!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    if !options.background_options.is_transparent() {
        let _ = write!(
            doc,
            r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
            escape(&options.background_options.color)
        );
    }

    let _ = write!(doc, r#"<g fill="{}">"#, escape(&options.dots_options.color));
    for row in 0..count {
        for col in 0..count {
            if modules[row * count + col] != Color::Dark || geometry.in_finder(col, row) {
                continue;
            }
            if hidden.is_some_and(|area| area.covers(col, row)) {
                continue;
            }
            let (x, y) = geometry.module_origin(col, row);
            write_dot(&mut doc, options.dots_options.kind, x, y, geometry.dot);
        }
    }
    doc.push_str("</g>");

    let corner_fill = escape(&options.corners_square_options.color);
    let dot_fill = escape(&options.corners_dot_options.color);
    for (col, row) in geometry.finder_origins() {
        let (x, y) = geometry.module_origin(col, row);
        write_corner_square(
            &mut doc,
            options.corners_square_options.kind,
            &corner_fill,
            x,
            y,
            geometry.dot,
        );
        write_corner_dot(
            &mut doc,
            options.corners_dot_options.kind,
            &dot_fill,
            x,
            y,
            geometry.dot,
        );
    }

    if let Some((logo, area)) = cut_out {
        let _ = write!(
            doc,
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
            area.x, area.y, area.width, area.height, logo.data_uri
        );
    }

    doc.push_str("</svg>");
    Ok(doc)
}

fn write_dot(doc: &mut String, kind: DotType, x: f64, y: f64, size: f64) {
    match kind {
        DotType::Dots => {
            let r = size / 2.0;
            let _ = write!(doc, r#"<circle cx="{}" cy="{}" r="{r}"/>"#, x + r, y + r);
        }
        DotType::Square => {
            let _ = write!(
                doc,
                r#"<rect x="{x}" y="{y}" width="{size}" height="{size}"/>"#
            );
        }
    }
}

fn write_corner_square(
    doc: &mut String,
    kind: CornerSquareType,
    fill: &str,
    x: f64,
    y: f64,
    dot: f64,
) {
    let outer = FINDER_MODULES as f64 * dot;
    let inner = outer - 2.0 * dot;
    let (outer_r, inner_r) = match kind {
        CornerSquareType::ExtraRounded => (2.5 * dot, 1.5 * dot),
        CornerSquareType::Square => (0.0, 0.0),
    };

    let _ = write!(doc, r#"<path fill="{fill}" fill-rule="evenodd" d=""#);
    rounded_square(doc, x, y, outer, outer_r);
    rounded_square(doc, x + dot, y + dot, inner, inner_r);
    doc.push_str(r#""/>"#);
}

fn write_corner_dot(
    doc: &mut String,
    kind: CornerDotType,
    fill: &str,
    x: f64,
    y: f64,
    dot: f64,
) {
    let centre = FINDER_MODULES as f64 * dot / 2.0;
    match kind {
        CornerDotType::Dot => {
            let _ = write!(
                doc,
                r#"<circle fill="{fill}" cx="{}" cy="{}" r="{}"/>"#,
                x + centre,
                y + centre,
                1.5 * dot
            );
        }
        CornerDotType::Square => {
            let side = 3.0 * dot;
            let _ = write!(
                doc,
                r#"<rect fill="{fill}" x="{}" y="{}" width="{side}" height="{side}"/>"#,
                x + 2.0 * dot,
                y + 2.0 * dot
            );
        }
    }
}

/// Append a closed square subpath with corner radius `r`.
fn rounded_square(doc: &mut String, x: f64, y: f64, size: f64, r: f64) {
    let right = x + size;
    let bottom = y + size;
    if r <= 0.0 {
        let _ = write!(doc, "M{x} {y}H{right}V{bottom}H{x}Z");
        return;
    }
    let _ = write!(
        doc,
        "M{} {y}H{}A{r} {r} 0 0 1 {right} {}V{}A{r} {r} 0 0 1 {} {bottom}H{}A{r} {r} 0 0 1 {x} {}V{}A{r} {r} 0 0 1 {} {y}Z",
        x + r,
        right - r,
        y + r,
        bottom - r,
        right - r,
        x + r,
        bottom - r,
        y + r,
        x + r,
    );
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::options::{
        BackgroundOptions, CornersDotOptions, CornersSquareOptions, DotsOptions, DrawType,
        ImageOptions, QrOptions,
    };

    fn options(data: &str, size: u32) -> StyleOptions {
        StyleOptions {
            width: size,
            height: size,
            draw_type: DrawType::Svg,
            data: data.to_string(),
            image: None,
            image_options: ImageOptions::default(),
            qr_options: QrOptions::default(),
            background_options: BackgroundOptions::default(),
            dots_options: DotsOptions {
                color: "#141413".to_string(),
                kind: DotType::Dots,
            },
            corners_square_options: CornersSquareOptions {
                color: "#cf4500".to_string(),
                kind: CornerSquareType::ExtraRounded,
            },
            corners_dot_options: CornersDotOptions {
                color: "#cf4500".to_string(),
                kind: CornerDotType::Dot,
            },
        }
    }

    #[test]
    fn document_has_requested_dimensions_and_colours() {
        let doc = render_document(&options("https://shocky.in", 360), None).unwrap();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"width="360" height="360" viewBox="0 0 360 360""#));
        assert!(doc.contains(r##"<g fill="#141413">"##));
        assert_eq!(doc.matches(r##"<path fill="#cf4500""##).count(), 3);
        assert!(doc.ends_with("</svg>"));
    }

    #[test]
    fn transparent_background_paints_nothing() {
        let doc = render_document(&options("hello", 200), None).unwrap();
        assert!(!doc.contains("<rect width="));

        let mut opaque = options("hello", 200);
        opaque.background_options.color = "#000000".to_string();
        let doc = render_document(&opaque, None).unwrap();
        assert!(doc.contains(r##"<rect width="200" height="200" fill="#000000"/>"##));
    }

    #[test]
    fn logo_hides_background_dots() {
        let logo = EmbeddedLogo {
            data_uri: "data:image/svg+xml;base64,PHN2Zy8+".to_string(),
            aspect: 1.0,
        };
        let plain = render_document(&options("https://shocky.in", 360), None).unwrap();
        let with_logo = render_document(&options("https://shocky.in", 360), Some(&logo)).unwrap();

        assert!(with_logo.contains(r#"xlink:href="data:image/svg+xml;base64,PHN2Zy8+""#));
        assert!(with_logo.matches("<circle").count() < plain.matches("<circle").count());

        let mut shown = options("https://shocky.in", 360);
        shown.image_options.hide_background_dots = false;
        let overlaid = render_document(&shown, Some(&logo)).unwrap();
        assert_eq!(
            overlaid.matches("<circle").count(),
            plain.matches("<circle").count()
        );
    }

    #[test]
    fn escapes_attribute_values() {
        assert_eq!(escape(r#"a"<b>&"#), "a&quot;&lt;b&gt;&amp;");
    }
}
