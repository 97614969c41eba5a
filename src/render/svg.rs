//! # SVG Renderer
//!
//! Serializes a layer list into a standalone SVG document sized to the
//! physical page (`width="210mm"` etc.) with the logical canvas as its
//! view box, so the output prints at exact size.
//!
//! ```text
//! Vec<Layer> → SvgWriter → <svg> … </svg>
//!                 ↓
//!          per layer: <g opacity, mix-blend-mode, transform>
//!          gradients, tile patterns, clips, shadows → <defs>
//!          QR modules from the qrcode encoder
//! ```

use super::blend::BlendMode;
use super::layer::{Clip, Layer, LayerContent, Paint, Rect, Shadow, Shape, Stroke, TextLine};
use super::symbols;
use crate::document::PageGeometry;
use crate::error::InsigniaError;

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text for XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render layers to an SVG document for `page`.
pub fn render_svg(layers: &[Layer], page: &PageGeometry) -> Result<String, InsigniaError> {
    let mut writer = SvgWriter::default();
    for layer in layers {
        writer.layer(layer)?;
    }
    Ok(writer.finish(layers, page))
}

#[derive(Default)]
struct SvgWriter {
    defs: String,
    body: String,
    next_id: u32,
}

impl SvgWriter {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn finish(self, layers: &[Layer], page: &PageGeometry) -> String {
        // Clip to the background's rounded outline so card corners stay round.
        let radius = layers
            .iter()
            .find_map(|l| match &l.content {
                LayerContent::Fill { corner_radius, .. } if l.name == "background" => {
                    Some(*corner_radius)
                }
                _ => None,
            })
            .unwrap_or(0.0);

        let mut out = String::new();
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}mm" height="{}mm" viewBox="0 0 {} {}">"#,
            num(page.width_mm),
            num(page.height_mm),
            num(page.width),
            num(page.height)
        ));
        out.push_str("<defs>");
        out.push_str(&format!(
            r#"<clipPath id="page"><rect x="0" y="0" width="{}" height="{}" rx="{}"/></clipPath>"#,
            num(page.width),
            num(page.height),
            num(radius)
        ));
        out.push_str(&self.defs);
        out.push_str("</defs>");
        out.push_str(r#"<g clip-path="url(#page)">"#);
        out.push_str(&self.body);
        out.push_str("</g></svg>");
        out
    }

    fn layer(&mut self, layer: &Layer) -> Result<(), InsigniaError> {
        let mut attrs = format!(r#" id="{}" data-z="{}""#, escape(&layer.name), layer.z);
        if layer.opacity < 1.0 {
            attrs.push_str(&format!(r#" opacity="{}""#, num(layer.opacity)));
        }
        if layer.blend != BlendMode::Normal {
            attrs.push_str(&format!(
                r#" style="mix-blend-mode:{}""#,
                layer.blend.css_name()
            ));
        }
        let transform = layer.transform.to_svg();
        if !transform.is_empty() {
            attrs.push_str(&format!(r#" transform="{}""#, transform));
        }

        self.body.push_str(&format!("<g{}>", attrs));
        let b = layer.bounds;
        match &layer.content {
            LayerContent::Fill {
                paint,
                corner_radius,
                shadow,
            } => self.fill(b, paint, *corner_radius, shadow.as_ref()),
            LayerContent::Shapes {
                view_box,
                fill,
                stroke,
                shapes,
            } => {
                let style = paint_attrs(fill.as_deref(), stroke.as_ref());
                match view_box {
                    Some(vb) => {
                        self.body.push_str(&format!(
                            r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="{} {} {} {}" preserveAspectRatio="none" overflow="hidden"><g{}>"#,
                            num(b.x),
                            num(b.y),
                            num(b.width),
                            num(b.height),
                            num(vb.x),
                            num(vb.y),
                            num(vb.width),
                            num(vb.height),
                            style
                        ));
                        self.shapes(shapes);
                        self.body.push_str("</g></svg>");
                    }
                    None => {
                        self.body.push_str(&format!("<g{}>", style));
                        self.shapes(shapes);
                        self.body.push_str("</g>");
                    }
                }
            }
            LayerContent::Tiled {
                tile_width,
                tile_height,
                fill,
                stroke,
                shapes,
            } => {
                let id = self.id("tile");
                let style = paint_attrs(fill.as_deref(), stroke.as_ref());
                let mut tile = String::new();
                for shape in shapes {
                    tile.push_str(&shape_svg(shape));
                }
                self.defs.push_str(&format!(
                    r#"<pattern id="{}" patternUnits="userSpaceOnUse" width="{}" height="{}"><g{}>{}</g></pattern>"#,
                    id,
                    num(*tile_width),
                    num(*tile_height),
                    style,
                    tile
                ));
                self.body.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="url(#{})"/>"#,
                    num(b.x),
                    num(b.y),
                    num(b.width),
                    num(b.height),
                    id
                ));
            }
            LayerContent::Text { lines } => {
                for line in lines {
                    self.body.push_str(&text_svg(line));
                }
            }
            LayerContent::Image {
                src,
                clip,
                border,
                shadow,
            } => self.image(b, src, *clip, border.as_ref(), shadow.as_ref()),
            LayerContent::Qr { payload, color } => {
                let (side, dark) = symbols::qr_modules(payload)?;
                let size = b.width.min(b.height);
                let module = size / side as f32;
                let x0 = b.x + (b.width - size) / 2.0;
                let y0 = b.y + (b.height - size) / 2.0;
                self.body.push_str(&format!(
                    r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff"/><g fill="{}">"##,
                    num(x0),
                    num(y0),
                    num(size),
                    num(size),
                    escape(color)
                ));
                for (i, is_dark) in dark.iter().enumerate() {
                    if *is_dark {
                        let (col, row) = (i % side, i / side);
                        self.body.push_str(&format!(
                            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
                            num(x0 + col as f32 * module),
                            num(y0 + row as f32 * module),
                            num(module),
                            num(module)
                        ));
                    }
                }
                self.body.push_str("</g>");
            }
            LayerContent::Barcode { bars, color, .. } => {
                self.body
                    .push_str(&format!(r#"<g fill="{}">"#, escape(color)));
                for bar in bars {
                    self.body.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
                        num(b.x + bar.x),
                        num(b.y),
                        num(bar.width),
                        num(b.height)
                    ));
                }
                self.body.push_str("</g>");
            }
        }
        self.body.push_str("</g>");
        Ok(())
    }

    fn shapes(&mut self, shapes: &[Shape]) {
        for shape in shapes {
            self.body.push_str(&shape_svg(shape));
        }
    }

    fn shadow_filter(&mut self, shadow: &Shadow) -> String {
        let id = self.id("shadow");
        self.defs.push_str(&format!(
            r#"<filter id="{}" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="0" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
            id,
            num(shadow.offset_y),
            num(shadow.blur / 2.0),
            escape(&shadow.color),
            num(shadow.opacity)
        ));
        id
    }

    fn gradient(&mut self, paint: &Paint) -> Option<String> {
        let stops = |stops: &[super::layer::GradientStop]| {
            stops
                .iter()
                .map(|s| {
                    format!(
                        r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                        num(s.offset),
                        escape(&s.color),
                        num(s.opacity)
                    )
                })
                .collect::<String>()
        };
        match paint {
            Paint::Linear { angle, stops: s } => {
                let id = self.id("linear");
                let (sin, cos) = angle.to_radians().sin_cos();
                self.defs.push_str(&format!(
                    r#"<linearGradient id="{}" x1="{}" y1="{}" x2="{}" y2="{}">{}</linearGradient>"#,
                    id,
                    num(0.5 - cos / 2.0),
                    num(0.5 - sin / 2.0),
                    num(0.5 + cos / 2.0),
                    num(0.5 + sin / 2.0),
                    stops(s)
                ));
                Some(id)
            }
            Paint::Radial {
                cx,
                cy,
                radius,
                stops: s,
            } => {
                let id = self.id("radial");
                self.defs.push_str(&format!(
                    r#"<radialGradient id="{}" cx="{}" cy="{}" r="{}">{}</radialGradient>"#,
                    id,
                    num(*cx),
                    num(*cy),
                    num(*radius),
                    stops(s)
                ));
                Some(id)
            }
            _ => None,
        }
    }

    fn fill(&mut self, b: Rect, paint: &Paint, radius: f32, shadow: Option<&Shadow>) {
        let filter = shadow
            .map(|s| format!(r#" filter="url(#{})""#, self.shadow_filter(s)))
            .unwrap_or_default();
        let rect = |fill: &str, extra: &str| {
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"{}/>"#,
                num(b.x),
                num(b.y),
                num(b.width),
                num(b.height),
                num(radius),
                fill,
                extra
            )
        };

        match paint {
            Paint::Solid { color } => self.body.push_str(&rect(&escape(color), &filter)),
            Paint::Linear { .. } | Paint::Radial { .. } => {
                let fill = self
                    .gradient(paint)
                    .map(|id| format!("url(#{})", id))
                    .unwrap_or_else(|| "none".into());
                self.body.push_str(&rect(&fill, &filter));
            }
            Paint::Mesh { base, spots } => {
                self.body.push_str(&rect(&escape(base), &filter));
                for spot in spots {
                    let id = self.id("mesh");
                    self.defs.push_str(&format!(
                        r#"<radialGradient id="{}" cx="{}" cy="{}" r="{}"><stop offset="0" stop-color="{}" stop-opacity="1"/><stop offset="1" stop-color="{}" stop-opacity="0"/></radialGradient>"#,
                        id,
                        num(spot.cx),
                        num(spot.cy),
                        num(spot.radius),
                        escape(&spot.color),
                        escape(&spot.color)
                    ));
                    self.body.push_str(&rect(&format!("url(#{})", id), ""));
                }
            }
            Paint::Conic { from_angle, stops } => {
                // No conic gradients in SVG 1.1: one wedge per stop interval.
                let (cx, cy) = b.center();
                let r = b.width.max(b.height);
                let clip = self.id("conic");
                self.defs.push_str(&format!(
                    r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}" rx="{}"/></clipPath>"#,
                    clip,
                    num(b.x),
                    num(b.y),
                    num(b.width),
                    num(b.height),
                    num(radius)
                ));
                self.body
                    .push_str(&format!(r#"<g clip-path="url(#{})"{}>"#, clip, filter));
                for pair in stops.windows(2) {
                    let a0 = (from_angle + pair[0].offset * 360.0 - 90.0).to_radians();
                    let a1 = (from_angle + pair[1].offset * 360.0 - 90.0).to_radians();
                    self.body.push_str(&format!(
                        r#"<path d="M{} {} L{} {} A{} {} 0 0 1 {} {} Z" fill="{}" fill-opacity="{}"/>"#,
                        num(cx),
                        num(cy),
                        num(cx + r * a0.cos()),
                        num(cy + r * a0.sin()),
                        num(r),
                        num(r),
                        num(cx + r * a1.cos()),
                        num(cy + r * a1.sin()),
                        escape(&pair[0].color),
                        num(pair[0].opacity)
                    ));
                }
                self.body.push_str("</g>");
            }
        }
    }

    fn image(&mut self, b: Rect, src: &str, clip: Clip, border: Option<&Stroke>, shadow: Option<&Shadow>) {
        let outline = match clip {
            Clip::None => None,
            Clip::Circle => {
                let (cx, cy) = b.center();
                Some(format!(
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                    num(cx),
                    num(cy),
                    num(b.width / 2.0),
                    num(b.height / 2.0)
                ))
            }
            Clip::Rounded { radius } => Some(format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}""#,
                num(b.x),
                num(b.y),
                num(b.width),
                num(b.height),
                num(radius)
            )),
        };

        if let (Some(shadow), Some(shape)) = (shadow, outline.as_ref()) {
            let filter = self.shadow_filter(shadow);
            self.body.push_str(&format!(
                r##"{} fill="#ffffff" filter="url(#{})"/>"##,
                shape, filter
            ));
        }

        let clip_attr = match outline.as_ref() {
            Some(shape) => {
                let id = self.id("clip");
                self.defs
                    .push_str(&format!(r#"<clipPath id="{}">{}/></clipPath>"#, id, shape));
                format!(r#" clip-path="url(#{})""#, id)
            }
            None => String::new(),
        };
        self.body.push_str(&format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" href="{}"{}/>"#,
            num(b.x),
            num(b.y),
            num(b.width),
            num(b.height),
            escape(src),
            clip_attr
        ));

        if let (Some(stroke), Some(shape)) = (border, outline.as_ref()) {
            self.body.push_str(&format!(
                r#"{} fill="none"{}/>"#,
                shape,
                stroke_attrs(stroke)
            ));
        }
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut out = format!(
        r#" stroke="{}" stroke-width="{}""#,
        escape(&stroke.color),
        num(stroke.width)
    );
    if !stroke.dash.is_empty() {
        let dash: Vec<String> = stroke.dash.iter().map(|d| num(*d)).collect();
        out.push_str(&format!(r#" stroke-dasharray="{}""#, dash.join(" ")));
    }
    out
}

fn paint_attrs(fill: Option<&str>, stroke: Option<&Stroke>) -> String {
    let mut out = match fill {
        Some(color) => format!(r#" fill="{}""#, escape(color)),
        None => r#" fill="none""#.to_string(),
    };
    if let Some(stroke) = stroke {
        out.push_str(&stroke_attrs(stroke));
    }
    out
}

fn shape_svg(shape: &Shape) -> String {
    match shape {
        Shape::Ellipse(e) => {
            let rotate = if e.rotation != 0.0 {
                format!(
                    r#" transform="rotate({} {} {})""#,
                    num(e.rotation),
                    num(e.cx),
                    num(e.cy)
                )
            } else {
                String::new()
            };
            format!(
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
                num(e.cx),
                num(e.cy),
                num(e.rx),
                num(e.ry),
                rotate
            )
        }
        Shape::Circle { cx, cy, r } => {
            format!(r#"<circle cx="{}" cy="{}" r="{}"/>"#, num(*cx), num(*cy), num(*r))
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
            rx,
        } => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"/>"#,
            num(*x),
            num(*y),
            num(*width),
            num(*height),
            num(*rx)
        ),
        Shape::Line { x1, y1, x2, y2 } => format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            num(*x1),
            num(*y1),
            num(*x2),
            num(*y2)
        ),
        Shape::Polyline { points, closed } => {
            let pts: Vec<String> = points
                .iter()
                .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
                .collect();
            let tag = if *closed { "polygon" } else { "polyline" };
            format!(r#"<{} points="{}"/>"#, tag, pts.join(" "))
        }
        Shape::Text {
            x,
            y,
            content,
            size,
            rotation,
        } => {
            let rotate = if *rotation != 0.0 {
                format!(
                    r#" transform="rotate({} {} {})""#,
                    num(*rotation),
                    num(*x),
                    num(*y)
                )
            } else {
                String::new()
            };
            format!(
                r#"<text x="{}" y="{}" font-size="{}" stroke="none"{}>{}</text>"#,
                num(*x),
                num(*y),
                num(*size),
                rotate,
                escape(content)
            )
        }
    }
}

fn text_svg(line: &TextLine) -> String {
    let text = if line.uppercase {
        line.text.to_uppercase()
    } else {
        line.text.clone()
    };
    let spacing = if line.letter_spacing != 0.0 {
        format!(r#" letter-spacing="{}""#, num(line.letter_spacing))
    } else {
        String::new()
    };
    format!(
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" text-anchor="{}" fill="{}"{}>{}</text>"#,
        num(line.x),
        num(line.y),
        escape(&line.font_family),
        num(line.font_size),
        line.weight,
        line.align.anchor(),
        escape(&line.color),
        spacing,
        escape(&text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignState;
    use crate::document::{CardSide, DocumentContent, Mode};
    use crate::render::compose::compose;

    #[test]
    fn test_num_trims() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.25), "0.25");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(12.5), "12.5");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"A & B <"x">"#), "A &amp; B &lt;&quot;x&quot;&gt;");
    }

    #[test]
    fn test_certificate_svg_page_size() {
        let layers = compose(
            &DesignState::default(),
            &DocumentContent::default(),
            Mode::Certificate,
            CardSide::Front,
        );
        let svg = render_svg(&layers, &PageGeometry::A4_PORTRAIT).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="210mm" height="297mm" viewBox="0 0 794 1123""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_blend_and_text_escaped() {
        let mut design = DesignState::default();
        design.guilloche_complexity = 1;
        let content = DocumentContent {
            name: "Tom & Jerry".into(),
            id: "CERT-1".into(),
            ..Default::default()
        };
        let layers = compose(&design, &content, Mode::Certificate, CardSide::Front);
        let svg = render_svg(&layers, &PageGeometry::A4_PORTRAIT).unwrap();
        assert!(svg.contains("mix-blend-mode:multiply"));
        assert!(svg.contains("Tom &amp; Jerry"));
        assert!(svg.contains(r#"id="qr_code""#));
    }

    #[test]
    fn test_card_svg_is_rounded_and_deterministic() {
        let content = DocumentContent {
            name: "Grace Hopper".into(),
            id: "EMP-7".into(),
            ..Default::default()
        };
        let layers = compose(&DesignState::default(), &content, Mode::Card, CardSide::Back);
        let a = render_svg(&layers, &PageGeometry::ID_CARD).unwrap();
        let b = render_svg(&layers, &PageGeometry::ID_CARD).unwrap();
        assert_eq!(a, b);
        assert!(a.contains(r#"rx="24""#));
        assert!(a.contains(r#"width="85.6mm""#));
    }
}
