//! ID card faces (CR80, 856 × 540 units).
//!
//! Front: header (logo + issuer), hologram, chip, ghost photo, holder
//! photo, name / role badge / details, stamp, brand footer.
//! Back: magnetic stripe, header, description, barcode, issue footer, QR.

use tracing::debug;

use super::blend::BlendMode;
use super::compose::Scene;
use super::layer::{Clip, Layer, LayerContent, LayerKind, LayerStack, Paint, Rect, Shadow, Shape, Stroke};
use super::{paint, symbols};
use crate::art::security;
use crate::design::{AssetSlot, ChipStyle, PhotoShape, SecurityPattern, TextAlign, TextStyle};

const MARGIN: f32 = 48.0;

const LOGO_SLOT: Rect = Rect::new(32.0, 24.0, 64.0, 64.0);
const HOLOGRAM_SIZE: f32 = 72.0;
const CHIP_SIZE: (f32, f32) = (86.0, 64.0);
const PHOTO_SIZE: (f32, f32) = (190.0, 240.0);
const PHOTO_TOP: f32 = 130.0;
const STAMP_SIZE: f32 = 110.0;
const QR_SIZE: f32 = 150.0;

const STRIPE_TOP: f32 = 40.0;
const STRIPE_HEIGHT: f32 = 84.0;
const BARCODE_SIZE: (f32, f32) = (360.0, 70.0);

/// Left-aligned copy of a style; card text is laid out flush left.
fn flush_left(style: &TextStyle) -> TextStyle {
    TextStyle {
        align: TextAlign::Left,
        ..style.clone()
    }
}

/// Decorative line pattern behind the card front.
pub(super) fn security_pattern(scene: &Scene<'_>) -> Option<Layer> {
    let d = scene.design;
    let bounds = scene.bounds();
    let (fill, stroke, shapes) = match d.card.security_pattern {
        SecurityPattern::None => return None,
        SecurityPattern::Guilloche => {
            // Card rosette: fixed complexity, independent of the document guilloche.
            let shapes = crate::art::guilloche::ellipses(2)
                .into_iter()
                .map(Shape::Ellipse)
                .collect();
            return Some(
                Layer::new(
                    "security_pattern",
                    LayerKind::Pattern,
                    bounds,
                    LayerContent::Shapes {
                        view_box: Some(crate::art::guilloche::VIEW_BOX),
                        fill: None,
                        stroke: Some(Stroke::solid(d.primary_color.clone(), 0.6)),
                        shapes,
                    },
                )
                .with_blend(BlendMode::Multiply)
                .with_opacity(0.12),
            );
        }
        SecurityPattern::Waves => (
            None,
            Some(Stroke::solid(d.primary_color.clone(), 0.5)),
            security::wave_lines(bounds, 12.0, 4.0, 90.0),
        ),
        SecurityPattern::Mesh => (
            None,
            Some(Stroke::solid(d.primary_color.clone(), 0.4)),
            security::mesh_lines(bounds, 14.0),
        ),
        SecurityPattern::Microtext => (
            Some(d.primary_color.clone()),
            None,
            security::microtext_rows(bounds, scene.microtext(), 9.0),
        ),
    };
    Some(
        Layer::new(
            "security_pattern",
            LayerKind::Pattern,
            bounds,
            LayerContent::Shapes {
                view_box: None,
                fill,
                stroke,
                shapes,
            },
        )
        .with_blend(BlendMode::Multiply)
        .with_opacity(0.12),
    )
}

pub(super) fn front(scene: &Scene<'_>, stack: &mut LayerStack) {
    let d = scene.design;
    let card = &d.card;
    let bounds = scene.bounds();
    let labels = scene.labels();

    // Header
    if let Some(layer) = scene.asset(AssetSlot::Logo, LOGO_SLOT) {
        stack.push(layer);
    }
    let title_style = flush_left(&d.title);
    let issuer = scene.spec(&title_style, 24.0, &d.primary_color, true);
    let header = Rect::new(LOGO_SLOT.right() + 12.0, LOGO_SLOT.y, 500.0, LOGO_SLOT.height);
    let issuer_text = scene
        .content
        .issuer
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(labels.card_issuer.as_str());
    let line = issuer.line(issuer_text, header.y + 42.0, header);
    if let Some(layer) = scene.text("header", header, vec![line]) {
        stack.push(layer);
    }

    // Hologram
    if card.hologram_visible && card.hologram_intensity > 0.0 {
        let disk = Rect::new(
            bounds.right() - 32.0 - HOLOGRAM_SIZE,
            24.0,
            HOLOGRAM_SIZE,
            HOLOGRAM_SIZE,
        );
        stack.push(
            Layer::new(
                "hologram",
                LayerKind::SecurityWidget,
                disk,
                LayerContent::Fill {
                    paint: paint::hologram(card.hologram_intensity),
                    corner_radius: HOLOGRAM_SIZE / 2.0,
                    shadow: None,
                },
            )
            .with_blend(BlendMode::Screen),
        );
    }

    // Chip, kept fully on the card
    if card.chip_visible {
        let (w, h) = CHIP_SIZE;
        stack.push(chip(
            card.chip_style,
            (bounds.width * card.chip_x / 100.0).min(bounds.width - w),
            (bounds.height * card.chip_y / 100.0).min(bounds.height - h),
        ));
    }

    // Photo
    let photo_rect = Rect::new(
        bounds.right() - MARGIN - PHOTO_SIZE.0,
        PHOTO_TOP,
        PHOTO_SIZE.0,
        PHOTO_SIZE.1,
    );
    let clip = match card.photo_shape {
        PhotoShape::Circle => Clip::Circle,
        PhotoShape::Rounded => Clip::Rounded { radius: 16.0 },
        PhotoShape::Square => Clip::Rounded { radius: 0.0 },
    };
    match &scene.content.photo {
        Some(src) => {
            if d.ghost_photo_opacity > 0.0 {
                let ghost = Rect::new(photo_rect.x - 130.0, bounds.bottom() - 150.0, 90.0, 112.0);
                stack.push(
                    Layer::new(
                        "ghost_photo",
                        LayerKind::SecurityWidget,
                        ghost,
                        LayerContent::Image {
                            src: src.clone(),
                            clip: Clip::Rounded { radius: 8.0 },
                            border: None,
                            shadow: None,
                        },
                    )
                    .with_blend(BlendMode::Multiply)
                    .with_opacity(d.ghost_photo_opacity),
                );
            }
            let border = (card.photo_border_width > 0.0)
                .then(|| Stroke::solid(card.photo_border_color.clone(), card.photo_border_width));
            let shadow = card.photo_shadow.then(|| Shadow {
                color: d.shadow_color.clone(),
                opacity: 0.3,
                blur: 12.0,
                offset_y: 4.0,
            });
            stack.push(Layer::new(
                "photo",
                LayerKind::ImageAsset,
                photo_rect,
                LayerContent::Image {
                    src: src.clone(),
                    clip,
                    border,
                    shadow,
                },
            ));
        }
        None => {
            let radius = match clip {
                Clip::Circle => PHOTO_SIZE.0 / 2.0,
                Clip::Rounded { radius } => radius,
                Clip::None => 0.0,
            };
            stack.push(Layer::new(
                "photo_placeholder",
                LayerKind::ImageAsset,
                photo_rect,
                LayerContent::Fill {
                    paint: Paint::solid("#e2e8f0"),
                    corner_radius: radius,
                    shadow: None,
                },
            ));
        }
    }

    // Name, role badge, details
    let text_region = Rect::new(MARGIN, 300.0, photo_rect.x - MARGIN - 24.0, 170.0);
    let name_style = flush_left(&d.name);
    let name = scene.spec(&name_style, 30.0, &card.name_color, false);
    let mut y = text_region.y + name.font_size();
    let line = name.line(scene.content.name.as_str(), y, text_region);
    if let Some(layer) = scene.text("name", Rect::new(text_region.x, text_region.y, text_region.width, name.advance()), vec![line]) {
        stack.push(layer);
    }
    y += 14.0;

    let role = scene.content.role.trim();
    if !role.is_empty() {
        let badge_style = TextStyle {
            letter_spacing: 1.0,
            ..flush_left(&d.body)
        };
        let badge_text = scene.spec(&badge_style, 14.0, &card.role_color, true);
        let width = (role.chars().count() as f32 * 9.5 + 28.0).min(text_region.width);
        let badge = Rect::new(text_region.x, y, width, 30.0);
        stack.push(Layer::new(
            "role_badge",
            LayerKind::TextBlock,
            badge,
            LayerContent::Fill {
                paint: Paint::solid(d.primary_color.clone()),
                corner_radius: 15.0,
                shadow: None,
            },
        ));
        let inner = Rect::new(badge.x + 14.0, badge.y, badge.width - 28.0, badge.height);
        let line = badge_text.line(role, badge.y + 20.0, inner);
        if let Some(layer) = scene.text("role", badge, vec![line]) {
            stack.push(layer);
        }
        y = badge.bottom() + 8.0;
    }

    let body_style = flush_left(&d.body);
    let details = scene.spec(&body_style, 14.0, &card.detail_color, false);
    let details_top = y;
    let (mut lines, _) = details.paragraph(&scene.content.description, y + details.font_size(), text_region);
    lines.retain(|l| l.y <= text_region.bottom());
    if let Some(layer) = scene.text(
        "details",
        Rect::new(text_region.x, details_top, text_region.width, (text_region.bottom() - details_top).max(0.0)),
        lines,
    ) {
        stack.push(layer);
    }

    // Stamp overlaps the photo's lower-left corner
    let stamp_slot = Rect::new(
        photo_rect.x - STAMP_SIZE / 2.0,
        photo_rect.bottom() - STAMP_SIZE / 2.0,
        STAMP_SIZE,
        STAMP_SIZE,
    );
    if let Some(layer) = scene.asset(AssetSlot::Stamp, stamp_slot) {
        stack.push(layer);
    }

    // Brand footer
    let footer_region = Rect::new(MARGIN, bounds.bottom() - 40.0, bounds.width - 2.0 * MARGIN, 30.0);
    let brand = scene.spec(&body_style, 12.0, &card.detail_color, false);
    let line = brand.line(labels.card_brand.as_str(), bounds.bottom() - 18.0, footer_region);
    if let Some(layer) = scene.text("footer", footer_region, vec![line]) {
        stack.push(layer);
    }
}

pub(super) fn back(scene: &Scene<'_>, stack: &mut LayerStack) {
    let d = scene.design;
    let card = &d.card;
    let bounds = scene.bounds();
    let labels = scene.labels();

    let mut y = 70.0;
    if card.stripe_visible {
        stack.push(Layer::new(
            "magnetic_stripe",
            LayerKind::SecurityWidget,
            Rect::new(0.0, STRIPE_TOP, bounds.width, STRIPE_HEIGHT),
            LayerContent::Fill {
                paint: Paint::solid(card.stripe_color.clone()),
                corner_radius: 0.0,
                shadow: None,
            },
        ));
        y = STRIPE_TOP + STRIPE_HEIGHT + 44.0;
    }

    let qr_slot = Rect::new(
        bounds.right() - MARGIN - QR_SIZE,
        bounds.bottom() - MARGIN - QR_SIZE,
        QR_SIZE,
        QR_SIZE,
    );
    let column = Rect::new(MARGIN, y - 30.0, qr_slot.x - MARGIN - 24.0, bounds.height);

    let title_style = flush_left(&d.title);
    let header = scene.spec(&title_style, 18.0, &d.primary_color, true);
    let line = header.line(labels.card_back_header.as_str(), y, column);
    if let Some(layer) = scene.text("header", Rect::new(column.x, y - header.font_size(), column.width, header.advance()), vec![line]) {
        stack.push(layer);
    }
    y += 36.0;

    let barcode_rect = Rect::new(MARGIN, bounds.bottom() - 175.0, BARCODE_SIZE.0, BARCODE_SIZE.1);
    let body_style = flush_left(&d.body);
    let body = scene.spec(&body_style, 15.0, &card.detail_color, false);
    let (mut lines, _) = body.paragraph(&scene.content.description, y, column);
    let limit = barcode_rect.y - 12.0;
    lines.retain(|l| l.y <= limit);
    let top = y - body.font_size();
    if let Some(layer) = scene.text("description", Rect::new(column.x, top, column.width, (limit - top).max(0.0)), lines) {
        stack.push(layer);
    }

    let id = scene.content.id.trim();
    if card.barcode_visible && !id.is_empty() {
        match symbols::encode_barcode(card.barcode_kind, id) {
            Ok(modules) => stack.push(Layer::new(
                "barcode",
                LayerKind::SecurityWidget,
                barcode_rect,
                LayerContent::Barcode {
                    symbology: card.barcode_kind,
                    data: id.to_string(),
                    bars: symbols::bars(&modules, barcode_rect.width),
                    color: d.text_color.clone(),
                },
            )),
            Err(e) => debug!(error = %e, "barcode skipped"),
        }
    }

    let footer = scene.spec(&body_style, 13.0, &card.detail_color, false);
    let mut lines = Vec::new();
    let date = scene.content.issue_date_label();
    let footer_region = Rect::new(MARGIN, bounds.bottom() - 78.0, column.width, 50.0);
    if !date.is_empty() {
        lines.push(footer.line(format!("{}: {}", labels.issued_caption, date), bounds.bottom() - 60.0, footer_region));
    }
    if !id.is_empty() {
        lines.push(footer.line(format!("{}: {}", labels.id_caption, id), bounds.bottom() - 38.0, footer_region));
    }
    if let Some(layer) = scene.text("footer", footer_region, lines) {
        stack.push(layer);
    }

    if let Some(layer) = scene.qr(qr_slot) {
        stack.push(layer);
    }
}

/// EMV contact chip at (x, y).
fn chip(style: ChipStyle, x: f32, y: f32) -> Layer {
    let (w, h) = CHIP_SIZE;
    let (fill, line) = match style {
        ChipStyle::Gold => ("#d4af37", "#8a6d1d"),
        ChipStyle::Silver => ("#c0c7cf", "#6b7280"),
    };
    let rect = |x: f32, y: f32, width: f32, height: f32, rx: f32| Shape::Rect {
        x,
        y,
        width,
        height,
        rx,
    };
    let line_shape = |x1: f32, y1: f32, x2: f32, y2: f32| Shape::Line { x1, y1, x2, y2 };
    let shapes = vec![
        rect(x, y, w, h, 10.0),
        line_shape(x, y + h / 3.0, x + w, y + h / 3.0),
        line_shape(x, y + 2.0 * h / 3.0, x + w, y + 2.0 * h / 3.0),
        line_shape(x + w / 3.0, y, x + w / 3.0, y + h),
        line_shape(x + 2.0 * w / 3.0, y, x + 2.0 * w / 3.0, y + h),
        rect(x + w / 3.0, y + h / 4.0, w / 3.0, h / 2.0, 4.0),
    ];
    Layer::new(
        "chip",
        LayerKind::SecurityWidget,
        Rect::new(x, y, w, h),
        LayerContent::Shapes {
            view_box: None,
            fill: Some(fill.to_string()),
            stroke: Some(Stroke::solid(line, 1.5)),
            shapes,
        },
    )
}

#[cfg(test)]
mod tests {
    use crate::design::{DesignState, SecurityPattern};
    use crate::document::{CardSide, DocumentContent, Mode};
    use crate::render::compose::compose;
    use crate::render::layer::{Layer, LayerContent};

    fn holder() -> DocumentContent {
        DocumentContent {
            name: "Grace Hopper".into(),
            role: "Rear Admiral".into(),
            description: "Member since 1944".into(),
            id: "EMP-0007".into(),
            photo: Some("data:image/jpeg;base64,/9j/".into()),
            ..Default::default()
        }
    }

    fn names(layers: &[Layer]) -> Vec<&str> {
        layers.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_front_widgets() {
        let layers = compose(&DesignState::default(), &holder(), Mode::Card, CardSide::Front);
        let names = names(&layers);
        for expected in ["background", "security_pattern", "hologram", "chip", "photo", "name", "role_badge", "footer"] {
            assert!(names.contains(&expected), "missing {expected}: {names:?}");
        }
        assert!(!names.contains(&"barcode"));
    }

    #[test]
    fn test_placeholder_without_photo() {
        let content = DocumentContent {
            photo: None,
            ..holder()
        };
        let layers = compose(&DesignState::default(), &content, Mode::Card, CardSide::Front);
        let names = names(&layers);
        assert!(names.contains(&"photo_placeholder"));
        assert!(!names.contains(&"photo"));
    }

    #[test]
    fn test_chip_follows_percent_position() {
        let mut design = DesignState::default();
        design.card.chip_x = 50.0;
        design.card.chip_y = 50.0;
        let layers = compose(&design, &holder(), Mode::Card, CardSide::Front);
        let chip = layers.iter().find(|l| l.name == "chip").unwrap();
        assert_eq!((chip.bounds.x, chip.bounds.y), (428.0, 270.0));
    }

    #[test]
    fn test_chip_stays_on_card_at_far_corner() {
        let mut design = DesignState::default();
        design.card.chip_x = 100.0;
        design.card.chip_y = 100.0;
        let layers = compose(&design, &holder(), Mode::Card, CardSide::Front);
        let card = &layers[0].bounds;
        let chip = layers.iter().find(|l| l.name == "chip").unwrap();
        assert!(chip.bounds.right() <= card.right());
        assert!(chip.bounds.bottom() <= card.bottom());
        assert_eq!((chip.bounds.x, chip.bounds.y), (856.0 - 86.0, 540.0 - 64.0));
    }

    #[test]
    fn test_security_pattern_none() {
        let mut design = DesignState::default();
        design.card.security_pattern = SecurityPattern::None;
        let layers = compose(&design, &holder(), Mode::Card, CardSide::Front);
        assert!(!names(&layers).contains(&"security_pattern"));
    }

    #[test]
    fn test_back_has_stripe_barcode_and_qr() {
        let layers = compose(&DesignState::default(), &holder(), Mode::Card, CardSide::Back);
        let names = names(&layers);
        for expected in ["magnetic_stripe", "header", "barcode", "footer", "qr_code"] {
            assert!(names.contains(&expected), "missing {expected}: {names:?}");
        }
        let barcode = layers.iter().find(|l| l.name == "barcode").unwrap();
        match &barcode.content {
            LayerContent::Barcode { data, bars, .. } => {
                assert_eq!(data, "EMP-0007");
                assert!(!bars.is_empty());
                assert!(bars.iter().all(|b| b.x + b.width <= barcode.bounds.width + 1e-3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_back_is_deterministic() {
        let a = compose(&DesignState::default(), &holder(), Mode::Card, CardSide::Back);
        let b = compose(&DesignState::default(), &holder(), Mode::Card, CardSide::Back);
        assert_eq!(a, b);
    }
}
