//! Certificate body: logo, title, boilerplate, recipient, description,
//! signature and stamp, verification QR, and the issue footer.
//!
//! Everything sits inside a 25 mm content margin drawn on the page itself.

use super::compose::Scene;
use super::layer::{LayerStack, Rect};
use crate::design::AssetSlot;

/// Content margin inside the page edge.
pub const CONTENT_MARGIN_MM: f32 = 25.0;

const LOGO_SIZE: f32 = 120.0;
const TITLE_SIZE: f32 = 48.0;
const BOILERPLATE_SIZE: f32 = 16.0;
const NAME_SIZE: f32 = 36.0;
const BODY_SIZE: f32 = 15.0;
const FOOTER_SIZE: f32 = 12.0;

const SIGNATURE_SLOT: (f32, f32) = (200.0, 80.0);
const STAMP_SIZE: f32 = 140.0;
const QR_SIZE: f32 = 100.0;

/// Footer band reserved above the bottom margin for signature, stamp and QR.
const FOOTER_BAND: f32 = 190.0;

pub(super) fn content(scene: &Scene<'_>, stack: &mut LayerStack) {
    let d = scene.design;
    let labels = scene.labels();
    let page = scene.page;
    let area = page.bounds().inset(page.mm_to_units(CONTENT_MARGIN_MM));
    let (cx, _) = area.center();

    let logo_slot = Rect::new(cx - LOGO_SIZE / 2.0, area.y, LOGO_SIZE, LOGO_SIZE);
    if let Some(layer) = scene.asset(AssetSlot::Logo, logo_slot) {
        stack.push(layer);
    }

    // Title block
    let mut y = logo_slot.bottom() + 24.0;
    let title = scene.spec(&d.title, TITLE_SIZE, &d.primary_color, true);
    y += title.font_size();
    let title_top = y - title.font_size();
    let (lines, next) = title.paragraph(&labels.certificate_title, y, area);
    if let Some(layer) = scene.text("title", Rect::new(area.x, title_top, area.width, next - title_top), lines) {
        stack.push(layer);
    }
    y = next + 12.0;

    // Boilerplate, optionally bilingual
    let boiler = scene.spec(&d.body, BOILERPLATE_SIZE, &d.text_color, false);
    let boiler_top = y;
    y += boiler.font_size();
    let mut lines = vec![boiler.line(labels.boilerplate.as_str(), y, area)];
    if d.bilingual && !labels.boilerplate_secondary.is_empty() {
        y += boiler.advance();
        let secondary = scene.spec(&d.body, BOILERPLATE_SIZE * 0.85, &d.secondary_color, false);
        lines.push(secondary.line(labels.boilerplate_secondary.as_str(), y, area));
    }
    if let Some(layer) = scene.text("boilerplate", Rect::new(area.x, boiler_top, area.width, y - boiler_top), lines) {
        stack.push(layer);
    }
    y += boiler.advance();

    // Recipient
    let name = scene.spec(&d.name, NAME_SIZE, &d.text_color, false);
    let name_top = y;
    y += name.font_size();
    let (lines, next) = name.paragraph(&scene.content.name, y, area);
    if let Some(layer) = scene.text("name", Rect::new(area.x, name_top, area.width, next - name_top), lines) {
        stack.push(layer);
    }
    y = next + 8.0;

    // Description, kept clear of the footer band
    let body = scene.spec(&d.body, BODY_SIZE, &d.text_color, false);
    let body_top = y;
    let body_limit = area.bottom() - FOOTER_BAND;
    let (mut lines, _) = body.paragraph(&scene.content.description, y + body.font_size(), area);
    lines.retain(|l| l.y <= body_limit);
    if let Some(layer) = scene.text(
        "description",
        Rect::new(area.x, body_top, area.width, (body_limit - body_top).max(0.0)),
        lines,
    ) {
        stack.push(layer);
    }

    // Signature (left), QR (center), stamp (right)
    let signature_slot = Rect::new(
        area.x,
        area.bottom() - FOOTER_BAND + 40.0,
        SIGNATURE_SLOT.0,
        SIGNATURE_SLOT.1,
    );
    if let Some(layer) = scene.asset(AssetSlot::Signature, signature_slot) {
        stack.push(layer);
    }

    let qr_slot = Rect::new(cx - QR_SIZE / 2.0, area.bottom() - FOOTER_BAND + 50.0, QR_SIZE, QR_SIZE);
    if let Some(layer) = scene.qr(qr_slot) {
        stack.push(layer);
    }

    let stamp_slot = Rect::new(
        area.right() - STAMP_SIZE,
        area.bottom() - FOOTER_BAND + 10.0,
        STAMP_SIZE,
        STAMP_SIZE,
    );
    if let Some(layer) = scene.asset(AssetSlot::Stamp, stamp_slot) {
        stack.push(layer);
    }

    // Issue footer
    let footer = scene.spec(&d.body, FOOTER_SIZE, &d.text_color, false);
    let mut parts = Vec::new();
    let date = scene.content.issue_date_label();
    if !date.is_empty() {
        parts.push(format!("{}: {}", labels.issued_caption, date));
    }
    let id = scene.content.id.trim();
    if !id.is_empty() {
        parts.push(format!("{}: {}", labels.id_caption, id));
    }
    if !parts.is_empty() {
        let baseline = area.bottom();
        let line = footer.line(parts.join("  ·  "), baseline, area);
        let top = baseline - footer.font_size();
        if let Some(layer) = scene.text("footer", Rect::new(area.x, top, area.width, footer.font_size()), vec![line]) {
            stack.push(layer);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::design::DesignState;
    use crate::document::{CardSide, DocumentContent, Mode};
    use crate::render::compose::compose;
    use crate::render::layer::{Layer, LayerContent};
    use chrono::NaiveDate;

    fn content() -> DocumentContent {
        DocumentContent {
            name: "Ada Lovelace".into(),
            description: "For outstanding contributions to analytical engines.".into(),
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 17),
            id: "CERT-2026-0042".into(),
            ..Default::default()
        }
    }

    fn find<'a>(layers: &'a [Layer], name: &str) -> Option<&'a Layer> {
        layers.iter().find(|l| l.name == name)
    }

    fn text_of(layer: &Layer) -> Vec<String> {
        match &layer.content {
            LayerContent::Text { lines } => lines.iter().map(|l| l.text.clone()).collect(),
            other => panic!("not a text layer: {other:?}"),
        }
    }

    #[test]
    fn test_body_layers_present() {
        let layers = compose(&DesignState::default(), &content(), Mode::Certificate, CardSide::Front);
        assert_eq!(text_of(find(&layers, "name").unwrap()), vec!["Ada Lovelace"]);
        assert_eq!(
            text_of(find(&layers, "footer").unwrap()),
            vec!["Issued: 17.10.2026  ·  ID: CERT-2026-0042"]
        );
        assert!(find(&layers, "title").unwrap().bounds.y > 0.0);
    }

    #[test]
    fn test_bilingual_adds_second_boilerplate_line() {
        let mut design = DesignState::default();
        let layers = compose(&design, &content(), Mode::Certificate, CardSide::Front);
        assert_eq!(text_of(find(&layers, "boilerplate").unwrap()).len(), 1);

        design.bilingual = true;
        let layers = compose(&design, &content(), Mode::Certificate, CardSide::Front);
        assert_eq!(text_of(find(&layers, "boilerplate").unwrap()).len(), 2);
    }

    #[test]
    fn test_qr_generated_from_id() {
        let layers = compose(&DesignState::default(), &content(), Mode::Certificate, CardSide::Front);
        match &find(&layers, "qr_code").unwrap().content {
            LayerContent::Qr { payload, .. } => {
                assert_eq!(payload, "https://verify.example.org/verify/CERT-2026-0042")
            }
            other => panic!("unexpected {other:?}"),
        }

        let anonymous = DocumentContent {
            id: String::new(),
            ..content()
        };
        let layers = compose(&DesignState::default(), &anonymous, Mode::Certificate, CardSide::Front);
        assert!(find(&layers, "qr_code").is_none());
    }

    #[test]
    fn test_missing_assets_are_skipped() {
        let layers = compose(&DesignState::default(), &content(), Mode::Certificate, CardSide::Front);
        for name in ["logo", "signature", "stamp", "sticker"] {
            assert!(find(&layers, name).is_none(), "{name}");
        }
    }

    #[test]
    fn test_landscape_uses_landscape_page() {
        let mut design = DesignState::default();
        design.orientation = crate::design::Orientation::Landscape;
        let layers = compose(&design, &content(), Mode::Certificate, CardSide::Front);
        assert_eq!(layers[0].bounds.width, 1123.0);
    }
}
