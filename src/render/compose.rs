//! # Layer Compositor
//!
//! Pure function from (design, content, mode, side) to an ordered layer
//! list. Every call rebuilds the whole tree; nothing is cached or mutated.
//!
//! ## Stacking order (bottom → top)
//!
//! 1. background (gradient or solid, document shadow)
//! 2. guilloche, card-front security pattern
//! 3. overlay texture, fibers, microtext, watermark
//! 4. ribbon badge
//! 5. border
//! 6. document content (certificate body, or card front/back)
//! 7. sticker
//!
//! Stages that have nothing to draw (zero opacity, `None` variants, missing
//! assets) are skipped, so layer names are the stable way to find a layer.

use tracing::debug;

use super::blend::BlendMode;
use super::layer::{
    Clip, Layer, LayerContent, LayerKind, LayerStack, Paint, Rect, Shadow, Shape, Stroke, TextLine,
};
use super::text::LineSpec;
use super::{card, certificate, paint};
use crate::art::{guilloche, overlay, security};
use crate::config::{EngineConfig, Labels};
use crate::design::{AssetSlot, BorderStyle, Corner, DesignState, TextAlign, TextStyle, ranges};
use crate::document::{CardSide, DocumentContent, Mode, PageGeometry, verification_url};
use crate::position::{self, Transform};

/// Ribbon band size before rotation.
const RIBBON_WIDTH: f32 = 220.0;
const RIBBON_HEIGHT: f32 = 36.0;
/// Distance from the corner to the ribbon center along each axis.
const RIBBON_INSET: f32 = 60.0;

/// Sticker slot, centered on the document.
const STICKER_SIZE: f32 = 160.0;

/// Engine-level inputs to composition that are not part of the design.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub verification_base_url: String,
    pub labels: Labels,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for ComposeOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            verification_base_url: config.verification_base_url.clone(),
            labels: config.labels.clone(),
        }
    }
}

/// Compose with default labels and verification URL.
///
/// ```
/// use insignia::design::DesignState;
/// use insignia::document::{CardSide, DocumentContent, Mode};
/// use insignia::render::compose;
///
/// let layers = compose(&DesignState::default(), &DocumentContent::default(), Mode::Certificate, CardSide::Front);
/// assert_eq!(layers[0].name, "background");
/// ```
pub fn compose(
    design: &DesignState,
    content: &DocumentContent,
    mode: Mode,
    side: CardSide,
) -> Vec<Layer> {
    compose_with(design, content, mode, side, &ComposeOptions::default())
}

/// Compose the layer tree for one document face.
pub fn compose_with(
    design: &DesignState,
    content: &DocumentContent,
    mode: Mode,
    side: CardSide,
    options: &ComposeOptions,
) -> Vec<Layer> {
    let design = ranges::sanitize(design);
    let page = PageGeometry::for_mode(mode, design.orientation);
    let scene = Scene {
        design: &design,
        content,
        options,
        page,
        mode,
    };
    let mut stack = LayerStack::new(page.bounds());

    stack.push(scene.background(side));

    if let Some(layer) = scene.guilloche() {
        stack.push(layer);
    }
    if mode == Mode::Card && side == CardSide::Front {
        if let Some(layer) = card::security_pattern(&scene) {
            stack.push(layer);
        }
    }

    if let Some(layer) = scene.overlay() {
        stack.push(layer);
    }
    stack.extend(scene.security_motifs());

    if let Some(layer) = scene.ribbon() {
        stack.push(layer);
    }
    if let Some(layer) = scene.border() {
        stack.push(layer);
    }

    match (mode, side) {
        (Mode::Certificate, _) => certificate::content(&scene, &mut stack),
        (Mode::Card, CardSide::Front) => card::front(&scene, &mut stack),
        (Mode::Card, CardSide::Back) => card::back(&scene, &mut stack),
    }

    let sticker_slot = centered(page.bounds(), STICKER_SIZE, STICKER_SIZE);
    if let Some(layer) = scene.asset(AssetSlot::Sticker, sticker_slot) {
        stack.push(layer);
    }

    debug!(
        mode = ?mode,
        side = ?side,
        layers = stack.layers.len(),
        "composed document"
    );
    stack.into_layers()
}

/// Rect of `width × height` centered in `outer`.
pub(crate) fn centered(outer: Rect, width: f32, height: f32) -> Rect {
    let (cx, cy) = outer.center();
    Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
}

/// Sanitized inputs shared by the compositor stages.
pub(crate) struct Scene<'a> {
    pub design: &'a DesignState,
    pub content: &'a DocumentContent,
    pub options: &'a ComposeOptions,
    pub page: PageGeometry,
    pub mode: Mode,
}

impl Scene<'_> {
    pub fn bounds(&self) -> Rect {
        self.page.bounds()
    }

    pub fn labels(&self) -> &Labels {
        &self.options.labels
    }

    fn corner_radius(&self) -> f32 {
        match self.mode {
            Mode::Card => self.design.card.corner_radius,
            Mode::Certificate => 0.0,
        }
    }

    /// Text parameters for one role.
    pub fn spec<'s>(
        &'s self,
        style: &'s TextStyle,
        base_size: f32,
        color: &'s str,
        uppercase: bool,
    ) -> LineSpec<'s> {
        LineSpec {
            font_family: &self.design.font_family,
            base_size,
            style,
            color,
            uppercase,
        }
    }

    fn background(&self, side: CardSide) -> Layer {
        let d = self.design;
        let paint = match (self.mode, side) {
            (Mode::Card, CardSide::Back) => {
                paint::gradient(d.card.back_gradient_kind, &d.card.back_gradient_colors)
            }
            (Mode::Card, CardSide::Front) if d.card.front_gradient_enabled => paint::gradient(
                crate::design::GradientKind::Linear,
                &d.card.front_gradient_colors,
            ),
            _ if d.gradient_enabled => paint::gradient(d.gradient_kind, &d.gradient_colors),
            _ => Paint::solid(d.background_color.clone()),
        };
        let shadow = (d.shadow_opacity > 0.0).then(|| Shadow {
            color: d.shadow_color.clone(),
            opacity: d.shadow_opacity,
            blur: d.shadow_blur,
            offset_y: d.shadow_blur / 3.0,
        });
        Layer::new(
            "background",
            LayerKind::Background,
            self.bounds(),
            LayerContent::Fill {
                paint,
                corner_radius: self.corner_radius(),
                shadow,
            },
        )
    }

    fn guilloche(&self) -> Option<Layer> {
        let d = self.design;
        if d.guilloche_opacity <= 0.0 {
            return None;
        }
        let ellipses = guilloche::ellipses(d.guilloche_complexity);
        if ellipses.is_empty() {
            return None;
        }
        Some(
            Layer::new(
                "guilloche",
                LayerKind::Pattern,
                self.bounds(),
                LayerContent::Shapes {
                    view_box: Some(guilloche::VIEW_BOX),
                    fill: None,
                    stroke: Some(Stroke::solid(d.primary_color.clone(), guilloche::STROKE_WIDTH)),
                    shapes: ellipses.into_iter().map(Shape::Ellipse).collect(),
                },
            )
            .with_blend(BlendMode::Multiply)
            .with_opacity(d.guilloche_opacity),
        )
    }

    fn overlay(&self) -> Option<Layer> {
        let d = self.design;
        if d.overlay_opacity <= 0.0 {
            return None;
        }
        let tile = overlay::tile_for(d.overlay_shape)?;
        let (fill, stroke) = match tile.style {
            overlay::TileStyle::Fill => (Some(d.overlay_color.clone()), None),
            overlay::TileStyle::Stroke(width) => {
                (None, Some(Stroke::solid(d.overlay_color.clone(), width)))
            }
        };
        Some(
            Layer::new(
                "overlay",
                LayerKind::Overlay,
                self.bounds(),
                LayerContent::Tiled {
                    tile_width: tile.width,
                    tile_height: tile.height,
                    fill,
                    stroke,
                    shapes: tile.shapes,
                },
            )
            .with_blend(BlendMode::Multiply)
            .with_opacity(d.overlay_opacity),
        )
    }

    fn security_motifs(&self) -> Vec<Layer> {
        let d = self.design;
        let bounds = self.bounds();
        let mut layers = Vec::new();

        if d.fiber_opacity > 0.0 {
            layers.push(
                Layer::new(
                    "fibers",
                    LayerKind::Pattern,
                    bounds,
                    LayerContent::Shapes {
                        view_box: None,
                        fill: None,
                        stroke: Some(Stroke::solid(d.secondary_color.clone(), 0.8)),
                        shapes: security::fibers(bounds, security::FIBER_COUNT),
                    },
                )
                .with_opacity(d.fiber_opacity),
            );
        }

        if d.microtext_opacity > 0.0 {
            let frame = bounds.inset(d.border_width + 6.0);
            layers.push(
                Layer::new(
                    "microtext",
                    LayerKind::Pattern,
                    bounds,
                    LayerContent::Shapes {
                        view_box: None,
                        fill: Some(d.text_color.clone()),
                        stroke: None,
                        shapes: security::microtext_ring(frame, self.microtext()),
                    },
                )
                .with_opacity(d.microtext_opacity),
            );
        }

        let watermark = d.watermark_text.trim();
        if d.watermark_opacity > 0.0 && !watermark.is_empty() {
            let (cx, cy) = bounds.center();
            let style = TextStyle {
                align: TextAlign::Center,
                weight: 700,
                ..d.title.clone()
            };
            let spec = self.spec(&style, bounds.width / 8.0, &d.primary_color, true);
            let line = spec.line(watermark, cy + spec.font_size() / 3.0, bounds);
            layers.push(
                Layer::new(
                    "watermark",
                    LayerKind::Overlay,
                    bounds,
                    LayerContent::Text { lines: vec![line] },
                )
                .with_transform(Transform::rotation_about(-30.0, (cx, cy)))
                .with_opacity(d.watermark_opacity),
            );
        }
        layers
    }

    /// Text repeated by the microtext motifs.
    pub fn microtext(&self) -> &str {
        let text = self.design.watermark_text.trim();
        if text.is_empty() {
            security::DEFAULT_MICROTEXT
        } else {
            text
        }
    }

    fn ribbon(&self) -> Option<Layer> {
        let d = self.design;
        if !d.ribbon_enabled {
            return None;
        }
        let b = self.bounds();
        let (cx, cy, rotation) = match d.ribbon_position {
            Corner::TopLeft => (b.x + RIBBON_INSET, b.y + RIBBON_INSET, -45.0),
            Corner::TopRight => (b.right() - RIBBON_INSET, b.y + RIBBON_INSET, 45.0),
            Corner::BottomLeft => (b.x + RIBBON_INSET, b.bottom() - RIBBON_INSET, 45.0),
            Corner::BottomRight => (b.right() - RIBBON_INSET, b.bottom() - RIBBON_INSET, -45.0),
        };
        let band = Rect::new(
            cx - RIBBON_WIDTH / 2.0,
            cy - RIBBON_HEIGHT / 2.0,
            RIBBON_WIDTH,
            RIBBON_HEIGHT,
        );
        Some(
            Layer::new(
                "ribbon",
                LayerKind::Ribbon,
                band,
                LayerContent::Fill {
                    paint: Paint::solid(d.ribbon_color.clone()),
                    corner_radius: 0.0,
                    shadow: None,
                },
            )
            .with_transform(Transform::rotation_about(rotation, (cx, cy))),
        )
    }

    fn border(&self) -> Option<Layer> {
        let d = self.design;
        let width = d.border_width;
        if d.border_style == BorderStyle::None || width <= 0.0 {
            return None;
        }
        let b = self.bounds();
        let radius = self.corner_radius();
        let frame = |inset: f32, rx: f32| Shape::Rect {
            x: b.x + inset,
            y: b.y + inset,
            width: (b.width - 2.0 * inset).max(0.0),
            height: (b.height - 2.0 * inset).max(0.0),
            rx: rx.max(0.0),
        };

        let (stroke, shapes) = match d.border_style {
            BorderStyle::Double | BorderStyle::Ornamental => {
                let line = width / 3.0;
                let outer = line / 2.0;
                let inner = width - line / 2.0;
                (
                    Stroke::solid(d.border_color.clone(), line),
                    vec![frame(outer, radius - outer), frame(inner, radius - inner)],
                )
            }
            style => {
                let dash = match style {
                    BorderStyle::Dashed => vec![width * 3.0, width * 2.0],
                    BorderStyle::Dotted => vec![width, width],
                    _ => Vec::new(),
                };
                let half = width / 2.0;
                (
                    Stroke {
                        color: d.border_color.clone(),
                        width,
                        dash,
                    },
                    vec![frame(half, radius - half)],
                )
            }
        };

        Some(Layer::new(
            "border",
            LayerKind::Border,
            b,
            LayerContent::Shapes {
                view_box: None,
                fill: None,
                stroke: Some(stroke),
                shapes,
            },
        ))
    }

    /// Floating image asset in its slot, or `None` when the slot is empty.
    pub fn asset(&self, slot: AssetSlot, slot_rect: Rect) -> Option<Layer> {
        let asset = self.design.asset(slot);
        let src = asset.src.as_ref()?;
        let placed = position::place(slot, asset, slot_rect);
        Some(
            Layer::new(
                slot.name(),
                LayerKind::ImageAsset,
                placed.bounds,
                LayerContent::Image {
                    src: src.clone(),
                    clip: Clip::None,
                    border: None,
                    shadow: None,
                },
            )
            .with_transform(placed.transform)
            .with_opacity(placed.opacity),
        )
    }

    /// QR widget: an uploaded QR image wins; otherwise a generated code for
    /// the verification URL when the document has an id.
    pub fn qr(&self, slot_rect: Rect) -> Option<Layer> {
        if self.design.qr_code.src.is_some() {
            return self.asset(AssetSlot::QrCode, slot_rect);
        }
        let id = self.content.id.trim();
        if id.is_empty() {
            return None;
        }
        let placed = position::place(AssetSlot::QrCode, &self.design.qr_code, slot_rect);
        Some(
            Layer::new(
                AssetSlot::QrCode.name(),
                LayerKind::SecurityWidget,
                placed.bounds,
                LayerContent::Qr {
                    payload: verification_url(&self.options.verification_base_url, id),
                    color: self.design.text_color.clone(),
                },
            )
            .with_transform(placed.transform)
            .with_opacity(placed.opacity),
        )
    }

    /// Text layer spanning `region`.
    pub fn text(&self, name: &str, region: Rect, lines: Vec<TextLine>) -> Option<Layer> {
        if lines.is_empty() {
            return None;
        }
        Some(Layer::new(
            name,
            LayerKind::TextBlock,
            region,
            LayerContent::Text { lines },
        ))
    }
}
