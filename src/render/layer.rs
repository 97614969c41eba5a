//! # Layer Tree
//!
//! The compositor's output: an ordered list of [`Layer`]s, each a complete,
//! platform-independent description of one visual element. Layers are built
//! fresh on every compose call and never edited afterwards.
//!
//! ```text
//! DesignState + DocumentContent ──► compose() ──► Vec<Layer> ──► renderer (SVG, canvas, print CSS)
//! ```
//!
//! All coordinates are logical document units (see
//! [`PageGeometry`](crate::document::PageGeometry)).

use serde::{Deserialize, Serialize};

use super::blend::BlendMode;
use crate::design::BarcodeKind;
use crate::position::Transform;

/// Axis-aligned rectangle in document units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }
}

/// Layer classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Background,
    Pattern,
    Overlay,
    Border,
    Ribbon,
    TextBlock,
    ImageAsset,
    SecurityWidget,
}

/// One color stop of a gradient. `offset` is in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: String,
    pub opacity: f32,
}

impl GradientStop {
    pub fn new(offset: f32, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A soft radial color spot of a mesh gradient. Positions are fractions of
/// the layer bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSpot {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: String,
}

/// How an area is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    Solid {
        color: String,
    },
    /// `angle` in degrees, 0 = left to right, 90 = top to bottom.
    Linear {
        angle: f32,
        stops: Vec<GradientStop>,
    },
    /// Center and radius are fractions of the layer bounds.
    Radial {
        cx: f32,
        cy: f32,
        radius: f32,
        stops: Vec<GradientStop>,
    },
    /// Base color with soft radial spots layered on top.
    Mesh {
        base: String,
        spots: Vec<MeshSpot>,
    },
    /// Sweep gradient around the center, starting at `from_angle` degrees.
    Conic {
        from_angle: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    pub fn solid(color: impl Into<String>) -> Self {
        Paint::Solid {
            color: color.into(),
        }
    }
}

/// Stroke parameters shared by a group of shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
    /// Dash pattern (on, off, ...); empty = solid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f32>,
}

impl Stroke {
    pub fn solid(color: impl Into<String>, width: f32) -> Self {
        Self {
            color: color.into(),
            width,
            dash: Vec::new(),
        }
    }
}

/// Drop shadow behind a filled area or image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: String,
    pub opacity: f32,
    pub blur: f32,
    pub offset_y: f32,
}

/// Ellipse primitive; `rotation` in degrees about its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub rotation: f32,
}

/// Geometric primitive. Styling comes from the enclosing group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Ellipse(Ellipse),
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        closed: bool,
    },
    /// Single run of text at a baseline point; `rotation` in degrees.
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
        rotation: f32,
    },
}

/// One line of laid-out text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// Anchor x (meaning depends on `align`) and baseline y.
    pub x: f32,
    pub y: f32,
    pub font_family: String,
    pub font_size: f32,
    pub weight: u16,
    pub letter_spacing: f32,
    pub align: crate::design::TextAlign,
    pub color: String,
    #[serde(default)]
    pub uppercase: bool,
}

/// Clip shape for images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Clip {
    None,
    Circle,
    Rounded { radius: f32 },
}

/// One bar of a 1D barcode, relative to the layer's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: f32,
    pub width: f32,
}

/// What a layer draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerContent {
    /// Fill the bounds with a paint.
    Fill {
        paint: Paint,
        corner_radius: f32,
        shadow: Option<Shadow>,
    },
    /// Shapes in `view_box` coordinates (or document coordinates when absent),
    /// scaled to the layer bounds.
    Shapes {
        view_box: Option<Rect>,
        fill: Option<String>,
        stroke: Option<Stroke>,
        shapes: Vec<Shape>,
    },
    /// A tile repeated across the bounds.
    Tiled {
        tile_width: f32,
        tile_height: f32,
        fill: Option<String>,
        stroke: Option<Stroke>,
        shapes: Vec<Shape>,
    },
    Text {
        lines: Vec<TextLine>,
    },
    /// Image fitted into the bounds.
    Image {
        src: String,
        clip: Clip,
        border: Option<Stroke>,
        shadow: Option<Shadow>,
    },
    /// QR widget; the symbol itself comes from the external encoder.
    Qr {
        payload: String,
        color: String,
    },
    Barcode {
        symbology: BarcodeKind,
        data: String,
        bars: Vec<Bar>,
        color: String,
    },
}

/// One renderable visual element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Stable identifier, e.g. `"background"`, `"guilloche"`, `"logo"`.
    pub name: String,
    pub kind: LayerKind,
    /// Paint order; higher draws later.
    pub z: u32,
    pub bounds: Rect,
    pub transform: Transform,
    pub blend: BlendMode,
    pub opacity: f32,
    pub content: LayerContent,
}

impl Layer {
    /// New layer with identity transform, normal blend and full opacity.
    /// The z-order is assigned when pushed onto a [`LayerStack`].
    pub fn new(name: impl Into<String>, kind: LayerKind, bounds: Rect, content: LayerContent) -> Self {
        Self {
            name: name.into(),
            kind,
            z: 0,
            bounds,
            transform: Transform::IDENTITY,
            blend: BlendMode::Normal,
            opacity: 1.0,
            content,
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Ordered layer buffer passed through the compositor stages, carrying the
/// document bounds. Assigns z-order in push order.
#[derive(Debug)]
pub struct LayerStack {
    pub layers: Vec<Layer>,
    /// Full document bounds in logical units.
    pub page: Rect,
}

impl LayerStack {
    pub fn new(page: Rect) -> Self {
        Self {
            layers: Vec::new(),
            page,
        }
    }

    /// Push a layer, stamping its z-order.
    pub fn push(&mut self, mut layer: Layer) {
        layer.z = self.layers.len() as u32;
        self.layers.push(layer);
    }

    pub fn extend(&mut self, layers: impl IntoIterator<Item = Layer>) {
        for layer in layers {
            self.push(layer);
        }
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}
