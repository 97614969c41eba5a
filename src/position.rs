//! # Positioning Engine
//!
//! Turns a floating asset's `{scale, offset_x, offset_y, rotation, opacity}`
//! into a layer [`Transform`].
//!
//! ## Composition
//!
//! ```text
//! transform = translate(offset_x, offset_y) ∘ scale(scale) ∘ rotate(rotation)
//! ```
//!
//! applied about the asset's anchor point (the CSS `transform-origin`).
//!
//! ## Anchors
//!
//! | Asset     | Anchor                       |
//! |-----------|------------------------------|
//! | logo      | top-center of its slot       |
//! | signature | top-left of its slot         |
//! | stamp     | top-left of its slot         |
//! | sticker   | center of its slot (= page)  |
//! | qr-code   | center of its slot           |
//!
//! Offsets are therefore "move the anchor by this much", and scaling grows
//! the asset away from the anchor.

use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::design::ranges;
use crate::design::{AssetPlacement, AssetSlot};
use crate::render::layer::Rect;

/// Rotate a point around the origin (angle in degrees, clockwise in
/// screen space where y grows downward).
#[inline]
pub fn rotate_deg(x: f32, y: f32, angle_deg: f32) -> (f32, f32) {
    let angle = angle_deg * PI / 180.0;
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

/// Point within a slot that a transform is applied about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    Center,
}

impl Anchor {
    /// Anchor used for an asset slot.
    pub fn for_slot(slot: AssetSlot) -> Self {
        match slot {
            AssetSlot::Logo => Anchor::TopCenter,
            AssetSlot::Signature | AssetSlot::Stamp => Anchor::TopLeft,
            AssetSlot::Sticker | AssetSlot::QrCode => Anchor::Center,
        }
    }

    /// Resolve to an absolute point inside `rect`.
    pub fn point(self, rect: &Rect) -> (f32, f32) {
        match self {
            Anchor::TopLeft => (rect.x, rect.y),
            Anchor::TopCenter => (rect.x + rect.width / 2.0, rect.y),
            Anchor::Center => rect.center(),
        }
    }
}

/// 2D transform: translate ∘ scale ∘ rotate about `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Degrees.
    pub rotation: f32,
    /// Absolute origin the scale and rotation are applied about.
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
        origin_x: 0.0,
        origin_y: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.scale == 1.0 && self.rotation == 0.0
    }

    /// Pure rotation about a point.
    pub fn rotation_about(rotation: f32, origin: (f32, f32)) -> Self {
        Self {
            rotation,
            origin_x: origin.0,
            origin_y: origin.1,
            ..Self::IDENTITY
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let (lx, ly) = (x - self.origin_x, y - self.origin_y);
        let (rx, ry) = rotate_deg(lx, ly, self.rotation);
        (
            rx * self.scale + self.origin_x + self.translate_x,
            ry * self.scale + self.origin_y + self.translate_y,
        )
    }

    /// CSS `transform` value; pair with [`Transform::css_origin`].
    ///
    /// Identity components are omitted, so an unrotated unit-scale asset
    /// offset by (50, 0) yields `translate(50px, 0px)`.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        if self.translate_x != 0.0 || self.translate_y != 0.0 {
            parts.push(format!(
                "translate({}px, {}px)",
                self.translate_x, self.translate_y
            ));
        }
        if self.scale != 1.0 {
            parts.push(format!("scale({})", self.scale));
        }
        if self.rotation != 0.0 {
            parts.push(format!("rotate({}deg)", self.rotation));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" ")
        }
    }

    pub fn css_origin(&self) -> String {
        format!("{}px {}px", self.origin_x, self.origin_y)
    }

    /// SVG `transform` attribute value with the origin folded in.
    pub fn to_svg(&self) -> String {
        if self.is_identity() {
            return String::new();
        }
        let (ox, oy) = (self.origin_x, self.origin_y);
        let mut out = format!(
            "translate({} {})",
            ox + self.translate_x,
            oy + self.translate_y
        );
        if self.scale != 1.0 {
            out.push_str(&format!(" scale({})", self.scale));
        }
        if self.rotation != 0.0 {
            out.push_str(&format!(" rotate({})", self.rotation));
        }
        out.push_str(&format!(" translate({} {})", -ox, -oy));
        out
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Resolved placement of a floating asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// The untransformed slot the asset is fitted into.
    pub bounds: Rect,
    pub transform: Transform,
    pub opacity: f32,
}

/// Place an asset into its slot.
///
/// Out-of-range values are clamped to the slot's bounds from
/// [`ranges`](crate::design::ranges); rotation is only honoured for the stamp.
pub fn place(slot: AssetSlot, asset: &AssetPlacement, slot_rect: Rect) -> Placement {
    let asset = ranges::clamp_asset(slot, asset);
    let (origin_x, origin_y) = Anchor::for_slot(slot).point(&slot_rect);
    Placement {
        bounds: slot_rect,
        transform: Transform {
            translate_x: asset.offset_x,
            translate_y: asset.offset_y,
            scale: asset.scale,
            rotation: asset.rotation,
            origin_x,
            origin_y,
        },
        opacity: asset.opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn test_rotate_90() {
        let (x, y) = rotate_deg(1.0, 0.0, 90.0);
        assert!(x.abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_logo_transform_css() {
        let asset = AssetPlacement {
            src: Some("data:image/png;base64,AAAA".into()),
            scale: 2.0,
            offset_x: 50.0,
            offset_y: 0.0,
            ..Default::default()
        };
        let placed = place(AssetSlot::Logo, &asset, Rect::new(100.0, 40.0, 120.0, 120.0));
        assert_eq!(placed.transform.to_css(), "translate(50px, 0px) scale(2)");
        assert_eq!(placed.transform.css_origin(), "160px 40px");
    }

    #[test]
    fn test_anchor_is_fixed_point_of_scale() {
        let slot = Rect::new(10.0, 20.0, 100.0, 60.0);
        for s in AssetSlot::ALL {
            let asset = AssetPlacement {
                scale: 2.5,
                ..Default::default()
            };
            let placed = place(s, &asset, slot);
            let anchor = Anchor::for_slot(s).point(&slot);
            assert!(approx(placed.transform.apply(anchor.0, anchor.1), anchor), "{s:?}");
        }
    }

    #[test]
    fn test_rotation_only_for_stamp() {
        let asset = AssetPlacement {
            rotation: 30.0,
            ..Default::default()
        };
        let slot = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(place(AssetSlot::Stamp, &asset, slot).transform.rotation, 30.0);
        assert_eq!(place(AssetSlot::Signature, &asset, slot).transform.rotation, 0.0);
    }

    #[test]
    fn test_apply_translate_scale_rotate() {
        let t = Transform {
            translate_x: 10.0,
            translate_y: 5.0,
            scale: 2.0,
            rotation: 90.0,
            origin_x: 0.0,
            origin_y: 0.0,
        };
        // (1, 0) → rotate → (0, 1) → scale → (0, 2) → translate → (10, 7)
        assert!(approx(t.apply(1.0, 0.0), (10.0, 7.0)));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let asset = AssetPlacement {
            scale: 12.0,
            offset_x: 5000.0,
            opacity: 3.0,
            ..Default::default()
        };
        let placed = place(AssetSlot::QrCode, &asset, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(placed.transform.scale, 3.0);
        assert_eq!(placed.transform.translate_x, 800.0);
        assert_eq!(placed.opacity, 1.0);
    }

    #[test]
    fn test_identity_svg_is_empty() {
        assert_eq!(Transform::IDENTITY.to_svg(), "");
        assert_eq!(Transform::IDENTITY.to_css(), "none");
    }
}
