//! Valid ranges for every numeric design field.
//!
//! The store itself never validates; UI controls use these bounds as their
//! clamp limits and the compositor clamps through [`sanitize`] so that an
//! out-of-range value is drawn at the nearest bound instead of rejected.

use super::types::{AssetPlacement, AssetSlot, DesignState, TextStyle};

/// Closed interval for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp into the range. NaN maps to `min`.
    #[inline]
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const OPACITY: Range = Range::new(0.0, 1.0);

pub const TEXT_SCALE: Range = Range::new(0.5, 2.5);
pub const FONT_WEIGHT: Range = Range::new(100.0, 900.0);
pub const LETTER_SPACING: Range = Range::new(-2.0, 12.0);
pub const LINE_HEIGHT: Range = Range::new(0.8, 2.5);

pub const GUILLOCHE_COMPLEXITY_MAX: u8 = 10;

pub const BORDER_WIDTH: Range = Range::new(0.0, 40.0);
pub const CORNER_RADIUS: Range = Range::new(0.0, 48.0);
pub const PHOTO_BORDER_WIDTH: Range = Range::new(0.0, 12.0);
pub const PERCENT: Range = Range::new(0.0, 100.0);
pub const SHADOW_BLUR: Range = Range::new(0.0, 80.0);

pub const LOGO_SCALE: Range = Range::new(0.2, 3.0);
pub const SIGNATURE_SCALE: Range = Range::new(0.2, 3.0);
pub const STAMP_SCALE: Range = Range::new(0.2, 3.0);
pub const STICKER_SCALE: Range = Range::new(0.2, 4.0);
pub const QR_SCALE: Range = Range::new(0.4, 3.0);

pub const ASSET_OFFSET: Range = Range::new(-800.0, 800.0);
pub const STICKER_OFFSET: Range = Range::new(-1200.0, 1200.0);
pub const STAMP_ROTATION: Range = Range::new(-180.0, 180.0);

/// Scale bounds for an asset slot.
pub fn scale_range(slot: AssetSlot) -> Range {
    match slot {
        AssetSlot::Logo => LOGO_SCALE,
        AssetSlot::Signature => SIGNATURE_SCALE,
        AssetSlot::Stamp => STAMP_SCALE,
        AssetSlot::Sticker => STICKER_SCALE,
        AssetSlot::QrCode => QR_SCALE,
    }
}

/// Offset bounds (both axes) for an asset slot.
pub fn offset_range(slot: AssetSlot) -> Range {
    match slot {
        AssetSlot::Sticker => STICKER_OFFSET,
        _ => ASSET_OFFSET,
    }
}

/// Clamp an asset placement to its slot's bounds.
///
/// Rotation is zeroed for every slot except the stamp.
pub fn clamp_asset(slot: AssetSlot, asset: &AssetPlacement) -> AssetPlacement {
    let offset = offset_range(slot);
    AssetPlacement {
        src: asset.src.clone(),
        scale: scale_range(slot).clamp(asset.scale),
        opacity: OPACITY.clamp(asset.opacity),
        offset_x: offset.clamp(asset.offset_x),
        offset_y: offset.clamp(asset.offset_y),
        rotation: match slot {
            AssetSlot::Stamp => STAMP_ROTATION.clamp(asset.rotation),
            _ => 0.0,
        },
    }
}

fn clamp_text(style: &TextStyle) -> TextStyle {
    TextStyle {
        scale: TEXT_SCALE.clamp(style.scale),
        weight: style.weight.clamp(FONT_WEIGHT.min as u16, FONT_WEIGHT.max as u16),
        letter_spacing: LETTER_SPACING.clamp(style.letter_spacing),
        line_height: LINE_HEIGHT.clamp(style.line_height),
        align: style.align,
    }
}

/// Return a copy of `design` with every numeric field clamped into range.
pub fn sanitize(design: &DesignState) -> DesignState {
    let mut d = design.clone();

    d.title = clamp_text(&design.title);
    d.name = clamp_text(&design.name);
    d.body = clamp_text(&design.body);

    d.overlay_opacity = OPACITY.clamp(d.overlay_opacity);
    d.guilloche_complexity = d.guilloche_complexity.min(GUILLOCHE_COMPLEXITY_MAX);
    d.guilloche_opacity = OPACITY.clamp(d.guilloche_opacity);
    d.microtext_opacity = OPACITY.clamp(d.microtext_opacity);
    d.ghost_photo_opacity = OPACITY.clamp(d.ghost_photo_opacity);
    d.fiber_opacity = OPACITY.clamp(d.fiber_opacity);
    d.watermark_opacity = OPACITY.clamp(d.watermark_opacity);

    d.border_width = BORDER_WIDTH.clamp(d.border_width);

    for slot in AssetSlot::ALL {
        *d.asset_mut(slot) = clamp_asset(slot, design.asset(slot));
    }

    d.card.corner_radius = CORNER_RADIUS.clamp(d.card.corner_radius);
    d.card.photo_border_width = PHOTO_BORDER_WIDTH.clamp(d.card.photo_border_width);
    d.card.chip_x = PERCENT.clamp(d.card.chip_x);
    d.card.chip_y = PERCENT.clamp(d.card.chip_y);
    d.card.hologram_intensity = OPACITY.clamp(d.card.hologram_intensity);

    d.shadow_opacity = OPACITY.clamp(d.shadow_opacity);
    d.shadow_blur = SHADOW_BLUR.clamp(d.shadow_blur);

    d
}

/// Replace every non-finite numeric field of `design` with the matching
/// field of `fallback`. Returns how many fields were replaced.
///
/// NaN breaks equality, so a design holding one never compares equal to
/// itself and every later snapshot would look like a change.
pub fn repair_non_finite(design: &mut DesignState, fallback: &DesignState) -> usize {
    let mut repaired = 0;
    let mut fix = |value: &mut f32, known: f32| {
        if !value.is_finite() {
            *value = if known.is_finite() { known } else { 0.0 };
            repaired += 1;
        }
    };

    for (style, known) in [
        (&mut design.title, &fallback.title),
        (&mut design.name, &fallback.name),
        (&mut design.body, &fallback.body),
    ] {
        fix(&mut style.scale, known.scale);
        fix(&mut style.letter_spacing, known.letter_spacing);
        fix(&mut style.line_height, known.line_height);
    }

    for slot in AssetSlot::ALL {
        let known = fallback.asset(slot);
        let asset = design.asset_mut(slot);
        fix(&mut asset.scale, known.scale);
        fix(&mut asset.opacity, known.opacity);
        fix(&mut asset.offset_x, known.offset_x);
        fix(&mut asset.offset_y, known.offset_y);
        fix(&mut asset.rotation, known.rotation);
    }

    let card = &mut design.card;
    fix(&mut card.corner_radius, fallback.card.corner_radius);
    fix(&mut card.photo_border_width, fallback.card.photo_border_width);
    fix(&mut card.chip_x, fallback.card.chip_x);
    fix(&mut card.chip_y, fallback.card.chip_y);
    fix(&mut card.hologram_intensity, fallback.card.hologram_intensity);

    fix(&mut design.overlay_opacity, fallback.overlay_opacity);
    fix(&mut design.guilloche_opacity, fallback.guilloche_opacity);
    fix(&mut design.microtext_opacity, fallback.microtext_opacity);
    fix(&mut design.ghost_photo_opacity, fallback.ghost_photo_opacity);
    fix(&mut design.fiber_opacity, fallback.fiber_opacity);
    fix(&mut design.watermark_opacity, fallback.watermark_opacity);
    fix(&mut design.border_width, fallback.border_width);
    fix(&mut design.shadow_opacity, fallback.shadow_opacity);
    fix(&mut design.shadow_blur, fallback.shadow_blur);

    repaired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_clamp() {
        assert_eq!(LOGO_SCALE.clamp(10.0), 3.0);
        assert_eq!(LOGO_SCALE.clamp(0.0), 0.2);
        assert_eq!(LOGO_SCALE.clamp(1.5), 1.5);
        assert_eq!(OPACITY.clamp(f32::NAN), 0.0);
    }

    #[test]
    fn test_default_design_is_in_range() {
        let design = DesignState::default();
        assert_eq!(sanitize(&design), design);
    }

    #[test]
    fn test_sanitize_clamps_assets() {
        let mut design = DesignState::default();
        design.sticker.scale = 9.0;
        design.sticker.offset_x = -5000.0;
        design.logo.rotation = 45.0;
        design.stamp.rotation = 270.0;
        design.guilloche_complexity = 200;

        let clean = sanitize(&design);
        assert_eq!(clean.sticker.scale, 4.0);
        assert_eq!(clean.sticker.offset_x, -1200.0);
        assert_eq!(clean.logo.rotation, 0.0);
        assert_eq!(clean.stamp.rotation, 180.0);
        assert_eq!(clean.guilloche_complexity, 10);
    }

    #[test]
    fn test_qr_scale_floor() {
        let asset = AssetPlacement {
            scale: 0.1,
            ..Default::default()
        };
        assert_eq!(clamp_asset(AssetSlot::QrCode, &asset).scale, 0.4);
        assert_eq!(clamp_asset(AssetSlot::Logo, &asset).scale, 0.2);
    }

    #[test]
    fn test_repair_non_finite_uses_fallback() {
        let fallback = DesignState::default();
        let mut design = fallback.clone();
        design.overlay_opacity = f32::NAN;
        design.name.scale = f32::INFINITY;
        design.stamp.rotation = f32::NEG_INFINITY;
        design.card.chip_x = f32::NAN;

        assert_eq!(repair_non_finite(&mut design, &fallback), 4);
        assert_eq!(design, fallback);
        assert_eq!(repair_non_finite(&mut design, &fallback), 0);
    }
}
