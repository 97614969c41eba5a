//! Design-parameter record and its enumerations.
//!
//! All types derive `Serialize + Deserialize` so the same record is the Rust
//! API, the persisted JSON document, and the wire format of the preview
//! server. `PartialEq` is derived on everything: history change detection
//! compares designs field by field.

use serde::{Deserialize, Serialize};

// ============================================================================
// THEME
// ============================================================================

/// Editor theme the design was authored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Page orientation for the certificate form factor.
///
/// Cards are always landscape; this only affects [`Mode::Certificate`](crate::document::Mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// SVG `text-anchor` value.
    pub fn anchor(self) -> &'static str {
        match self {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }
}

/// Typography parameters for one text role (title, name, body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Multiplier over the role's base font size.
    pub scale: f32,
    /// CSS font weight (100–900).
    pub weight: u16,
    /// Extra spacing between glyphs, in logical px.
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub align: TextAlign,
}

impl TextStyle {
    fn new(weight: u16) -> Self {
        Self {
            scale: 1.0,
            weight,
            letter_spacing: 0.0,
            line_height: 1.3,
            align: TextAlign::Center,
        }
    }
}

// ============================================================================
// BACKGROUND
// ============================================================================

/// Background gradient formula.
///
/// `Linear`, `Radial` and `Mesh` use the design's three gradient colors; the
/// remaining variants are fixed-palette presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Mesh,
    Sunset,
    Ocean,
    Forest,
    Royal,
    Metallic,
    Aurora,
}

impl GradientKind {
    pub const ALL: [GradientKind; 9] = [
        GradientKind::Linear,
        GradientKind::Radial,
        GradientKind::Mesh,
        GradientKind::Sunset,
        GradientKind::Ocean,
        GradientKind::Forest,
        GradientKind::Royal,
        GradientKind::Metallic,
        GradientKind::Aurora,
    ];
}

// ============================================================================
// SECURITY MOTIFS
// ============================================================================

/// Tiled overlay texture drawn over the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayShape {
    #[default]
    None,
    Dots,
    Grid,
    Lines,
    Diagonal,
    CrossHatch,
    Waves,
    Hexagons,
    Triangles,
    Diamonds,
    Circles,
    Stars,
    Chevron,
    Zigzag,
    Checkerboard,
    Stripes,
    Scales,
    Plaid,
    Bricks,
    Crosses,
    Rings,
}

impl OverlayShape {
    pub const ALL: [OverlayShape; 21] = [
        OverlayShape::None,
        OverlayShape::Dots,
        OverlayShape::Grid,
        OverlayShape::Lines,
        OverlayShape::Diagonal,
        OverlayShape::CrossHatch,
        OverlayShape::Waves,
        OverlayShape::Hexagons,
        OverlayShape::Triangles,
        OverlayShape::Diamonds,
        OverlayShape::Circles,
        OverlayShape::Stars,
        OverlayShape::Chevron,
        OverlayShape::Zigzag,
        OverlayShape::Checkerboard,
        OverlayShape::Stripes,
        OverlayShape::Scales,
        OverlayShape::Plaid,
        OverlayShape::Bricks,
        OverlayShape::Crosses,
        OverlayShape::Rings,
    ];
}

// ============================================================================
// BORDER & RIBBON
// ============================================================================

/// Document border style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    None,
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    /// Rendered as a double line.
    Ornamental,
}

/// Document corner, used for the ribbon badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

// ============================================================================
// FLOATING ASSETS
// ============================================================================

/// Placement of one floating image asset (logo, stamp, signature, sticker, QR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPlacement {
    /// Image source as a data URI; `None` hides the asset.
    pub src: Option<String>,
    pub scale: f32,
    pub opacity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Degrees; only honoured for the stamp.
    pub rotation: f32,
}

impl Default for AssetPlacement {
    fn default() -> Self {
        Self {
            src: None,
            scale: 1.0,
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
        }
    }
}

/// Floating asset slots. Each slot owns one [`AssetPlacement`] in the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSlot {
    Logo,
    Stamp,
    Signature,
    Sticker,
    QrCode,
}

impl AssetSlot {
    pub const ALL: [AssetSlot; 5] = [
        AssetSlot::Logo,
        AssetSlot::Stamp,
        AssetSlot::Signature,
        AssetSlot::Sticker,
        AssetSlot::QrCode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetSlot::Logo => "logo",
            AssetSlot::Stamp => "stamp",
            AssetSlot::Signature => "signature",
            AssetSlot::Sticker => "sticker",
            AssetSlot::QrCode => "qr_code",
        }
    }
}

// ============================================================================
// CARD
// ============================================================================

/// Shape of the holder photo on the card front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoShape {
    Circle,
    #[default]
    Rounded,
    Square,
}

/// EMV chip finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipStyle {
    #[default]
    Gold,
    Silver,
}

/// Decorative security pattern on the card front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPattern {
    None,
    #[default]
    Guilloche,
    Waves,
    Mesh,
    Microtext,
}

/// 1D symbology for the card-back barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeKind {
    #[default]
    Code128,
    Code39,
    Code93,
}

/// Card-only design fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDesign {
    pub corner_radius: f32,
    pub front_gradient_enabled: bool,
    pub front_gradient_colors: [String; 3],
    pub photo_shape: PhotoShape,
    pub photo_border_width: f32,
    pub photo_border_color: String,
    pub photo_shadow: bool,
    pub name_color: String,
    pub role_color: String,
    pub detail_color: String,
    pub chip_visible: bool,
    pub chip_style: ChipStyle,
    /// Chip position as a percentage of card width.
    pub chip_x: f32,
    /// Chip position as a percentage of card height.
    pub chip_y: f32,
    pub hologram_visible: bool,
    pub hologram_intensity: f32,
    pub security_pattern: SecurityPattern,
    pub back_gradient_kind: GradientKind,
    pub back_gradient_colors: [String; 3],
    pub stripe_visible: bool,
    pub stripe_color: String,
    pub barcode_visible: bool,
    pub barcode_kind: BarcodeKind,
}

impl Default for CardDesign {
    fn default() -> Self {
        Self {
            corner_radius: 24.0,
            front_gradient_enabled: false,
            front_gradient_colors: [
                "#0f172a".into(),
                "#1e3a8a".into(),
                "#0ea5e9".into(),
            ],
            photo_shape: PhotoShape::Rounded,
            photo_border_width: 3.0,
            photo_border_color: "#ffffff".into(),
            photo_shadow: true,
            name_color: "#0f172a".into(),
            role_color: "#ffffff".into(),
            detail_color: "#334155".into(),
            chip_visible: true,
            chip_style: ChipStyle::Gold,
            chip_x: 8.0,
            chip_y: 38.0,
            hologram_visible: true,
            hologram_intensity: 0.6,
            security_pattern: SecurityPattern::Guilloche,
            back_gradient_kind: GradientKind::Linear,
            back_gradient_colors: [
                "#f8fafc".into(),
                "#e2e8f0".into(),
                "#cbd5e1".into(),
            ],
            stripe_visible: true,
            stripe_color: "#111827".into(),
            barcode_visible: true,
            barcode_kind: BarcodeKind::Code128,
        }
    }
}

// ============================================================================
// DESIGN STATE
// ============================================================================

/// The complete design-parameter record for one document design.
///
/// Always a complete value: [`Default`] is the compiled-in starting design
/// and every other state is derived from it through whole-or-partial
/// replacement (see [`DesignStore`](super::DesignStore)). Valid ranges for
/// the numeric fields live in [`ranges`](super::ranges).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignState {
    // Theme
    pub theme_mode: ThemeMode,
    pub font_family: String,
    pub bilingual: bool,
    pub orientation: Orientation,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub text_color: String,
    pub background_color: String,

    // Typography
    pub title: TextStyle,
    pub name: TextStyle,
    pub body: TextStyle,

    // Background
    pub gradient_enabled: bool,
    pub gradient_kind: GradientKind,
    pub gradient_colors: [String; 3],

    // Security motifs
    pub overlay_shape: OverlayShape,
    pub overlay_opacity: f32,
    pub overlay_color: String,
    pub guilloche_complexity: u8,
    pub guilloche_opacity: f32,
    pub microtext_opacity: f32,
    pub ghost_photo_opacity: f32,
    pub fiber_opacity: f32,
    pub watermark_text: String,
    pub watermark_opacity: f32,

    // Border & ribbon
    pub border_style: BorderStyle,
    pub border_width: f32,
    pub border_color: String,
    pub ribbon_enabled: bool,
    pub ribbon_color: String,
    pub ribbon_position: Corner,

    // Floating assets
    pub logo: AssetPlacement,
    pub stamp: AssetPlacement,
    pub signature: AssetPlacement,
    pub sticker: AssetPlacement,
    pub qr_code: AssetPlacement,

    // Card
    pub card: CardDesign,

    // Shadow
    pub shadow_color: String,
    pub shadow_opacity: f32,
    pub shadow_blur: f32,
}

impl Default for DesignState {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Light,
            font_family: "Georgia, serif".into(),
            bilingual: false,
            orientation: Orientation::Portrait,
            primary_color: "#1e3a8a".into(),
            secondary_color: "#b45309".into(),
            accent_color: "#d4af37".into(),
            text_color: "#1f2937".into(),
            background_color: "#fffdf7".into(),

            title: TextStyle {
                letter_spacing: 4.0,
                ..TextStyle::new(700)
            },
            name: TextStyle::new(600),
            body: TextStyle {
                line_height: 1.6,
                ..TextStyle::new(400)
            },

            gradient_enabled: false,
            gradient_kind: GradientKind::Linear,
            gradient_colors: ["#fffdf7".into(), "#fef3c7".into(), "#fde68a".into()],

            overlay_shape: OverlayShape::None,
            overlay_opacity: 0.08,
            overlay_color: "#1e3a8a".into(),
            guilloche_complexity: 0,
            guilloche_opacity: 0.15,
            microtext_opacity: 0.0,
            ghost_photo_opacity: 0.0,
            fiber_opacity: 0.0,
            watermark_text: String::new(),
            watermark_opacity: 0.0,

            border_style: BorderStyle::Solid,
            border_width: 8.0,
            border_color: "#d4af37".into(),
            ribbon_enabled: false,
            ribbon_color: "#b91c1c".into(),
            ribbon_position: Corner::TopRight,

            logo: AssetPlacement::default(),
            stamp: AssetPlacement {
                opacity: 0.9,
                ..AssetPlacement::default()
            },
            signature: AssetPlacement::default(),
            sticker: AssetPlacement::default(),
            qr_code: AssetPlacement::default(),

            card: CardDesign::default(),

            shadow_color: "#000000".into(),
            shadow_opacity: 0.2,
            shadow_blur: 24.0,
        }
    }
}

impl DesignState {
    /// The placement record for an asset slot.
    pub fn asset(&self, slot: AssetSlot) -> &AssetPlacement {
        match slot {
            AssetSlot::Logo => &self.logo,
            AssetSlot::Stamp => &self.stamp,
            AssetSlot::Signature => &self.signature,
            AssetSlot::Sticker => &self.sticker,
            AssetSlot::QrCode => &self.qr_code,
        }
    }

    pub fn asset_mut(&mut self, slot: AssetSlot) -> &mut AssetPlacement {
        match slot {
            AssetSlot::Logo => &mut self.logo,
            AssetSlot::Stamp => &mut self.stamp,
            AssetSlot::Signature => &mut self.signature,
            AssetSlot::Sticker => &mut self.sticker,
            AssetSlot::QrCode => &mut self.qr_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_json() {
        let design = DesignState::default();
        let json = serde_json::to_string(&design).unwrap();
        let back: DesignState = serde_json::from_str(&json).unwrap();
        assert_eq!(design, back);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let value = serde_json::to_value(DesignState::default()).unwrap();
        assert!(value.get("primaryColor").is_some());
        assert!(value.get("guillocheComplexity").is_some());
        assert!(value["card"].get("chipVisible").is_some());
        assert_eq!(value["overlayShape"], "none");
    }

    #[test]
    fn test_incomplete_design_is_rejected() {
        let result: Result<DesignState, _> = serde_json::from_str(r##"{"primaryColor":"#000"}"##);
        assert!(result.is_err());
    }

    #[test]
    fn test_asset_slot_accessors() {
        let mut design = DesignState::default();
        design.asset_mut(AssetSlot::Stamp).rotation = 15.0;
        assert_eq!(design.asset(AssetSlot::Stamp).rotation, 15.0);
        assert_eq!(design.asset(AssetSlot::Logo).rotation, 0.0);
    }

    #[test]
    fn test_enum_variant_counts() {
        assert_eq!(GradientKind::ALL.len(), 9);
        assert_eq!(OverlayShape::ALL.len(), 21);
    }
}
