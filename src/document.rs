//! # Documents and Page Geometry
//!
//! The content record being rendered, the render mode, and the physical
//! page contract the print/export boundary must satisfy.
//!
//! ## Form Factors
//!
//! | Form factor   | Physical (mm)  | Logical (units) |
//! |---------------|----------------|-----------------|
//! | A4 portrait   | 210 × 297      | 794 × 1123      |
//! | A4 landscape  | 297 × 210      | 1123 × 794      |
//! | ID card (CR80)| 85.6 × 53.98   | 856 × 540       |
//!
//! A4 logical units are CSS pixels at 96 dpi; the card uses 10 units/mm.
//! Pages print with zero margin. The certificate's own 25 mm margin is
//! drawn as content, not as a page margin.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::design::Orientation;
use crate::render::layer::Rect;

/// What kind of document is being designed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Certificate,
    Card,
}

/// Card face. Ignored for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CardSide {
    #[default]
    Front,
    Back,
}

/// The record being rendered. Owned by the calling form; read-only here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Document identifier; also the verification key.
    #[serde(default)]
    pub id: String,
    /// Holder photo as a data URI.
    #[serde(default)]
    pub photo: Option<String>,
    /// Issuer label for the card header; falls back to the configured label.
    #[serde(default)]
    pub issuer: Option<String>,
}

impl DocumentContent {
    /// Issue date formatted for display (`17.10.2026`), or empty.
    pub fn issue_date_label(&self) -> String {
        self.issue_date
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_default()
    }
}

/// Verification URL encoded in the QR widget: `<base>/verify/<document-id>`.
pub fn verification_url(base: &str, document_id: &str) -> String {
    format!("{}/verify/{}", base.trim_end_matches('/'), document_id)
}

/// Physical page and logical canvas size of one form factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub name: &'static str,
    pub width_mm: f32,
    pub height_mm: f32,
    /// Logical canvas width the compositor lays out in.
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub const A4_PORTRAIT: Self = Self {
        name: "A4 portrait",
        width_mm: 210.0,
        height_mm: 297.0,
        width: 794.0,
        height: 1123.0,
    };

    pub const A4_LANDSCAPE: Self = Self {
        name: "A4 landscape",
        width_mm: 297.0,
        height_mm: 210.0,
        width: 1123.0,
        height: 794.0,
    };

    pub const ID_CARD: Self = Self {
        name: "ID card",
        width_mm: 85.6,
        height_mm: 53.98,
        width: 856.0,
        height: 540.0,
    };

    /// Geometry for a mode; orientation only applies to certificates.
    pub fn for_mode(mode: Mode, orientation: Orientation) -> Self {
        match (mode, orientation) {
            (Mode::Card, _) => Self::ID_CARD,
            (Mode::Certificate, Orientation::Portrait) => Self::A4_PORTRAIT,
            (Mode::Certificate, Orientation::Landscape) => Self::A4_LANDSCAPE,
        }
    }

    /// Logical units per millimeter.
    #[inline]
    pub fn units_per_mm(&self) -> f32 {
        self.width / self.width_mm
    }

    /// Convert millimeters to logical units.
    #[inline]
    pub fn mm_to_units(&self, mm: f32) -> f32 {
        mm * self.units_per_mm()
    }

    /// Full logical bounds.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Print CSS for the export boundary: exact page size, zero margin.
    pub fn print_css(&self) -> String {
        format!(
            "@page {{ size: {}mm {}mm; margin: 0; }}",
            self.width_mm, self.height_mm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_fields_are_all_optional() {
        let empty: DocumentContent = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DocumentContent::default());

        let partial: DocumentContent = serde_json::from_str(r#"{"id": "CERT-7"}"#).unwrap();
        assert_eq!(partial.id, "CERT-7");
        assert!(partial.name.is_empty());
    }

    #[test]
    fn test_geometry_for_mode() {
        assert_eq!(
            PageGeometry::for_mode(Mode::Certificate, Orientation::Portrait),
            PageGeometry::A4_PORTRAIT
        );
        assert_eq!(
            PageGeometry::for_mode(Mode::Certificate, Orientation::Landscape).width_mm,
            297.0
        );
        assert_eq!(
            PageGeometry::for_mode(Mode::Card, Orientation::Portrait),
            PageGeometry::ID_CARD
        );
    }

    #[test]
    fn test_a4_units_per_mm_is_96_dpi() {
        let upm = PageGeometry::A4_PORTRAIT.units_per_mm();
        assert!((upm - 96.0 / 25.4).abs() < 0.01);
        // 25 mm certificate margin ≈ 94.5 units
        assert!((PageGeometry::A4_PORTRAIT.mm_to_units(25.0) - 94.5).abs() < 0.2);
    }

    #[test]
    fn test_print_css() {
        assert_eq!(
            PageGeometry::ID_CARD.print_css(),
            "@page { size: 85.6mm 53.98mm; margin: 0; }"
        );
    }

    #[test]
    fn test_verification_url() {
        assert_eq!(
            verification_url("https://example.org/", "CERT-42"),
            "https://example.org/verify/CERT-42"
        );
    }

    #[test]
    fn test_issue_date_label() {
        let content = DocumentContent {
            issue_date: NaiveDate::from_ymd_opt(2026, 10, 17),
            ..Default::default()
        };
        assert_eq!(content.issue_date_label(), "17.10.2026");
        assert_eq!(DocumentContent::default().issue_date_label(), "");
    }
}
