//! # Engine Configuration
//!
//! Everything the engine needs that is not part of a design: fixed labels,
//! the verification base URL, asset limits, and viewport/history tuning.
//!
//! Loaded from an optional JSON file; every field has a default, so a
//! partial file only overrides what it names.
//!
//! ```json
//! {
//!   "verificationBaseUrl": "https://certs.example.org",
//!   "labels": { "certificateTitle": "Certificate of Completion" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::InsigniaError;
use crate::history::HISTORY_CAP;
use crate::render::viewport::DEFAULT_MARGIN;

/// Recommended cap for ingested asset files (5 MiB).
pub const DEFAULT_MAX_ASSET_BYTES: u64 = 5 * 1024 * 1024;

/// Fixed document text that is not part of the design or the content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    pub certificate_title: String,
    pub boilerplate: String,
    /// Second-language boilerplate, shown when the design is bilingual.
    pub boilerplate_secondary: String,
    pub card_issuer: String,
    pub card_brand: String,
    pub card_back_header: String,
    pub issued_caption: String,
    pub id_caption: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            certificate_title: "Certificate".into(),
            boilerplate: "This is to certify that".into(),
            boilerplate_secondary: "Nous certifions que".into(),
            card_issuer: "Identity Card".into(),
            card_brand: "Issued under the authority of the certifying organisation".into(),
            card_back_header: "Cardholder Information".into(),
            issued_caption: "Issued".into(),
            id_caption: "ID".into(),
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Base of the QR verification URL (`<base>/verify/<id>`).
    pub verification_base_url: String,
    pub labels: Labels,
    /// Largest asset file accepted by ingestion, in bytes.
    pub max_asset_bytes: u64,
    /// Inset kept free around the document in the viewport, in px.
    pub viewport_margin: f32,
    pub history_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verification_base_url: "https://verify.example.org".into(),
            labels: Labels::default(),
            max_asset_bytes: DEFAULT_MAX_ASSET_BYTES,
            viewport_margin: DEFAULT_MARGIN,
            history_cap: HISTORY_CAP,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, InsigniaError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            InsigniaError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, InsigniaError> {
        serde_json::from_str(text).map_err(|e| InsigniaError::Config(e.to_string()))
    }

    /// Load `path` if given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, InsigniaError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{"verificationBaseUrl":"https://certs.test","labels":{"certificateTitle":"Diploma"}}"#,
        )
        .unwrap();
        assert_eq!(config.verification_base_url, "https://certs.test");
        assert_eq!(config.labels.certificate_title, "Diploma");
        assert_eq!(config.labels.boilerplate, "This is to certify that");
        assert_eq!(config.history_cap, HISTORY_CAP);
        assert_eq!(config.max_asset_bytes, DEFAULT_MAX_ASSET_BYTES);
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let err = EngineConfig::from_json("{").unwrap_err();
        assert!(matches!(err, InsigniaError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/insignia.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
