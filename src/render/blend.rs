//! Blend modes for layer compositing.
//!
//! Security motifs are multiply-blended over the background so they tint
//! rather than cover it. Renderers map each mode onto their platform's
//! equivalent (`mix-blend-mode` for SVG/CSS).

use serde::{Deserialize, Serialize};

/// Blend modes for compositing layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Normal blending - top layer replaces bottom based on opacity.
    #[default]
    Normal,
    /// Multiply - darkens (used for guilloche and overlay textures).
    Multiply,
    /// Screen - lightens (used for the hologram sheen).
    Screen,
}

impl BlendMode {
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
        }
    }

    /// CSS `mix-blend-mode` keyword.
    pub fn css_name(self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_names() {
        assert_eq!(BlendMode::Multiply.css_name(), "multiply");
        assert_eq!(BlendMode::Screen.css_name(), "screen");
    }

    #[test]
    fn test_serde_names_match() {
        for mode in BlendMode::all() {
            let json = serde_json::to_string(mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.name()));
        }
    }
}
