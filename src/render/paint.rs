//! Background gradient formulas.
//!
//! `Linear`, `Radial` and `Mesh` are driven by the design's three colors;
//! the other kinds are fixed-palette presets and ignore them.

use crate::design::GradientKind;

use super::layer::{GradientStop, MeshSpot, Paint};

fn three_stops(colors: [&str; 3]) -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, colors[0]),
        GradientStop::new(0.5, colors[1]),
        GradientStop::new(1.0, colors[2]),
    ]
}

fn linear(angle: f32, colors: [&str; 3]) -> Paint {
    Paint::Linear {
        angle,
        stops: three_stops(colors),
    }
}

/// Paint for a gradient kind and palette.
pub fn gradient(kind: GradientKind, colors: &[String; 3]) -> Paint {
    let palette = [colors[0].as_str(), colors[1].as_str(), colors[2].as_str()];
    match kind {
        GradientKind::Linear => linear(135.0, palette),
        GradientKind::Radial => Paint::Radial {
            cx: 0.5,
            cy: 0.5,
            radius: 0.75,
            stops: three_stops(palette),
        },
        GradientKind::Mesh => Paint::Mesh {
            base: colors[0].clone(),
            spots: vec![
                MeshSpot {
                    cx: 0.85,
                    cy: 0.15,
                    radius: 0.6,
                    color: colors[1].clone(),
                },
                MeshSpot {
                    cx: 0.15,
                    cy: 0.85,
                    radius: 0.6,
                    color: colors[2].clone(),
                },
            ],
        },
        GradientKind::Sunset => linear(135.0, ["#ff7e5f", "#feb47b", "#ffd194"]),
        GradientKind::Ocean => linear(90.0, ["#2193b0", "#6dd5ed", "#e0f7fa"]),
        GradientKind::Forest => linear(135.0, ["#134e5e", "#71b280", "#d4f1c4"]),
        GradientKind::Royal => Paint::Radial {
            cx: 0.3,
            cy: 0.2,
            radius: 1.0,
            stops: three_stops(["#4b6cb7", "#243b55", "#141e30"]),
        },
        GradientKind::Metallic => Paint::Linear {
            angle: 45.0,
            stops: vec![
                GradientStop::new(0.0, "#bdc3c7"),
                GradientStop::new(0.25, "#ecf0f1"),
                GradientStop::new(0.5, "#95a5a6"),
                GradientStop::new(0.75, "#ecf0f1"),
                GradientStop::new(1.0, "#bdc3c7"),
            ],
        },
        GradientKind::Aurora => Paint::Mesh {
            base: "#0f172a".into(),
            spots: vec![
                MeshSpot {
                    cx: 0.2,
                    cy: 0.3,
                    radius: 0.7,
                    color: "#00c9ff".into(),
                },
                MeshSpot {
                    cx: 0.8,
                    cy: 0.2,
                    radius: 0.6,
                    color: "#92fe9d".into(),
                },
                MeshSpot {
                    cx: 0.6,
                    cy: 0.9,
                    radius: 0.6,
                    color: "#fc5c7d".into(),
                },
            ],
        },
    }
}

/// Rainbow sweep for the hologram disk; stop opacity follows `intensity`.
pub fn hologram(intensity: f32) -> Paint {
    let colors = ["#ff00cc", "#ffcc00", "#00ffcc", "#3399ff", "#cc66ff", "#ff00cc"];
    let last = (colors.len() - 1) as f32;
    Paint::Conic {
        from_angle: 0.0,
        stops: colors
            .iter()
            .enumerate()
            .map(|(i, c)| GradientStop::new(i as f32 / last, *c).with_opacity(intensity))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> [String; 3] {
        ["#111111".into(), "#222222".into(), "#333333".into()]
    }

    #[test]
    fn test_custom_kinds_use_palette() {
        match gradient(GradientKind::Linear, &palette()) {
            Paint::Linear { stops, .. } => {
                assert_eq!(stops[0].color, "#111111");
                assert_eq!(stops[2].color, "#333333");
            }
            other => panic!("unexpected {other:?}"),
        }
        match gradient(GradientKind::Mesh, &palette()) {
            Paint::Mesh { base, spots } => {
                assert_eq!(base, "#111111");
                assert_eq!(spots.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_presets_ignore_palette() {
        let a = gradient(GradientKind::Sunset, &palette());
        let b = gradient(
            GradientKind::Sunset,
            &["#000".into(), "#000".into(), "#000".into()],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_hologram_intensity() {
        let Paint::Conic { stops, .. } = hologram(0.4) else {
            panic!("hologram is not conic");
        };
        assert!(stops.iter().all(|s| s.opacity == 0.4));
        assert_eq!(stops.last().map(|s| s.offset), Some(1.0));
    }
}
