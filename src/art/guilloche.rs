//! # Guilloche
//!
//! Concentric rotated ellipses around a fixed anchor, in the style of the
//! fine-line rosettes printed on banknotes.
//!
//! ## Formula
//!
//! ```text
//! n   = complexity × 10
//! rx  = 200 + 20·i
//! ry  = 350 + 15·i
//! rot = i × 360 / n      (degrees about the anchor)
//! ```
//!
//! Drawn stroke-only at [`STROKE_WIDTH`] in the design's primary color,
//! inside an 800 × 1120 view box stretched to the document bounds.

use crate::render::layer::{Ellipse, Rect};

/// View box the ellipses are laid out in.
pub const VIEW_BOX: Rect = Rect::new(0.0, 0.0, 800.0, 1120.0);

/// Fixed rosette center.
pub const ANCHOR: (f32, f32) = (400.0, 560.0);

pub const STROKE_WIDTH: f32 = 0.4;

/// Ellipses per complexity step.
pub const ELLIPSES_PER_STEP: usize = 10;

/// Generate the rosette for a complexity in 0–10 (higher values are capped).
///
/// Returns exactly `complexity × 10` ellipses with strictly increasing radii.
pub fn ellipses(complexity: u8) -> Vec<Ellipse> {
    let count = complexity.min(10) as usize * ELLIPSES_PER_STEP;
    if count == 0 {
        return Vec::new();
    }
    let step = 360.0 / count as f32;
    (0..count)
        .map(|i| {
            let fi = i as f32;
            Ellipse {
                cx: ANCHOR.0,
                cy: ANCHOR.1,
                rx: 200.0 + 20.0 * fi,
                ry: 350.0 + 15.0 * fi,
                rotation: fi * step,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_per_complexity() {
        for c in 0..=10u8 {
            assert_eq!(ellipses(c).len(), c as usize * 10);
        }
        assert_eq!(ellipses(200).len(), 100);
    }

    #[test]
    fn test_radii_strictly_increase() {
        let e = ellipses(10);
        for pair in e.windows(2) {
            assert!(pair[1].rx > pair[0].rx);
            assert!(pair[1].ry > pair[0].ry);
        }
    }

    #[test]
    fn test_first_and_rotation_step() {
        let e = ellipses(3);
        assert_eq!(e[0].rx, 200.0);
        assert_eq!(e[0].ry, 350.0);
        assert_eq!(e[0].rotation, 0.0);
        assert!((e[1].rotation - 12.0).abs() < 1e-4);
        assert!(e.iter().all(|el| (el.cx, el.cy) == ANCHOR));
    }
}
