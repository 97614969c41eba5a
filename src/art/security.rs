//! # Decorative Security Motifs
//!
//! Fibers, microtext, and the card-front line patterns. None of these are
//! verifiable security features; they only imitate the look.
//!
//! Fibers need scattered positions, so they come from an integer hash of
//! the fiber index. The result is the same on every call and platform.

use std::f32::consts::PI;

use crate::render::layer::{Rect, Shape};

/// Default microtext line when the design has no watermark text.
pub const DEFAULT_MICROTEXT: &str = "ORIGINAL DOCUMENT";

/// Microtext glyph size in document units.
pub const MICROTEXT_SIZE: f32 = 4.0;

/// Number of fibers scattered over a document.
pub const FIBER_COUNT: u32 = 60;

/// 32-bit integer mix (lowbias32).
fn mix(i: u32, salt: u32) -> u32 {
    let mut x = i.wrapping_mul(0x9E37_79B9) ^ salt.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846C_A68B);
    x ^= x >> 16;
    x
}

/// Hash to [0, 1).
fn unit(i: u32, salt: u32) -> f32 {
    (mix(i, salt) >> 8) as f32 / (1u32 << 24) as f32
}

/// Short bent fibers scattered over `bounds`.
pub fn fibers(bounds: Rect, count: u32) -> Vec<Shape> {
    (0..count)
        .map(|i| {
            let x = bounds.x + unit(i, 1) * bounds.width;
            let y = bounds.y + unit(i, 2) * bounds.height;
            let angle = unit(i, 3) * 2.0 * PI;
            let length = 12.0 + unit(i, 4) * 18.0;
            let bend = (unit(i, 5) - 0.5) * 0.8;

            let half = length / 2.0;
            let (dx, dy) = (angle.cos() * half, angle.sin() * half);
            let (bx, by) = ((angle + bend).cos() * half, (angle + bend).sin() * half);
            Shape::Polyline {
                points: vec![(x, y), (x + dx, y + dy), (x + dx + bx, y + dy + by)],
                closed: false,
            }
        })
        .collect()
}

/// Repeat `text` (separated by a dot) until it spans roughly `length` units.
pub fn repeat_to_length(text: &str, length: f32, size: f32) -> String {
    let unit = if text.trim().is_empty() {
        DEFAULT_MICROTEXT
    } else {
        text.trim()
    };
    let glyph = size * 0.6;
    let target = (length / glyph).max(0.0) as usize;
    let mut out = String::new();
    while out.chars().count() < target {
        if !out.is_empty() {
            out.push_str(" · ");
        }
        out.push_str(unit);
    }
    out
}

/// Microtext running around the inside of `frame`.
pub fn microtext_ring(frame: Rect, text: &str) -> Vec<Shape> {
    let size = MICROTEXT_SIZE;
    let horizontal = repeat_to_length(text, frame.width, size);
    let vertical = repeat_to_length(text, frame.height, size);
    vec![
        Shape::Text {
            x: frame.x,
            y: frame.y + size,
            content: horizontal.clone(),
            size,
            rotation: 0.0,
        },
        Shape::Text {
            x: frame.x,
            y: frame.bottom() - 1.0,
            content: horizontal,
            size,
            rotation: 0.0,
        },
        Shape::Text {
            x: frame.x + size,
            y: frame.y,
            content: vertical.clone(),
            size,
            rotation: 90.0,
        },
        Shape::Text {
            x: frame.right() - 1.0,
            y: frame.y,
            content: vertical,
            size,
            rotation: 90.0,
        },
    ]
}

/// Horizontal rows of microtext filling `bounds`.
pub fn microtext_rows(bounds: Rect, text: &str, spacing: f32) -> Vec<Shape> {
    let line = repeat_to_length(text, bounds.width, MICROTEXT_SIZE);
    let rows = (bounds.height / spacing).floor() as usize;
    (0..rows)
        .map(|r| Shape::Text {
            x: bounds.x,
            y: bounds.y + spacing * (r as f32 + 1.0),
            content: line.clone(),
            size: MICROTEXT_SIZE,
            rotation: 0.0,
        })
        .collect()
}

/// Parallel sine lines across `bounds`.
pub fn wave_lines(bounds: Rect, spacing: f32, amplitude: f32, period: f32) -> Vec<Shape> {
    let rows = (bounds.height / spacing).ceil() as usize;
    let samples = ((bounds.width / 8.0).ceil() as usize).max(2);
    (0..=rows)
        .map(|r| {
            let base = bounds.y + r as f32 * spacing;
            let phase = r as f32 * 0.35;
            let points = (0..=samples)
                .map(|s| {
                    let x = bounds.x + bounds.width * s as f32 / samples as f32;
                    (x, base + amplitude * (2.0 * PI * x / period + phase).sin())
                })
                .collect();
            Shape::Polyline {
                points,
                closed: false,
            }
        })
        .collect()
}

/// Diagonal lattice in both directions across `bounds`.
pub fn mesh_lines(bounds: Rect, spacing: f32) -> Vec<Shape> {
    let span = bounds.width + bounds.height;
    let steps = (span / spacing).ceil() as usize;
    let mut shapes = Vec::with_capacity(steps * 2);
    for s in 0..=steps {
        let d = s as f32 * spacing;
        // "/" direction
        shapes.push(Shape::Line {
            x1: bounds.x + d - bounds.height,
            y1: bounds.bottom(),
            x2: bounds.x + d,
            y2: bounds.y,
        });
        // "\" direction
        shapes.push(Shape::Line {
            x1: bounds.x + d - bounds.height,
            y1: bounds.y,
            x2: bounds.x + d,
            y2: bounds.bottom(),
        });
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibers_are_stable_and_inside_start_bounds() {
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        let a = fibers(bounds, FIBER_COUNT);
        let b = fibers(bounds, FIBER_COUNT);
        assert_eq!(a, b);
        assert_eq!(a.len(), FIBER_COUNT as usize);
        for f in &a {
            let Shape::Polyline { points, .. } = f else {
                panic!("fiber is not a polyline");
            };
            let (x, y) = points[0];
            assert!(x >= 0.0 && x < 800.0 && y >= 0.0 && y < 600.0);
        }
    }

    #[test]
    fn test_unit_range() {
        for i in 0..1000 {
            let u = unit(i, 7);
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_repeat_to_length() {
        let s = repeat_to_length("ABC", 60.0, 4.0);
        assert!(s.chars().count() >= 25);
        assert!(s.starts_with("ABC · ABC"));
        assert!(repeat_to_length("  ", 10.0, 4.0).starts_with(DEFAULT_MICROTEXT));
    }

    #[test]
    fn test_microtext_ring_has_four_edges() {
        assert_eq!(microtext_ring(Rect::new(10.0, 10.0, 200.0, 100.0), "X").len(), 4);
    }

    #[test]
    fn test_wave_and_mesh_nonempty() {
        let b = Rect::new(0.0, 0.0, 856.0, 540.0);
        assert!(!wave_lines(b, 14.0, 6.0, 120.0).is_empty());
        assert!(!mesh_lines(b, 18.0).is_empty());
        assert_eq!(microtext_rows(b, "ID", 9.0).len(), 60);
    }
}
