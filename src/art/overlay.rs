//! # Overlay Textures
//!
//! One fixed tiling formula per [`OverlayShape`]. Each tile has its own
//! size and is repeated across the document; the compositor multiplies it
//! over the background at the design's overlay opacity.

use std::f32::consts::PI;

use crate::design::OverlayShape;
use crate::render::layer::Shape;

/// How a tile's shapes are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileStyle {
    Fill,
    /// Stroke-only with the given width.
    Stroke(f32),
}

/// A repeating tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub width: f32,
    pub height: f32,
    pub style: TileStyle,
    pub shapes: Vec<Shape>,
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Shape {
    Shape::Line { x1, y1, x2, y2 }
}

fn circle(cx: f32, cy: f32, r: f32) -> Shape {
    Shape::Circle { cx, cy, r }
}

fn rect(x: f32, y: f32, width: f32, height: f32) -> Shape {
    Shape::Rect {
        x,
        y,
        width,
        height,
        rx: 0.0,
    }
}

fn polygon(points: &[(f32, f32)]) -> Shape {
    Shape::Polyline {
        points: points.to_vec(),
        closed: true,
    }
}

fn polyline(points: Vec<(f32, f32)>) -> Shape {
    Shape::Polyline {
        points,
        closed: false,
    }
}

/// Five-pointed star centered on (cx, cy).
fn star(cx: f32, cy: f32, outer: f32, inner: f32) -> Shape {
    let points = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = -PI / 2.0 + i as f32 * PI / 5.0;
            (cx + r * a.cos(), cy + r * a.sin())
        })
        .collect();
    Shape::Polyline {
        points,
        closed: true,
    }
}

/// One period of a sine wave across the tile width.
fn sine(width: f32, mid: f32, amplitude: f32, samples: usize) -> Shape {
    let points = (0..=samples)
        .map(|i| {
            let x = width * i as f32 / samples as f32;
            (x, mid + amplitude * (2.0 * PI * x / width).sin())
        })
        .collect();
    polyline(points)
}

fn tile(width: f32, height: f32, style: TileStyle, shapes: Vec<Shape>) -> Option<Tile> {
    Some(Tile {
        width,
        height,
        style,
        shapes,
    })
}

/// Tile formula for an overlay shape. `None` for [`OverlayShape::None`].
pub fn tile_for(shape: OverlayShape) -> Option<Tile> {
    use TileStyle::{Fill, Stroke};

    match shape {
        OverlayShape::None => None,
        OverlayShape::Dots => tile(20.0, 20.0, Fill, vec![circle(10.0, 10.0, 2.0)]),
        OverlayShape::Grid => tile(
            24.0,
            24.0,
            Stroke(1.0),
            vec![line(0.0, 0.0, 24.0, 0.0), line(0.0, 0.0, 0.0, 24.0)],
        ),
        OverlayShape::Lines => tile(16.0, 16.0, Stroke(1.0), vec![line(0.0, 8.0, 16.0, 8.0)]),
        OverlayShape::Diagonal => tile(
            16.0,
            16.0,
            Stroke(1.0),
            vec![
                line(0.0, 16.0, 16.0, 0.0),
                line(-4.0, 4.0, 4.0, -4.0),
                line(12.0, 20.0, 20.0, 12.0),
            ],
        ),
        OverlayShape::CrossHatch => tile(
            16.0,
            16.0,
            Stroke(0.8),
            vec![line(0.0, 0.0, 16.0, 16.0), line(0.0, 16.0, 16.0, 0.0)],
        ),
        OverlayShape::Waves => tile(40.0, 20.0, Stroke(1.2), vec![sine(40.0, 10.0, 5.0, 20)]),
        OverlayShape::Hexagons => tile(
            28.0,
            49.0,
            Stroke(1.0),
            vec![
                polygon(&[
                    (14.0, 9.25),
                    (27.0, 16.75),
                    (27.0, 31.75),
                    (14.0, 39.25),
                    (1.0, 31.75),
                    (1.0, 16.75),
                ]),
                line(14.0, 0.0, 14.0, 9.25),
                line(14.0, 39.25, 14.0, 49.0),
            ],
        ),
        OverlayShape::Triangles => tile(
            24.0,
            21.0,
            Fill,
            vec![polygon(&[(0.0, 21.0), (12.0, 0.0), (24.0, 21.0)])],
        ),
        OverlayShape::Diamonds => tile(
            24.0,
            24.0,
            Stroke(1.0),
            vec![polygon(&[(12.0, 0.0), (24.0, 12.0), (12.0, 24.0), (0.0, 12.0)])],
        ),
        OverlayShape::Circles => tile(30.0, 30.0, Stroke(1.0), vec![circle(15.0, 15.0, 10.0)]),
        OverlayShape::Stars => tile(40.0, 40.0, Fill, vec![star(20.0, 20.0, 8.0, 3.2)]),
        OverlayShape::Chevron => tile(
            24.0,
            12.0,
            Stroke(1.5),
            vec![polyline(vec![(0.0, 12.0), (12.0, 0.0), (24.0, 12.0)])],
        ),
        OverlayShape::Zigzag => tile(
            20.0,
            10.0,
            Stroke(1.0),
            vec![polyline(vec![
                (0.0, 10.0),
                (5.0, 0.0),
                (10.0, 10.0),
                (15.0, 0.0),
                (20.0, 10.0),
            ])],
        ),
        OverlayShape::Checkerboard => tile(
            20.0,
            20.0,
            Fill,
            vec![rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 10.0, 10.0, 10.0)],
        ),
        OverlayShape::Stripes => tile(20.0, 20.0, Fill, vec![rect(0.0, 0.0, 10.0, 20.0)]),
        OverlayShape::Scales => tile(
            20.0,
            20.0,
            Stroke(1.0),
            vec![
                circle(10.0, 10.0, 10.0),
                circle(0.0, 20.0, 10.0),
                circle(20.0, 20.0, 10.0),
            ],
        ),
        OverlayShape::Plaid => tile(
            40.0,
            40.0,
            Fill,
            vec![
                rect(0.0, 8.0, 40.0, 6.0),
                rect(8.0, 0.0, 6.0, 40.0),
                rect(0.0, 26.0, 40.0, 2.0),
                rect(26.0, 0.0, 2.0, 40.0),
            ],
        ),
        OverlayShape::Bricks => tile(
            40.0,
            20.0,
            Stroke(1.0),
            vec![
                line(0.0, 0.0, 40.0, 0.0),
                line(0.0, 10.0, 40.0, 10.0),
                line(0.0, 0.0, 0.0, 10.0),
                line(20.0, 10.0, 20.0, 20.0),
            ],
        ),
        OverlayShape::Crosses => tile(
            24.0,
            24.0,
            Stroke(1.5),
            vec![line(12.0, 8.0, 12.0, 16.0), line(8.0, 12.0, 16.0, 12.0)],
        ),
        OverlayShape::Rings => tile(
            32.0,
            32.0,
            Stroke(1.0),
            vec![circle(16.0, 16.0, 12.0), circle(16.0, 16.0, 6.0)],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_tile() {
        assert!(tile_for(OverlayShape::None).is_none());
    }

    #[test]
    fn test_every_other_shape_has_a_tile() {
        for shape in OverlayShape::ALL.iter().skip(1) {
            let t = tile_for(*shape).unwrap_or_else(|| panic!("{shape:?} has no tile"));
            assert!(t.width > 0.0 && t.height > 0.0);
            assert!(!t.shapes.is_empty());
        }
    }

    #[test]
    fn test_star_has_ten_points() {
        match star(0.0, 0.0, 8.0, 3.0) {
            Shape::Polyline { points, closed } => {
                assert_eq!(points.len(), 10);
                assert!(closed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
