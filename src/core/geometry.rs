//! World geometry: points, textured wall segments and the objects grouping them.
use serde::{Deserialize, Serialize};

use crate::render::textures::TextureRef;

/// A point in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(p1: Coordinate, p2: Coordinate) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// A directed wall segment bound to a texture.
///
/// The texture column runs from `point1` (column 0) to `point2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub point1: Coordinate,
    pub point2: Coordinate,
    pub texture: TextureRef,
}

impl Edge {
    pub fn new(point1: impl Into<Coordinate>, point2: impl Into<Coordinate>, texture: TextureRef) -> Self {
        Self {
            point1: point1.into(),
            point2: point2.into(),
            texture,
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        distance(self.point1, self.point2)
    }

    /// Inclusive axis-aligned bounds test. For a point already known to lie
    /// on the edge's line this is equivalent to lying on the segment.
    #[inline]
    pub fn bounds_contain(&self, p: Coordinate) -> bool {
        let (min_x, max_x) = min_max(self.point1.x, self.point2.x);
        let (min_y, max_y) = min_max(self.point1.y, self.point2.y);
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }
}

#[inline]
fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A named group of edges sharing one height scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub edges: Vec<Edge>,
    /// Multiplier on the apparent height of every edge in the object.
    pub scale: i32,
}

impl Object {
    pub fn new(name: impl Into<String>, edges: Vec<Edge>, scale: i32) -> Self {
        Self {
            name: name.into(),
            edges,
            scale,
        }
    }
}
