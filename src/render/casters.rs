//! Ray casting against wall segments.
//!
//! A ray is the half-line from the viewer along `(cos a, sin a)`. Every edge
//! of every object is intersected in slope-intercept form; hits that fall on
//! the segment, lie ahead of the viewer and beyond the near clip are kept,
//! sorted nearest first, and cut off after the first opaque surface.
use crate::config::RenderConfig;
use crate::core::geometry::{Coordinate, Edge, Object, distance};

/// One ray/edge hit. Lives only as long as the geometry it borrows.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    pub distance: f64,
    pub point: Coordinate,
    pub edge: &'a Edge,
    /// Texture column in `0..edge.texture.width`.
    pub column: u32,
    pub object: &'a Object,
}

impl Intersection<'_> {
    #[inline]
    pub fn scale(&self) -> i32 {
        self.object.scale
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        !self.edge.texture.has_alpha_channel
    }
}

/// Where the ray's line crosses the edge's line, if the lines aren't parallel.
fn line_intersection(edge: &Edge, origin: Coordinate, view_sin: f64, view_cos: f64) -> Option<Coordinate> {
    let points_y_diff = edge.point1.y - edge.point2.y;
    let points_x_diff = edge.point1.x - edge.point2.x;

    if points_x_diff == 0.0 {
        if view_cos == 0.0 {
            // both vertical
            return None;
        }
        let k = view_sin / view_cos;
        let b = origin.y - k * origin.x;
        let x = edge.point1.x;
        return Some(Coordinate::new(x, k * x + b));
    }

    let k1 = points_y_diff / points_x_diff;
    let b1 = edge.point1.y - k1 * edge.point1.x;
    if view_cos == 0.0 {
        let x = origin.x;
        return Some(Coordinate::new(x, k1 * x + b1));
    }

    let k2 = view_sin / view_cos;
    if k1 == k2 {
        return None;
    }
    let b2 = origin.y - k2 * origin.x;
    let x = (b2 - b1) / (k1 - k2);
    Some(Coordinate::new(x, k1 * x + b1))
}

/// Texture column for a hit `along` world units from `point1`.
#[inline]
fn texture_column(edge: &Edge, along: f64) -> u32 {
    let width = edge.texture.width.max(1);
    let units_per_pixel = edge.length() / width as f64;
    // float -> int casts saturate, NaN from a zero-length edge lands on 0
    let column = (along / units_per_pixel).floor() as u32;
    column.min(width - 1)
}

/// Cast one ray and return the hits that can contribute to its column:
/// transparent hits nearest first, ending with the first opaque one.
pub fn cast_ray<'a>(
    ray_angle: f64,
    origin: Coordinate,
    objects: &'a [Object],
    config: &RenderConfig,
) -> Vec<Intersection<'a>> {
    let view_sin = ray_angle.sin();
    let view_cos = ray_angle.cos();

    let mut intersections = Vec::new();
    for object in objects {
        for edge in &object.edges {
            let Some(point) = line_intersection(edge, origin, view_sin, view_cos) else {
                continue;
            };
            if !edge.bounds_contain(point) {
                continue;
            }
            let dot = (point.x - origin.x) * view_cos + (point.y - origin.y) * view_sin;
            if dot <= 0.0 {
                continue;
            }
            let dist = distance(origin, point);
            if dist <= config.min_render_distance {
                continue;
            }
            intersections.push(Intersection {
                distance: dist,
                point,
                edge,
                column: texture_column(edge, distance(edge.point1, point)),
                object,
            });
        }
    }

    intersections.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    if let Some(first_opaque) = intersections.iter().position(Intersection::is_opaque) {
        intersections.truncate(first_opaque + 1);
    }
    log::trace!("ray {:.4}: {} visible hits", ray_angle, intersections.len());
    intersections
}
