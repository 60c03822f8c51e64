//! Billboard sprites.
//!
//! A sprite is an ordinary edge that is re-oriented every frame so it stays
//! square-on to the viewer; the caster and compositor treat it like a wall.
use crate::core::geometry::{Coordinate, Edge, Object};
use crate::render::textures::TextureRef;

/// Edge of length `2 * half_size` through `center`, perpendicular to `look_angle`.
///
/// `point1` is on the side the first screen column sees (counter-clockwise
/// of the view direction), so texture column 0 is drawn leftmost.
pub fn billboard_edge(center: Coordinate, look_angle: f64, half_size: f64, texture: TextureRef) -> Edge {
    let (sin, cos) = look_angle.sin_cos();
    let dx = -sin * half_size;
    let dy = cos * half_size;
    Edge::new(
        [center.x + dx, center.y + dy],
        [center.x - dx, center.y - dy],
        texture,
    )
}

/// Single-edge object for a sprite, ready to append to a frame's geometry.
pub fn billboard_object(
    name: impl Into<String>,
    center: Coordinate,
    look_angle: f64,
    half_size: f64,
    texture: TextureRef,
    scale: i32,
) -> Object {
    Object::new(name, vec![billboard_edge(center, look_angle, half_size, texture)], scale)
}

/// Billboard texture that cycles through `frames`, advancing one frame every
/// `frame_time` seconds and wrapping after the last.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    frames: Vec<TextureRef>,
    frame_time: f64,
    elapsed: f64,
    current: usize,
}

impl SpriteAnimation {
    /// `None` without frames. A non-positive `frame_time` holds the first frame.
    pub fn new(frames: Vec<TextureRef>, frame_time: f64) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            frame_time,
            elapsed: 0.0,
            current: 0,
        })
    }

    /// Advance the clock by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if !(self.frame_time > 0.0) || self.frames.len() < 2 {
            return;
        }
        self.elapsed += dt.max(0.0);
        let steps = (self.elapsed / self.frame_time).floor();
        if steps >= 1.0 {
            self.elapsed -= steps * self.frame_time;
            self.current = (self.current + (steps as usize % self.frames.len())) % self.frames.len();
        }
    }

    pub fn frame(&self) -> TextureRef {
        self.frames[self.current]
    }

    pub fn frame_index(&self) -> usize {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::core::geometry::distance;
    use crate::render::casters::cast_ray;
    use crate::render::textures::TextureId;
    use approx::assert_relative_eq;

    fn tex() -> TextureRef {
        TextureRef {
            id: TextureId::from_raw(3),
            width: 10,
            height: 10,
            has_alpha_channel: true,
        }
    }

    #[test]
    fn edge_is_centred_and_perpendicular() {
        for look in [0.0, 0.7, 2.0, -1.3] {
            let c = Coordinate::new(40.0, -12.0);
            let e = billboard_edge(c, look, 25.0, tex());
            assert_relative_eq!(e.length(), 50.0, epsilon = 1e-9);
            assert_relative_eq!(distance(e.point1, c), 25.0, epsilon = 1e-9);
            let (dx, dy) = (e.point2.x - e.point1.x, e.point2.y - e.point1.y);
            let dot = dx * look.cos() + dy * look.sin();
            assert_relative_eq!(dot, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn left_ray_sees_first_column() {
        let obj = billboard_object("ghost", Coordinate::new(50.0, 0.0), 0.0, 10.0, tex(), 1);
        let objs = vec![obj];
        let cfg = RenderConfig::default();
        // counter-clockwise of the view is the left half of the screen
        let left = cast_ray(0.15, Coordinate::new(0.0, 0.0), &objs, &cfg);
        let right = cast_ray(-0.15, Coordinate::new(0.0, 0.0), &objs, &cfg);
        assert!(left[0].column < 5);
        assert!(right[0].column >= 5);
    }

    fn numbered(n: u32) -> TextureRef {
        TextureRef {
            id: TextureId::from_raw(n),
            ..tex()
        }
    }

    #[test]
    fn animation_cycles_and_wraps() {
        let mut anim = SpriteAnimation::new(vec![numbered(0), numbered(1), numbered(2)], 0.1).unwrap();
        assert_eq!(anim.frame().id, TextureId::from_raw(0));
        anim.tick(0.05);
        assert_eq!(anim.frame_index(), 0);
        anim.tick(0.06);
        assert_eq!(anim.frame_index(), 1);
        // a long stall skips frames rather than lagging behind
        anim.tick(0.25);
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.frame().id, TextureId::from_raw(0));
    }

    #[test]
    fn animation_edge_cases() {
        assert!(SpriteAnimation::new(Vec::new(), 0.1).is_none());
        let mut still = SpriteAnimation::new(vec![numbered(4), numbered(5)], 0.0).unwrap();
        still.tick(10.0);
        assert_eq!(still.frame().id, TextureId::from_raw(4));
        let mut single = SpriteAnimation::new(vec![numbered(6)], 0.1).unwrap();
        single.tick(1.0);
        assert_eq!(single.frame_index(), 0);
    }
}
