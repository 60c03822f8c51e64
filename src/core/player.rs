//! Viewer pose and walking with wall collision.
use std::f64::consts::FRAC_PI_2;

use crate::core::geometry::Coordinate;
use crate::render::render3d::View;

/// Viewer pose in y-up world space; `a` is counter-clockwise from +x.
pub struct Player {
    pub pos: Coordinate,
    pub a: f64,
    pub fov: f64,
    pub speed_walk: f64,
    pub speed_sprint: f64,
    pub mouse_sens: f64,
    pub sprinting: bool,
    pub radius: f64,
}

impl Player {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            pos: Coordinate::new(x, y),
            a: angle,
            fov: FRAC_PI_2,
            speed_walk: 70.0,
            speed_sprint: 140.0,
            mouse_sens: 0.0025,
            sprinting: false,
            radius: 15.0,
        }
    }

    #[inline]
    pub fn forward(&self) -> (f64, f64) {
        (self.a.cos(), self.a.sin())
    }

    /// Turn by `turn` radians (positive is left), then walk `forward`/`strafe`
    /// (each in -1..=1, positive strafe is right) for `dt` seconds. Each axis
    /// moves only if `is_free` accepts the new spot, so the player slides
    /// along walls instead of sticking.
    pub fn advance(&mut self, forward: f64, strafe: f64, turn: f64, dt: f64, is_free: impl Fn(f64, f64) -> bool) {
        self.a += turn;
        let speed = if self.sprinting { self.speed_sprint } else { self.speed_walk };
        let (fx, fy) = self.forward();
        let (rx, ry) = (fy, -fx);
        let dx = (fx * forward + rx * strafe) * speed * dt;
        let dy = (fy * forward + ry * strafe) * speed * dt;

        if dx != 0.0 && is_free(self.pos.x + dx, self.pos.y) {
            self.pos.x += dx;
        }
        if dy != 0.0 && is_free(self.pos.x, self.pos.y + dy) {
            self.pos.y += dy;
        }
    }

    pub fn view(&self, rays_number: u32, screen_width: u32, screen_height: u32) -> View {
        View {
            origin: self.pos,
            look_angle: self.a,
            fov: self.fov,
            rays_number,
            screen_width,
            screen_height,
        }
    }
}
