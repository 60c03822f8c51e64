//! Column compositor: one ray per screen column, hits drawn back to front.
use std::ops::Range;

use crate::config::RenderConfig;
use crate::core::geometry::{Coordinate, Object};
use crate::error::{RenderError, Result};
use crate::render::casters::{Intersection, cast_ray};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::{Texture, TextureLookup};

/// Viewer pose and screen layout for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub origin: Coordinate,
    /// Radians. The centre ray points this way.
    pub look_angle: f64,
    /// Total angular width, split evenly across the rays.
    pub fov: f64,
    pub rays_number: u32,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl View {
    fn validate(&self) -> Result<()> {
        if self.rays_number == 0 {
            return Err(RenderError::InvalidView("rays_number must be at least 1".into()));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(RenderError::InvalidView(format!(
                "screen must be non-empty, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        Ok(())
    }

    /// Bytes in one RGBA frame.
    pub fn frame_len(&self) -> usize {
        self.screen_width as usize * self.screen_height as usize * 4
    }
}

/// Screen pixels whose centres fall inside `[start, end)`.
#[inline]
fn covered_span(start: f64, end: f64, limit: u32) -> Range<u32> {
    let first = (start - 0.5).ceil().max(0.0);
    let end = (end - 0.5).ceil().min(limit as f64);
    if end <= first { 0..0 } else { first as u32..end as u32 }
}

/// Stretch texture column `column` over screen columns `x0..x1`, starting at
/// row `y` and `h` rows tall, alpha-blending onto the canvas.
fn draw_slice(fb: &mut Framebuffer, texture: &Texture, column: u32, (x0, x1): (f64, f64), y: f64, h: f64) {
    let xs = covered_span(x0, x1, fb.width);
    let ys = covered_span(y, y + h, fb.height);
    if xs.is_empty() || ys.is_empty() {
        return;
    }
    let th = texture.height();
    for py in ys {
        let v = ((py as f64 + 0.5 - y) / h * th as f64).floor();
        let ty = (v.max(0.0) as u32).min(th - 1);
        let color = texture.sample(column, ty);
        if color.a == 0 {
            continue;
        }
        for px in xs.clone() {
            fb.blend_pixel(px, py, color);
        }
    }
}

/// Draw one ray's hits, farthest first so nearer see-through layers cover farther ones.
fn draw_column(
    fb: &mut Framebuffer,
    hits: &[Intersection<'_>],
    textures: &impl TextureLookup,
    xs: (f64, f64),
    config: &RenderConfig,
) -> usize {
    let screen_height = fb.height as f64;
    let mut drawn = 0;
    for hit in hits.iter().rev() {
        let scale_ratio_y = screen_height / hit.distance * config.distance_ratio * hit.scale() as f64;
        if !(scale_ratio_y > 0.0) {
            continue;
        }
        let Some(texture) = textures.get(hit.edge.texture.id) else {
            log::trace!("texture {:?} not resolvable, slice skipped", hit.edge.texture.id);
            continue;
        };
        let top_y = (screen_height - scale_ratio_y) / 2.0;
        draw_slice(fb, texture, hit.column, xs, top_y, scale_ratio_y);
        drawn += 1;
    }
    drawn
}

/// Render a full frame into `fb`, resizing it to the view's screen if needed.
pub fn render_frame(
    fb: &mut Framebuffer,
    view: &View,
    objects: &[Object],
    textures: &impl TextureLookup,
    config: &RenderConfig,
) -> Result<()> {
    view.validate()?;
    if fb.width != view.screen_width || fb.height != view.screen_height {
        *fb = Framebuffer::new(view.screen_width, view.screen_height);
    }
    fb.set_background_color(config.background);
    fb.clear();

    let ang_between_rays = view.fov / view.rays_number as f64;
    let start_angle = view.look_angle + view.fov / 2.0;
    let scale_ratio_x = view.screen_width as f64 / view.rays_number as f64;

    let mut slices = 0;
    for i in 0..view.rays_number {
        let ray_angle = start_angle - i as f64 * ang_between_rays;
        let hits = cast_ray(ray_angle, view.origin, objects, config);
        if hits.is_empty() {
            continue;
        }
        // neighbours derive shared boundaries from the same expression
        let xs = (i as f64 * scale_ratio_x, (i + 1) as f64 * scale_ratio_x);
        slices += draw_column(fb, &hits, textures, xs, config);
    }

    log::debug!(
        "frame {}x{}: {} rays, {} slices drawn",
        view.screen_width,
        view.screen_height,
        view.rays_number,
        slices
    );
    Ok(())
}

/// Render a frame and write it to `output_pixels` as row-major RGBA8.
///
/// `output_pixels` must be exactly `screen_width * screen_height * 4` bytes;
/// it is fully overwritten.
pub fn update_image(
    output_pixels: &mut [u8],
    view: &View,
    objects: &[Object],
    textures: &impl TextureLookup,
    config: &RenderConfig,
) -> Result<()> {
    view.validate()?;
    if output_pixels.len() != view.frame_len() {
        return Err(RenderError::OutputLength {
            expected: view.frame_len(),
            actual: output_pixels.len(),
        });
    }
    let mut fb = Framebuffer::new(view.screen_width, view.screen_height);
    render_frame(&mut fb, view, objects, textures, config)?;
    fb.copy_rgba_into(output_pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Edge;
    use crate::render::framebuffer::Color;
    use crate::render::textures::{TextureManager, TextureRef};

    const RED: Color = Color::new(200, 0, 0, 255);

    fn solid(tm: &mut TextureManager, color: Color, alpha: bool) -> TextureRef {
        let id = tm.insert(Texture::from_colors(4, 4, vec![color; 16]).unwrap());
        tm.texture_ref(id, alpha).unwrap()
    }

    fn view(rays: u32, w: u32, h: u32) -> View {
        View {
            origin: Coordinate::new(0.0, 0.0),
            look_angle: 0.0,
            fov: std::f64::consts::FRAC_PI_2,
            rays_number: rays,
            screen_width: w,
            screen_height: h,
        }
    }

    #[test]
    fn spans_partition_the_row() {
        let step = 640.0 / 200.0;
        let mut next = 0;
        for i in 0..200 {
            let r = covered_span(i as f64 * step, (i + 1) as f64 * step, 640);
            assert_eq!(r.start, next);
            next = r.end;
        }
        assert_eq!(next, 640);
    }

    #[test]
    fn span_clips_to_screen() {
        assert_eq!(covered_span(-50.0, 450.0, 100), 0..100);
        assert_eq!(covered_span(120.0, 125.0, 100), 0..0);
        assert_eq!(covered_span(3.0, 3.2, 100), 0..0);
    }

    #[test]
    fn empty_scene_is_all_background() {
        let tm = TextureManager::new();
        let cfg = RenderConfig::default();
        let mut fb = Framebuffer::new(1, 1);
        render_frame(&mut fb, &view(16, 16, 8), &[], &tm, &cfg).unwrap();
        assert_eq!((fb.width, fb.height), (16, 8));
        assert!(fb.color_buffer.iter().all(|&c| c == cfg.background));
    }

    #[test]
    fn wall_height_follows_distance_and_scale() {
        let mut tm = TextureManager::new();
        let t = solid(&mut tm, RED, false);
        // wide wall 20 units ahead; height = 100 / 20 * 2 = 10 rows
        let objs = vec![Object::new("w", vec![Edge::new([20.0, -100.0], [20.0, 100.0], t)], 2)];
        let cfg = RenderConfig::default();
        let mut fb = Framebuffer::new(8, 100);
        render_frame(&mut fb, &view(8, 8, 100), &objs, &tm, &cfg).unwrap();
        for x in 0..8 {
            let rows: Vec<u32> = (0..100).filter(|&y| fb.get_pixel(x, y) == RED).collect();
            // oblique rays travel farther, so no column beats the centre one
            assert!(!rows.is_empty() && rows.len() <= 10, "column {x}: {} rows", rows.len());
            assert!(rows.contains(&49) && rows.contains(&50));
        }
        // ray 4 looks straight down the x axis
        let centre: Vec<u32> = (0..100).filter(|&y| fb.get_pixel(4, y) == RED).collect();
        assert_eq!(centre, (45..55).collect::<Vec<u32>>());
        assert_eq!(fb.get_pixel(4, 0), cfg.background);
    }

    #[test]
    fn distance_ratio_scales_every_slice() {
        let mut tm = TextureManager::new();
        let t = solid(&mut tm, RED, false);
        let objs = vec![Object::new("w", vec![Edge::new([20.0, -100.0], [20.0, 100.0], t)], 1)];
        // 100 / 20 * ratio rows, centred on row 50
        for (ratio, rows) in [(1.0, 47..52), (2.0, 45..55), (0.5, 49..51)] {
            let cfg = RenderConfig {
                distance_ratio: ratio,
                ..RenderConfig::default()
            };
            let mut fb = Framebuffer::new(8, 100);
            render_frame(&mut fb, &view(8, 8, 100), &objs, &tm, &cfg).unwrap();
            let centre: Vec<u32> = (0..100).filter(|&y| fb.get_pixel(4, y) == RED).collect();
            assert_eq!(centre, rows.collect::<Vec<u32>>(), "ratio {ratio}");
        }
    }

    #[test]
    fn non_positive_scale_draws_nothing() {
        let mut tm = TextureManager::new();
        let t = solid(&mut tm, RED, false);
        let cfg = RenderConfig::default();
        for scale in [0, -3] {
            let objs = vec![Object::new("w", vec![Edge::new([20.0, -100.0], [20.0, 100.0], t)], scale)];
            let mut fb = Framebuffer::new(8, 50);
            render_frame(&mut fb, &view(8, 8, 50), &objs, &tm, &cfg).unwrap();
            assert!(fb.color_buffer.iter().all(|&c| c == cfg.background));
        }
    }

    #[test]
    fn nearer_transparent_layer_covers_farther_opaque() {
        let mut tm = TextureManager::new();
        let blue = Color::new(0, 0, 255, 255);
        let far = solid(&mut tm, RED, false);
        // see-through surface, but the texel itself is opaque blue
        let near = solid(&mut tm, blue, true);
        let objs = vec![
            Object::new("far", vec![Edge::new([40.0, -100.0], [40.0, 100.0], far)], 4),
            Object::new("near", vec![Edge::new([20.0, -100.0], [20.0, 100.0], near)], 1),
        ];
        let cfg = RenderConfig::default();
        let mut fb = Framebuffer::new(4, 100);
        render_frame(&mut fb, &view(4, 4, 100), &objs, &tm, &cfg).unwrap();
        // far wall: 100/40*4 = 10 rows; near wall: 100/20*1 = 5 rows, drawn on top
        assert_eq!(fb.get_pixel(2, 50), blue);
        assert_eq!(fb.get_pixel(2, 46), RED);
        assert_eq!(fb.get_pixel(2, 10), cfg.background);
    }

    #[test]
    fn transparent_texels_show_what_is_behind() {
        let mut tm = TextureManager::new();
        let far = solid(&mut tm, RED, false);
        let glass = solid(&mut tm, Color::new(0, 0, 0, 0), true);
        let objs = vec![
            Object::new("far", vec![Edge::new([40.0, -100.0], [40.0, 100.0], far)], 4),
            Object::new("glass", vec![Edge::new([20.0, -100.0], [20.0, 100.0], glass)], 4),
        ];
        let cfg = RenderConfig::default();
        let mut fb = Framebuffer::new(4, 100);
        render_frame(&mut fb, &view(4, 4, 100), &objs, &tm, &cfg).unwrap();
        assert_eq!(fb.get_pixel(2, 50), RED);
    }

    #[test]
    fn missing_texture_is_skipped() {
        let mut tm = TextureManager::new();
        let t = solid(&mut tm, RED, false);
        tm.destroy(t.id);
        let objs = vec![Object::new("w", vec![Edge::new([20.0, -100.0], [20.0, 100.0], t)], 1)];
        let cfg = RenderConfig::default();
        let mut fb = Framebuffer::new(4, 20);
        render_frame(&mut fb, &view(4, 4, 20), &objs, &tm, &cfg).unwrap();
        assert!(fb.color_buffer.iter().all(|&c| c == cfg.background));
    }

    #[test]
    fn update_image_validates_inputs() {
        let tm = TextureManager::new();
        let cfg = RenderConfig::default();
        let mut out = vec![0u8; 10];
        assert!(matches!(
            update_image(&mut out, &view(4, 4, 4), &[], &tm, &cfg),
            Err(RenderError::OutputLength { expected: 64, actual: 10 })
        ));
        assert!(matches!(
            update_image(&mut out, &view(0, 4, 4), &[], &tm, &cfg),
            Err(RenderError::InvalidView(_))
        ));
        let mut out = vec![0u8; 0];
        assert!(matches!(
            update_image(&mut out, &view(4, 0, 4), &[], &tm, &cfg),
            Err(RenderError::InvalidView(_))
        ));
    }
}
