//! Texture storage and the handles edges use to refer to it.
//!
//! Edges never hold pixels. They carry a [`TextureRef`] (id plus the metadata
//! the caster needs) and the compositor resolves the id through a
//! [`TextureLookup`] at draw time.
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{RenderError, Result};
use crate::render::framebuffer::Color;

/// Opaque handle to a texture owned by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What an edge knows about its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
    /// See-through surfaces don't stop the ray.
    pub has_alpha_channel: bool,
}

/// Immutable RGBA pixmap.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    w: u32,
    h: u32,
    px: Vec<Color>,
}

impl Texture {
    /// Build from `width * height * 4` bytes of row-major RGBA8.
    pub fn from_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Self> {
        let count = Self::pixel_count(width, height)?;
        if pixels.len() != count * 4 {
            return Err(RenderError::PixelDataLength {
                expected: count * 4,
                actual: pixels.len(),
            });
        }
        let px = pixels
            .chunks_exact(4)
            .map(|p| Color::new(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self { w: width, h: height, px })
    }

    pub fn from_colors(width: u32, height: u32, px: Vec<Color>) -> Result<Self> {
        let count = Self::pixel_count(width, height)?;
        if px.len() != count {
            return Err(RenderError::PixelDataLength {
                expected: count * 4,
                actual: px.len() * 4,
            });
        }
        Ok(Self { w: width, h: height, px })
    }

    fn pixel_count(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyTexture { width, height });
        }
        Ok(width as usize * height as usize)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Wrapping sample.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[yi * self.w as usize + xi]
    }

    /// True if any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.px.iter().any(|c| c.a < 255)
    }

    /// Checkerboard: `base` with lighter 8px cells.
    pub fn checker(w: u32, h: u32, base: Color) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        let cell = 8u32;
        let mut px = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                let c = if ((x / cell) + (y / cell)) % 2 == 0 { mix(base, Color::WHITE, 24) } else { base };
                px.push(c);
            }
        }
        Self { w, h, px }
    }

    /// Brick courses with per-pixel noise, deterministic for a given seed.
    pub fn bricks(w: u32, h: u32, base: Color, seed: u64) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        let mut rng = StdRng::seed_from_u64(seed);
        let mortar = mix(base, Color::BLACK, 160);
        let course = (h / 6).max(2);
        let brick = (w / 2).max(2);
        let mut px = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            let row = y / course;
            let shift = if row % 2 == 0 { 0 } else { brick / 2 };
            for x in 0..w {
                let on_mortar = y % course == 0 || (x + shift) % brick == 0;
                let c = if on_mortar { mortar } else { mix(base, Color::BLACK, rng.gen_range(0..48)) };
                px.push(c);
            }
        }
        Self { w, h, px }
    }

    /// Filled ellipse on a fully transparent surround; the usual billboard body.
    pub fn disc(w: u32, h: u32, body: Color) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        let cx = w as f32 * 0.5;
        let cy = h as f32 * 0.5;
        let rx = w as f32 * 0.5;
        let ry = h as f32 * 0.5;
        let mut px = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                let nx = (x as f32 + 0.5 - cx) / rx;
                let ny = (y as f32 + 0.5 - cy) / ry;
                px.push(if nx * nx + ny * ny <= 1.0 { body } else { Color::TRANSPARENT });
            }
        }
        Self { w, h, px }
    }
}

#[inline]
fn mix(a: Color, b: Color, t: u8) -> Color {
    let ta = t as u16;
    let na = 255u16 - ta;
    let mixc = |x: u8, y: u8| -> u8 { (((x as u16) * na + (y as u16) * ta) / 255) as u8 };
    Color::new(mixc(a.r, b.r), mixc(a.g, b.g), mixc(a.b, b.b), mixc(a.a, b.a))
}

/// Resolves texture handles to pixels.
pub trait TextureLookup {
    fn get(&self, id: TextureId) -> Option<&Texture>;
}

/// Owns textures and hands out [`TextureId`]s for them.
#[derive(Debug, Default)]
pub struct TextureManager {
    maps: HashMap<TextureId, Texture>,
    next_id: u32,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy caller-owned RGBA8 pixels into a new texture.
    pub fn create_from_memory(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<TextureId> {
        let texture = Texture::from_rgba(pixels, width, height)?;
        Ok(self.insert(texture))
    }

    pub fn insert(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        log::debug!("texture {:?} created ({}x{})", id, texture.w, texture.h);
        self.maps.insert(id, texture);
        id
    }

    /// Release a texture. Edges still naming it will simply not draw.
    pub fn destroy(&mut self, id: TextureId) -> Option<Texture> {
        let removed = self.maps.remove(&id);
        if removed.is_some() {
            log::debug!("texture {:?} destroyed", id);
        }
        removed
    }

    /// Metadata for binding `id` to edges.
    pub fn texture_ref(&self, id: TextureId, has_alpha_channel: bool) -> Result<TextureRef> {
        let tex = self.maps.get(&id).ok_or(RenderError::UnknownTexture(id))?;
        Ok(TextureRef {
            id,
            width: tex.w,
            height: tex.h,
            has_alpha_channel,
        })
    }

    pub fn image_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.maps.get(&id).map(|t| (t.w, t.h))
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl TextureLookup for TextureManager {
    fn get(&self, id: TextureId) -> Option<&Texture> {
        self.maps.get(&id)
    }
}
