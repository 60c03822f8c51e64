//! C ABI for hosts that own the map and call the renderer once per frame.
//!
//! Record layouts are fixed: points are two consecutive `f64`s, textures are
//! opaque handles returned by [`create_texture_from_memory`] and released
//! with [`destroy_texture`]. Nothing here unwinds into the caller: rejected
//! input is logged and the call does nothing.
use std::collections::HashMap;
use std::ffi::{c_int, c_void};
use std::{ptr, slice};

use crate::config::RenderConfig;
use crate::core::geometry::{Coordinate, Edge, Object};
use crate::render::render3d::{self, View};
use crate::render::textures::{Texture, TextureId, TextureLookup, TextureRef};

/// Per-surface metadata, shared by any number of edges.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawTexture {
    pub width: c_int,
    pub height: c_int,
    pub texture_pointer: *const c_void,
    pub has_alpha_channel: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawEdge {
    pub point1: *const f64,
    pub point2: *const f64,
    pub texture: *const RawTexture,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawObject {
    pub edges_number: c_int,
    pub edges: *const RawEdge,
    pub scale: c_int,
}

/// Textures borrowed from caller handles for the duration of one call.
struct BorrowedTextures<'a> {
    textures: Vec<&'a Texture>,
    ids: HashMap<*const c_void, TextureId>,
}

impl<'a> BorrowedTextures<'a> {
    fn new() -> Self {
        Self {
            textures: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// # Safety
    /// `handle` must come from [`create_texture_from_memory`] and outlive `'a`.
    unsafe fn intern(&mut self, handle: *const c_void) -> TextureId {
        if let Some(&id) = self.ids.get(&handle) {
            return id;
        }
        let id = TextureId::from_raw(self.textures.len() as u32);
        // SAFETY: guaranteed by the caller.
        self.textures.push(unsafe { &*(handle as *const Texture) });
        self.ids.insert(handle, id);
        id
    }
}

impl TextureLookup for BorrowedTextures<'_> {
    fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.raw() as usize).copied()
    }
}

/// View a C array as a slice, treating null or non-positive counts as empty.
///
/// # Safety
/// A non-null `data` must point to `len` initialised values.
unsafe fn raw_slice<'a, T>(data: *const T, len: c_int) -> &'a [T] {
    match usize::try_from(len) {
        Ok(n) if n > 0 && !data.is_null() => unsafe { slice::from_raw_parts(data, n) },
        _ => &[],
    }
}

/// # Safety
/// `p` must be null or point to two readable `f64`s.
unsafe fn read_point(p: *const f64) -> Option<Coordinate> {
    if p.is_null() {
        return None;
    }
    // SAFETY: guaranteed by the caller.
    let xy = unsafe { slice::from_raw_parts(p, 2) };
    Some(Coordinate::new(xy[0], xy[1]))
}

/// Copy caller records into owned geometry, interning texture handles.
/// Edges with missing points or an unusable texture are skipped.
///
/// # Safety
/// All pointers reachable from `objects` must be valid for the call.
unsafe fn import_objects<'a>(raw: &[RawObject], textures: &mut BorrowedTextures<'a>) -> Vec<Object> {
    let mut objects = Vec::with_capacity(raw.len());
    for (i, obj) in raw.iter().enumerate() {
        // SAFETY: edge arrays are valid per the function contract.
        let raw_edges = unsafe { raw_slice(obj.edges, obj.edges_number) };
        let mut edges = Vec::with_capacity(raw_edges.len());
        for e in raw_edges {
            // SAFETY: as above, for points and texture records.
            let (p1, p2) = unsafe { (read_point(e.point1), read_point(e.point2)) };
            let (Some(point1), Some(point2)) = (p1, p2) else {
                log::warn!("object {i}: edge without points skipped");
                continue;
            };
            let Some(tex) = (unsafe { e.texture.as_ref() }) else {
                log::warn!("object {i}: edge without texture skipped");
                continue;
            };
            let (Ok(width @ 1..), Ok(height @ 1..)) = (u32::try_from(tex.width), u32::try_from(tex.height)) else {
                log::warn!("object {i}: texture {}x{} skipped", tex.width, tex.height);
                continue;
            };
            if tex.texture_pointer.is_null() {
                log::warn!("object {i}: null texture handle skipped");
                continue;
            }
            // SAFETY: non-null handles come from create_texture_from_memory.
            let id = unsafe { textures.intern(tex.texture_pointer) };
            let texture = TextureRef {
                id,
                width,
                height,
                has_alpha_channel: tex.has_alpha_channel,
            };
            edges.push(Edge {
                point1,
                point2,
                texture,
            });
        }
        objects.push(Object::new(format!("object {i}"), edges, obj.scale));
    }
    objects
}

/// Render one frame into `output_pixels` (`screen_width * screen_height * 4`
/// bytes, RGBA8, row-major, top-left origin).
///
/// # Safety
/// `output_pixels` must be writable for the full frame, `pos` must point to
/// two `f64`s, `objects` to `objects_number` records, and every texture
/// handle reachable from them must be live.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn update_image(
    output_pixels: *mut u8,
    look_angle: f64,
    fov: f64,
    rays_number: c_int,
    screen_width: c_int,
    screen_height: c_int,
    pos: *const f64,
    objects_number: c_int,
    objects: *const RawObject,
) {
    if output_pixels.is_null() {
        log::error!("update_image: null output buffer");
        return;
    }
    // SAFETY: caller contract.
    let Some(origin) = (unsafe { read_point(pos) }) else {
        log::error!("update_image: null position");
        return;
    };
    let (Ok(rays_number), Ok(screen_width), Ok(screen_height)) = (
        u32::try_from(rays_number),
        u32::try_from(screen_width),
        u32::try_from(screen_height),
    ) else {
        log::error!("update_image: negative ray count or screen size");
        return;
    };
    let view = View {
        origin,
        look_angle,
        fov,
        rays_number,
        screen_width,
        screen_height,
    };

    let mut textures = BorrowedTextures::new();
    // SAFETY: caller contract.
    let objects = unsafe { import_objects(raw_slice(objects, objects_number), &mut textures) };
    // SAFETY: caller guarantees the buffer holds a full frame.
    let out = unsafe { slice::from_raw_parts_mut(output_pixels, view.frame_len()) };
    if let Err(e) = render3d::update_image(out, &view, &objects, &textures, &RenderConfig::default()) {
        log::error!("update_image: {e}");
    }
}

/// Copy `width * height * 4` bytes of RGBA8 into a new texture and return its
/// handle, or null if the input is unusable. Release with [`destroy_texture`].
///
/// # Safety
/// `pixels` must be readable for `width * height * 4` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn create_texture_from_memory(pixels: *const u8, width: c_int, height: c_int) -> *mut c_void {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        log::error!("create_texture_from_memory: negative size {width}x{height}");
        return ptr::null_mut();
    };
    if pixels.is_null() {
        log::error!("create_texture_from_memory: null pixels");
        return ptr::null_mut();
    }
    let len = w as usize * h as usize * 4;
    // SAFETY: caller contract.
    let data = unsafe { slice::from_raw_parts(pixels, len) };
    match Texture::from_rgba(data, w, h) {
        Ok(texture) => {
            log::debug!("texture handle created ({w}x{h})");
            Box::into_raw(Box::new(texture)) as *mut c_void
        }
        Err(e) => {
            log::error!("create_texture_from_memory: {e}");
            ptr::null_mut()
        }
    }
}

/// Release a texture handle. Null is ignored.
///
/// # Safety
/// `texture` must be null or a live handle from [`create_texture_from_memory`];
/// it must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn destroy_texture(texture: *mut c_void) {
    if texture.is_null() {
        return;
    }
    // SAFETY: caller contract; the handle was produced by Box::into_raw.
    drop(unsafe { Box::from_raw(texture as *mut Texture) });
    log::debug!("texture handle destroyed");
}
