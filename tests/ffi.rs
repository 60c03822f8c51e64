use std::f64::consts::FRAC_PI_2;
use std::ptr;

use hollow_render::ffi::{RawEdge, RawObject, RawTexture, create_texture_from_memory, destroy_texture, update_image};

const BACKGROUND: [u8; 4] = [255, 120, 120, 255];

fn solid_rgba(w: usize, h: usize, px: [u8; 4]) -> Vec<u8> {
    px.iter().copied().cycle().take(w * h * 4).collect()
}

#[test]
fn renders_through_texture_handles() {
    let pixels = solid_rgba(4, 4, [10, 200, 30, 255]);
    let handle = unsafe { create_texture_from_memory(pixels.as_ptr(), 4, 4) };
    assert!(!handle.is_null());

    let raw_texture = RawTexture {
        width: 4,
        height: 4,
        texture_pointer: handle,
        has_alpha_channel: false,
    };
    let p1 = [100.0f64, 50.0];
    let p2 = [100.0f64, -50.0];
    let edges = [RawEdge {
        point1: p1.as_ptr(),
        point2: p2.as_ptr(),
        texture: &raw_texture,
    }];
    let objects = [RawObject {
        edges_number: 1,
        edges: edges.as_ptr(),
        scale: 50,
    }];
    let pos = [0.0f64, 0.0];
    let (w, h) = (32usize, 24usize);
    let mut out = vec![0u8; w * h * 4];

    unsafe {
        update_image(
            out.as_mut_ptr(),
            0.0,
            FRAC_PI_2,
            w as i32,
            w as i32,
            h as i32,
            pos.as_ptr(),
            1,
            objects.as_ptr(),
        );
        destroy_texture(handle);
    }

    let at = |x: usize, y: usize| -> [u8; 4] {
        let i = (y * w + x) * 4;
        [out[i], out[i + 1], out[i + 2], out[i + 3]]
    };
    assert_eq!(at(w / 2, h / 2), [10, 200, 30, 255]);
    assert_eq!(at(0, h / 2), BACKGROUND);
    assert_eq!(at(w / 2, 0), BACKGROUND);
}

#[test]
fn rejects_unusable_textures() {
    let pixels = solid_rgba(2, 2, [0, 0, 0, 255]);
    unsafe {
        assert!(create_texture_from_memory(ptr::null(), 2, 2).is_null());
        assert!(create_texture_from_memory(pixels.as_ptr(), -1, 2).is_null());
        assert!(create_texture_from_memory(pixels.as_ptr(), 0, 0).is_null());
        // null handles are ignored
        destroy_texture(ptr::null_mut());
    }
}

#[test]
fn bad_frames_leave_the_buffer_alone() {
    let pos = [0.0f64, 0.0];
    let mut out = vec![9u8; 8 * 8 * 4];
    unsafe {
        update_image(out.as_mut_ptr(), 0.0, FRAC_PI_2, 0, 8, 8, pos.as_ptr(), 0, ptr::null());
        update_image(out.as_mut_ptr(), 0.0, FRAC_PI_2, 8, 8, 8, ptr::null(), 0, ptr::null());
        update_image(out.as_mut_ptr(), 0.0, FRAC_PI_2, 8, -8, 8, pos.as_ptr(), 0, ptr::null());
    }
    assert!(out.iter().all(|&b| b == 9));
}

#[test]
fn empty_scene_is_all_background() {
    let pos = [3.0f64, -4.0];
    let mut out = vec![0u8; 8 * 6 * 4];
    unsafe {
        update_image(out.as_mut_ptr(), 1.0, FRAC_PI_2, 8, 8, 6, pos.as_ptr(), 0, ptr::null());
    }
    assert!(out.chunks_exact(4).all(|p| p == BACKGROUND));
}
