use raylib::prelude::*;

use hollow_render::core::maze::Maze;
use hollow_render::core::player::Player;

/// Radians per second for the arrow keys.
const KEY_TURN_SPEED: f64 = 2.0;

fn axis(window: &RaylibHandle, positive: KeyboardKey, negative: KeyboardKey) -> f64 {
    let mut v = 0.0;
    if window.is_key_down(positive) {
        v += 1.0;
    }
    if window.is_key_down(negative) {
        v -= 1.0;
    }
    v
}

/// WASD to walk, Shift to sprint, mouse or arrow keys to turn.
pub fn process_events(window: &RaylibHandle, player: &mut Player, maze: &Maze) {
    let dt = window.get_frame_time() as f64;
    let forward = axis(window, KeyboardKey::KEY_W, KeyboardKey::KEY_S);
    let strafe = axis(window, KeyboardKey::KEY_D, KeyboardKey::KEY_A);
    player.sprinting = window.is_key_down(KeyboardKey::KEY_LEFT_SHIFT);

    // mouse right turns clockwise
    let mouse_turn = -(window.get_mouse_delta().x as f64) * player.mouse_sens;
    let key_turn = axis(window, KeyboardKey::KEY_LEFT, KeyboardKey::KEY_RIGHT) * KEY_TURN_SPEED * dt;

    let r = player.radius;
    player.advance(forward, strafe, mouse_turn + key_turn, dt, |x, y| maze.is_free(x, y, r));
}
