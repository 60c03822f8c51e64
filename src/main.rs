mod process_events;

use std::path::Path;

use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;
use simplelog::{Config, LevelFilter, SimpleLogger};

use hollow_render::core::maze::{BLOCK_SIZE, Maze, load_maze, parse_maze};
use hollow_render::core::player::Player;
use hollow_render::render::framebuffer::Color as Rgba;
use hollow_render::render::sprites::{SpriteAnimation, billboard_object};
use hollow_render::{Framebuffer, Object, RenderConfig, Texture, TextureManager, render_frame};
use process_events::process_events;

const DISPLAY_WIDTH: i32 = 1280;
const DISPLAY_HEIGHT: i32 = 720;
const RAYS_AMOUNT: u32 = 320;
const WALL_SCALE: i32 = 40;
const SPRITE_HALF_SIZE: f64 = 12.0;
const SPRITE_FRAME_TIME: f64 = 0.15;
const MINIMAP_CELL: i32 = 8;

const FALLBACK_MAZE: &str = "\
##########
#@   #   #
# ## # # #
#  !   # #
#### ### #
#   !    #
# ###### #
#        #
##########
";

/// Decode an image through raylib, or build a procedural texture when the
/// file is missing or unusable.
fn load_or_generate(path: &str, fallback: impl FnOnce() -> Texture) -> Texture {
    let Ok(img) = Image::load_image(path) else {
        log::info!("{path} not found, using a generated texture");
        return fallback();
    };
    let w = img.width().max(1) as u32;
    let h = img.height().max(1) as u32;
    let px: Vec<Rgba> = img.get_image_data().iter().map(|&c| c.into()).collect();
    match Texture::from_colors(w, h, px) {
        Ok(t) => {
            log::info!("loaded {path} ({w}x{h})");
            t
        }
        Err(e) => {
            log::warn!("{path}: {e}");
            fallback()
        }
    }
}

fn load_level() -> hollow_render::Result<Maze> {
    load_maze("maze.txt", BLOCK_SIZE).or_else(|e| {
        log::warn!("maze.txt: {e}; using the built-in level");
        parse_maze(FALLBACK_MAZE, BLOCK_SIZE)
    })
}

fn load_config() -> RenderConfig {
    let path = Path::new("render.ron");
    if !path.exists() {
        return RenderConfig::default();
    }
    RenderConfig::load(path).unwrap_or_else(|e| {
        log::warn!("render.ron: {e}; using defaults");
        RenderConfig::default()
    })
}

fn main() {
    if let Err(e) = SimpleLogger::init(LevelFilter::Info, Config::default()) {
        eprintln!("logger: {e}");
    }

    let (mut window, raylib_thread) = raylib::init()
        .size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .title("hollow-render")
        .build();
    window.disable_cursor();
    window.set_target_fps(60);

    let config = load_config();
    let maze = match load_level() {
        Ok(m) => m,
        Err(e) => {
            log::error!("level: {e}");
            return;
        }
    };

    let mut texman = TextureManager::new();
    let wall = load_or_generate("assets/wall.png", || {
        Texture::bricks(64, 64, Rgba::new(150, 70, 50, 255), 7)
    });
    let wall_alpha = wall.has_transparency();
    let wall_id = texman.insert(wall);
    let Ok(wall_ref) = texman.texture_ref(wall_id, wall_alpha) else {
        log::error!("texture registry lost the wall texture");
        return;
    };

    // sprite_0.png, sprite_1.png, ... or a pulsing generated disc
    let mut ghost_frames = Vec::new();
    for (n, tint) in [(90u8, 200u8), (120, 220), (160, 240), (120, 220)].into_iter().enumerate() {
        let frame = load_or_generate(&format!("assets/sprite_{n}.png"), || {
            Texture::disc(32, 32, Rgba::new(tint.0, tint.1, 240, 255))
        });
        let alpha = frame.has_transparency();
        let id = texman.insert(frame);
        match texman.texture_ref(id, alpha) {
            Ok(r) => ghost_frames.push(r),
            Err(e) => log::warn!("sprite frame {n}: {e}"),
        }
    }
    let Some(mut ghost) = SpriteAnimation::new(ghost_frames, SPRITE_FRAME_TIME) else {
        log::error!("no sprite frames");
        return;
    };

    let mut objects: Vec<Object> = maze.wall_objects(wall_ref, WALL_SCALE);
    let wall_count = objects.len();
    let sprites = maze.entity_spawns();

    let spawn = maze.spawn().unwrap_or_else(|| {
        log::warn!("level has no '@' cell, starting in the first cell");
        hollow_render::Coordinate::new(BLOCK_SIZE * 1.5, -BLOCK_SIZE * 1.5)
    });
    let mut player = Player::new(spawn.x, spawn.y, 0.0);

    let mut framebuffer = Framebuffer::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32);
    let mut pixels = vec![0u8; framebuffer.byte_len()];
    let blank = Image::gen_image_color(DISPLAY_WIDTH, DISPLAY_HEIGHT, Color::BLACK);
    let mut screen = match window.load_texture_from_image(&raylib_thread, &blank) {
        Ok(t) => t,
        Err(e) => {
            log::error!("screen texture: {e}");
            return;
        }
    };

    let mut show_minimap = false;

    while !window.window_should_close() {
        if window.is_key_pressed(KeyboardKey::KEY_M) {
            show_minimap = !show_minimap;
        }
        process_events(&window, &mut player, &maze);
        ghost.tick(window.get_frame_time() as f64);

        // sprites turn to face the player every frame
        objects.truncate(wall_count);
        for (n, &c) in sprites.iter().enumerate() {
            objects.push(billboard_object(
                format!("sprite {n}"),
                c,
                player.a,
                SPRITE_HALF_SIZE,
                ghost.frame(),
                WALL_SCALE,
            ));
        }

        let view = player.view(RAYS_AMOUNT, DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32);
        if let Err(e) = render_frame(&mut framebuffer, &view, &objects, &texman, &config) {
            log::error!("render: {e}");
            break;
        }
        if let Err(e) = framebuffer.copy_rgba_into(&mut pixels) {
            log::error!("upload: {e}");
            break;
        }
        if let Err(e) = screen.update_texture(&pixels) {
            log::warn!("screen upload: {e}");
        }

        let fps_now = window.get_fps();
        let sprint_on = player.sprinting;
        let mut d = window.begin_drawing(&raylib_thread);
        d.clear_background(Color::BLACK);
        d.draw_texture(&screen, 0, 0, Color::WHITE);
        d.draw_text(&format!("FPS: {fps_now}"), 10, 10, 20, Color::WHITE);
        if sprint_on {
            d.draw_text("SPRINT", 10, 40, 20, Color::RED);
        }
        if show_minimap {
            draw_minimap(&mut d, &maze, &player, &sprites);
        }
    }
}

/// Top-down map in the top-right corner: walls, entities and the player.
fn draw_minimap(d: &mut impl RaylibDraw, maze: &Maze, player: &Player, entities: &[hollow_render::Coordinate]) {
    let cols = maze.cols() as i32;
    let rows = maze.rows() as i32;
    let x0 = DISPLAY_WIDTH - cols * MINIMAP_CELL - 10;
    let y0 = 10;
    d.draw_rectangle(x0, y0, cols * MINIMAP_CELL, rows * MINIMAP_CELL, Color::new(0, 0, 0, 160));
    for j in 0..rows {
        for i in 0..cols {
            if maze.is_wall(i as isize, j as isize) {
                d.draw_rectangle(x0 + i * MINIMAP_CELL, y0 + j * MINIMAP_CELL, MINIMAP_CELL, MINIMAP_CELL, Color::GRAY);
            }
        }
    }

    // world y is up, map rows grow downward
    let to_map = |x: f64, y: f64| -> (f32, f32) {
        let k = MINIMAP_CELL as f64 / maze.block_size;
        ((x0 as f64 + x * k) as f32, (y0 as f64 - y * k) as f32)
    };
    for e in entities {
        let (ex, ey) = to_map(e.x, e.y);
        d.draw_circle_v(Vector2::new(ex, ey), 2.0, Color::SKYBLUE);
    }
    let (px, py) = to_map(player.pos.x, player.pos.y);
    let (fx, fy) = player.forward();
    let tip = Vector2::new(px + fx as f32 * 8.0, py - fy as f32 * 8.0);
    d.draw_line_v(Vector2::new(px, py), tip, Color::YELLOW);
    d.draw_circle_v(Vector2::new(px, py), 3.0, Color::YELLOW);
}
