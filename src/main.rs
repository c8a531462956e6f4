//! softraster viewer: spins a textured mesh in front of a free-look camera,
//! rendered entirely by the software rasterizer and blitted to the window.

use macroquad::prelude::*;
use softraster::app::{AppState, CONTROLS};
use softraster::assets::{load_mesh_or_default, load_texture_or_default};
use softraster::config::{RenderConfig, CONFIG_PATH};
use softraster::{Frame, Renderer, SoftwareRenderer};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const MOVE_SPEED: f32 = 4.0;
const FAST_MOVE_SPEED: f32 = 40.0;
const MOUSE_SENSITIVITY: f32 = 0.005;

fn window_conf() -> Conf {
    let config = RenderConfig::load_or_default(CONFIG_PATH);
    Conf {
        window_title: format!("softraster v{}", VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn handle_toggles(app: &mut AppState) {
    if is_key_pressed(KeyCode::F2) {
        app.toggle_rotation();
    }
    if is_key_pressed(KeyCode::F7) {
        app.toggle_depth_buffer();
    }
    if is_key_pressed(KeyCode::F8) {
        app.toggle_bounding_boxes();
    }
    if is_key_pressed(KeyCode::F9) {
        app.cycle_cull_mode();
    }
    if is_key_pressed(KeyCode::F10) {
        app.toggle_uniform_clear_color();
    }
    if is_key_pressed(KeyCode::F11) {
        app.toggle_print_fps();
    }
}

fn handle_camera(app: &mut AppState, dt: f32, last_mouse: &mut (f32, f32)) {
    let speed = if is_key_down(KeyCode::LeftShift) { FAST_MOVE_SPEED } else { MOVE_SPEED };

    let mut forward = 0.0;
    let mut right = 0.0;
    if is_key_down(KeyCode::W) {
        forward += speed * dt;
    }
    if is_key_down(KeyCode::S) {
        forward -= speed * dt;
    }
    if is_key_down(KeyCode::D) {
        right += speed * dt;
    }
    if is_key_down(KeyCode::A) {
        right -= speed * dt;
    }
    app.camera.move_local(forward, right, 0.0);

    if is_key_pressed(KeyCode::Left) {
        app.camera.zoom(-1);
    }
    if is_key_pressed(KeyCode::Right) {
        app.camera.zoom(1);
    }

    let mouse = mouse_position();
    if is_mouse_button_down(MouseButton::Right) {
        let dx = mouse.0 - last_mouse.0;
        let dy = mouse.1 - last_mouse.1;
        app.camera.rotate(dy * MOUSE_SENSITIVITY, dx * MOUSE_SENSITIVITY);
    }
    *last_mouse = mouse;
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RenderConfig::load_or_default(CONFIG_PATH);
    let mesh = load_mesh_or_default(config.mesh.as_deref());
    let texture = load_texture_or_default(config.texture.as_deref());

    // Buffers are sized once here and never reallocated
    let mut renderer = match SoftwareRenderer::new(config.width, config.height, config.options) {
        Ok(renderer) => renderer,
        Err(e) => {
            log::error!("Failed to create frame buffers: {}", e);
            return;
        }
    };
    let mut app = AppState::new(&config);
    let aspect = config.aspect_ratio();

    log::info!("=== softraster v{} ({} renderer) ===", VERSION, renderer.name());
    for line in CONTROLS {
        log::info!("   {}", line);
    }

    let mut last_mouse = mouse_position();

    loop {
        let dt = get_frame_time();

        handle_toggles(&mut app);
        handle_camera(&mut app, dt, &mut last_mouse);
        if app.update(dt) {
            log::info!("FPS: {}", get_fps());
        }
        renderer.options = app.options;

        let frame = Frame {
            mesh: &mesh,
            texture: &texture,
            world: app.world_matrix(),
            view: app.camera.view_matrix(),
            projection: app.camera.projection_matrix(aspect),
            clear_color: app.current_clear_color(),
        };

        if let Err(e) = renderer.render(&frame) {
            log::error!("Frame failed: {}", e);
            break;
        }

        // Convert framebuffer to texture and draw it over the whole window
        let fb = renderer.frame_buffer();
        let fb_texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.to_rgba8());
        fb_texture.set_filter(FilterMode::Nearest);

        clear_background(BLACK);
        draw_texture_ex(
            &fb_texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
