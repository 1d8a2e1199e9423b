use anyhow::Context;
use macroquad::prelude::*;
use tiled_level::render::cull;
use tiled_level::{Level, LoaderConfig, MacroquadRenderer, PositionKey};

fn window_conf() -> Conf {
    Conf {
        window_title: "Level Viewer".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

// usage: cargo run --example viewer -- [map.json] [config.json]
#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let map_path = args
        .next()
        .unwrap_or_else(|| "assets/maps/map1.json".to_owned());
    let config = match args.next() {
        Some(cfg) => LoaderConfig::from_file(cfg)?,
        None => LoaderConfig::default(),
    };

    let level = Level::load(&map_path, &config)
        .with_context(|| format!("Loading level {}", map_path))?;
    for skipped in &level.skipped {
        eprintln!(
            "skipped object {} ({}) in '{}': {}",
            skipped.object_id, skipped.name, skipped.layer, skipped.error
        );
    }

    println!(
        "{} entities, {} addressable by position",
        level.render.len(),
        level.spatial.len()
    );

    let mut renderer = MacroquadRenderer::new(&level.registry, config.render.clone());
    let mut camera = Vec2::ZERO;

    loop {
        let speed = 400.0 * get_frame_time();
        if is_key_down(KeyCode::Left) {
            camera.x -= speed;
        }
        if is_key_down(KeyCode::Right) {
            camera.x += speed;
        }
        if is_key_down(KeyCode::Up) {
            camera.y -= speed;
        }
        if is_key_down(KeyCode::Down) {
            camera.y += speed;
        }

        renderer.clear();
        let screen = vec2(screen_width(), screen_height());
        renderer.set_offset(camera);
        level.draw_visible(&mut renderer, camera, camera + screen);

        let (mx, my) = mouse_position();
        let world = camera + vec2(mx, my);
        let hovered = level
            .render
            .iter()
            .filter(|e| cull::draw_rect(e).contains(world))
            .last()
            .map(|e| (e.kind(), e.position()));
        let status = match hovered {
            Some((kind, at)) => format!("{:?} at {}", kind, PositionKey::from_world(at)),
            None => format!("({:.0}, {:.0})", world.x, world.y),
        };
        draw_text(&status, 20.0, 30.0, 28.0, WHITE);

        next_frame().await;
    }
}
