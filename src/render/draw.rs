use crate::config::RenderConfig;
use crate::entity::{Building, Faction};
use crate::registry::TilesetRegistry;
use crate::render::Renderer;
use crate::tileset::ImageRegion;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Draws with Macroquad. Needs a live Macroquad context.
pub struct MacroquadRenderer {
    textures: HashMap<(usize, usize), Texture2D>,
    config: RenderConfig,
    offset: Vec2,
}

impl MacroquadRenderer {
    /// Uploads every tileset image once.
    pub fn new(registry: &TilesetRegistry, config: RenderConfig) -> Self {
        let mut textures = HashMap::new();
        for (ti, ts) in registry.tilesets().iter().enumerate() {
            for ii in 0..ts.image_count() {
                if let Some(img) = ts.image(ii) {
                    let tex = Texture2D::from_image(img);
                    tex.set_filter(FilterMode::Nearest);
                    textures.insert((ti, ii), tex);
                }
            }
        }
        MacroquadRenderer {
            textures,
            config,
            offset: Vec2::ZERO,
        }
    }

    /// World position drawn at the screen's top-left corner.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn clear(&self) {
        let [r, g, b, a] = self.config.clear_color;
        clear_background(Color::from_rgba(r, g, b, a));
    }
}

fn faction_color(faction: Faction) -> Color {
    match faction {
        Faction::Blue => BLUE,
        Faction::Green => GREEN,
        Faction::Red => RED,
        Faction::Yellow => YELLOW,
        Faction::None => GRAY,
    }
}

impl Renderer for MacroquadRenderer {
    fn draw(&mut self, region: &ImageRegion, at: Vec2) {
        let Some(tex) = self.textures.get(&(region.tileset, region.image)) else {
            return;
        };
        let at = at - self.offset;
        draw_texture_ex(
            tex,
            at.x,
            at.y,
            WHITE,
            DrawTextureParams {
                source: Some(region.rect),
                ..Default::default()
            },
        );
    }

    fn draw_banner(&mut self, building: &Building) {
        let Some(label) = building.banner_label() else {
            return;
        };
        let scale = self.config.banner_scale;
        let font_size = self.config.banner_font_size;
        let dims = measure_text(&label, None, font_size, 1.0);

        let pad = 8.0 * scale;
        let w = dims.width + pad * 2.0;
        let h = dims.height + pad * 2.0;
        let at = building.placement.draw_position - self.offset;
        let x = at.x + building.placement.region.width() / 2.0 - w / 2.0;

        draw_rectangle(x, at.y, w, h, faction_color(building.captured_by));
        draw_text(&label, x + pad, at.y + pad + dims.offset_y, font_size as f32, BLACK);
    }
}
