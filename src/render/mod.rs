//! Depth-ordered draw list and the drawing seam it feeds.

pub mod cull;
mod draw;

pub use draw::MacroquadRenderer;

use crate::entity::{Building, Entity};
use crate::tileset::ImageRegion;
use macroquad::math::Vec2;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Something that can put a region of a tileset image on screen.
pub trait Renderer {
    /// `at` is the top-left corner of the drawn image.
    fn draw(&mut self, region: &ImageRegion, at: Vec2);

    /// Capture banner over a spawn building. Ignored by default.
    fn draw_banner(&mut self, _building: &Building) {}
}

/// Entities bucketed by z-index, each bucket in paint order.
#[derive(Debug, Default)]
pub struct RenderIndex {
    buckets: BTreeMap<u8, Vec<Rc<Entity>>>,
}

impl RenderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `z_index` part of the draw order even while its bucket is empty.
    pub fn register(&mut self, z_index: u8) {
        self.buckets.entry(z_index).or_default();
    }

    pub fn push(&mut self, z_index: u8, entity: Rc<Entity>) {
        self.buckets.entry(z_index).or_default().push(entity);
    }

    /// Ascending.
    pub fn z_indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.buckets.keys().copied()
    }

    pub fn bucket(&self, z_index: u8) -> &[Rc<Entity>] {
        self.buckets.get(&z_index).map_or(&[][..], Vec::as_slice)
    }

    /// Every entity in draw order: ascending z-index, then bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Entity>> + '_ {
        self.buckets.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R) {
        for entity in self.iter() {
            draw_entity(renderer, entity);
        }
    }

    /// Like [`RenderIndex::draw`] but skips entities entirely outside the view.
    pub fn draw_visible<R: Renderer>(&self, renderer: &mut R, view_min: Vec2, view_max: Vec2) {
        for entity in cull::visible(self, view_min, view_max) {
            draw_entity(renderer, entity);
        }
    }
}

fn draw_entity<R: Renderer>(renderer: &mut R, entity: &Entity) {
    renderer.draw(&entity.image_region(), entity.transformed_position());
    if let Some(building) = entity.as_building() {
        renderer.draw_banner(building);
    }
}
