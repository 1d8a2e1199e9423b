use crate::config::LoaderConfig;
use crate::error::MapError;
use crate::image::{FileImageLoader, ImageLoader};
use crate::indexer::{Indices, LayerIndexer, SkippedObject, SpatialCollision};
use crate::loader::json_loader::decode_map_file;
use crate::registry::TilesetRegistry;
use crate::render::{RenderIndex, Renderer};
use crate::spatial::SpatialIndex;
use crate::tilemap::TileMap;
use crate::tileset::TilesetLoader;
use macroquad::logging::info;
use macroquad::math::Vec2;
use std::path::Path;

/// Parses a level file and loads every tileset it references.
pub struct TileMapLoader<'a, L: ImageLoader> {
    config: &'a LoaderConfig,
    images: &'a L,
}

impl<'a, L: ImageLoader> TileMapLoader<'a, L> {
    pub fn new(config: &'a LoaderConfig, images: &'a L) -> Self {
        TileMapLoader { config, images }
    }

    pub fn load(&self, path: &Path) -> Result<(TileMap, TilesetRegistry), MapError> {
        let map = decode_map_file(path, self.config)?;
        let tilesets = TilesetLoader::new(self.config, self.images);
        let loaded = map
            .tilesets
            .iter()
            .map(|r| tilesets.load(&r.path, r.first_gid))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((map, TilesetRegistry::new(loaded)))
    }
}

/// A fully loaded level: parsed map, tilesets and both indices.
///
/// Everything is read-only once built.
#[derive(Debug)]
pub struct Level {
    pub map: TileMap,
    pub registry: TilesetRegistry,
    pub render: RenderIndex,
    pub spatial: SpatialIndex,
    /// Objects left out because their data could not be turned into entities.
    pub skipped: Vec<SkippedObject>,
    pub collisions: Vec<SpatialCollision>,
}

impl Level {
    /// Loads images from disk.
    pub fn load(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Self, MapError> {
        Self::load_with(path, config, &FileImageLoader)
    }

    pub fn load_with<L: ImageLoader>(
        path: impl AsRef<Path>,
        config: &LoaderConfig,
        images: &L,
    ) -> Result<Self, MapError> {
        let path = path.as_ref();
        let (map, registry) = TileMapLoader::new(config, images).load(path)?;
        let Indices {
            render,
            spatial,
            skipped,
            collisions,
        } = LayerIndexer::new(&registry, config.tile_size).index(&map.layers)?;

        info!(
            "Loaded level {}: {} layers, {} tilesets, {} entities, {} skipped objects",
            path.display(),
            map.layers.len(),
            registry.len(),
            render.len(),
            skipped.len()
        );

        Ok(Level {
            map,
            registry,
            render,
            spatial,
            skipped,
            collisions,
        })
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R) {
        self.render.draw(renderer);
    }

    pub fn draw_visible<R: Renderer>(&self, renderer: &mut R, view_min: Vec2, view_max: Vec2) {
        self.render.draw_visible(renderer, view_min, view_max);
    }
}
