//! Tiled JSON level loader for Macroquad.
//!
//! Loads a level and its tilesets, resolves every tile and object GID to an
//! image region, builds typed entities from authored object properties and
//! indexes them by depth (for drawing) and by position (for lookups).

mod config;
mod entity;
mod error;
mod factory;
mod image;
mod indexer;
mod loader {
    pub mod json_loader;
}
mod map;
mod properties;
mod registry;
pub mod render;
mod spatial;
mod tilemap;
mod tileset;

pub use config::{LoaderConfig, RenderConfig};
pub use entity::{
    Building, Cliff, Direction, Entity, EntityKind, Faction, ObjectInfo, ObjectKind, Placement,
    Stairs, Tile,
};
pub use error::{MapError, ObjectError};
pub use factory::ObjectFactory;
pub use image::{normalize_asset_path, FileImageLoader, ImageLoader};
pub use indexer::{Indices, LayerIndexer, SkippedObject, SpatialCollision};
pub use loader::json_loader::{decode_map_file, decode_map_str};
pub use map::{Level, TileMapLoader};
pub use properties::{coerce_bool, coerce_string, coerce_u8, Properties, Property, PropertyValue};
pub use registry::{LayerCache, OwnedTileset, TilesetRegistry};
pub use render::{MacroquadRenderer, RenderIndex, Renderer};
pub use spatial::{PositionKey, SpatialIndex};
pub use tilemap::{Layer, MapObject, TileMap, TilesetRef};
pub use tileset::{
    clean_gid, ImageRegion, Tileset, TilesetKind, TilesetLoader, FLIP_D, FLIP_H, FLIP_V, GID_MASK,
};
