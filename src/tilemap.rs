use crate::properties::{Properties, Property};
use std::path::PathBuf;

/// Parsed level description. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    /// File order.
    pub layers: Vec<Layer>,
    /// File order; the registry sorts them.
    pub tilesets: Vec<TilesetRef>,
}

/// A tileset reference from the level file.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesetRef {
    /// Resolved against the level file's directory.
    pub path: PathBuf,
    pub first_gid: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Row-major GIDs, 0 = empty. `None` for layers without tile data.
    pub tile_data: Option<Vec<u32>>,
    /// Authoring order.
    pub objects: Vec<MapObject>,
    pub z_index: u8,
    pub properties: Properties,
}

/// Object record as authored, before any resolution.
#[derive(Debug, Clone, Default)]
pub struct MapObject {
    pub gid: u32,
    pub object_id: u32,
    pub name: String,
    /// Free-text discriminator (`Building`, `Stairs`, ...).
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub properties: Vec<Property>,
}
