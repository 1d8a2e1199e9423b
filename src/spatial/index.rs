use crate::entity::Entity;
use macroquad::math::Vec2;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Position rounded to whole pixels. Displays as `x,y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    pub x: i64,
    pub y: i64,
}

impl PositionKey {
    /// Rounds half away from zero.
    pub fn from_world(p: Vec2) -> Self {
        PositionKey {
            x: p.x.round() as i64,
            y: p.y.round() as i64,
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One entity per rounded position, per z-index.
///
/// Inserting at an occupied key replaces the previous entity (last write
/// wins) and hands the displaced one back to the caller.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    buckets: BTreeMap<u8, HashMap<PositionKey, Rc<Entity>>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `z_index` known even if nothing is ever inserted at it.
    pub fn register(&mut self, z_index: u8) {
        self.buckets.entry(z_index).or_default();
    }

    pub fn insert(&mut self, z_index: u8, entity: Rc<Entity>) -> Option<Rc<Entity>> {
        let key = PositionKey::from_world(entity.position());
        self.buckets.entry(z_index).or_default().insert(key, entity)
    }

    pub fn get(&self, z_index: u8, position: Vec2) -> Option<&Rc<Entity>> {
        self.get_key(z_index, PositionKey::from_world(position))
    }

    pub fn get_key(&self, z_index: u8, key: PositionKey) -> Option<&Rc<Entity>> {
        self.buckets.get(&z_index)?.get(&key)
    }

    pub fn layer(&self, z_index: u8) -> Option<&HashMap<PositionKey, Rc<Entity>>> {
        self.buckets.get(&z_index)
    }

    /// Ascending.
    pub fn z_indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.buckets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Placement, Tile};
    use crate::tileset::ImageRegion;
    use macroquad::math::{vec2, Rect};

    fn tile(x: f32, y: f32, image: usize) -> Rc<Entity> {
        let region = ImageRegion {
            tileset: 0,
            image,
            rect: Rect::new(0.0, 0.0, 64.0, 64.0),
        };
        Rc::new(Entity::Tile(Tile {
            placement: Placement::at_cell(vec2(x, y), region),
        }))
    }

    #[test]
    fn key_rounds_and_formats() {
        let key = PositionKey::from_world(vec2(63.6, 127.4));
        assert_eq!(key.to_string(), "64,127");
        assert_eq!(PositionKey::from_world(vec2(-0.5, 2.5)).to_string(), "-1,3");
    }

    #[test]
    fn lookup_is_segmented_by_z_index() {
        let mut index = SpatialIndex::new();
        index.insert(0, tile(64.0, 64.0, 0));
        index.insert(1, tile(64.0, 64.0, 1));

        assert_eq!(index.get(0, vec2(64.2, 63.8)).unwrap().image_region().image, 0);
        assert_eq!(index.get(1, vec2(64.0, 64.0)).unwrap().image_region().image, 1);
        assert!(index.get(2, vec2(64.0, 64.0)).is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn same_key_keeps_last_insert() {
        let mut index = SpatialIndex::new();
        assert!(index.insert(0, tile(10.0, 10.0, 0)).is_none());
        let displaced = index.insert(0, tile(10.4, 9.6, 1)).expect("displaced");
        assert_eq!(displaced.image_region().image, 0);
        assert_eq!(index.get(0, vec2(10.0, 10.0)).unwrap().image_region().image, 1);
        assert_eq!(index.len(), 1);
    }
}
