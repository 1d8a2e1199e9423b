use crate::entity::{Entity, ObjectKind, Placement, Tile};
use crate::error::{MapError, ObjectError};
use crate::factory::ObjectFactory;
use crate::registry::{LayerCache, TilesetRegistry};
use crate::render::RenderIndex;
use crate::spatial::{PositionKey, SpatialIndex};
use crate::tilemap::{Layer, MapObject};
use macroquad::logging::{debug, warn};
use macroquad::math::vec2;
use std::rc::Rc;

/// An object left out of the level, and why.
#[derive(Debug)]
pub struct SkippedObject {
    pub layer: String,
    pub object_id: u32,
    pub name: String,
    pub error: ObjectError,
}

/// Two objects landed on the same spatial key; the later one won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialCollision {
    pub z_index: u8,
    pub key: PositionKey,
    pub displaced_object_id: Option<u32>,
    pub winner_object_id: Option<u32>,
}

/// Output of indexing every layer of a map.
#[derive(Debug, Default)]
pub struct Indices {
    pub render: RenderIndex,
    pub spatial: SpatialIndex,
    pub skipped: Vec<SkippedObject>,
    pub collisions: Vec<SpatialCollision>,
}

/// Builds the render and spatial indices from map layers.
pub struct LayerIndexer<'r> {
    registry: &'r TilesetRegistry,
    factory: ObjectFactory,
    tile_size: f32,
}

impl<'r> LayerIndexer<'r> {
    pub fn new(registry: &'r TilesetRegistry, tile_size: u32) -> Self {
        LayerIndexer {
            registry,
            factory: ObjectFactory,
            tile_size: tile_size as f32,
        }
    }

    /// Layers are processed in file order. Resolution errors abort; object
    /// construction errors skip the object.
    pub fn index(&self, layers: &[Layer]) -> Result<Indices, MapError> {
        let mut out = Indices::default();
        for layer in layers {
            out.render.register(layer.z_index);
            out.spatial.register(layer.z_index);
            let tiles = self.index_tiles(layer, &mut out)?;
            let objects = self.index_objects(layer, &mut out)?;
            debug!(
                "Indexed layer '{}' at z {}: {} tiles, {} objects",
                layer.name, layer.z_index, tiles, objects
            );
        }
        Ok(out)
    }

    fn index_tiles(&self, layer: &Layer, out: &mut Indices) -> Result<usize, MapError> {
        let Some(data) = &layer.tile_data else {
            return Ok(0);
        };
        if layer.width == 0 {
            return Ok(0);
        }

        let mut cache = LayerCache::new(self.registry);
        let mut count = 0;
        for (idx, &gid) in data.iter().enumerate() {
            if gid == 0 {
                continue;
            }
            let region = cache.resolve(gid)?;
            let col = idx % layer.width;
            let row = idx / layer.width;
            let world = vec2(col as f32 * self.tile_size, row as f32 * self.tile_size);

            out.render.push(
                layer.z_index,
                Rc::new(Entity::Tile(Tile {
                    placement: Placement::at_cell(world, region),
                })),
            );
            count += 1;
        }
        Ok(count)
    }

    /// Objects are visited last-authored first, so earlier-authored objects
    /// paint on top.
    fn index_objects(&self, layer: &Layer, out: &mut Indices) -> Result<usize, MapError> {
        let mut count = 0;
        for obj in layer.objects.iter().rev() {
            match self.build_object(obj) {
                Ok(entity) => {
                    let entity = Rc::new(entity);
                    out.render.push(layer.z_index, Rc::clone(&entity));
                    if let Some(displaced) = out.spatial.insert(layer.z_index, Rc::clone(&entity)) {
                        let collision = SpatialCollision {
                            z_index: layer.z_index,
                            key: PositionKey::from_world(entity.position()),
                            displaced_object_id: displaced.info().map(|i| i.object_id),
                            winner_object_id: entity.info().map(|i| i.object_id),
                        };
                        warn!(
                            "Object {:?} at {} (z {}) hides object {:?} from position lookup",
                            collision.winner_object_id,
                            collision.key,
                            collision.z_index,
                            collision.displaced_object_id
                        );
                        out.collisions.push(collision);
                    }
                    count += 1;
                }
                Err(ObjectError::Resolve(err)) => return Err(err),
                Err(error) => {
                    warn!(
                        "Unable to unpack object {} ('{}') in layer '{}': {}",
                        obj.object_id, obj.name, layer.name, error
                    );
                    out.skipped.push(SkippedObject {
                        layer: layer.name.clone(),
                        object_id: obj.object_id,
                        name: obj.name.clone(),
                        error,
                    });
                }
            }
        }
        Ok(count)
    }

    /// The type is checked before the GID is resolved so that non-tile
    /// authoring objects (gid 0) are skipped instead of aborting the load.
    fn build_object(&self, obj: &MapObject) -> Result<Entity, ObjectError> {
        obj.kind.parse::<ObjectKind>()?;
        let owner = self.registry.owner(obj.gid)?;
        self.factory.build(obj, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::properties::{Property, PropertyValue};
    use crate::tileset::tests::{dynamic, uniform};
    use macroquad::math::Rect;

    fn registry() -> TilesetRegistry {
        TilesetRegistry::new(vec![
            uniform(1, 4, 256, 256),
            dynamic(17, &[(64, 128), (64, 64), (128, 64)]),
        ])
    }

    fn object(id: u32, kind: &str, gid: u32, x: f32, y: f32) -> MapObject {
        MapObject {
            gid,
            object_id: id,
            name: format!("obj{id}"),
            kind: kind.into(),
            x,
            y,
            width: 64.0,
            height: 64.0,
            properties: Vec::new(),
        }
    }

    fn with_prop(mut obj: MapObject, name: &str, value: &str) -> MapObject {
        obj.properties.push(Property {
            name: name.into(),
            declared_type: Some("string".into()),
            value: PropertyValue::String(value.into()),
        });
        obj
    }

    fn ids(index: &RenderIndex, z: u8) -> Vec<u32> {
        index
            .bucket(z)
            .iter()
            .filter_map(|e| e.info().map(|i| i.object_id))
            .collect()
    }

    #[test]
    fn grid_tiles_land_on_scaled_cells() {
        let reg = registry();
        let layer = Layer {
            name: "ground".into(),
            width: 3,
            height: 2,
            tile_data: Some(vec![1, 0, 6, 0, 2, 0]),
            z_index: 0,
            ..Default::default()
        };
        let out = LayerIndexer::new(&reg, 64).index(&[layer]).expect("index");

        let tiles = out.render.bucket(0);
        assert_eq!(tiles.len(), 3);
        assert!(tiles.iter().all(|t| t.kind() == EntityKind::Tile));
        assert_eq!(tiles[0].position(), vec2(0.0, 0.0));
        assert_eq!(tiles[1].position(), vec2(128.0, 0.0));
        assert_eq!(tiles[1].image_region().rect, Rect::new(64.0, 64.0, 64.0, 64.0));
        assert_eq!(tiles[2].position(), vec2(64.0, 64.0));
        assert_eq!(tiles[2].transformed_position(), tiles[2].position());
        assert!(out.spatial.layer(0).map_or(true, |l| l.is_empty()));
    }

    #[test]
    fn unresolvable_tile_aborts() {
        let reg = TilesetRegistry::new(vec![uniform(5, 4, 256, 256)]);
        let layer = Layer {
            name: "ground".into(),
            width: 1,
            height: 1,
            tile_data: Some(vec![2]),
            ..Default::default()
        };
        let err = LayerIndexer::new(&reg, 64).index(&[layer]).err().expect("error");
        assert!(matches!(err, MapError::UnresolvedId { gid: 2 }));
    }

    #[test]
    fn objects_render_in_reverse_authoring_order() {
        let reg = registry();
        let layer = Layer {
            name: "props".into(),
            objects: vec![
                object(1, "Cliff", 17, 0.0, 64.0),
                object(2, "Cliff", 18, 64.0, 64.0),
                object(3, "Building", 19, 128.0, 64.0),
            ],
            z_index: 3,
            ..Default::default()
        };
        let out = LayerIndexer::new(&reg, 64).index(&[layer]).expect("index");
        assert_eq!(ids(&out.render, 3), vec![3, 2, 1]);
        assert_eq!(out.spatial.len(), 3);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn broken_stairs_are_skipped_but_siblings_load() {
        let reg = registry();
        let stairs = with_prop(object(2, "Stairs", 18, 64.0, 64.0), "ascend", "NORTH");
        let layer = Layer {
            name: "props".into(),
            objects: vec![
                object(1, "Cliff", 17, 0.0, 64.0),
                stairs,
                object(3, "Cliff", 19, 128.0, 64.0),
            ],
            z_index: 1,
            ..Default::default()
        };
        let out = LayerIndexer::new(&reg, 64).index(&[layer]).expect("index");

        assert_eq!(ids(&out.render, 1), vec![3, 1]);
        assert!(out.spatial.get(1, vec2(64.0, 64.0)).is_none());
        assert!(out.spatial.get(1, vec2(0.0, 64.0)).is_some());
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].object_id, 2);
        assert!(matches!(
            &out.skipped[0].error,
            ObjectError::MissingRequiredProperty(p) if p == "descend"
        ));
    }

    #[test]
    fn unsupported_objects_without_gid_are_skipped() {
        let reg = registry();
        let layer = Layer {
            name: "markers".into(),
            objects: vec![object(7, "SpawnArea", 0, 0.0, 0.0)],
            ..Default::default()
        };
        let out = LayerIndexer::new(&reg, 64).index(&[layer]).expect("index");
        assert!(out.render.is_empty());
        assert!(matches!(
            out.skipped[0].error,
            ObjectError::UnsupportedObjectType(_)
        ));
    }

    #[test]
    fn object_with_bad_image_index_aborts() {
        let reg = registry();
        let layer = Layer {
            name: "props".into(),
            objects: vec![object(1, "Cliff", 40, 0.0, 0.0)],
            ..Default::default()
        };
        let err = LayerIndexer::new(&reg, 64).index(&[layer]).err().expect("error");
        assert!(matches!(err, MapError::IndexOutOfRange { .. }));
    }

    #[test]
    fn same_position_keeps_later_insert_for_lookup_only() {
        let reg = registry();
        let layer = Layer {
            name: "props".into(),
            objects: vec![
                object(1, "Cliff", 17, 64.0, 128.0),
                object(2, "Cliff", 18, 64.2, 127.8),
            ],
            z_index: 2,
            ..Default::default()
        };
        let out = LayerIndexer::new(&reg, 64).index(&[layer]).expect("index");

        // Reverse order: 2 is inserted first, 1 overwrites it.
        assert_eq!(ids(&out.render, 2), vec![2, 1]);
        let hit = out.spatial.get(2, vec2(64.0, 128.0)).expect("hit");
        assert_eq!(hit.info().map(|i| i.object_id), Some(1));
        assert_eq!(
            out.collisions,
            vec![SpatialCollision {
                z_index: 2,
                key: PositionKey { x: 64, y: 128 },
                displaced_object_id: Some(2),
                winner_object_id: Some(1),
            }]
        );
    }

    #[test]
    fn z_indices_are_registered_in_ascending_order() {
        let reg = registry();
        let layers = [
            Layer {
                name: "top".into(),
                z_index: 4,
                ..Default::default()
            },
            Layer {
                name: "ground".into(),
                z_index: 0,
                width: 1,
                height: 1,
                tile_data: Some(vec![1]),
                ..Default::default()
            },
            Layer {
                name: "also ground".into(),
                z_index: 0,
                width: 1,
                height: 1,
                tile_data: Some(vec![2]),
                ..Default::default()
            },
        ];
        let out = LayerIndexer::new(&reg, 64).index(&layers).expect("index");
        assert_eq!(out.render.z_indices().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(out.render.bucket(0).len(), 2);
    }
}
