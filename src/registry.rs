use crate::error::MapError;
use crate::tileset::{clean_gid, ImageRegion, Tileset};
use macroquad::texture::Image;

/// Tileset that owns a GID, together with its position in the registry.
#[derive(Debug, Clone, Copy)]
pub struct OwnedTileset<'r> {
    pub index: usize,
    pub tileset: &'r Tileset,
}

impl<'r> OwnedTileset<'r> {
    pub fn region(&self, gid: u32) -> Result<ImageRegion, MapError> {
        let (image, rect) = self.tileset.locate(gid)?;
        Ok(ImageRegion {
            tileset: self.index,
            image,
            rect,
        })
    }
}

/// All tilesets of a map, ordered by ascending first GID.
///
/// A tileset owns every GID from its first GID up to the next tileset's
/// first GID minus one; the last one owns everything above it.
#[derive(Debug, Default)]
pub struct TilesetRegistry {
    tilesets: Vec<Tileset>,
}

impl TilesetRegistry {
    /// Input order does not matter; tilesets are sorted by first GID.
    pub fn new(mut tilesets: Vec<Tileset>) -> Self {
        tilesets.sort_by_key(Tileset::first_gid);
        TilesetRegistry { tilesets }
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    pub fn image(&self, region: &ImageRegion) -> Option<&Image> {
        self.tilesets.get(region.tileset)?.image(region.image)
    }

    /// Scans from the highest first GID down; the first tileset whose first
    /// GID is `<= gid` owns it.
    pub fn owner(&self, gid: u32) -> Result<OwnedTileset<'_>, MapError> {
        let gid = clean_gid(gid);
        if gid == 0 {
            return Err(MapError::UnresolvedId { gid });
        }
        self.tilesets
            .iter()
            .enumerate()
            .rev()
            .find(|(_, ts)| ts.first_gid() <= gid)
            .map(|(index, tileset)| OwnedTileset { index, tileset })
            .ok_or(MapError::UnresolvedId { gid })
    }

    pub fn resolve(&self, gid: u32) -> Result<ImageRegion, MapError> {
        self.owner(gid)?.region(gid)
    }

    fn owns(&self, index: usize, gid: u32) -> bool {
        let Some(ts) = self.tilesets.get(index) else {
            return false;
        };
        let upper = self
            .tilesets
            .get(index + 1)
            .map_or(u32::MAX, Tileset::first_gid);
        ts.first_gid() <= gid && gid < upper
    }
}

/// Remembers the tileset that resolved the previous tile of a layer.
///
/// Consecutive tiles of a layer usually share a tileset, so the cached
/// owner is tried first; a GID outside its range falls back to a full
/// registry scan. Results are identical to [`TilesetRegistry::resolve`].
pub struct LayerCache<'r> {
    registry: &'r TilesetRegistry,
    owner: Option<usize>,
}

impl<'r> LayerCache<'r> {
    pub fn new(registry: &'r TilesetRegistry) -> Self {
        LayerCache {
            registry,
            owner: None,
        }
    }

    pub fn resolve(&mut self, gid: u32) -> Result<ImageRegion, MapError> {
        let clean = clean_gid(gid);
        if let Some(index) = self.owner {
            if clean != 0 && self.registry.owns(index, clean) {
                let tileset = &self.registry.tilesets[index];
                return OwnedTileset { index, tileset }.region(gid);
            }
        }
        let owned = self.registry.owner(gid)?;
        self.owner = Some(owned.index);
        owned.region(gid)
    }
}
