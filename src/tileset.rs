use crate::config::LoaderConfig;
use crate::error::MapError;
use crate::image::{normalize_asset_path, ImageLoader};
use macroquad::logging::info;
use macroquad::math::Rect;
use macroquad::texture::Image;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// Strips the flip flags from a raw GID.
#[inline]
pub fn clean_gid(raw: u32) -> u32 {
    raw & GID_MASK
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilesetKind {
    Uniform,
    Dynamic,
}

/// A loaded tileset. Immutable once built.
#[derive(Clone)]
pub enum Tileset {
    /// One atlas image sliced into a grid of square tiles.
    Uniform {
        first_gid: u32,
        columns: u32,
        tile_size: u32,
        image: Image,
        source: PathBuf,
    },
    /// One standalone image per local tile index.
    Dynamic {
        first_gid: u32,
        images: Vec<Image>,
        source: PathBuf,
    },
}

/// Sub-rectangle of one image owned by a tileset in a registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRegion {
    /// Index of the tileset in its registry.
    pub tileset: usize,
    /// Index of the image within the tileset (always 0 for uniform tilesets).
    pub image: usize,
    pub rect: Rect,
}

impl ImageRegion {
    pub fn width(&self) -> f32 {
        self.rect.w
    }

    pub fn height(&self) -> f32 {
        self.rect.h
    }
}

impl fmt::Debug for Tileset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tileset")
            .field("kind", &self.kind())
            .field("first_gid", &self.first_gid())
            .field("images", &self.image_count())
            .field("source", &self.source())
            .finish()
    }
}

impl Tileset {
    pub fn first_gid(&self) -> u32 {
        match self {
            Tileset::Uniform { first_gid, .. } | Tileset::Dynamic { first_gid, .. } => *first_gid,
        }
    }

    pub fn kind(&self) -> TilesetKind {
        match self {
            Tileset::Uniform { .. } => TilesetKind::Uniform,
            Tileset::Dynamic { .. } => TilesetKind::Dynamic,
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            Tileset::Uniform { source, .. } | Tileset::Dynamic { source, .. } => source,
        }
    }

    pub fn image_count(&self) -> usize {
        match self {
            Tileset::Uniform { .. } => 1,
            Tileset::Dynamic { images, .. } => images.len(),
        }
    }

    pub fn image(&self, index: usize) -> Option<&Image> {
        match self {
            Tileset::Uniform { image, .. } => (index == 0).then_some(image),
            Tileset::Dynamic { images, .. } => images.get(index),
        }
    }

    /// Image index and source rectangle for `gid`, which must be owned by
    /// this tileset (`gid >= first_gid`).
    pub fn locate(&self, gid: u32) -> Result<(usize, Rect), MapError> {
        let gid = clean_gid(gid);
        let first_gid = self.first_gid();
        if gid == 0 || gid < first_gid {
            return Err(MapError::UnresolvedId { gid });
        }
        let local_id = gid - first_gid;

        match self {
            Tileset::Uniform {
                columns,
                tile_size,
                image,
                source,
                ..
            } => {
                if *columns == 0 {
                    return Err(MapError::InvalidTilesetFormat {
                        path: source.clone(),
                    });
                }
                let col = local_id % columns;
                let row = local_id / columns;
                let size = *tile_size as f32;
                let region = Rect::new(col as f32 * size, row as f32 * size, size, size);
                if region.right() > image.width as f32 || region.bottom() > image.height as f32 {
                    return Err(MapError::OutOfBounds {
                        gid,
                        region,
                        atlas: (image.width, image.height),
                    });
                }
                Ok((0, region))
            }
            Tileset::Dynamic { images, .. } => {
                let image = images
                    .get(local_id as usize)
                    .ok_or(MapError::IndexOutOfRange {
                        gid,
                        local_id,
                        image_count: images.len(),
                    })?;
                Ok((
                    local_id as usize,
                    Rect::new(0.0, 0.0, image.width as f32, image.height as f32),
                ))
            }
        }
    }
}

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    columns: Option<u32>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

/// Grid atlases may list tiles that only carry metadata, so `image` is
/// optional here and checked when the tileset is dynamic.
#[derive(Deserialize)]
struct JsonTile {
    #[serde(default)]
    image: Option<String>,
}

/// Parses tileset description files and eagerly loads their images.
pub struct TilesetLoader<'a, L: ImageLoader> {
    config: &'a LoaderConfig,
    images: &'a L,
}

impl<'a, L: ImageLoader> TilesetLoader<'a, L> {
    pub fn new(config: &'a LoaderConfig, images: &'a L) -> Self {
        TilesetLoader { config, images }
    }

    pub fn load(&self, path: &Path, first_gid: u32) -> Result<Tileset, MapError> {
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_from_str(&txt, path, first_gid)
    }

    /// `path` is only used for error reporting and [`Tileset::source`].
    pub fn load_from_str(
        &self,
        txt: &str,
        path: &Path,
        first_gid: u32,
    ) -> Result<Tileset, MapError> {
        let raw: JsonTileset = serde_json::from_str(txt).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if first_gid == 0 {
            return Err(MapError::UnresolvedId { gid: 0 });
        }

        let tileset = match (raw.columns, raw.image) {
            (Some(columns), Some(image)) if columns > 0 => {
                let img_path = normalize_asset_path(&image, &self.config.assets_dir);
                Tileset::Uniform {
                    first_gid,
                    columns,
                    tile_size: self.config.tile_size,
                    image: self.images.load_image(&img_path)?,
                    source: path.to_path_buf(),
                }
            }
            _ if !raw.tiles.is_empty() => {
                let images = raw
                    .tiles
                    .iter()
                    .map(|tile| {
                        let image = tile.image.as_deref().ok_or_else(|| {
                            MapError::InvalidTilesetFormat {
                                path: path.to_path_buf(),
                            }
                        })?;
                        let img_path = normalize_asset_path(image, &self.config.assets_dir);
                        self.images.load_image(&img_path)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Tileset::Dynamic {
                    first_gid,
                    images,
                    source: path.to_path_buf(),
                }
            }
            _ => {
                return Err(MapError::InvalidTilesetFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        info!(
            "Loaded {:?} tileset {} (first gid {}, {} image(s))",
            tileset.kind(),
            path.display(),
            first_gid,
            tileset.image_count()
        );
        Ok(tileset)
    }
}
