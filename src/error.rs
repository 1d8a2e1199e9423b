use macroquad::math::Rect;
use std::path::PathBuf;
use std::{error, fmt, io};

/// Fatal error: aborts the whole level load.
#[derive(Debug)]
pub enum MapError {
    /// Level file is not a `.json` file
    UnsupportedFormat(String),
    /// File could not be read
    Io { path: PathBuf, source: io::Error },
    /// File is not valid JSON or does not match the expected structure
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Referenced image is missing or could not be decoded
    ImageLoad { path: PathBuf, reason: String },
    /// Tileset has neither a non-zero `columns` nor a non-empty `tiles` list
    InvalidTilesetFormat { path: PathBuf },
    /// A tile layer's data length does not match `width * height`
    InvalidLayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
    /// GID is 0 or no tileset owns it
    UnresolvedId { gid: u32 },
    /// Grid cell computed for a uniform tileset lies outside its atlas
    OutOfBounds {
        gid: u32,
        region: Rect,
        atlas: (u16, u16),
    },
    /// Local index past the end of a dynamic tileset's image list
    IndexOutOfRange {
        gid: u32,
        local_id: u32,
        image_count: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnsupportedFormat(path) => {
                write!(f, "Map file must be a JSON file: {}", path)
            }
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "Failed to parse JSON in {}: {}", path.display(), source)
            }
            MapError::ImageLoad { path, reason } => {
                write!(f, "Unable to load image {}: {}", path.display(), reason)
            }
            MapError::InvalidTilesetFormat { path } => write!(
                f,
                "Tileset {} has neither `columns` nor `tiles`",
                path.display()
            ),
            MapError::InvalidLayerSize {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Invalid layer size for layer '{}': expected {} tiles, found {}",
                layer, expected, actual
            ),
            MapError::UnresolvedId { gid } => {
                write!(f, "No tileset owns global id {}", gid)
            }
            MapError::OutOfBounds { gid, region, atlas } => write!(
                f,
                "Global id {} maps to ({}, {}, {}, {}) outside the {}x{} atlas",
                gid, region.x, region.y, region.w, region.h, atlas.0, atlas.1
            ),
            MapError::IndexOutOfRange {
                gid,
                local_id,
                image_count,
            } => write!(
                f,
                "Global id {} maps to image {} but the tileset has {} images",
                gid, local_id, image_count
            ),
        }
    }
}

impl error::Error for MapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Recoverable error: the offending object is skipped and loading continues.
#[derive(Debug)]
pub enum ObjectError {
    /// `type` is not one of the known object kinds
    UnsupportedObjectType(String),
    /// Property is present but holds the wrong kind of value
    TypeMismatch {
        property: String,
        expected: &'static str,
    },
    /// Property value cannot be converted to the target type
    TypeCoercion { property: String, value: String },
    /// Required property is absent or empty
    MissingRequiredProperty(String),
    /// Image resolution failed; this is fatal for the level
    Resolve(MapError),
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectError::UnsupportedObjectType(kind) => {
                write!(f, "Unsupported object type: ({})", kind)
            }
            ObjectError::TypeMismatch { property, expected } => {
                write!(f, "Property `{}` must be a {}", property, expected)
            }
            ObjectError::TypeCoercion { property, value } => {
                write!(f, "Property `{}` cannot be converted from {}", property, value)
            }
            ObjectError::MissingRequiredProperty(name) => {
                write!(f, "Object is missing `{}` property", name)
            }
            ObjectError::Resolve(err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for ObjectError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ObjectError::Resolve(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MapError> for ObjectError {
    fn from(err: MapError) -> Self {
        ObjectError::Resolve(err)
    }
}
