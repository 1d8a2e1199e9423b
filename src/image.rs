use crate::error::MapError;
use macroquad::texture::Image;
use std::path::{Path, PathBuf};

/// Decodes image files referenced by tilesets.
pub trait ImageLoader {
    fn load_image(&self, path: &Path) -> Result<Image, MapError>;
}

/// Reads images from disk and decodes them with Macroquad's decoder.
///
/// Decoding happens on the CPU only, so no graphics context is needed at
/// load time; textures are created later by the renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load_image(&self, path: &Path) -> Result<Image, MapError> {
        let bytes = std::fs::read(path).map_err(|err| MapError::ImageLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Image::from_file_with_format(&bytes, None).map_err(|err| MapError::ImageLoad {
            path: path.to_path_buf(),
            reason: format!("{err:?}"),
        })
    }
}

/// Maps an image reference from a tileset file to a path under `assets_dir`.
///
/// Backslashes become `/`, the path is lexically cleaned, one leading `../`
/// is dropped and the rest is joined onto `assets_dir`.
pub fn normalize_asset_path(raw: &str, assets_dir: &Path) -> PathBuf {
    let cleaned = clean_path(&raw.replace('\\', "/"));
    let rel = cleaned.strip_prefix("../").unwrap_or(&cleaned);
    assets_dir.join(rel)
}

/// Lexical cleanup of a `/`-separated path: drops empty and `.` segments and
/// folds `..` into the preceding segment where there is one.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}
