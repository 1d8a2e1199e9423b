use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings shared by every stage of a level load.
///
/// Built once (from code or a JSON file) and passed by reference to the
/// loaders and the renderer; nothing reads configuration from globals.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Root every image reference is re-rooted under.
    pub assets_dir: PathBuf,
    /// Edge length of a grid cell and of a uniform tileset's tiles, in pixels.
    pub tile_size: u32,
    /// Layer property holding the layer's depth bucket.
    pub z_index_property: String,
    pub render: RenderConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            assets_dir: PathBuf::from("assets"),
            tile_size: 64,
            z_index_property: "z_index".to_owned(),
            render: RenderConfig::default(),
        }
    }
}

impl LoaderConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let cfg: LoaderConfig = serde_json::from_str(&txt)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        if cfg.tile_size == 0 {
            anyhow::bail!("tile_size must be non-zero in {}", path.display());
        }
        Ok(cfg)
    }
}

/// Renderer-facing settings (fonts, banner layout).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub banner_font_size: u16,
    pub banner_scale: f32,
    /// RGBA, 0-255.
    pub clear_color: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            banner_font_size: 16,
            banner_scale: 0.8,
            clear_color: [120, 180, 255, 255],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("tiled_level_cfg_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir.join(name)
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let path = temp_file("config.json");
        fs::write(&path, r#"{ "tile_size": 32, "render": { "banner_font_size": 20 } }"#)
            .expect("failed to write config");

        let cfg = LoaderConfig::from_file(&path).expect("config");
        assert_eq!(cfg.tile_size, 32);
        assert_eq!(cfg.assets_dir, PathBuf::from("assets"));
        assert_eq!(cfg.z_index_property, "z_index");
        assert_eq!(cfg.render.banner_font_size, 20);
        assert_eq!(cfg.render.banner_scale, 0.8);
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let path = temp_file("config.json");
        fs::write(&path, r#"{ "tile_size": 0 }"#).expect("failed to write config");
        assert!(LoaderConfig::from_file(&path).is_err());
    }
}
