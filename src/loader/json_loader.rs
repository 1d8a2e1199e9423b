use crate::config::LoaderConfig;
use crate::error::MapError;
use crate::properties::{coerce_u8, Properties, Property, PropertyValue};
use crate::tilemap::{Layer, MapObject, TileMap, TilesetRef};
use macroquad::logging::warn;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    data: Option<Vec<u32>>,
    #[serde(default)]
    objects: Vec<JsonObject>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    source: String,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    gid: u32,
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    value: JsonValue,
}

fn json_property_to_model(prop: JsonProperty) -> Option<Property> {
    let JsonProperty { name, kind, value } = prop;

    let parsed = match &value {
        JsonValue::Bool(b) => Some(PropertyValue::Bool(*b)),
        JsonValue::Number(n) => n
            .as_i64()
            .map(PropertyValue::Int)
            .or_else(|| n.as_f64().map(PropertyValue::Float)),
        JsonValue::String(s) => Some(PropertyValue::String(s.clone())),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    };

    match parsed {
        Some(value) => Some(Property {
            name,
            declared_type: kind,
            value,
        }),
        None => {
            warn!("Dropping non-scalar property `{}`: {}", name, value);
            None
        }
    }
}

fn properties_from_json(props: Vec<JsonProperty>) -> Vec<Property> {
    props.into_iter().filter_map(json_property_to_model).collect()
}

fn object_to_model(obj: JsonObject) -> MapObject {
    let kind = if !obj.class.is_empty() {
        obj.class
    } else {
        obj.kind
    };

    MapObject {
        gid: obj.gid,
        object_id: obj.id,
        name: obj.name,
        kind,
        x: obj.x,
        y: obj.y,
        width: obj.width,
        height: obj.height,
        properties: properties_from_json(obj.properties),
    }
}

/// Depth bucket from the layer's z-index property. Without one, the layer's
/// position in the file is used.
fn layer_z_index(name: &str, position: usize, properties: &Properties, key: &str) -> u8 {
    match properties.get(key) {
        None => u8::try_from(position).unwrap_or(u8::MAX),
        Some(value) => coerce_u8(key, Some(value)).unwrap_or_else(|err| {
            warn!("Error parsing z-index of layer '{}': {}", name, err);
            0
        }),
    }
}

fn layer_to_model(l: JsonLayer, position: usize, config: &LoaderConfig) -> Result<Layer, MapError> {
    let authored = properties_from_json(l.properties);
    let properties = Properties::from_list(&authored);
    let z_index = layer_z_index(&l.name, position, &properties, &config.z_index_property);

    let tile_data = match l.kind.as_deref().unwrap_or("tilelayer") {
        "tilelayer" => l.data,
        _ => None,
    };
    if let Some(data) = &tile_data {
        let expected = l.width.saturating_mul(l.height);
        if data.len() != expected {
            return Err(MapError::InvalidLayerSize {
                layer: l.name,
                expected,
                actual: data.len(),
            });
        }
    }

    Ok(Layer {
        name: l.name,
        width: l.width,
        height: l.height,
        tile_data,
        objects: l.objects.into_iter().map(object_to_model).collect(),
        z_index,
        properties,
    })
}

/// Parses a level description. Tileset references are resolved against the
/// directory of `path` but not loaded.
pub fn decode_map_file(path: &Path, config: &LoaderConfig) -> Result<TileMap, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }

    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    decode_map_str(&txt, path, &map_dir, config)
}

/// `path` is used for error reporting only.
pub fn decode_map_str(
    txt: &str,
    path: &Path,
    map_dir: &Path,
    config: &LoaderConfig,
) -> Result<TileMap, MapError> {
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tilesets = j
        .tilesets
        .into_iter()
        .map(|ts| TilesetRef {
            path: map_dir.join(ts.source),
            first_gid: ts.firstgid,
        })
        .collect();

    let layers = j
        .layers
        .into_iter()
        .enumerate()
        .map(|(i, l)| layer_to_model(l, i, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TileMap { layers, tilesets })
}
