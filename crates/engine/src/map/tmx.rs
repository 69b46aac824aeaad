//! Loader for the object layers of Tiled (`.tmx`) maps.
//!
//! Only what the physics core consumes is read: map size, and rectangle
//! objects of every `<objectgroup>`. Tiled stores objects y-down from the top
//! of the map; they are flipped into the y-up map space used everywhere else.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::geometry::Rect;

use super::definition::Map;
use super::layer::{MapLayer, MapObject, COLLISION_LAYER, PORTAL_LAYER, SPAWNS_LAYER};
use super::map_type::MapType;

const SHAPE_ELEMENTS: [&str; 5] = ["ellipse", "polygon", "polyline", "point", "text"];

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("failed to read map file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed map xml in {path}: {source}")]
    XmlMalformed {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("expected <map> root in {path}, found <{found}>")]
    InvalidRoot { path: PathBuf, found: String },
    #[error("missing attribute '{attribute}' on <{element}> in {path} (line {line}, column {column})")]
    MissingAttribute {
        path: PathBuf,
        element: String,
        attribute: &'static str,
        line: u32,
        column: u32,
    },
    #[error(
        "invalid value '{value}' for attribute '{attribute}' in {path} (line {line}, column {column})"
    )]
    InvalidAttribute {
        path: PathBuf,
        attribute: &'static str,
        value: String,
        line: u32,
        column: u32,
    },
}

pub fn load_map_file(path: &Path, map_type: MapType) -> Result<Map, MapLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| MapLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map_document(path, &raw, map_type)
}

/// Loads `<dir>/<map_type>.tmx` for every map type whose file exists.
pub fn load_maps_dir(dir: &Path) -> Result<Vec<Map>, MapLoadError> {
    let mut maps = Vec::new();
    for map_type in MapType::ALL {
        let path = dir.join(map_type.asset_file_name());
        if !path.is_file() {
            warn!(map = %map_type, path = %path.display(), "map_file_missing");
            continue;
        }
        let map = load_map_file(&path, map_type)?;
        info!(map = %map_type, path = %path.display(), "map_file_loaded");
        maps.push(map);
    }
    Ok(maps)
}

pub fn parse_map_document(path: &Path, raw: &str, map_type: MapType) -> Result<Map, MapLoadError> {
    let doc = Document::parse(raw).map_err(|source| MapLoadError::XmlMalformed {
        path: path.to_path_buf(),
        source,
    })?;
    let root = doc.root_element();
    if root.tag_name().name() != "map" {
        return Err(MapLoadError::InvalidRoot {
            path: path.to_path_buf(),
            found: root.tag_name().name().to_string(),
        });
    }

    let context = ParseContext { doc: &doc, path };
    let width_tiles = context.required_f32(root, "width")?;
    let height_tiles = context.required_f32(root, "height")?;
    let tile_width = context.required_f32(root, "tilewidth")?;
    let tile_height = context.required_f32(root, "tileheight")?;
    let pixel_width = width_tiles * tile_width;
    let pixel_height = height_tiles * tile_height;

    let mut map = Map::new(map_type, pixel_width, pixel_height);
    for group in root
        .children()
        .filter(|node| node.has_tag_name("objectgroup"))
    {
        let name = group.attribute("name").unwrap_or_default();
        let layer = context.parse_object_group(group, name, pixel_height)?;
        map = match name {
            COLLISION_LAYER => map.with_collision_layer(layer),
            PORTAL_LAYER => map.with_portal_layer(layer),
            SPAWNS_LAYER => map.with_spawns_layer(layer),
            other => {
                debug!(map = %map_type, layer = other, "object_layer_ignored");
                map
            }
        };
    }
    Ok(map)
}

struct ParseContext<'a, 'input> {
    doc: &'a Document<'input>,
    path: &'a Path,
}

impl ParseContext<'_, '_> {
    fn parse_object_group(
        &self,
        group: Node<'_, '_>,
        name: &str,
        pixel_height: f32,
    ) -> Result<MapLayer, MapLoadError> {
        let mut layer = MapLayer::new(name);
        for object in group.children().filter(|node| node.has_tag_name("object")) {
            let shaped = object
                .children()
                .any(|child| SHAPE_ELEMENTS.contains(&child.tag_name().name()));
            if shaped {
                debug!(layer = name, "non_rectangle_object_skipped");
                continue;
            }

            let x = self.required_f32(object, "x")?;
            let y = self.required_f32(object, "y")?;
            let width = self.optional_f32(object, "width")?.unwrap_or(0.0);
            let height = self.optional_f32(object, "height")?.unwrap_or(0.0);
            let rect = Rect::new(x, pixel_height - y - height, width, height);
            layer.push(MapObject::new(object.attribute("name"), rect));
        }
        Ok(layer)
    }

    fn required_f32(&self, node: Node<'_, '_>, attribute: &'static str) -> Result<f32, MapLoadError> {
        self.optional_f32(node, attribute)?.ok_or_else(|| {
            let pos = self.doc.text_pos_at(node.range().start);
            MapLoadError::MissingAttribute {
                path: self.path.to_path_buf(),
                element: node.tag_name().name().to_string(),
                attribute,
                line: pos.row,
                column: pos.col,
            }
        })
    }

    fn optional_f32(
        &self,
        node: Node<'_, '_>,
        attribute: &'static str,
    ) -> Result<Option<f32>, MapLoadError> {
        let Some(raw) = node.attribute(attribute) else {
            return Ok(None);
        };
        match raw.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => {
                let pos = self.doc.text_pos_at(node.range().start);
                Err(MapLoadError::InvalidAttribute {
                    path: self.path.to_path_buf(),
                    attribute,
                    value: raw.to_string(),
                    line: pos.row,
                    column: pos.col,
                })
            }
        }
    }
}
