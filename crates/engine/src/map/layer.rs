use crate::geometry::{Rect, Vec2};

pub const COLLISION_LAYER: &str = "MAP_COLLISION_LAYER";
pub const PORTAL_LAYER: &str = "MAP_PORTAL_LAYER";
pub const SPAWNS_LAYER: &str = "MAP_SPAWNS_LAYER";
pub const PLAYER_START: &str = "PLAYER_START";

/// Named rectangle in map space (pixels, y-up).
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub name: Option<String>,
    pub rect: Rect,
}

impl MapObject {
    pub fn new(name: Option<&str>, rect: Rect) -> Self {
        Self {
            name: name.map(ToString::to_string),
            rect,
        }
    }

    pub fn named(name: &str, rect: Rect) -> Self {
        Self::new(Some(name), rect)
    }

    pub fn unnamed(rect: Rect) -> Self {
        Self::new(None, rect)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }
}

/// Object layer; iteration follows declaration order in the map file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapLayer {
    name: String,
    objects: Vec<MapObject>,
}

impl MapLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    pub fn with_objects(name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        Self {
            name: name.into(),
            objects,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, object: MapObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn overlapping<'a>(&'a self, bounds: &'a Rect) -> impl Iterator<Item = &'a MapObject> + 'a {
        self.objects
            .iter()
            .filter(move |object| object.rect.overlaps(bounds))
    }

    /// Bottom-left corners of every object carrying `name`.
    pub fn positions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Vec2> + 'a {
        self.objects
            .iter()
            .filter(move |object| object.is_named(name))
            .map(|object| object.rect.origin())
    }
}
