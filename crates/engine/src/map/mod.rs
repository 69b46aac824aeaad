mod definition;
mod layer;
mod manager;
mod map_type;
mod tmx;

pub use definition::{Map, NpcSpawn};
pub use layer::{MapLayer, MapObject, COLLISION_LAYER, PLAYER_START, PORTAL_LAYER, SPAWNS_LAYER};
pub use manager::{MapError, MapHandle, MapManager};
pub use map_type::{MapType, UnknownMapType};
pub use tmx::{load_map_file, load_maps_dir, parse_map_document, MapLoadError};
