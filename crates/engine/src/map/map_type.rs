use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapType {
    TopWorld,
    Town,
    CastleOfDoom,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown map type '{0}'")]
pub struct UnknownMapType(pub String);

impl MapType {
    pub const ALL: [MapType; 3] = [MapType::TopWorld, MapType::Town, MapType::CastleOfDoom];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::TopWorld => "TOP_WORLD",
            Self::Town => "TOWN",
            Self::CastleOfDoom => "CASTLE_OF_DOOM",
        }
    }

    /// Exact, case-sensitive match on the token used in map files.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|map_type| map_type.as_token() == token)
    }

    pub fn asset_file_name(self) -> String {
        format!("{}.tmx", self.as_token().to_ascii_lowercase())
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for MapType {
    type Err = UnknownMapType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_token(value).ok_or_else(|| UnknownMapType(value.to_string()))
    }
}
