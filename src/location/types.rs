//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A span of text tagged by the entity tagger.
///
/// The label is the tagger's own category string (`GPE`, `Province`, ...);
/// it stays open here and is only narrowed by the resolver's allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub text: String,
    #[serde(alias = "label_", alias = "category")]
    pub label: String,
}

impl TaggedSpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Administrative level a place name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Prefecture,
    City,
    Town,
}

/// Prefecture / city / town resolved from one article.
///
/// Each level holds at most one name; a later span of the same level
/// replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceHierarchy {
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
}

impl PlaceHierarchy {
    pub fn is_empty(&self) -> bool {
        self.prefecture.is_none() && self.city.is_none() && self.town.is_none()
    }

    pub(crate) fn set(&mut self, level: Level, name: String) {
        let slot = match level {
            Level::Prefecture => &mut self.prefecture,
            Level::City => &mut self.city,
            Level::Town => &mut self.town,
        };
        *slot = Some(name);
    }
}

/// Administrative granularity of a resolved item, used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Prefecture,
    Ward,
    City,
    Town,
    Village,
    Other,
    /// Any type string this build does not know, e.g. from a hand-written
    /// fallback file.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Prefecture => "prefecture",
            Self::Ward => "ward",
            Self::City => "city",
            Self::Town => "town",
            Self::Village => "village",
            Self::Other => "other",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A point on the map, latitude first.
///
/// Serialized as a `[lat, lon]` pair to match the map client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lat, self.lon)
    }
}

/// Why a geocoding lookup produced no coordinate.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("geocoder returned HTTP {0}")]
    Status(u16),
    #[error("no results for '{0}'")]
    NoResults(String),
    #[error("invalid geocoder response: {0}")]
    InvalidResponse(String),
}
