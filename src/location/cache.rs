//! File-based geocode cache at ~/.geonews/geocode-cache.json.
//!
//! TTL: 30 days. Keys are the exact composed query strings.
//! Only successful lookups are stored.

use super::providers::Geocoder;
use super::types::{Coordinate, GeocodeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const CACHE_TTL_MS: i64 = 30 * 24 * 3600 * 1000; // 30 days in ms

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    lat: f64,
    lon: f64,
    timestamp: i64,
}

fn is_expired(entry: &CacheEntry, now: i64) -> bool {
    now - entry.timestamp > CACHE_TTL_MS
}

/// The geocode cache.
pub struct GeocodeCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl GeocodeCache {
    /// Load cache from a specific path. Missing or unreadable files start
    /// empty; expired entries are dropped.
    pub fn load_from(path: PathBuf) -> Self {
        let mut entries = Self::read_file(&path).unwrap_or_default();
        let now = chrono::Utc::now().timestamp_millis();
        entries.retain(|_, entry| !is_expired(entry, now));
        Self { path, entries }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geonews")
            .join("geocode-cache.json")
    }

    fn read_file(path: &Path) -> Option<HashMap<String, CacheEntry>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Look up a query. Returns None if missing or expired.
    pub fn get(&self, query: &str) -> Option<Coordinate> {
        let entry = self.entries.get(query)?;

        if is_expired(entry, chrono::Utc::now().timestamp_millis()) {
            return None;
        }

        Some(Coordinate::new(entry.lat, entry.lon))
    }

    /// Store a coordinate and persist to disk.
    pub fn put(&mut self, query: &str, coord: Coordinate) {
        self.entries.insert(
            query.to_string(),
            CacheEntry {
                lat: coord.lat,
                lon: coord.lon,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        );
        self.persist();
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %e, "could not write geocode cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize geocode cache"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A [`Geocoder`] that consults a [`GeocodeCache`] before the wrapped service.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: Mutex<GeocodeCache>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, cache: GeocodeCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(query);
        if let Some(coord) = cached {
            tracing::debug!(query, %coord, "geocode cache hit");
            return Ok(coord);
        }

        let coord = self.inner.geocode(query)?;
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .put(query, coord);
        Ok(coord)
    }
}
