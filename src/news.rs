//! Geotagged news items, display ranking, and the published dataset.

use crate::location::{Coordinate, LocationType};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Shown when a feed entry carries no description.
pub const NO_SUMMARY: &str = "概要なし";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub coords: Coordinate,
    pub location_type: LocationType,
}

/// Display rank of a location type; lower sorts first.
pub fn rank(location_type: LocationType) -> u8 {
    match location_type {
        LocationType::Prefecture => 0,
        LocationType::Ward => 1,
        LocationType::City => 2,
        LocationType::Town => 3,
        LocationType::Village => 4,
        LocationType::Other => 5,
        LocationType::Unknown => 99,
    }
}

/// Stable sort by [`rank`]; items of equal rank keep their order.
pub fn sort_by_specificity(items: &mut [NewsItem]) {
    items.sort_by_key(|item| rank(item.location_type));
}

// ─── Published dataset ──────────────────────────────────────────

/// Single-slot cell holding the current dataset.
///
/// The refresh task publishes a complete list; readers take an `Arc`
/// snapshot that stays consistent even if a new list is published.
pub struct NewsStore {
    inner: ArcSwap<Vec<NewsItem>>,
}

impl NewsStore {
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<NewsItem>> {
        self.inner.load_full()
    }

    pub fn publish(&self, items: Vec<NewsItem>) {
        self.inner.store(Arc::new(items));
    }
}

impl Default for NewsStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Fallback dataset ───────────────────────────────────────────

const FALLBACK_DESCRIPTION: &str =
    "現在、地名を含むリアルタイムニュースが見つからなかったため、サンプルデータを表示しています。";

/// Sample items served while no live item has been resolved.
pub fn builtin_fallback() -> Vec<NewsItem> {
    vec![
        NewsItem {
            title: "【フォールバック表示】東京スカイツリーでイベント開催".into(),
            link: "#".into(),
            description: FALLBACK_DESCRIPTION.into(),
            coords: Coordinate::new(35.7101, 139.8107),
            location_type: LocationType::Prefecture,
        },
        NewsItem {
            title: "【フォールバック表示】大阪城公園が桜で満開に".into(),
            link: "#".into(),
            description: FALLBACK_DESCRIPTION.into(),
            coords: Coordinate::new(34.6873, 135.5259),
            location_type: LocationType::City,
        },
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid fallback data in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Load a deployment-provided fallback dataset (a JSON array of items).
pub fn load_fallback(path: &Path) -> Result<Vec<NewsItem>, FallbackError> {
    let data = std::fs::read_to_string(path).map_err(|source| FallbackError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| FallbackError::Json {
        path: path.display().to_string(),
        source,
    })
}
