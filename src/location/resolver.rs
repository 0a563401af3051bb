//! Location resolver: tagged spans → place hierarchy.
//!
//! Spans are filtered by tagger label, then classified by their trailing
//! administrative suffix:
//!
//!   都 道 府 県  → prefecture
//!   市 区        → city
//!   町 村        → town
//!
//! Bare names that are both a prefecture and a same-named city (長崎, 広島, ...)
//! become `<name>県`, but only while no prefecture has been seen yet. That check
//! runs in tagger order, so the outcome depends on span order.

use super::types::{Level, PlaceHierarchy, TaggedSpan};

/// Tagger labels treated as place names by default.
pub const DEFAULT_TARGET_LABELS: &[&str] = &["GPE", "Province", "City"];

const PREFECTURE_SUFFIXES: &[char] = &['都', '道', '府', '県'];
pub(crate) const CITY_SUFFIXES: &[char] = &['市', '区'];
pub(crate) const TOWN_SUFFIXES: &[char] = &['町', '村'];

/// Suffix appended to an ambiguous bare name to make it a prefecture.
const PREFECTURE_SUFFIX: char = '県';

/// Prefecture names that are also the name of a city or region.
pub const AMBIGUOUS_NAMES: &[&str] = &[
    "長崎", "宮崎", "鹿児島", "佐賀", "沖縄", "岡山", "富山", "石川", "福井",
    "山梨", "栃木", "青森", "秋田", "山形", "福島", "岩手", "宮城", "奈良",
    "岐阜", "静岡", "広島", "山口", "徳島", "高知", "大分", "熊本",
];

/// Classify a place name by its trailing suffix.
pub fn classify_suffix(name: &str) -> Option<Level> {
    if name.ends_with(PREFECTURE_SUFFIXES) {
        Some(Level::Prefecture)
    } else if name.ends_with(CITY_SUFFIXES) {
        Some(Level::City)
    } else if name.ends_with(TOWN_SUFFIXES) {
        Some(Level::Town)
    } else {
        None
    }
}

pub fn is_ambiguous_name(name: &str) -> bool {
    AMBIGUOUS_NAMES.contains(&name)
}

/// Builds a [`PlaceHierarchy`] from tagger output. Holds no per-article state.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    target_labels: Vec<String>,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationResolver {
    pub fn new() -> Self {
        Self::with_labels(DEFAULT_TARGET_LABELS.iter().copied())
    }

    /// Create a resolver that accepts spans carrying any of `labels`.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, label: &str) -> bool {
        self.target_labels.iter().any(|l| l == label)
    }

    /// Resolve spans in the order given. Never fails; an empty hierarchy
    /// means no place was found.
    pub fn resolve(&self, spans: &[TaggedSpan]) -> PlaceHierarchy {
        let mut places = PlaceHierarchy::default();

        for name in spans.iter().filter(|s| self.accepts(&s.label)).map(|s| s.text.as_str()) {
            if let Some(level) = classify_suffix(name) {
                places.set(level, name.to_string());
            } else if is_ambiguous_name(name) && places.prefecture.is_none() {
                places.set(Level::Prefecture, format!("{}{}", name, PREFECTURE_SUFFIX));
            }
        }

        places
    }
}
