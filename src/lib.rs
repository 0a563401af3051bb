//! geonews: place-name geotagging for a Japanese news feed.
//!
//! Articles are tagged for place names, resolved to a prefecture/city/town
//! hierarchy, geocoded, ranked by administrative specificity and served as
//! JSON for a map client.

pub mod config;
pub mod feed;
pub mod location;
pub mod news;
pub mod pipeline;
pub mod scheduler;
pub mod server;
pub mod tagger;
