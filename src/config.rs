//! Runtime configuration and component wiring.

use crate::feed::{RssFeed, DEFAULT_FEED_URL};
use crate::location::{
    CachedGeocoder, GeocodeCache, Geocoder, GsiGeocoder, LocationResolver, DEFAULT_TARGET_LABELS,
    GSI_ADDRESS_SEARCH_URL,
};
use crate::news::{builtin_fallback, load_fallback, FallbackError, NewsItem};
use crate::pipeline::Pipeline;
use crate::tagger::{EntityTagger, HttpTagger, LexiconTagger};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ALLOW_ORIGIN: &str = "https://takumi-egg.github.io";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub feed_url: String,
    pub geocoder_url: String,
    /// NER service endpoint. `None` uses the built-in lexicon tagger.
    pub tagger_url: Option<String>,
    pub target_labels: Vec<String>,
    pub interval: Duration,
    pub http_timeout: Duration,
    pub allow_origins: Vec<String>,
    pub fallback_file: Option<PathBuf>,
    /// Geocode cache file. `None` disables caching.
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            feed_url: DEFAULT_FEED_URL.into(),
            geocoder_url: GSI_ADDRESS_SEARCH_URL.into(),
            tagger_url: None,
            target_labels: DEFAULT_TARGET_LABELS.iter().map(|s| s.to_string()).collect(),
            interval: Duration::from_secs(600),
            http_timeout: Duration::from_secs(10),
            allow_origins: vec![DEFAULT_ALLOW_ORIGIN.into()],
            fallback_file: None,
            cache_path: Some(GeocodeCache::default_path()),
        }
    }
}

impl Config {
    pub fn build_pipeline(&self) -> Pipeline {
        let feed = RssFeed::new(&self.feed_url, self.http_timeout);

        let tagger: Box<dyn EntityTagger> = match &self.tagger_url {
            Some(url) => Box::new(HttpTagger::new(url, self.http_timeout)),
            None => {
                tracing::info!("no tagger URL configured, using built-in lexicon tagger");
                Box::new(LexiconTagger::new())
            }
        };

        let gsi = GsiGeocoder::new(&self.geocoder_url, self.http_timeout);
        let geocoder: Box<dyn Geocoder> = match &self.cache_path {
            Some(path) => Box::new(CachedGeocoder::new(gsi, GeocodeCache::load_from(path.clone()))),
            None => Box::new(gsi),
        };

        Pipeline::new(
            Box::new(feed),
            tagger,
            LocationResolver::with_labels(self.target_labels.iter().cloned()),
            geocoder,
        )
    }

    /// The deployment's fallback dataset, or the built-in sample set.
    pub fn fallback(&self) -> Result<Vec<NewsItem>, FallbackError> {
        match &self.fallback_file {
            Some(path) => load_fallback(path),
            None => Ok(builtin_fallback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.interval, Duration::from_secs(600));
        assert_eq!(cfg.target_labels, vec!["GPE", "Province", "City"]);
        assert_eq!(cfg.allow_origins, vec![DEFAULT_ALLOW_ORIGIN]);
        assert!(cfg.tagger_url.is_none());
    }

    #[test]
    fn test_builtin_fallback_when_no_file() {
        assert_eq!(Config::default().fallback().unwrap(), builtin_fallback());
    }

    #[test]
    fn test_missing_fallback_file_is_error() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            fallback_file: Some(dir.path().join("missing.json")),
            ..Config::default()
        };
        assert!(cfg.fallback().is_err());
    }

    #[test]
    fn test_unreachable_tagger_resolves_nothing() {
        let cfg = Config {
            cache_path: None,
            tagger_url: Some("http://127.0.0.1:9/ents".into()),
            http_timeout: Duration::from_millis(200),
            ..Config::default()
        };
        let pipeline = cfg.build_pipeline();
        let entry = crate::feed::FeedEntry {
            title: "札幌市で雪まつり".into(),
            link: "#".into(),
            description: None,
        };
        assert!(pipeline.process_entry(&entry).is_none());
    }
}
