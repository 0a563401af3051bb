//! One refresh cycle: feed → tag → resolve → compose → geocode → rank.

use crate::feed::{FeedEntry, FeedError, FeedSource};
use crate::location::{compose, Geocoder, LocationResolver};
use crate::news::{sort_by_specificity, NewsItem, NO_SUMMARY};
use crate::tagger::EntityTagger;
use std::time::Instant;

pub struct Pipeline {
    feed: Box<dyn FeedSource>,
    tagger: Box<dyn EntityTagger>,
    resolver: LocationResolver,
    geocoder: Box<dyn Geocoder>,
}

impl Pipeline {
    pub fn new(
        feed: Box<dyn FeedSource>,
        tagger: Box<dyn EntityTagger>,
        resolver: LocationResolver,
        geocoder: Box<dyn Geocoder>,
    ) -> Self {
        Self {
            feed,
            tagger,
            resolver,
            geocoder,
        }
    }

    /// Fetch the feed and build a ranked dataset.
    ///
    /// Only a feed failure aborts the cycle. Articles without a place or
    /// whose query cannot be geocoded are left out.
    pub fn run_cycle(&self) -> Result<Vec<NewsItem>, FeedError> {
        let start = Instant::now();
        let entries = self.feed.fetch()?;
        let total = entries.len();

        let mut items: Vec<NewsItem> = entries.iter().filter_map(|e| self.process_entry(e)).collect();
        sort_by_specificity(&mut items);

        tracing::info!(
            entries = total,
            geotagged = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "refresh cycle complete"
        );
        Ok(items)
    }

    /// Resolve one article to a [`NewsItem`], or `None` if it has no usable place.
    pub fn process_entry(&self, entry: &FeedEntry) -> Option<NewsItem> {
        let spans = self.tagger.tag(&entry.tagging_text());
        let places = self.resolver.resolve(&spans);
        let query = compose(&places)?;
        tracing::debug!(title = %entry.title, ?places, query = %query.text, "composed query");

        match self.geocoder.geocode(&query.text) {
            Ok(coords) => {
                tracing::debug!(query = %query.text, %coords, "geocoded");
                Some(NewsItem {
                    title: entry.title.clone(),
                    link: entry.link.clone(),
                    description: entry
                        .description
                        .clone()
                        .unwrap_or_else(|| NO_SUMMARY.to_string()),
                    coords,
                    location_type: query.location_type,
                })
            }
            Err(e) => {
                tracing::warn!(title = %entry.title, query = %query.text, error = %e, "geocoding failed, skipping article");
                None
            }
        }
    }
}
