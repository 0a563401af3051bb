//! News feed source: RSS 2.0 over HTTP.

use std::io::BufRead;
use std::time::Duration;

/// Default feed: Yahoo! News Japan, domestic category.
pub const DEFAULT_FEED_URL: &str = "https://news.yahoo.co.jp/rss/categories/domestic.xml";

/// One article from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
}

impl FeedEntry {
    /// Text handed to the entity tagger.
    pub fn tagging_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),
    #[error("feed returned HTTP {0}")]
    Status(u16),
    #[error("could not parse feed: {0}")]
    Parse(String),
}

pub trait FeedSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<FeedEntry>, FeedError>;
}

/// Parse an RSS channel. Items without a title or link are skipped.
pub fn parse_channel<R: BufRead>(reader: R) -> Result<Vec<FeedEntry>, FeedError> {
    let channel = rss::Channel::read_from(reader).map_err(|e| FeedError::Parse(e.to_string()))?;

    let entries = channel
        .items()
        .iter()
        .filter_map(|item| {
            Some(FeedEntry {
                title: item.title()?.to_string(),
                link: item.link()?.to_string(),
                description: item.description().map(str::to_string),
            })
        })
        .collect();

    Ok(entries)
}

pub struct RssFeed {
    agent: ureq::Agent,
    url: String,
}

impl RssFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.into(),
        }
    }
}

impl FeedSource for RssFeed {
    fn fetch(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let response = match self.agent.get(&self.url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => return Err(FeedError::Status(code)),
            Err(e) => return Err(FeedError::Network(e.to_string())),
        };

        parse_channel(std::io::BufReader::new(response.into_reader()))
    }
}
