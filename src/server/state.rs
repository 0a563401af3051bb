use crate::news::{NewsItem, NewsStore};
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<NewsStore>,
    pub fallback: Vec<NewsItem>,
}
