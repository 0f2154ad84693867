//! Decides which feed backs a page request.

use crate::config::{EmptyQueryFeed, TrayConfig};
use crate::types::{Category, MediaKind, Tab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    Trending(MediaKind),
    Recent(MediaKind),
    Search { kind: MediaKind, query: String },
    NoFeed,
}

/// Resolve the feed for `tab`.
///
/// A non-empty category query masks the search text. Filters literally
/// named "trending" or "recent" (any case) route to those feeds.
pub fn resolve(
    tab: Tab,
    search_text: &str,
    category: Option<&Category>,
    config: &TrayConfig,
) -> FeedRequest {
    let kind = tab.kind();
    let category_filter = category.map(|c| c.query.trim()).unwrap_or("");
    let filter = if category_filter.is_empty() {
        search_text.trim()
    } else {
        category_filter
    };

    if filter.is_empty() {
        return match config.empty_query_feed() {
            EmptyQueryFeed::Trending => FeedRequest::Trending(kind),
            EmptyQueryFeed::Recent => FeedRequest::Recent(kind),
            EmptyQueryFeed::None => FeedRequest::NoFeed,
        };
    }

    if filter.eq_ignore_ascii_case("trending") {
        FeedRequest::Trending(kind)
    } else if filter.eq_ignore_ascii_case("recent") {
        FeedRequest::Recent(kind)
    } else {
        FeedRequest::Search {
            kind,
            query: filter.to_string(),
        }
    }
}
