use crate::config::TrayConfig;
use crate::resolver::FeedRequest;
use crate::types::{Category, MediaItem, Tab};

/// One page request against a resolved feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub feed: FeedRequest,
    pub page: u32,
    /// Replace the item list on success instead of appending.
    pub reset: bool,
}

/// Per-scope generation counters. A completion is applied only if it
/// carries the scope's current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Generations {
    pub(crate) fetch: u64,
    pub(crate) categories: u64,
}

/// Observable tray state. Only the reducer writes to it.
#[derive(Debug, Clone)]
pub struct TrayState {
    pub config: TrayConfig,

    pub tabs: Vec<Tab>,
    pub selected_tab: Option<Tab>,

    pub categories: Vec<Category>,
    pub selected_category: Option<Category>,

    pub items: Vec<MediaItem>,

    pub search_text: String,
    pub last_committed_query: Option<String>,

    // Paging: last merged page; 0 before any page arrived
    pub current_page: u32,
    pub has_next: bool,

    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error_message: Option<String>,

    pub(crate) generations: Generations,
    /// Feed behind the current item list; load-more pages through it.
    pub(crate) active_feed: Option<FeedRequest>,
    /// Page request whose completion is still outstanding.
    pub(crate) pending_request: Option<PageRequest>,
    /// Page request that failed and has not been superseded; retry replays it.
    pub(crate) failed_request: Option<PageRequest>,
    /// The category load for the selected tab failed; retry reissues it.
    pub(crate) categories_failed: bool,
}

impl TrayState {
    pub fn new(config: TrayConfig) -> Self {
        let config = config.normalized();
        Self {
            tabs: config.tabs.clone(),
            config,
            selected_tab: None,
            categories: Vec::new(),
            selected_category: None,
            items: Vec::new(),
            search_text: String::new(),
            last_committed_query: None,
            current_page: 0,
            has_next: false,
            is_loading: false,
            is_loading_more: false,
            error_message: None,
            generations: Generations::default(),
            active_feed: None,
            pending_request: None,
            failed_request: None,
            categories_failed: false,
        }
    }

    /// Feed backing the visible items, if any request has been made.
    pub fn active_feed(&self) -> Option<&FeedRequest> {
        self.active_feed.as_ref()
    }

    pub fn can_load_more(&self) -> bool {
        self.selected_tab.is_some() && self.has_next && !self.is_loading && !self.is_loading_more
    }

    pub(crate) fn reset_paging(&mut self) {
        self.items.clear();
        self.current_page = 0;
        self.has_next = false;
        self.is_loading_more = false;
        self.error_message = None;
    }
}
