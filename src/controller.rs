use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::action::{Action, Scope};
use crate::config::TrayConfig;
use crate::error::{ApiError, Result};
use crate::media_api::MediaApi;
use crate::resolver::FeedRequest;
use crate::tray::{update, Effect, PageRequest, TrayState};
use crate::types::{Category, MediaItem, MediaKind, Page, Tab};

/// Page size used for the synthesized empty page when no size is configured.
const DEFAULT_PER_PAGE: u32 = 24;

pub type SelectHandler = Box<dyn Fn(&MediaItem) + Send + Sync>;

/// Request parameters shared by every fetch a controller issues.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    pub customer_id: String,
    pub locale: Option<String>,
    pub per_page: Option<u32>,
}

/// Owns one tray's state and runs the effects the reducer asks for.
///
/// Fetches run as tasks in a `JoinSet`; their completions come back through
/// [`TrayController::next`] and are applied in order.
pub struct TrayController {
    api: Arc<dyn MediaApi>,
    context: Arc<FetchContext>,
    state: TrayState,
    snapshot: watch::Sender<TrayState>,
    tasks: JoinSet<Option<Action>>,
    fetch_scope: CancellationToken,
    category_scope: CancellationToken,
    on_select: Option<SelectHandler>,
}

impl TrayController {
    pub fn new(api: Arc<dyn MediaApi>, config: TrayConfig, context: FetchContext) -> Self {
        let state = TrayState::new(config);
        let (snapshot, _) = watch::channel(state.clone());
        Self {
            api,
            context: Arc::new(context),
            state,
            snapshot,
            tasks: JoinSet::new(),
            fetch_scope: CancellationToken::new(),
            category_scope: CancellationToken::new(),
            on_select: None,
        }
    }

    pub fn with_on_select(mut self, handler: impl Fn(&MediaItem) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Box::new(handler));
        self
    }

    pub fn state(&self) -> &TrayState {
        &self.state
    }

    /// Read-only view that follows every state change.
    pub fn subscribe(&self) -> watch::Receiver<TrayState> {
        self.snapshot.subscribe()
    }

    pub fn dispatch(&mut self, action: Action) {
        let effects = update(&mut self.state, action);
        self.snapshot.send_replace(self.state.clone());
        for effect in effects {
            self.run(effect);
        }
    }

    pub fn bootstrap(&mut self) {
        self.dispatch(Action::Bootstrap);
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.dispatch(Action::SelectTab(tab));
    }

    pub fn select_category(&mut self, category: Option<Category>) {
        self.dispatch(Action::SelectCategory(category));
    }

    pub fn change_search_text(&mut self, text: impl Into<String>) {
        self.dispatch(Action::ChangeSearchText(text.into()));
    }

    pub fn submit_search(&mut self) {
        self.dispatch(Action::SubmitSearch);
    }

    pub fn clear_search(&mut self) {
        self.dispatch(Action::ClearSearch);
    }

    pub fn load_next_page(&mut self) {
        self.dispatch(Action::LoadNextPage);
    }

    pub fn dismiss_error(&mut self) {
        self.dispatch(Action::DismissError);
    }

    pub fn retry(&mut self) {
        self.dispatch(Action::Retry);
    }

    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Wait for the next completion and apply it. Returns `false` once no
    /// task is left. Cancel safe.
    pub async fn next(&mut self) -> bool {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Some(action)) => {
                    self.dispatch(action);
                    return true;
                }
                Ok(None) => {}
                Err(e) => warn!("fetch task ended abnormally: {}", e),
            }
        }
        false
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    /// Hand a picked item to the host. Does not touch tray state.
    pub fn select_item(&self, item: &MediaItem) {
        match &self.on_select {
            Some(handler) => handler(item),
            None => debug!(id = %item.id, "item picked with no handler registered"),
        }
    }

    /// Report a share of `item` under the last committed query.
    pub fn share_item(&self, item: &MediaItem) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let query = self.state.last_committed_query.clone().unwrap_or_default();
        let (kind, slug) = (item.kind, item.slug.clone());
        tokio::spawn(async move {
            if let Err(e) = api
                .trigger_share(kind, &slug, &context.customer_id, &query)
                .await
            {
                warn!("share hook failed for {}: {}", slug, e);
            }
        })
    }

    pub fn report_item(&self, item: &MediaItem, reason: impl Into<String>) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let reason = reason.into();
        let (kind, slug) = (item.kind, item.slug.clone());
        tokio::spawn(async move {
            let customer_id = Some(context.customer_id.as_str()).filter(|id| !id.is_empty());
            if let Err(e) = api.report(kind, &slug, customer_id, &reason).await {
                warn!("report hook failed for {}: {}", slug, e);
            }
        })
    }

    pub fn hide_from_recent(&self, item: &MediaItem) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let (kind, slug) = (item.kind, item.slug.clone());
        tokio::spawn(async move {
            if let Err(e) = api
                .hide_from_recent(kind, &context.customer_id, &slug)
                .await
            {
                warn!("hide hook failed for {}: {}", slug, e);
            }
        })
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchPage {
                generation,
                request,
                cancel_in_flight,
            } => {
                if cancel_in_flight {
                    self.restart(Scope::Fetch);
                }
                self.spawn_page(generation, request);
            }
            Effect::FetchCategories { generation, kind } => {
                self.restart(Scope::Categories);
                self.spawn_categories(generation, kind);
            }
            Effect::Cancel(scope) => self.restart(scope),
        }
    }

    /// Cancel everything in `scope` and open a fresh token for new work.
    fn restart(&mut self, scope: Scope) {
        let token = match scope {
            Scope::Fetch => &mut self.fetch_scope,
            Scope::Categories => &mut self.category_scope,
        };
        std::mem::replace(token, CancellationToken::new()).cancel();
    }

    fn spawn_page(&mut self, generation: u64, request: PageRequest) {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let token = self.fetch_scope.clone();
        debug!(generation, feed = ?request.feed, page = request.page, "fetching page");

        self.tasks.spawn(async move {
            let reset = request.reset;
            let result = tokio::select! {
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = fetch_page(api.as_ref(), &context, &request) => result,
            };
            match result {
                Ok(page) => Some(Action::PageLoaded {
                    generation,
                    page,
                    reset,
                }),
                Err(e) if e.is_cancelled() => {
                    debug!(generation, "page fetch cancelled");
                    None
                }
                Err(e) => Some(Action::PageFailed {
                    generation,
                    message: e.to_string(),
                }),
            }
        });
    }

    fn spawn_categories(&mut self, generation: u64, kind: MediaKind) {
        let api = Arc::clone(&self.api);
        let context = Arc::clone(&self.context);
        let token = self.category_scope.clone();
        debug!(generation, ?kind, "fetching categories");

        self.tasks.spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = api.categories(kind, context.locale.as_deref()) => result,
            };
            match result {
                Ok(categories) => Some(Action::CategoriesLoaded {
                    generation,
                    categories,
                }),
                Err(e) if e.is_cancelled() => None,
                Err(e) => Some(Action::CategoriesFailed {
                    generation,
                    message: e.to_string(),
                }),
            }
        });
    }
}

impl Drop for TrayController {
    fn drop(&mut self) {
        self.fetch_scope.cancel();
        self.category_scope.cancel();
    }
}

async fn fetch_page(api: &dyn MediaApi, context: &FetchContext, request: &PageRequest) -> Result<Page> {
    let page = Some(request.page);
    let per_page = context.per_page;
    let locale = context.locale.as_deref();
    let customer_id = Some(context.customer_id.as_str());

    match &request.feed {
        FeedRequest::Trending(kind) => {
            api.trending(*kind, customer_id, page, per_page, locale)
                .await
        }
        FeedRequest::Recent(kind) => {
            api.recent(*kind, &context.customer_id, page, per_page, locale)
                .await
        }
        FeedRequest::Search { kind, query } => {
            api.search(*kind, query, customer_id, page, per_page, locale)
                .await
        }
        FeedRequest::NoFeed => Ok(Page::empty(per_page.unwrap_or(DEFAULT_PER_PAGE))),
    }
}
