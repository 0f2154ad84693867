use tracing::{debug, warn};

use super::state::{PageRequest, TrayState};
use super::Effect;
use crate::action::{Action, Scope};
use crate::resolver::{resolve, FeedRequest};
use crate::types::{Category, Page, Tab};

/// Apply `action` to `state` and return the async work it calls for.
///
/// All tray state transitions live here; the controller only executes the
/// returned effects and feeds completions back in.
pub fn update(state: &mut TrayState, action: Action) -> Vec<Effect> {
    let mut effects = Vec::new();

    match action {
        Action::Bootstrap => bootstrap(state, &mut effects),
        Action::SelectTab(tab) => select_tab(state, tab, &mut effects),
        Action::SelectCategory(category) => select_category(state, category, &mut effects),
        Action::ChangeSearchText(raw) => {
            state.search_text = raw.replace(['\n', '\r'], "").trim().to_string();
        }
        Action::SubmitSearch => submit_search(state, &mut effects),
        Action::ClearSearch => clear_search(state, &mut effects),
        Action::LoadNextPage => load_next_page(state, &mut effects),
        Action::DismissError => state.error_message = None,
        Action::Retry => retry(state, &mut effects),

        Action::PageLoaded {
            generation,
            page,
            reset,
        } => {
            if generation != state.generations.fetch {
                debug!(generation, current = state.generations.fetch, "discarding stale page");
                return effects;
            }
            state.pending_request = None;
            state.failed_request = None;
            merge_page(state, page, reset);
        }
        Action::PageFailed {
            generation,
            message,
        } => {
            if generation != state.generations.fetch {
                debug!(generation, "discarding stale page failure");
                return effects;
            }
            warn!("page fetch failed: {}", message);
            state.failed_request = state.pending_request.take();
            state.is_loading = false;
            state.is_loading_more = false;
            state.error_message = Some(message);
        }
        Action::CategoriesLoaded {
            generation,
            categories,
        } => {
            if generation != state.generations.categories {
                debug!(generation, "discarding stale categories");
                return effects;
            }
            // Chip highlight only; the page fetch for this tab is already out.
            if state.config.show_trending && state.selected_category.is_none() {
                state.selected_category = categories
                    .iter()
                    .find(|c| c.display_name.trim().eq_ignore_ascii_case("trending"))
                    .cloned();
            }
            state.categories = categories;
            state.categories_failed = false;
        }
        Action::CategoriesFailed {
            generation,
            message,
        } => {
            if generation != state.generations.categories {
                debug!(generation, "discarding stale category failure");
                return effects;
            }
            warn!("category load failed: {}", message);
            state.categories.clear();
            state.categories_failed = true;
            state.error_message = Some(message);
        }
    }

    effects
}

fn bootstrap(state: &mut TrayState, effects: &mut Vec<Effect>) {
    let config = state.config.clone();
    let generations = state.generations;
    *state = TrayState::new(config);
    // Keep counting so completions from a previous session stay stale.
    state.generations = generations;
    cancel(state, Scope::Fetch, effects);
    cancel(state, Scope::Categories, effects);

    let initial = if state.tabs.contains(&state.config.initial_tab) {
        Some(state.config.initial_tab)
    } else {
        state.tabs.first().copied()
    };

    match initial {
        Some(tab) => select_tab(state, tab, effects),
        None => debug!("no tabs enabled, nothing to load"),
    }
}

fn select_tab(state: &mut TrayState, tab: Tab, effects: &mut Vec<Effect>) {
    if !state.tabs.contains(&tab) {
        warn!(?tab, "ignoring selection of a disabled tab");
        return;
    }

    state.selected_tab = Some(tab);
    state.selected_category = None;
    state.categories.clear();
    state.categories_failed = false;
    state.reset_paging();
    state.is_loading = true;

    if state.config.show_categories {
        begin_categories(state, tab, effects);
    }

    let query = state.search_text.trim().to_string();
    state.last_committed_query = (!query.is_empty()).then_some(query);

    let feed = resolve(tab, &state.search_text, None, &state.config);
    begin_reset_fetch(state, feed, effects);
}

fn select_category(state: &mut TrayState, category: Option<Category>, effects: &mut Vec<Effect>) {
    let Some(tab) = state.selected_tab else {
        return;
    };

    state.search_text.clear();
    state.last_committed_query = category
        .as_ref()
        .map(|c| c.query.trim().to_string())
        .filter(|q| !q.is_empty());
    state.selected_category = category;
    state.reset_paging();
    state.is_loading = true;

    let feed = resolve(tab, "", state.selected_category.as_ref(), &state.config);
    begin_reset_fetch(state, feed, effects);
}

fn submit_search(state: &mut TrayState, effects: &mut Vec<Effect>) {
    if !state.config.show_search {
        return;
    }
    let Some(tab) = state.selected_tab else {
        return;
    };

    let query = state.search_text.trim().to_string();
    state.search_text = query.clone();
    state.selected_category = None;
    state.reset_paging();
    state.is_loading = true;

    let feed = resolve(tab, &query, None, &state.config);
    state.last_committed_query = (!query.is_empty()).then_some(query);
    begin_reset_fetch(state, feed, effects);
}

fn clear_search(state: &mut TrayState, effects: &mut Vec<Effect>) {
    state.search_text.clear();
    state.last_committed_query = None;

    let Some(tab) = state.selected_tab else {
        return;
    };

    state.reset_paging();
    state.is_loading = true;

    let feed = resolve(tab, "", state.selected_category.as_ref(), &state.config);
    begin_reset_fetch(state, feed, effects);
}

fn load_next_page(state: &mut TrayState, effects: &mut Vec<Effect>) {
    if !state.can_load_more() {
        return;
    }
    let Some(feed) = state.active_feed.clone() else {
        return;
    };

    state.is_loading_more = true;
    let request = PageRequest {
        feed,
        page: state.current_page + 1,
        reset: false,
    };
    begin_fetch(state, request, false, effects);
}

/// Reissue whatever failed: the last failed page request and, if the chips
/// for the selected tab failed to load, the category request.
fn retry(state: &mut TrayState, effects: &mut Vec<Effect>) {
    let retry_categories = state.categories_failed && state.config.show_categories;
    let retry_page = !state.is_loading && !state.is_loading_more;

    if retry_categories {
        if let Some(tab) = state.selected_tab {
            state.categories_failed = false;
            state.error_message = None;
            begin_categories(state, tab, effects);
        }
    }

    if !retry_page {
        return;
    }
    let Some(request) = state.failed_request.take() else {
        return;
    };

    state.error_message = None;
    if request.reset {
        state.is_loading = true;
        begin_fetch(state, request, true, effects);
    } else {
        state.is_loading_more = true;
        begin_fetch(state, request, false, effects);
    }
}

fn begin_categories(state: &mut TrayState, tab: Tab, effects: &mut Vec<Effect>) {
    state.generations.categories = state.generations.categories.wrapping_add(1);
    effects.push(Effect::FetchCategories {
        generation: state.generations.categories,
        kind: tab.kind(),
    });
}

fn begin_reset_fetch(state: &mut TrayState, feed: FeedRequest, effects: &mut Vec<Effect>) {
    state.active_feed = Some(feed.clone());
    let request = PageRequest {
        feed,
        page: 1,
        reset: true,
    };
    begin_fetch(state, request, true, effects);
}

fn begin_fetch(
    state: &mut TrayState,
    request: PageRequest,
    cancel_in_flight: bool,
    effects: &mut Vec<Effect>,
) {
    if cancel_in_flight {
        state.generations.fetch = state.generations.fetch.wrapping_add(1);
    }
    state.failed_request = None;
    state.pending_request = Some(request.clone());
    effects.push(Effect::FetchPage {
        generation: state.generations.fetch,
        request,
        cancel_in_flight,
    });
}

fn cancel(state: &mut TrayState, scope: Scope, effects: &mut Vec<Effect>) {
    match scope {
        Scope::Fetch => state.generations.fetch = state.generations.fetch.wrapping_add(1),
        Scope::Categories => {
            state.generations.categories = state.generations.categories.wrapping_add(1)
        }
    }
    effects.push(Effect::Cancel(scope));
}

fn merge_page(state: &mut TrayState, page: Page, reset: bool) {
    if reset {
        state.items = page.items;
        state.is_loading = false;
    } else {
        state.items.extend(page.items);
    }
    state.current_page = page.current_page;
    state.has_next = page.has_next;
    state.is_loading_more = false;
}
