use crate::types::{Category, Page, Tab};

/// Cancellation domain. Starting a primary request in a scope supersedes
/// whatever is in flight there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Fetch,
    Categories,
}

/// Everything that can change tray state: user intents from the rendering
/// layer and completions posted back by fetch tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Intents
    Bootstrap,
    SelectTab(Tab),
    SelectCategory(Option<Category>),
    ChangeSearchText(String),
    SubmitSearch,
    ClearSearch,
    LoadNextPage,
    DismissError,
    Retry,

    // Completions, tagged with the scope generation they were issued under
    PageLoaded {
        generation: u64,
        page: Page,
        reset: bool,
    },
    PageFailed {
        generation: u64,
        message: String,
    },
    CategoriesLoaded {
        generation: u64,
        categories: Vec<Category>,
    },
    CategoriesFailed {
        generation: u64,
        message: String,
    },
}
