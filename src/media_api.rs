use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::types::{Category, ItemsSelector, MediaItem, MediaKind, Page};

/// Remote content source behind the tray.
///
/// Implementations hold no per-request mutable state, so one instance can be
/// shared (`Arc<dyn MediaApi>`) by any number of controllers.
#[async_trait]
pub trait MediaApi: Send + Sync + std::fmt::Debug {
    // Feeds used by the tray
    async fn trending(
        &self,
        kind: MediaKind,
        customer_id: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<Page>;
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        customer_id: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<Page>;
    async fn recent(
        &self,
        kind: MediaKind,
        customer_id: &str,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<Page>;
    async fn categories(&self, kind: MediaKind, locale: Option<&str>) -> Result<Vec<Category>>;

    // Optional hooks (default impls for sources without them)
    async fn items(&self, _kind: MediaKind, _selector: &ItemsSelector) -> Result<Vec<MediaItem>> {
        Err(ApiError::InvalidRequest(
            "Item lookup not supported by this source".into(),
        ))
    }
    async fn trigger_share(
        &self,
        _kind: MediaKind,
        _slug: &str,
        _customer_id: &str,
        _query: &str,
    ) -> Result<()> {
        Ok(())
    }
    async fn report(
        &self,
        _kind: MediaKind,
        _slug: &str,
        _customer_id: Option<&str>,
        _reason: &str,
    ) -> Result<()> {
        Ok(())
    }
    async fn hide_from_recent(&self, _kind: MediaKind, _customer_id: &str, _slug: &str) -> Result<()> {
        Ok(())
    }
    async fn search_suggestions(&self, _query: &str, _limit: u32) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
