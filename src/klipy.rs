use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::media_api::MediaApi;
use crate::types::{
    Category, CategoryPayload, Envelope, ItemsSelector, MediaItem, MediaKind, MediaListPayload,
    Page,
};

/// Ad placement constraints for the ad-aware recent feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdParameters {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub language: Option<String>,
    pub user_agent: Option<String>,
}

impl AdParameters {
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ad-min-width", self.min_width.to_string()),
            ("ad-max-width", self.max_width.to_string()),
            ("ad-min-height", self.min_height.to_string()),
            ("ad-max-height", self.max_height.to_string()),
        ];
        if let Some(language) = &self.language {
            params.push(("ad-language", language.clone()));
        }
        if let Some(user_agent) = &self.user_agent {
            params.push(("ad-user-agent", user_agent.clone()));
        }
        params
    }
}

/// Klipy REST client. Every path is `/api/v1/{api_key}/...`.
pub struct Klipy {
    client: Client,
    config: ClientConfig,
}

impl std::fmt::Debug for Klipy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Klipy")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

type Params = Vec<(&'static str, String)>;

impl Klipy {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::InvalidRequest("API key is empty".into()));
        }
        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn api_url(&self, segments: &[&str]) -> String {
        let mut url = format!(
            "{}/api/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key)
        );
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn page_params(&self, page: Option<u32>, per_page: Option<u32>, locale: Option<&str>) -> Params {
        let mut params = Params::new();
        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = per_page.or(self.config.default_per_page) {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(locale) = locale.or(self.config.default_locale.as_deref()) {
            params.push(("locale", locale.to_string()));
        }
        params
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!("klipy transport error: {}", e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], params: &Params) -> Result<T> {
        let url = self.api_url(segments);
        tracing::debug!(path = %segments.join("/"), "GET");
        let bytes = self.execute(self.client.get(&url).query(params)).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }

    async fn send_json<B: Serialize>(&self, method: Method, segments: &[&str], body: Option<&B>) -> Result<()> {
        let url = self.api_url(segments);
        tracing::debug!(path = %segments.join("/"), %method, "send");
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await.map(|_| ())
    }

    /// Recent feed with ad placement parameters attached.
    pub async fn recent_with_ads(
        &self,
        kind: MediaKind,
        customer_id: &str,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
        ads: &AdParameters,
    ) -> Result<Page> {
        let mut params = self.page_params(page, per_page, locale);
        params.extend(ads.query_params());
        self.get_json(&[kind.path_segment(), "recent", customer_id], &params)
            .await
    }

    /// Single item by slug or id.
    pub async fn item(&self, kind: MediaKind, slug_or_id: &str) -> Result<MediaItem> {
        self.get_json(&[kind.path_segment(), slug_or_id], &Params::new())
            .await
    }

    /// Autocomplete for partially typed queries. Malformed bodies mean "no suggestions".
    pub async fn autocomplete(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        soften_decode(
            self.get_json(
                &["search-autocomplete", query],
                &vec![("limit", limit.to_string())],
            )
            .await,
        )
    }
}

/// `customer_id` query parameter, omitted when blank.
fn customer_param(customer_id: Option<&str>) -> Option<(&'static str, String)> {
    customer_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| ("customer_id", id.to_string()))
}

/// Treat decode failures as an empty result.
fn soften_decode(result: Result<Vec<String>>) -> Result<Vec<String>> {
    match result {
        Err(ApiError::Decode(msg)) => {
            tracing::debug!("suggestion payload not decodable, treating as empty: {}", msg);
            Ok(vec![])
        }
        other => other,
    }
}

#[derive(Serialize)]
struct SharePayload<'a> {
    customer_id: &'a str,
    q: &'a str,
}

#[derive(Serialize)]
struct ReportPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<&'a str>,
    reason: &'a str,
}

#[async_trait]
impl MediaApi for Klipy {
    async fn trending(
        &self,
        kind: MediaKind,
        customer_id: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<Page> {
        let mut params = self.page_params(page, per_page, locale);
        params.extend(customer_param(customer_id));
        self.get_json(&[kind.path_segment(), "trending"], &params)
            .await
    }

    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        customer_id: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<Page> {
        let mut params = vec![("q", query.to_string())];
        params.extend(self.page_params(page, per_page, locale));
        params.extend(customer_param(customer_id));
        self.get_json(&[kind.path_segment(), "search"], &params)
            .await
    }

    async fn recent(
        &self,
        kind: MediaKind,
        customer_id: &str,
        page: Option<u32>,
        per_page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<Page> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "Recent feed needs a customer id".into(),
            ));
        }
        let params = self.page_params(page, per_page, locale);
        self.get_json(&[kind.path_segment(), "recent", customer_id], &params)
            .await
    }

    async fn categories(&self, kind: MediaKind, locale: Option<&str>) -> Result<Vec<Category>> {
        let params = self.page_params(None, None, locale);
        let payload: CategoryPayload = self
            .get_json(&[kind.path_segment(), "categories"], &params)
            .await?;
        Ok(payload.categories)
    }

    async fn items(&self, kind: MediaKind, selector: &ItemsSelector) -> Result<Vec<MediaItem>> {
        let (name, values) = match selector {
            ItemsSelector::Ids(ids) => ("ids", ids),
            ItemsSelector::Slugs(slugs) => ("slugs", slugs),
        };
        let joined = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if joined.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Provide at least one id or slug".into(),
            ));
        }

        let payload: MediaListPayload = self
            .get_json(&[kind.path_segment(), "items"], &vec![(name, joined)])
            .await?;
        Ok(payload.data)
    }

    async fn trigger_share(
        &self,
        kind: MediaKind,
        slug: &str,
        customer_id: &str,
        query: &str,
    ) -> Result<()> {
        let body = SharePayload {
            customer_id,
            q: query,
        };
        self.send_json(Method::POST, &[kind.path_segment(), "share", slug], Some(&body))
            .await
    }

    async fn report(
        &self,
        kind: MediaKind,
        slug: &str,
        customer_id: Option<&str>,
        reason: &str,
    ) -> Result<()> {
        let body = ReportPayload {
            customer_id,
            reason,
        };
        self.send_json(Method::POST, &[kind.path_segment(), "report", slug], Some(&body))
            .await
    }

    async fn hide_from_recent(&self, kind: MediaKind, customer_id: &str, slug: &str) -> Result<()> {
        self.send_json::<()>(
            Method::DELETE,
            &[kind.path_segment(), "recent", customer_id, slug],
            None,
        )
        .await
    }

    async fn search_suggestions(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        soften_decode(
            self.get_json(
                &["search-suggestions", query],
                &vec![("limit", limit.to_string())],
            )
            .await,
        )
    }
}
