use serde::Deserialize;
use std::path::PathBuf;

use crate::types::Tab;

pub const DEFAULT_BASE_URL: &str = "https://api.klipy.com";
pub const API_KEY_ENV: &str = "KLIPY_API_KEY";

/// Feed shown when there is no search text and no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyQueryFeed {
    Trending,
    Recent,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_locale: Option<String>,
    pub default_per_page: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_locale: None,
            default_per_page: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// Tray behavior, fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    pub tabs: Vec<Tab>,
    pub initial_tab: Tab,
    pub columns: u16,
    pub show_trending: bool,
    pub show_recents: bool,
    pub show_categories: bool,
    pub show_search: bool,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            tabs: Tab::ALL.to_vec(),
            initial_tab: Tab::Gifs,
            columns: 3,
            show_trending: true,
            show_recents: false,
            show_categories: false,
            show_search: true,
        }
    }
}

impl TrayConfig {
    /// Clamp columns to at least two and drop duplicate tabs, keeping order.
    pub fn normalized(mut self) -> Self {
        self.columns = self.columns.max(2);
        let mut seen = Vec::with_capacity(self.tabs.len());
        self.tabs.retain(|tab| {
            if seen.contains(tab) {
                false
            } else {
                seen.push(*tab);
                true
            }
        });
        self
    }

    /// Trending wins over recent; with neither, there is no feed.
    pub fn empty_query_feed(&self) -> EmptyQueryFeed {
        if self.show_trending {
            EmptyQueryFeed::Trending
        } else if self.show_recents {
            EmptyQueryFeed::Recent
        } else {
            EmptyQueryFeed::None
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub tray: TrayConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("klipy-tray").join("config.toml"))
}

impl Config {
    /// Load `~/.config/klipy-tray/config.toml`, falling back to defaults.
    /// `KLIPY_API_KEY` fills in a missing API key.
    pub fn load() -> Self {
        let mut config = config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|content| Self::parse(&content))
            .unwrap_or_default();

        if config.client.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                config.client.api_key = key.trim().to_string();
            }
        }
        config
    }

    fn parse(content: &str) -> Self {
        match toml::from_str::<Config>(content) {
            Ok(mut config) => {
                config.tray = config.tray.normalized();
                config
            }
            Err(e) => {
                tracing::warn!("ignoring invalid config file: {}", e);
                Config::default()
            }
        }
    }
}
