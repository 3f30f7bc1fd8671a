use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Site-level settings for the connector. Everything here is read-only
/// once the connector is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    pub name: String,
    pub base_url: String,
    pub search_url: String,
    pub updates_url: String,
    pub user_agent: String,
    pub headers: Option<HashMap<String, String>>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_redirects: usize,
    pub page_size: usize,
    /// Shortener hosts whose links must be followed to reach the real resource.
    pub indirection_domains: Vec<String>,
    /// Image CDN hosts whose sources are final, like the origin's own.
    pub image_hosts: Vec<String>,
    /// Extensions that mark an origin image URL as already final.
    pub image_extensions: Vec<String>,
    pub selectors: SelectorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorsConfig {
    pub card: String,
    pub card_link: String,
    pub card_image: String,
    pub chapter_list: String,
    pub chapter_item: String,
    pub chapter_link: String,
    pub reader: String,
    pub reader_image: String,
}

impl ConnectorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ConnectorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Same configuration pointed at another origin. Search and updates
    /// URLs follow the new base.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base = base_url.trim_end_matches('/');
        self.search_url = format!("{}/?s=", base);
        self.updates_url = base.to_string();
        self.base_url = base_url;
        self
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            name: "MangaHindiSub".to_string(),
            base_url: "https://mangahindisub.in".to_string(),
            search_url: "https://mangahindisub.in/?s=".to_string(),
            updates_url: "https://mangahindisub.in".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:97.0) Gecko/20100101 Firefox/97.0".to_string(),
            headers: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            page_size: 20,
            indirection_domains: vec!["modijiurl.com".to_string(), "seturl.in".to_string()],
            image_hosts: ["i0.wp.com", "i1.wp.com", "i2.wp.com"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            image_extensions: ["jpg", "jpeg", "png", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            selectors: SelectorsConfig::default(),
        }
    }
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            card: "div.bsx".to_string(),
            card_link: "a".to_string(),
            card_image: "img".to_string(),
            chapter_list: "ul.cl".to_string(),
            chapter_item: "li".to_string(),
            chapter_link: "a".to_string(),
            reader: "div.reader-area".to_string(),
            reader_image: "img".to_string(),
        }
    }
}
