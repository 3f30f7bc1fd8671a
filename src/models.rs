use regex::Regex;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// One title as listed on a search, browse or updates page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCard {
    pub title: String,
    pub source_url: String,
    pub thumbnail_url: Option<String>,
}

impl PartialEq for CatalogCard {
    fn eq(&self, other: &Self) -> bool {
        self.source_url == other.source_url
    }
}
impl Eq for CatalogCard {}

impl Hash for CatalogCard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_url.hash(state);
    }
}

#[derive(Debug, Clone)]
pub struct ChapterEntry {
    pub label: String,
    pub url: String,
    pub parent: Arc<CatalogCard>,
    pub page_urls: Vec<String>,
}

impl ChapterEntry {
    pub fn new(label: String, url: String, parent: Arc<CatalogCard>) -> Self {
        Self {
            label,
            url,
            parent,
            page_urls: Vec::new(),
        }
    }

    /// Chapter number parsed from the label, e.g. `Chapter 12.5`.
    pub fn number(&self) -> Option<f64> {
        static NUMBER_RE: OnceLock<Option<Regex>> = OnceLock::new();
        let re = NUMBER_RE
            .get_or_init(|| Regex::new(r"(?i)chapter\s*([0-9]+(?:\.[0-9]+)?)").ok())
            .as_ref()?;
        re.captures(&self.label)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// A previously observed (title, latest chapter) pair supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastChapter {
    pub url: String,
    /// `None` when the title was recorded before any chapter was seen.
    pub chapter_url: Option<String>,
}

impl LastChapter {
    pub fn new(url: impl Into<String>, chapter_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            chapter_url: Some(chapter_url.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    pub not_updated: Vec<String>,
}

/// Outcome of one best-effort link resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The link was already final; no request was made.
    Direct(String),
    Resolved(String),
    Failed { original: String, error: String },
}

impl Resolution {
    /// The URL to use downstream. A failed resolution keeps the original link.
    pub fn into_url(self) -> String {
        match self {
            Resolution::Direct(url) | Resolution::Resolved(url) => url,
            Resolution::Failed { original, .. } => original,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed { .. })
    }
}
