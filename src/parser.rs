use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::models::{CatalogCard, ChapterEntry};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Turns raw site HTML into candidate records. Missing markup yields empty
/// results; nothing here fails on malformed documents.
pub struct PageParser {
    base: Url,
    card: Selector,
    card_link: Selector,
    card_image: Selector,
    chapter_list: Selector,
    chapter_item: Selector,
    chapter_link: Selector,
    reader: Selector,
    reader_image: Selector,
}

fn selector(kind: &str, css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ConnectorError::scraping(format!("Invalid {} selector '{}': {}", kind, css, e)))
}

impl PageParser {
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let s = &config.selectors;
        Ok(Self {
            base: Url::parse(&config.base_url)?,
            card: selector("card", &s.card)?,
            card_link: selector("card link", &s.card_link)?,
            card_image: selector("card image", &s.card_image)?,
            chapter_list: selector("chapter list", &s.chapter_list)?,
            chapter_item: selector("chapter item", &s.chapter_item)?,
            chapter_link: selector("chapter link", &s.chapter_link)?,
            reader: selector("reader", &s.reader)?,
            reader_image: selector("reader image", &s.reader_image)?,
        })
    }

    pub fn extract_cards(&self, html: &str) -> Vec<CatalogCard> {
        let document = Html::parse_document(html);
        let mut out = Vec::new();

        for item in document.select(&self.card) {
            let Some(link) = item.select(&self.card_link).next() else {
                continue;
            };
            let Some(source_url) = link.value().attr("href").and_then(|h| self.absolutize(h)) else {
                continue;
            };

            let title = link
                .value()
                .attr("title")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| collapsed_text(&link));

            let thumbnail_url = item
                .select(&self.card_image)
                .filter_map(|img| img.value().attr("src"))
                .find_map(|src| self.absolutize(src));

            out.push(CatalogCard {
                title,
                source_url,
                thumbnail_url,
            });
        }

        debug!("[MANGAHINDISUB PARSER] cards parsed: {}", out.len());
        out
    }

    /// Cards with duplicates removed; the first occurrence of a URL wins.
    pub fn extract_distinct_cards(&self, html: &str) -> Vec<CatalogCard> {
        let mut seen = HashSet::new();
        self.extract_cards(html)
            .into_iter()
            .filter(|card| seen.insert(card.source_url.clone()))
            .collect()
    }

    pub fn extract_chapters(&self, html: &str, parent: &Arc<CatalogCard>) -> Vec<ChapterEntry> {
        let document = Html::parse_document(html);
        let Some(list) = document.select(&self.chapter_list).next() else {
            debug!("[MANGAHINDISUB PARSER] no chapter list on {}", parent.source_url);
            return Vec::new();
        };

        let chapters: Vec<ChapterEntry> = list
            .select(&self.chapter_item)
            .filter_map(|item| {
                let link = item.select(&self.chapter_link).next()?;
                let url = self.absolutize(link.value().attr("href")?)?;
                Some(ChapterEntry::new(collapsed_text(&link), url, Arc::clone(parent)))
            })
            .collect();

        debug!(
            "[MANGAHINDISUB PARSER] chapters parsed for {}: {}",
            parent.source_url,
            chapters.len()
        );
        chapters
    }

    /// Every image source inside the reader containers, unclassified.
    pub fn extract_page_images(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut out = Vec::new();

        for container in document.select(&self.reader) {
            for img in container.select(&self.reader_image) {
                let src = img
                    .value()
                    .attr("src")
                    .filter(|s| !s.trim().is_empty())
                    .or_else(|| img.value().attr("data-src"));
                if let Some(url) = src.and_then(|s| self.absolutize(s)) {
                    out.push(url);
                }
            }
        }

        debug!("[MANGAHINDISUB PARSER] image sources found: {}", out.len());
        out
    }

    fn absolutize(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match Url::parse(raw) {
            Ok(_) => Some(raw.to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.base.join(raw).ok().map(String::from)
            }
            Err(_) => None,
        }
    }
}

fn collapsed_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}
