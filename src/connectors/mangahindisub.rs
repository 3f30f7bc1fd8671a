use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::models::{CatalogCard, ChapterEntry, LastChapter, UpdateReport};
use crate::parser::PageParser;
use crate::resolver::LinkResolver;
use crate::traits::{Fetch, MangaClient};
use crate::updates::{diff_snapshots, FreshSnapshot};
use crate::utils::{encode_query, paginate, HttpClient};
use async_stream::stream;
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MangaHindiSubClient<F = HttpClient> {
    config: ConnectorConfig,
    fetcher: F,
    parser: PageParser,
    resolver: LinkResolver<F>,
}

impl MangaHindiSubClient<HttpClient> {
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let http_client = HttpClient::new(&config)?;
        Self::with_fetcher(config, http_client)
    }
}

impl<F: Fetch + Clone> MangaHindiSubClient<F> {
    pub fn with_fetcher(config: ConnectorConfig, fetcher: F) -> Result<Self> {
        let parser = PageParser::new(&config)?;
        let resolver = LinkResolver::new(fetcher.clone(), &config)?;
        Ok(Self {
            config,
            fetcher,
            parser,
            resolver,
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn search_url(&self, query: &str, page: usize) -> String {
        format!("{}{}&page={}", self.config.search_url, encode_query(query), page)
    }

    /// Every chapter on the card's page, shortened links resolved one by one.
    async fn all_chapters(&self, card: Arc<CatalogCard>) -> Result<Vec<ChapterEntry>> {
        let html = self.fetcher.get_url(&card.source_url).await?;
        let mut chapters = self.parser.extract_chapters(&html, &card);

        let mut failed = 0usize;
        for chapter in chapters.iter_mut() {
            let resolution = self.resolver.resolve_entry(&chapter.url).await;
            if resolution.is_failed() {
                failed += 1;
            }
            chapter.url = resolution.into_url();
        }

        info!(
            "[MANGAHINDISUB] {} chapters for {} ({} unresolved)",
            chapters.len(),
            card.title,
            failed
        );
        Ok(chapters)
    }

    /// Latest chapter per title listed on an updates page. Each title is
    /// visited once; titles without a chapter list, or whose latest chapter
    /// link cannot be resolved, are left out.
    pub async fn updates_from_page(&self, html: &str) -> Result<FreshSnapshot> {
        let mut fresh = FreshSnapshot::new();

        for card in self.parser.extract_distinct_cards(html) {
            let card = Arc::new(card);
            let page = self.fetcher.get_url(&card.source_url).await?;
            let Some(first) = self.parser.extract_chapters(&page, &card).into_iter().next() else {
                debug!("[MANGAHINDISUB UPDATES] no chapters yet for {}", card.source_url);
                continue;
            };

            let resolution = self.resolver.resolve_entry(&first.url).await;
            if resolution.is_failed() {
                warn!(
                    "[MANGAHINDISUB UPDATES] latest chapter of {} unresolved, leaving it out",
                    card.source_url
                );
                continue;
            }
            let latest = resolution.into_url();
            debug!("[MANGAHINDISUB UPDATES] {} -> {}", card.source_url, latest);
            fresh.insert(card.source_url.clone(), latest);
        }

        Ok(fresh)
    }

    /// Fetch the chapter's own page and fill in its image URLs.
    pub async fn load_pages(&self, chapter: &mut ChapterEntry) -> Result<()> {
        let html = self.fetcher.get_url(&chapter.url).await?;
        chapter.page_urls = self.list_page_images(&html).await?;
        info!(
            "[MANGAHINDISUB] {} pages for {}",
            chapter.page_urls.len(),
            chapter.label
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl<F: Fetch + Clone> MangaClient for MangaHindiSubClient<F> {
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogCard>> {
        let url = self.search_url(query, page);
        info!("[MANGAHINDISUB] searching: {}", url);

        let html = self.fetcher.get_url(&url).await?;
        Ok(self.parser.extract_cards(&html))
    }

    async fn list_chapters(&self, card: &CatalogCard, page: usize) -> Result<Vec<ChapterEntry>> {
        let chapters = self.all_chapters(Arc::new(card.clone())).await?;
        Ok(paginate(chapters, page, self.config.page_size))
    }

    fn stream_chapters<'a>(&'a self, url: &str, name: &str) -> BoxStream<'a, Result<ChapterEntry>> {
        let card = Arc::new(CatalogCard {
            title: name.to_string(),
            source_url: url.to_string(),
            thumbnail_url: None,
        });

        Box::pin(stream! {
            let html = match self.fetcher.get_url(&card.source_url).await {
                Ok(html) => html,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for mut chapter in self.parser.extract_chapters(&html, &card) {
                chapter.url = self.resolver.resolve_entry(&chapter.url).await.into_url();
                yield Ok(chapter);
            }
        })
    }

    async fn list_page_images(&self, chapter_html: &str) -> Result<Vec<String>> {
        let mut images = Vec::new();
        for src in self.parser.extract_page_images(chapter_html) {
            if let Some(url) = self.resolver.resolve_image(&src).await {
                images.push(url);
            }
        }
        Ok(images)
    }

    fn owns_url(&self, url: &str) -> bool {
        url.starts_with(&self.config.base_url)
    }

    async fn check_updates(&self, last_chapters: &[LastChapter]) -> Result<UpdateReport> {
        let html = self.fetcher.get_url(&self.config.updates_url).await?;
        let fresh = self.updates_from_page(&html).await?;
        let report = diff_snapshots(last_chapters, &fresh);

        info!(
            "[MANGAHINDISUB UPDATES] checked {} titles: {} updated, {} unchanged",
            last_chapters.len(),
            report.updated.len(),
            report.not_updated.len()
        );
        Ok(report)
    }
}
