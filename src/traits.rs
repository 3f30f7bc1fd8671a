use crate::error::Result;
use crate::models::{CatalogCard, ChapterEntry, LastChapter, UpdateReport};
use futures::stream::BoxStream;

/// A fetched document together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub final_url: String,
}

/// HTTP GET capability the connector depends on. The connector itself always
/// follows redirects; `follow_redirects = false` is part of the transport
/// contract for hosts that want to inspect a single hop.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str, follow_redirects: bool) -> Result<FetchedPage>;

    /// Fetch and return only the body, following redirects.
    async fn get_url(&self, url: &str) -> Result<String> {
        Ok(self.fetch(url, true).await?.body)
    }
}

/// Contract every site connector exposes to the aggregator.
#[async_trait::async_trait]
pub trait MangaClient: Send + Sync {
    /// Search the catalog. `page` is 1-indexed.
    async fn search(&self, query: &str, page: usize) -> Result<Vec<CatalogCard>>;

    /// One page of a title's chapters with shortened links resolved.
    async fn list_chapters(&self, card: &CatalogCard, page: usize) -> Result<Vec<ChapterEntry>>;

    /// Every chapter of a title, yielded one at a time.
    fn stream_chapters<'a>(&'a self, url: &str, name: &str) -> BoxStream<'a, Result<ChapterEntry>>;

    /// Final image URLs for an already fetched chapter page.
    async fn list_page_images(&self, chapter_html: &str) -> Result<Vec<String>>;

    fn owns_url(&self, url: &str) -> bool;

    async fn check_updates(&self, last_chapters: &[LastChapter]) -> Result<UpdateReport>;
}
