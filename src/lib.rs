//! Catalog connector for MangaHindiSub.
//!
//! Parses the site's HTML into [`CatalogCard`]s and [`ChapterEntry`]s,
//! follows shortened chapter and image links to their final URLs, and
//! reports which known titles gained chapters since a caller-supplied
//! snapshot. Everything is exposed through the [`MangaClient`] trait.

pub mod config;
pub mod connectors;
pub mod error;
pub mod models;
pub mod parser;
pub mod resolver;
#[doc(hidden)]
pub mod testing;
pub mod traits;
pub mod updates;
pub mod utils;

pub use config::ConnectorConfig;
pub use connectors::MangaHindiSubClient;
pub use error::{ConnectorError, Result};
pub use models::{CatalogCard, ChapterEntry, LastChapter, Resolution, UpdateReport};
pub use traits::{Fetch, FetchedPage, MangaClient};
