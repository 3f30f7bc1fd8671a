use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::models::Resolution;
use crate::traits::Fetch;
use tracing::{debug, info, warn};
use url::Url;

/// Where a link points relative to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Served by the site itself.
    Origin,
    /// A known shortener that redirects to the real resource.
    Indirect,
    Foreign,
}

/// Follows shortened links to the URL they finally land on.
pub struct LinkResolver<F> {
    fetcher: F,
    origin_host: String,
    indirection_domains: Vec<String>,
    image_hosts: Vec<String>,
    image_extensions: Vec<String>,
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

impl<F: Fetch> LinkResolver<F> {
    pub fn new(fetcher: F, config: &ConnectorConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)?;
        let origin_host = base
            .host_str()
            .ok_or_else(|| ConnectorError::scraping(format!("Base URL has no host: {}", config.base_url)))?
            .to_ascii_lowercase();

        Ok(Self {
            fetcher,
            origin_host,
            indirection_domains: config
                .indirection_domains
                .iter()
                .map(|d| d.to_ascii_lowercase())
                .collect(),
            image_hosts: config.image_hosts.iter().map(|h| h.to_ascii_lowercase()).collect(),
            image_extensions: config
                .image_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        })
    }

    pub fn classify(&self, url: &str) -> LinkClass {
        let Some(host) = host_of(url) else {
            return LinkClass::Foreign;
        };

        if host_matches(&host, &self.origin_host) {
            LinkClass::Origin
        } else if self.indirection_domains.iter().any(|d| host_matches(&host, d)) {
            LinkClass::Indirect
        } else {
            LinkClass::Foreign
        }
    }

    /// True for image CDN hosts that serve the site's uploads directly.
    pub fn is_image_host(&self, url: &str) -> bool {
        host_of(url).is_some_and(|host| self.image_hosts.iter().any(|h| host_matches(&host, h)))
    }

    /// True when the URL path ends in one of the configured image extensions.
    pub fn has_image_hint(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let path = parsed.path().to_ascii_lowercase();
        self.image_extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{}", ext)))
    }

    /// Follow redirects from `url` and return where they end. An already
    /// final URL comes back unchanged.
    pub async fn resolve(&self, url: &str) -> Result<String> {
        let page = self.fetcher.fetch(url, true).await?;
        if page.final_url != url {
            info!("[MANGAHINDISUB RESOLVER] {} -> {}", url, page.final_url);
        }
        Ok(page.final_url)
    }

    /// Best-effort resolution for a chapter link: origin links are returned
    /// without a request, everything else is followed.
    pub async fn resolve_entry(&self, url: &str) -> Resolution {
        if self.classify(url) == LinkClass::Origin {
            return Resolution::Direct(url.to_string());
        }
        self.attempt(url).await
    }

    /// Apply the image policy: origin and image CDN sources with an extension
    /// hint are kept, shortener images are followed, anything else is dropped.
    pub async fn resolve_image(&self, url: &str) -> Option<String> {
        match self.classify(url) {
            LinkClass::Origin if self.has_image_hint(url) => Some(url.to_string()),
            LinkClass::Foreign if self.is_image_host(url) && self.has_image_hint(url) => {
                Some(url.to_string())
            }
            LinkClass::Indirect => Some(self.attempt(url).await.into_url()),
            class => {
                debug!("[MANGAHINDISUB RESOLVER] skipping image {} ({:?})", url, class);
                None
            }
        }
    }

    async fn attempt(&self, url: &str) -> Resolution {
        match self.resolve(url).await {
            Ok(resolved) if self.classify(&resolved) == LinkClass::Indirect => {
                warn!("[MANGAHINDISUB RESOLVER] {} stopped on shortener page {}", url, resolved);
                Resolution::Failed {
                    original: url.to_string(),
                    error: format!("still on shortener: {}", resolved),
                }
            }
            Ok(resolved) => Resolution::Resolved(resolved),
            Err(e) => {
                warn!("[MANGAHINDISUB RESOLVER] keeping unresolved {}: {}", url, e);
                Resolution::Failed {
                    original: url.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}
