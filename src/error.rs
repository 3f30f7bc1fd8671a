use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Could not resolve {url}: {reason}")]
    Resolution { url: String, reason: String },
}

impl ConnectorError {
    pub fn scraping(msg: impl Into<String>) -> Self {
        Self::Scraping(msg.into())
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status { url: url.into(), status }
    }

    pub fn resolution(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Resolution {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
