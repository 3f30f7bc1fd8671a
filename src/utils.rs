use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::traits::{Fetch, FetchedPage};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// reqwest-backed [`Fetch`] implementation. Cloning is cheap; the inner
/// clients share one connection pool each.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    no_redirect: Client,
    headers: Option<HashMap<String, String>>,
}

impl HttpClient {
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let builder = || {
            Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .user_agent(config.user_agent.as_str())
        };

        let client = builder()
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        let no_redirect = builder().redirect(Policy::none()).build()?;

        Ok(Self {
            client,
            no_redirect,
            headers: config.headers.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str, follow_redirects: bool) -> Result<FetchedPage> {
        let client = if follow_redirects { &self.client } else { &self.no_redirect };
        let mut request = client.get(url);

        if let Some(headers) = &self.headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        let response = request.send().await?;
        let status = response.status();

        // Without redirect following a 3xx is the answer, not a failure.
        let accepted = status.is_success() || (!follow_redirects && status.is_redirection());
        if !accepted {
            return Err(ConnectorError::status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("[HTTP] GET {} -> {} ({} bytes)", url, final_url, body.len());

        Ok(FetchedPage { body, final_url })
    }
}

/// Slice one 1-indexed page out of `items`. Page 0 and pages past the end
/// are empty.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Vec<T> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }
    items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect()
}

/// Form-encode a search query (spaces become `+`).
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_concatenate_to_the_full_list() {
        let items: Vec<u32> = (0..47).collect();

        let mut joined = Vec::new();
        for page in 1..=3 {
            let slice = paginate(items.clone(), page, 20);
            assert!(slice.len() <= 20);
            joined.extend(slice);
        }
        assert_eq!(joined, items);
        assert!(paginate(items.clone(), 4, 20).is_empty());
        assert!(paginate(items, 0, 20).is_empty());
    }

    #[test]
    fn query_is_form_encoded() {
        assert_eq!(encode_query("solo leveling"), "solo+leveling");
        assert_eq!(encode_query("a&b=c/ä"), "a%26b%3Dc%2F%C3%A4");
    }

    #[tokio::test]
    async fn follows_redirect_chain_and_reports_final_url() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let _a = server
            .mock("GET", "/s/abc")
            .with_status(302)
            .with_header("location", &format!("{}/hop", base))
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/hop")
            .with_status(301)
            .with_header("location", &format!("{}/chapter-1/", base))
            .create_async()
            .await;
        let _c = server
            .mock("GET", "/chapter-1/")
            .match_header("user-agent", "test-agent")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let config = ConnectorConfig {
            user_agent: "test-agent".to_string(),
            ..ConnectorConfig::default()
        };
        let client = HttpClient::new(&config).unwrap();
        let page = client.fetch(&format!("{}/s/abc", base), true).await.unwrap();

        assert_eq!(page.final_url, format!("{}/chapter-1/", base));
        assert_eq!(page.body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn redirect_without_following_is_returned_as_is() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/s/abc", server.url());
        let _m = server
            .mock("GET", "/s/abc")
            .with_status(302)
            .with_header("location", "https://mangahindisub.in/x/")
            .create_async()
            .await;

        let client = HttpClient::new(&ConnectorConfig::default()).unwrap();
        let page = client.fetch(&url, false).await.unwrap();
        assert_eq!(page.final_url, url);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("GET", "/gone").with_status(404).create_async().await;

        let client = HttpClient::new(&ConnectorConfig::default()).unwrap();
        let err = client
            .fetch(&format!("{}/gone", server.url()), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Status { status: 404, .. }));
    }
}
