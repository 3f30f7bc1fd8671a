//! In-memory [`Fetch`] implementation for exercising connectors without a
//! network.

use crate::error::{ConnectorError, Result};
use crate::traits::{Fetch, FetchedPage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

const MAX_HOPS: usize = 10;

#[derive(Debug, Clone)]
enum Route {
    Page(String),
    Redirect(String),
    Fail(u16),
}

#[derive(Default)]
struct Inner {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<String>>,
}

/// Serves canned pages and redirects keyed by exact URL. Unknown URLs
/// answer 404. Every request is recorded.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    inner: Arc<Inner>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.route(url.into(), Route::Page(body.into()))
    }

    pub fn redirect(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.route(from.into(), Route::Redirect(to.into()))
    }

    pub fn failing(self, url: impl Into<String>, status: u16) -> Self {
        self.route(url.into(), Route::Fail(status))
    }

    fn route(self, url: String, route: Route) -> Self {
        lock(&self.inner.routes).insert(url, route);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.inner.requests).clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        lock(&self.inner.requests).iter().filter(|u| *u == url).count()
    }
}

#[async_trait::async_trait]
impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &str, follow_redirects: bool) -> Result<FetchedPage> {
        lock(&self.inner.requests).push(url.to_string());

        let routes = lock(&self.inner.routes);
        let mut current = url.to_string();
        for _ in 0..=MAX_HOPS {
            match routes.get(&current) {
                Some(Route::Page(body)) => {
                    return Ok(FetchedPage {
                        body: body.clone(),
                        final_url: current,
                    })
                }
                Some(Route::Redirect(_)) if !follow_redirects => {
                    return Ok(FetchedPage {
                        body: String::new(),
                        final_url: current,
                    })
                }
                Some(Route::Redirect(to)) => current = to.clone(),
                Some(Route::Fail(status)) => return Err(ConnectorError::status(current, *status)),
                None => return Err(ConnectorError::status(current, 404)),
            }
        }

        Err(ConnectorError::resolution(url, "too many redirects"))
    }
}
