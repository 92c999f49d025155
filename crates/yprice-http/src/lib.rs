//! yprice HTTP Layer
//!
//! The page-fetching seam between the scraping logic and the network.
//!
//! # Architecture
//!
//! Lookups only ever need "GET this URL, tell me where I ended up, what the
//! status was, and what the body said". [`PageFetcher`] captures exactly that,
//! and every call takes the run's [`CancelToken`] so an aborted run stops its
//! in-flight requests instead of waiting them out.
//!
//! # Fetchers
//!
//! - `MockFetcher`: Deterministic routes for testing, no network
//! - `ReqwestFetcher`: Real HTTP via `reqwest`, redirects followed
//!
//! # Examples
//!
//! ```
//! use yprice_http::{CancelToken, MockFetcher, PageFetcher};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut fetcher = MockFetcher::new();
//! fetcher.add_page("https://example.test/", "<html></html>");
//!
//! let page = fetcher
//!     .fetch("https://example.test/", &CancelToken::new())
//!     .await
//!     .unwrap();
//! assert!(page.is_success());
//! # }
//! ```

#![warn(missing_docs)]

pub mod cancel;
pub mod config;
pub mod http;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use cancel::CancelToken;
pub use config::HttpConfig;
pub use http::ReqwestFetcher;

/// Errors that can occur while fetching a page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or protocol failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP client could not be constructed
    #[error("Client error: {0}")]
    Client(String),

    /// The run was cancelled while the request was in flight
    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            FetchError::Transport(format!("Invalid request: {}", e))
        } else if e.is_connect() {
            FetchError::Transport(format!("Connection failed: {}", e))
        } else if e.is_timeout() {
            FetchError::Transport(format!("Request timed out: {}", e))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code of the final response
    pub status: u16,

    /// Decoded response body
    pub body: String,
}

impl Page {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for fetching pages
///
/// Implementations follow redirects and report the final URL. Non-2xx
/// statuses are returned as pages, not errors; callers decide what a status
/// means.
pub trait PageFetcher: Send + Sync {
    /// GET `url`, aborting with [`FetchError::Cancelled`] if `cancel` fires
    fn fetch(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> impl Future<Output = Result<Page, FetchError>> + Send;
}

#[derive(Debug, Clone)]
enum MockRoute {
    Page(Page),
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    routes: Mutex<HashMap<String, MockRoute>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Mock fetcher for deterministic testing
///
/// Routes are matched on the exact URL string. Unknown URLs answer with an
/// empty 404 page. Clones share routes and counters, so a test can keep one
/// handle for assertions while another is moved into the code under test.
///
/// # Examples
///
/// ```
/// use yprice_http::{CancelToken, MockFetcher, PageFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut fetcher = MockFetcher::new();
/// fetcher.add_redirect("https://a.test/search", "https://a.test/company?scode=7203", "");
/// fetcher.add_status("https://a.test/broken", 503);
///
/// let cancel = CancelToken::new();
/// let page = fetcher.fetch("https://a.test/search", &cancel).await.unwrap();
/// assert_eq!(page.url, "https://a.test/company?scode=7203");
///
/// let page = fetcher.fetch("https://a.test/broken", &cancel).await.unwrap();
/// assert_eq!(page.status, 503);
/// assert_eq!(fetcher.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    state: Arc<MockState>,
    latency: Duration,
}

impl MockFetcher {
    /// Create a mock with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency` (cancellation still wins)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Answer `url` with a 200 page
    pub fn add_page(&mut self, url: impl Into<String>, body: impl Into<String>) {
        let url = url.into();
        let page = Page {
            url: url.clone(),
            status: 200,
            body: body.into(),
        };
        self.insert(url, MockRoute::Page(page));
    }

    /// Answer `url` as if it redirected to `final_url`
    pub fn add_redirect(
        &mut self,
        url: impl Into<String>,
        final_url: impl Into<String>,
        body: impl Into<String>,
    ) {
        let page = Page {
            url: final_url.into(),
            status: 200,
            body: body.into(),
        };
        self.insert(url.into(), MockRoute::Page(page));
    }

    /// Answer `url` with an empty page carrying `status`
    pub fn add_status(&mut self, url: impl Into<String>, status: u16) {
        let url = url.into();
        let page = Page {
            url: url.clone(),
            status,
            body: String::new(),
        };
        self.insert(url, MockRoute::Page(page));
    }

    /// Fail `url` with a transport error
    pub fn add_error(&mut self, url: impl Into<String>, message: impl Into<String>) {
        self.insert(url.into(), MockRoute::Error(message.into()));
    }

    /// Number of fetches issued so far
    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }

    /// URLs fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Highest number of fetches that were in flight at the same time
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    fn insert(&mut self, url: String, route: MockRoute) {
        self.state.routes.lock().unwrap().insert(url, route);
    }

    fn route(&self, url: &str) -> Option<MockRoute> {
        self.state.routes.lock().unwrap().get(url).cloned()
    }
}

/// Tracks a fetch as in flight for as long as it lives
struct InFlight<'a> {
    state: &'a MockState,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a MockState) -> Self {
        let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Page, FetchError> {
        self.state.calls.lock().unwrap().push(url.to_string());
        let _in_flight = InFlight::enter(&self.state);

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if !self.latency.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(self.latency) => {}
            }
        }

        let route = self.route(url);
        match route {
            Some(MockRoute::Page(page)) => Ok(page),
            Some(MockRoute::Error(message)) => Err(FetchError::Transport(message)),
            None => Ok(Page {
                url: url.to_string(),
                status: 404,
                body: String::new(),
            }),
        }
    }
}
