//! Session-scoped HTTP client for the property portal backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use url::Url;

use crate::{types::QueryPayload, user_agent::get_user_agent, Error};

/// Base URL of the production portal.
pub const DEFAULT_BASE_URL: &str = "https://www.centris.ca";

const LOCK_PATH: &str = "/Mvc/lock";
const QUERY_PATH: &str = "/property/UpdateQuery";
const RESULTS_PATH: &str = "/property/Results";

const ACCEPT_LANGUAGE: &str = "fr-CA,fr;q=0.9,en-CA;q=0.8,en;q=0.7";

/// Connection settings for a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Base URL for the portal. Defaults to the production host.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SessionConfig {
    /// Settings pointing at a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct TokenState {
    value: String,
    generation: u64,
}

/// An authenticated scraping session against the portal backend.
///
/// The backend refuses anonymous traffic: every request must carry an opaque
/// session token obtained from a lock endpoint, alongside the cookies set
/// during the handshake. `open` performs that handshake once; afterwards the
/// session transparently attaches the token to every request and, when the
/// backend starts rejecting it mid-run, re-handshakes exactly once and
/// retries the failed request before giving up.
///
/// Concurrent requests share one token. A generation counter makes sure a
/// burst of rejected requests triggers a single refresh rather than one per
/// caller.
#[derive(Debug)]
pub struct Session {
    base_url: String,
    http: reqwest::Client,
    token: RwLock<TokenState>,
    refresh_gate: tokio::sync::Mutex<()>,
    closed: AtomicBool,
}

impl Session {
    /// Opens a session: builds the HTTP client, performs the lock handshake,
    /// and stores the returned token.
    pub async fn open(config: SessionConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;

        let session = Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            token: RwLock::new(TokenState::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
            closed: AtomicBool::new(false),
        };

        let token = session.handshake().await?;
        {
            let mut state = session.token.write().unwrap_or_else(|e| e.into_inner());
            state.value = token;
            state.generation = 1;
        }
        tracing::debug!("Session opened against {}", session.base_url);
        Ok(session)
    }

    /// Base URL this session points at, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token currently attached to outgoing requests.
    pub fn handshake_token(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .value
            .clone()
    }

    /// Turns an href as found in page markup into an absolute URL.
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }

    /// Fetches an arbitrary page through the session, returning its body.
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let url = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid URL: {}", e);
            Error::RequestFailed
        })?;
        self.execute(|token| self.browser_get(with_token(&url, token)))
            .await
    }

    /// Submits a search payload, establishing the live result set the
    /// results endpoint will paginate over.
    pub async fn submit_query(&self, payload: &QueryPayload) -> Result<(), Error> {
        let url = self.endpoint_url(QUERY_PATH)?;
        self.execute(|token| self.browser_post(with_token(&url, token)).json(payload))
            .await?;
        Ok(())
    }

    /// Fetches one page of the current result set as HTML. Pages are
    /// numbered from 1.
    pub async fn results_page(&self, page: u32) -> Result<String, Error> {
        let url = self.endpoint_url(&format!("{}?page={}", RESULTS_PATH, page))?;
        self.execute(|token| self.browser_get(with_token(&url, token)))
            .await
    }

    /// Marks the session closed. Subsequent requests fail with
    /// [`Error::SessionClosed`]. Closing twice is a no-op.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let mut state = self.token.write().unwrap_or_else(|e| e.into_inner());
            state.value.clear();
            tracing::debug!("Session closed");
        }
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    fn browser_get(&self, url: Url) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("accept-language", ACCEPT_LANGUAGE)
            .header("referer", self.base_url.as_str())
            .header("upgrade-insecure-requests", "1")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
    }

    fn browser_post(&self, url: Url) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", ACCEPT_LANGUAGE)
            .header("origin", self.base_url.as_str())
            .header("referer", self.base_url.as_str())
            .header("sec-fetch-dest", "empty")
            .header("sec-fetch-mode", "cors")
            .header("sec-fetch-site", "same-origin")
    }

    /// Sends a request built by `make`, refreshing the handshake token and
    /// retrying once if the backend rejects it.
    async fn execute<F>(&self, make: F) -> Result<String, Error>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        self.ensure_open()?;
        let (token, generation) = self.token_snapshot();
        let resp = make(&token).send().await.map_err(|e| {
            tracing::error!("Failed to reach backend: {}", e);
            Error::RequestFailed
        })?;

        if !token_rejected(resp.status()) {
            return read_body(resp).await;
        }

        tracing::warn!(
            "Token rejected with status {}, refreshing handshake",
            resp.status().as_u16()
        );
        self.refresh_token(generation).await?;

        let (token, _) = self.token_snapshot();
        let resp = make(&token).send().await.map_err(|e| {
            tracing::error!("Failed to reach backend: {}", e);
            Error::RequestFailed
        })?;
        if token_rejected(resp.status()) {
            return Err(Error::Handshake {
                reason: format!(
                    "token still rejected after refresh (status {})",
                    resp.status().as_u16()
                ),
            });
        }
        read_body(resp).await
    }

    /// Performs the lock handshake and returns the fresh token.
    async fn handshake(&self) -> Result<String, Error> {
        let url = self.endpoint_url(LOCK_PATH)?;
        let resp = self.browser_get(url).send().await.map_err(|e| {
            tracing::error!("Handshake request failed: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read handshake body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            return Err(Error::Handshake {
                reason: format!("lock endpoint returned status {}", status.as_u16()),
            });
        }

        // The endpoint returns the bare token, sometimes JSON-quoted.
        let token = body.trim().trim_matches('"').to_string();
        if token.is_empty() {
            return Err(Error::Handshake {
                reason: "lock endpoint returned an empty token".to_string(),
            });
        }
        Ok(token)
    }

    /// Replaces the stored token unless another caller already did.
    ///
    /// `seen_generation` is the generation of the token that just got
    /// rejected; if the stored generation has moved past it, the refresh
    /// already happened and this call returns without a handshake.
    async fn refresh_token(&self, seen_generation: u64) -> Result<(), Error> {
        let _gate = self.refresh_gate.lock().await;
        {
            let state = self.token.read().unwrap_or_else(|e| e.into_inner());
            if state.generation != seen_generation {
                tracing::debug!("Token already refreshed by a concurrent request");
                return Ok(());
            }
        }

        let value = self.handshake().await?;
        let mut state = self.token.write().unwrap_or_else(|e| e.into_inner());
        state.value = value;
        state.generation += 1;
        tracing::info!("Handshake token refreshed (generation {})", state.generation);
        Ok(())
    }

    fn token_snapshot(&self) -> (String, u64) {
        let state = self.token.read().unwrap_or_else(|e| e.into_inner());
        (state.value.clone(), state.generation)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

fn token_rejected(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 401 | 403)
}

fn with_token(url: &Url, token: &str) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut().append_pair("uck", token);
    url
}

async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::RequestFailed
    })?;

    if !status.is_success() {
        let snippet = truncate_body(&body);
        tracing::error!("Request failed with status {}: {}", status, snippet);
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: snippet,
        });
    }
    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Error pages are localized; the cap must not split a multi-byte char.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
