//! Time-bounded GET requests against the catalog API.

use std::{fmt::Display, future::Future, num::NonZeroU32, time::Duration};

use reqwest::{header::ACCEPT, Client};
use serde_json::Value;
use shared::{error::FetchError, protocol::ApiErrorBody};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Query string pairs, percent-encoded when the request URL is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(page: u32, size: NonZeroU32) -> Self {
        Self::new().with("page", page).with("size", size)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Handle to a spawned request. Dropping the handle aborts the task; aborting
/// a task that already settled does nothing.
pub struct InFlight<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> InFlight<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Aborts the task now instead of waiting for the handle to drop.
    pub fn cancel(self) {
        self.handle.abort();
    }

    /// Waits for the task. `None` when it panicked or was aborted.
    pub async fn join(mut self) -> Option<T> {
        (&mut self.handle).await.ok()
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl FetchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends each path segment (percent-encoded) to the base URL and
    /// attaches the query pairs.
    pub fn url_for(&self, path: &[&str], query: &QueryParams) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Transport(format!("invalid base url '{}': {e}", self.base_url)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                FetchError::Transport(format!("base url '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(path);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.iter() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn get(&self, path: &[&str], query: &QueryParams) -> Result<Value, FetchError> {
        self.get_with_timeout(path, query, self.timeout).await
    }

    pub async fn get_with_timeout(
        &self,
        path: &[&str],
        query: &QueryParams,
        timeout: Duration,
    ) -> Result<Value, FetchError> {
        let url = self.url_for(path, query)?;
        debug!(%url, "issuing catalog request");

        // The timer lives inside this future, so it is released on every exit.
        match tokio::time::timeout(timeout, self.execute(url.clone())).await {
            Ok(Ok(body)) => {
                debug!(%url, "catalog request settled");
                Ok(body)
            }
            Ok(Err(err)) => {
                warn!(%url, error = %err, "catalog request failed");
                Err(err)
            }
            Err(_) => {
                warn!(
                    %url,
                    timeout_ms = timeout.as_millis() as u64,
                    "catalog request timed out"
                );
                Err(FetchError::Timeout)
            }
        }
    }

    /// Spawns a GET whose lifetime is bound to the returned handle.
    pub fn spawn_get(
        &self,
        path: Vec<String>,
        query: QueryParams,
    ) -> InFlight<Result<Value, FetchError>> {
        let client = self.clone();
        InFlight::spawn(async move {
            let segments: Vec<&str> = path.iter().map(String::as_str).collect();
            client.get(&segments, &query).await
        })
    }

    async fn execute(&self, url: Url) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(body) = response.json::<ApiErrorBody>().await {
                debug!(
                    status = status.as_u16(),
                    error = body.error.as_deref().unwrap_or_default(),
                    message = body.message.as_deref().unwrap_or_default(),
                    "catalog api returned an error body"
                );
            }
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify_transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn classify_transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
