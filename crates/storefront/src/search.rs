//! Product name suggestions for the search box.
//!
//! Results are cached per normalized query and country (5 minute TTL by
//! default). Transient backend failures are retried with a bounded
//! exponential backoff; a [`CancellationToken`] lets the caller drop a
//! lookup that a newer keystroke has made irrelevant.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::config::SuggestionConfig;

/// Queries shorter than this return no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Suggestion lookup cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Cached, retrying suggestion lookups.
#[derive(Clone)]
pub struct SuggestionService {
    inner: Arc<SuggestionServiceInner>,
}

struct SuggestionServiceInner {
    api: ApiClient,
    cache: Cache<String, Vec<String>>,
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl std::fmt::Debug for SuggestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionService")
            .field("cached", &self.inner.cache.entry_count())
            .field("max_attempts", &self.inner.max_attempts)
            .finish_non_exhaustive()
    }
}

impl SuggestionService {
    #[must_use]
    pub fn new(api: ApiClient, config: &SuggestionConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(SuggestionServiceInner {
                api,
                cache,
                max_attempts: config.max_attempts.max(1),
                base_delay: config.base_delay,
                max_delay: config.max_delay,
            }),
        }
    }

    /// Suggest product names for `query`, optionally within one country.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Cancelled` if `cancel` fires before a result is
    /// available, or the last backend error once attempts are exhausted.
    #[instrument(skip(self, cancel))]
    pub async fn suggest(
        &self,
        query: &str,
        country: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        let query = normalize(query);
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let key = format!("{query}|{}", country.unwrap_or_default());
        if let Some(names) = self.inner.cache.get(&key).await {
            debug!("Suggestion cache hit");
            return Ok(names);
        }

        let mut attempt = 1;
        let names = loop {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }

            let result = tokio::select! {
                () = cancel.cancelled() => return Err(SearchError::Cancelled),
                result = self.inner.api.product_suggestions(&query, country) => result,
            };

            match result {
                Ok(suggestions) => {
                    break dedup(suggestions.into_iter().map(|s| s.name));
                }
                Err(e) if attempt < self.inner.max_attempts && is_transient(&e) => {
                    let delay = self.delay_for(attempt);
                    warn!(attempt, ?delay, error = %e, "Suggestion lookup failed, retrying");
                    tokio::select! {
                        () = cancel.cancelled() => return Err(SearchError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        self.inner.cache.insert(key, names.clone()).await;
        Ok(names)
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Wait before retry number `attempt` (1-based): base doubled per
    /// attempt, capped.
    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.inner
            .base_delay
            .saturating_mul(factor)
            .min(self.inner.max_delay)
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn is_transient(error: &ApiError) -> bool {
    match error {
        ApiError::Transport(_) => true,
        ApiError::Status { status, .. } => status.is_server_error(),
        _ => false,
    }
}

/// Remove duplicates, keeping the first occurrence of each name.
fn dedup(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
