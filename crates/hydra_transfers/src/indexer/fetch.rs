//! Indexer GraphQL client with rate limiting, retries, and cached responses.

use crate::indexer::cache::{CacheError, ResponseCache};
use crate::indexer::records::AccountTransfers;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

const DEFAULT_INDEXER_URL: &str = "https://explorer.hydradx.cloud/graphql";
const RATE_LIMIT_MS: u64 = 200;
const MAX_RETRIES: u32 = 3;
const RETRY_BACKOFF_MS: u64 = 500;

/// The one query this client issues. Extrinsic kinds, event names, and the
/// nested filter predicates are wire contract with the indexer schema.
const ACCOUNT_TRANSFERS_QUERY: &str = r#"
query AccountTransfers($accountHash: String!) {
  calls(
    where: {
      origin_jsonContains: { value: { value: $accountHash } }
      name_in: [
        "Tokens.transfer_keep_alive"
        "Tokens.transfer"
        "Balances.transfer_keep_alive"
        "Balances.transfer"
        "XTokens.transfer"
      ]
      OR: {
        name_in: [
          "Tokens.transfer_keep_alive"
          "Tokens.transfer"
          "Balances.transfer_keep_alive"
          "Balances.transfer"
          "XTokens.transfer"
        ]
        args_jsonContains: { dest: $accountHash }
      }
    }
    orderBy: block_height_DESC
  ) {
    args
    name
    origin
    block {
      timestamp
    }
    extrinsic {
      hash
    }
  }
  events(
    where: {
      name_in: ["Currencies.Deposited"]
      args_jsonContains: { who: $accountHash }
      call: { name_in: ["ParachainSystem.set_validation_data"] }
      OR: {
        name_in: ["Tokens.Withdrawn"]
        args_jsonContains: { who: $accountHash }
        call: { name_in: ["Ethereum.transact"] }
      }
    }
    orderBy: block_height_DESC
  ) {
    name
    args
    call {
      args
      name
    }
    block {
      timestamp
    }
    extrinsic {
      hash
    }
  }
}
"#;

/// How stale a cached response may be when serving a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Refetch unless the cached response is fresher than the configured
    /// live bound.
    Live,
    /// Serve any cached response; fetch only on a miss.
    Cached,
}

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub indexer_url: String,
    pub rate_limit_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Maximum cache age in seconds a [`RefreshPolicy::Live`] request accepts.
    pub live_max_age_secs: i64,
    pub offline: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            indexer_url: DEFAULT_INDEXER_URL.to_string(),
            rate_limit_ms: RATE_LIMIT_MS,
            max_retries: MAX_RETRIES,
            retry_backoff_ms: RETRY_BACKOFF_MS,
            live_max_age_secs: 0,
            offline: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid indexer url: {0}")]
    Url(#[from] url::ParseError),
    #[error("cache: {0}")]
    Cache(#[from] CacheError),
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("api error: status {0} body {1}")]
    Api(u16, String),
    #[error("graphql: {0}")]
    GraphQl(String),
    #[error("offline mode: no cached data for request")]
    OfflineMiss,
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Indexer client with rate limiting and optional SQLite response cache.
pub struct Fetcher {
    config: FetchConfig,
    client: Option<reqwest::Client>,
    cache: Option<ResponseCache>,
    last_request: std::sync::Mutex<Option<OffsetDateTime>>,
    request_count: AtomicU64,
}

impl Fetcher {
    pub fn new(config: FetchConfig, cache: Option<ResponseCache>) -> Result<Self, FetchError> {
        url::Url::parse(&config.indexer_url)?;
        let client = if config.offline {
            None
        } else {
            Some(
                reqwest::Client::builder()
                    .use_rustls_tls()
                    .timeout(Duration::from_secs(30))
                    .build()?,
            )
        };
        Ok(Self {
            config,
            client,
            cache,
            last_request: std::sync::Mutex::new(None),
            request_count: AtomicU64::new(0),
        })
    }

    /// Run the `AccountTransfers` query for an account hash (0x-prefixed raw
    /// key hex, the indexer's account format).
    pub async fn account_transfers(
        &self,
        account_hash: &str,
        refresh: RefreshPolicy,
    ) -> Result<AccountTransfers, FetchError> {
        let body = serde_json::json!({
            "query": ACCOUNT_TRANSFERS_QUERY,
            "variables": { "accountHash": account_hash },
        });
        let normalized = serde_json::to_string(&body)?;
        let cache_key = ResponseCache::key_for(&normalized);
        let raw = self.request_json(&body, &cache_key, refresh).await?;
        let envelope: GraphQlEnvelope<AccountTransfers> = serde_json::from_str(&raw)?;
        let data = Self::unwrap_envelope(envelope)?;
        info!(
            calls = data.calls.len(),
            events = data.events.len(),
            "account_transfers"
        );
        Ok(data)
    }

    fn unwrap_envelope<T>(envelope: GraphQlEnvelope<T>) -> Result<T, FetchError> {
        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FetchError::GraphQl(joined));
            }
        }
        envelope
            .data
            .ok_or_else(|| FetchError::GraphQl("response carried no data".to_string()))
    }

    async fn rate_limit(&self) {
        let sleep_ms = {
            let last = self.last_request.lock().unwrap();
            let prev = *last;
            drop(last);
            if let Some(prev) = prev {
                let elapsed = (OffsetDateTime::now_utc() - prev).whole_milliseconds();
                let need: i128 = self.config.rate_limit_ms as i128;
                if elapsed < need {
                    (need - elapsed).max(0) as u64
                } else {
                    0
                }
            } else {
                0
            }
        };
        if sleep_ms > 0 {
            tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
        }
        *self.last_request.lock().unwrap() = Some(OffsetDateTime::now_utc());
    }

    async fn request_json(
        &self,
        body: &serde_json::Value,
        cache_key: &str,
        refresh: RefreshPolicy,
    ) -> Result<String, FetchError> {
        if let Some(cache) = &self.cache {
            if self.config.offline {
                return cache.get(cache_key, None)?.ok_or(FetchError::OfflineMiss);
            }
            let max_age = match refresh {
                RefreshPolicy::Live => Some(self.config.live_max_age_secs),
                RefreshPolicy::Cached => None,
            };
            if let Some(hit) = cache.get(cache_key, max_age)? {
                debug!(key = %cache_key, "cache hit");
                return Ok(hit);
            }
        } else if self.config.offline {
            return Err(FetchError::OfflineMiss);
        }

        let client = self.client.as_ref().ok_or(FetchError::OfflineMiss)?;
        self.rate_limit().await;

        let url = self.config.indexer_url.clone();
        let mut last_err = None;
        for attempt in 0..=self.config.max_retries {
            match client.post(&url).json(body).send().await {
                Ok(r) => {
                    let status = r.status();
                    let text = r.text().await.unwrap_or_default();
                    if !status.is_success() {
                        last_err = Some(FetchError::Api(status.as_u16(), text));
                        if attempt < self.config.max_retries {
                            let ms = self.config.retry_backoff_ms * (1 << attempt);
                            tokio::time::sleep(Duration::from_millis(ms)).await;
                        }
                        continue;
                    }
                    // GraphQL-level errors are not transient; fail without
                    // retrying and without caching.
                    let probe: GraphQlEnvelope<serde_json::Value> = serde_json::from_str(&text)?;
                    Self::unwrap_envelope(probe)?;
                    self.request_count.fetch_add(1, Ordering::Relaxed);
                    if let Some(cache) = &self.cache {
                        let _ = cache.set(cache_key, &text);
                    }
                    return Ok(text);
                }
                Err(e) => {
                    last_err = Some(FetchError::Request(e));
                    if attempt < self.config.max_retries {
                        let ms = self.config.retry_backoff_ms * (1 << attempt);
                        warn!(attempt, ms, "retry after error");
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or(FetchError::Api(0, "unknown".to_string())))
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}
