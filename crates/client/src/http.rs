//! HTTP implementation of [`QueryService`].
//!
//! Every query is a `GET {base_url}/{endpoint}?{arguments}`. Argument values
//! use the service's wire encoding: booleans as `yes`/`no`, lists comma-joined.

use std::collections::HashMap;
use std::time::Duration;

use metrics::counter;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use omniprobe_core::config::ServiceConfig;
use omniprobe_core::error::QueryError;
use omniprobe_core::metrics::{LABEL_ENDPOINT, LABEL_RESULT, QUERY_REQUESTS_TOTAL};
use omniprobe_core::service::QueryService;
use omniprobe_core::types::{ArgValue, Arguments, QueryKind, QueryOutput};

use crate::decode::{BodyKind, decode_body};

/// Longest error body kept in a [`QueryError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Query service client backed by `reqwest`.
///
/// With `cache_responses` enabled, decoded outputs are kept in memory keyed
/// by the full request URL until [`QueryService::reset_cache`] is called.
pub struct HttpQueryService {
    client: reqwest::Client,
    base_url: Url,
    cache: Option<RwLock<HashMap<String, QueryOutput>>>,
}

impl HttpQueryService {
    /// Builds a client from the `[service]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRequest`] when the base URL cannot be
    /// parsed or the HTTP client cannot be constructed.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, QueryError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            QueryError::InvalidRequest(format!("invalid base url '{}': {e}", config.base_url))
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| QueryError::InvalidRequest(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            cache: config.cache_responses.then(|| RwLock::new(HashMap::new())),
        })
    }

    /// Base URL every request is resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Builds the request URL for a query. `Absent` values are never encoded.
    pub fn request_url(&self, kind: QueryKind, arguments: &Arguments) -> Result<Url, QueryError> {
        let endpoint = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            kind.endpoint()
        );
        let mut url = Url::parse(&endpoint)
            .map_err(|e| QueryError::InvalidRequest(format!("invalid request url: {e}")))?;

        let mut params = arguments
            .iter()
            .filter(|(_, value)| !matches!(value, ArgValue::Absent))
            .map(|(key, value)| (key.as_str(), value.to_query_value()))
            .peekable();
        if params.peek().is_some() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn cached(&self, key: &str) -> Option<QueryOutput> {
        let cache = self.cache.as_ref()?;
        cache.read().await.get(key).cloned()
    }

    async fn store(&self, key: String, output: &QueryOutput) {
        if let Some(cache) = &self.cache {
            cache.write().await.insert(key, output.clone());
        }
    }

    async fn fetch(&self, url: Url, has_header: bool) -> Result<QueryOutput, QueryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        let kind = BodyKind::from_content_type(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );
        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        decode_body(kind, &body, has_header)
    }
}

impl QueryService for HttpQueryService {
    async fn invoke(
        &self,
        kind: QueryKind,
        arguments: &Arguments,
    ) -> Result<QueryOutput, QueryError> {
        let url = self.request_url(kind, arguments)?;
        let key = url.to_string();

        if let Some(output) = self.cached(&key).await {
            debug!(url = %key, "serving query from response cache");
            counter!(QUERY_REQUESTS_TOTAL, LABEL_ENDPOINT => kind.endpoint(), LABEL_RESULT => "cached")
                .increment(1);
            return Ok(output);
        }

        debug!(url = %key, query_kind = %kind, "querying service");
        match self.fetch(url, wants_header(arguments)).await {
            Ok(output) => {
                counter!(QUERY_REQUESTS_TOTAL, LABEL_ENDPOINT => kind.endpoint(), LABEL_RESULT => "ok")
                    .increment(1);
                self.store(key, &output).await;
                Ok(output)
            }
            Err(e) => {
                counter!(QUERY_REQUESTS_TOTAL, LABEL_ENDPOINT => kind.endpoint(), LABEL_RESULT => "error")
                    .increment(1);
                warn!(url = %key, error = %e, "query failed");
                Err(e)
            }
        }
    }

    async fn reset_cache(&self) -> Result<(), QueryError> {
        if let Some(cache) = &self.cache {
            let mut cache = cache.write().await;
            debug!(entries = cache.len(), "clearing response cache");
            cache.clear();
        }
        Ok(())
    }
}

/// Whether the service will emit a TSV header line for these arguments.
fn wants_header(arguments: &Arguments) -> bool {
    match arguments.get("header") {
        Some(ArgValue::Bool(flag)) => *flag,
        Some(ArgValue::Int(n)) => *n != 0,
        Some(ArgValue::Text(text)) => {
            !matches!(text.trim().to_lowercase().as_str(), "no" | "0" | "false")
        }
        _ => true,
    }
}
