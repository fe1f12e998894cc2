use crate::config::ApiConfig;
use crate::error::{AuthError, ExportError, FetchError};
use crate::logging::{LogContext, MetricsLogger};
use crate::models::EnrichedTransaction;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Instant;

/// Half-open fetch window: `start` inclusive, `end` exclusive.
/// Either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, crate::error::ConfigError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Err(crate::error::ConfigError::InvalidWindow {
                    start: s.to_rfc3339(),
                    end: e.to_rfc3339(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Whether a unix-seconds timestamp falls inside [start, end)
    pub fn contains(&self, ts: i64) -> bool {
        if let Some(start) = self.start {
            if ts < start.timestamp() {
                return false;
            }
        }
        if let Some(end) = self.end {
            if ts >= end.timestamp() {
                return false;
            }
        }
        true
    }

    /// Whether a timestamp is older than the window start. With results
    /// arriving newest-first, nothing after such a record can qualify.
    pub fn is_before_start(&self, ts: i64) -> bool {
        self.start.map(|s| ts < s.timestamp()).unwrap_or(false)
    }

    pub fn start_ms(&self) -> Option<i64> {
        self.start.map(|s| s.timestamp_millis())
    }

    pub fn end_ms(&self) -> Option<i64> {
        self.end.map(|e| e.timestamp_millis())
    }
}

/// Client for the Helius enriched-transactions API
#[derive(Clone)]
pub struct HeliusClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HeliusClient {
    pub fn new(config: &ApiConfig, api_key: String) -> Result<Self, ExportError> {
        let context = LogContext::new("helius_client", "initialization")
            .with_metadata("endpoint", serde_json::json!(config.endpoint));
        context.info("Initializing Helius client");

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch enriched transactions for one wallet, newest first, paginating
    /// with the `before` signature cursor until the API runs out of pages,
    /// `limit` in-window records have been collected, or a record older than
    /// the window start is seen. Records newer than the window end are
    /// dropped without counting toward the limit.
    ///
    /// A failed page fails the whole call; no partial vector is returned.
    pub async fn fetch_transactions(
        &self,
        wallet: &str,
        window: &TimeWindow,
        limit: usize,
    ) -> Result<Vec<EnrichedTransaction>, ExportError> {
        let url = format!("{}/addresses/{}/transactions", self.endpoint, wallet);
        let mut collected: Vec<EnrichedTransaction> = Vec::new();
        let mut before: Option<String> = None;
        let mut page = 0usize;

        'pages: while collected.len() < limit {
            let mut request = self
                .client
                .get(&url)
                .query(&[("api-key", self.api_key.as_str())]);
            if let Some(cursor) = &before {
                request = request.query(&[("before", cursor.as_str())]);
            }
            if let Some(start_ms) = window.start_ms() {
                request = request.query(&[("startTime", start_ms.to_string())]);
            }
            if let Some(end_ms) = window.end_ms() {
                request = request.query(&[("endTime", end_ms.to_string())]);
            }

            let started = Instant::now();
            let response = request.send().await.map_err(|e| {
                MetricsLogger::log_api_call(
                    wallet,
                    page,
                    0,
                    started.elapsed().as_millis() as u64,
                    false,
                );
                FetchError::Http(e)
            })?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                MetricsLogger::log_api_call(
                    wallet,
                    page,
                    0,
                    started.elapsed().as_millis() as u64,
                    false,
                );
                return Err(AuthError::Rejected {
                    status: status.as_u16(),
                }
                .into());
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                MetricsLogger::log_api_call(
                    wallet,
                    page,
                    0,
                    started.elapsed().as_millis() as u64,
                    false,
                );
                return Err(FetchError::Status {
                    wallet: wallet.to_string(),
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            let body = response.text().await.map_err(FetchError::Http)?;
            let value: serde_json::Value =
                serde_json::from_str(&body).map_err(FetchError::Json)?;
            if !value.is_array() {
                return Err(FetchError::InvalidResponse(format!(
                    "expected a JSON array of transactions for wallet {}",
                    wallet
                ))
                .into());
            }
            let batch: Vec<EnrichedTransaction> =
                serde_json::from_value(value).map_err(FetchError::Json)?;

            MetricsLogger::log_api_call(
                wallet,
                page,
                batch.len(),
                started.elapsed().as_millis() as u64,
                true,
            );

            if batch.is_empty() {
                break;
            }

            let last_signature = batch
                .last()
                .map(|tx| tx.signature.clone())
                .unwrap_or_default();

            for tx in batch {
                // Descending order: once past the start bound, stop entirely
                if window.is_before_start(tx.timestamp) {
                    break 'pages;
                }
                if !window.contains(tx.timestamp) {
                    continue;
                }
                collected.push(tx);
                if collected.len() >= limit {
                    break 'pages;
                }
            }

            if last_signature.is_empty() {
                break;
            }
            before = Some(last_signature);
            page += 1;
        }

        let context = LogContext::new("helius_client", "fetch_transactions")
            .with_wallet(wallet)
            .with_metadata("records", serde_json::json!(collected.len()))
            .with_metadata("pages", serde_json::json!(page + 1));
        context.debug(&format!(
            "Fetched {} in-window transactions for {}",
            collected.len(),
            wallet
        ));

        Ok(collected)
    }
}
