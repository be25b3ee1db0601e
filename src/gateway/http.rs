//! HTTP query gateway implementation.
//!
//! Calls the read-only SQL RPC endpoint with one JSON round trip per query
//! and decodes the response payload into raw records.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{ExplorerError, Result};
use crate::gateway::QueryGateway;
use crate::table::Record;

/// HTTP client for the query RPC endpoint.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    endpoint: Url,
    api_key: Option<String>,
    client: Client,
}

/// Request body for the RPC call.
#[derive(Serialize)]
struct RpcRequest<'a> {
    sql_text: &'a str,
}

impl HttpGateway {
    /// Creates a new gateway for the given endpoint.
    pub fn new(endpoint: Url, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExplorerError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }

    /// Creates a gateway from the remote configuration section.
    pub fn from_config(remote: &RemoteConfig) -> Result<Self> {
        let endpoint = remote.endpoint_url()?;
        Self::new(endpoint, remote.api_key.clone(), remote.timeout())
    }

    /// Parses an RPC error response, preferring the remote-supplied message.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> ExplorerError {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            if let Some(message) = value.get("message").and_then(Value::as_str) {
                return ExplorerError::execution(message);
            }
        }

        ExplorerError::execution(format!("Query service error ({status}): {body}"))
    }

    /// Decodes the RPC payload into records.
    ///
    /// A non-array payload carries no rows. Array entries must be objects.
    fn decode_records(payload: Value) -> Result<Vec<Record>> {
        match payload {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(ExplorerError::execution(format!(
                        "Expected result records to be objects, got: {other}"
                    ))),
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl QueryGateway for HttpGateway {
    async fn execute(&self, sql: &str) -> Result<Vec<Record>> {
        debug!("Dispatching query to {}", self.endpoint);

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(&RpcRequest { sql_text: sql });

        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExplorerError::execution("Query request timed out")
            } else if e.is_connect() {
                ExplorerError::execution("Failed to connect to the query service")
            } else {
                ExplorerError::execution(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExplorerError::execution(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| ExplorerError::execution(format!("Failed to parse response: {e}")))?;

        Self::decode_records(payload)
    }
}
