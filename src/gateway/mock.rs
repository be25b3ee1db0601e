//! Mock query gateway for testing.
//!
//! Returns queued canned outcomes and counts invocations so tests can assert
//! that rejected queries never reach the gateway. Responses can be delayed or
//! the gateway can hang entirely to exercise the deadline path.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ExplorerError, Result};
use crate::gateway::QueryGateway;
use crate::table::Record;

/// One queued canned outcome.
struct MockResponse {
    result: Result<Vec<Record>>,
    delay: Option<Duration>,
}

/// A mock gateway that returns predefined outcomes in queue order.
///
/// When the queue is empty, calls resolve to an empty record set.
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<MockResponse>>,
    calls: AtomicUsize,
    hang: bool,
}

impl MockGateway {
    /// Creates a new mock gateway with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock gateway whose calls never resolve.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    /// Queues a successful response with the given records.
    pub fn with_records(self, records: Vec<Record>) -> Self {
        self.push(MockResponse {
            result: Ok(records),
            delay: None,
        });
        self
    }

    /// Queues a successful response delivered after `delay`.
    pub fn with_delayed_records(self, records: Vec<Record>, delay: Duration) -> Self {
        self.push(MockResponse {
            result: Ok(records),
            delay: Some(delay),
        });
        self
    }

    /// Queues an empty result set.
    pub fn with_empty(self) -> Self {
        self.with_records(Vec::new())
    }

    /// Queues an execution error with the given message.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(MockResponse {
            result: Err(ExplorerError::execution(message)),
            delay: None,
        });
        self
    }

    /// Returns how many times execute was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(&self, response: MockResponse) {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(response);
    }
}

/// Builds a record from field/value pairs, preserving the given order.
pub fn mock_record(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[async_trait]
impl QueryGateway for MockGateway {
    async fn execute(&self, _sql: &str) -> Result<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.hang {
            futures::future::pending::<()>().await;
        }

        let response = self
            .responses
            .lock()
            .expect("mock response queue poisoned")
            .pop_front();

        match response {
            Some(MockResponse { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(Vec::new()),
        }
    }
}
