//! User-query request lifecycle.
//!
//! Owns the single user-query slot: guards submissions, dispatches them to
//! the query gateway under a deadline, and publishes the resulting outcome,
//! table state, and operator notices.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ExplorerError;
use crate::gateway::QueryGateway;
use crate::policy::{self, Verdict};
use crate::table::{normalize_with, ResultTable, SchemaInference};

/// Default per-submission deadline.
const DEFAULT_DEADLINE_SECS: u64 = 30;

/// Severity of an operator-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Transient operator feedback emitted alongside state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Outcome of the most recent submission. Exactly one is current at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The query produced at least one row.
    Success(ResultTable),
    /// No query yet, or the last query returned zero rows.
    Empty,
    /// The guard refused the text; the gateway was never invoked.
    Rejected(String),
    /// The gateway call failed; carries the remote message verbatim.
    Failed(String),
}

/// Snapshot of the user-query slot for table views.
///
/// The displayed table is tracked separately from the outcome: a failed
/// submission keeps the previous table on screen, an empty one clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub loading: bool,
    pub table: Option<ResultTable>,
}

struct SlotState {
    loading: bool,
    outcome: QueryOutcome,
    table: Option<ResultTable>,
}

/// Controller for the single user-query slot.
///
/// Submissions are logically serial; if a second submission is issued while
/// an earlier one is still in flight, the earlier response is discarded when
/// it arrives. Each submission takes a monotonically increasing sequence
/// token, and a response is applied only if its token is still the latest
/// issued one.
pub struct QuerySession {
    gateway: Arc<dyn QueryGateway>,
    inference: SchemaInference,
    deadline: Duration,
    state: Mutex<SlotState>,
    seq: AtomicU64,
    notices: mpsc::UnboundedSender<Notice>,
}

impl QuerySession {
    /// Creates a session with first-row inference and the default deadline.
    ///
    /// Returns the session and the receiving end of its notice channel.
    pub fn new(gateway: Arc<dyn QueryGateway>) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        Self::with_options(
            gateway,
            SchemaInference::FirstRow,
            Duration::from_secs(DEFAULT_DEADLINE_SECS),
        )
    }

    /// Creates a session with an explicit inference policy and deadline.
    pub fn with_options(
        gateway: Arc<dyn QueryGateway>,
        inference: SchemaInference,
        deadline: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let session = Self {
            gateway,
            inference,
            deadline,
            state: Mutex::new(SlotState {
                loading: false,
                outcome: QueryOutcome::Empty,
                table: None,
            }),
            seq: AtomicU64::new(0),
            notices: tx,
        };

        (session, rx)
    }

    /// Submits query text and returns the outcome the slot now holds.
    ///
    /// Policy-rejected text never reaches the gateway. A response that has
    /// been superseded by a newer submission is discarded and the current
    /// outcome is returned instead.
    pub async fn submit(&self, text: &str) -> QueryOutcome {
        if let Verdict::Rejected { reason } = policy::check(text) {
            let outcome = QueryOutcome::Rejected(reason.to_string());
            // Prior results stay on screen; only the outcome changes.
            self.lock_state().outcome = outcome.clone();
            self.notify(Severity::Warning, reason);
            return outcome;
        }

        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_state().loading = true;

        let result = match tokio::time::timeout(self.deadline, self.gateway.execute(text)).await {
            Ok(result) => result,
            Err(_) => Err(ExplorerError::execution(format!(
                "Query timed out after {} seconds",
                self.deadline.as_secs()
            ))),
        };

        let mut state = self.lock_state();

        // A stale response must not clobber a newer submission. The loading
        // flag stays owned by the newest one.
        if token != self.seq.load(Ordering::SeqCst) {
            debug!("Discarding response of superseded submission {token}");
            return state.outcome.clone();
        }

        state.loading = false;

        match result {
            Err(e) => {
                let message = e.message().to_string();
                state.outcome = QueryOutcome::Failed(message.clone());
                // Prior columns/rows stay in place so the operator keeps context.
                self.notify(Severity::Error, message);
            }
            Ok(records) => match normalize_with(records, self.inference) {
                None => {
                    state.table = None;
                    state.outcome = QueryOutcome::Empty;
                    self.notify(Severity::Info, "No rows returned");
                }
                Some(table) => {
                    state.table = Some(table.clone());
                    state.outcome = QueryOutcome::Success(table);
                }
            },
        }

        state.outcome.clone()
    }

    /// Returns the outcome of the most recent applied submission.
    pub fn outcome(&self) -> QueryOutcome {
        self.lock_state().outcome.clone()
    }

    /// Returns a snapshot of the slot for table views.
    pub fn view(&self) -> TableView {
        let state = self.lock_state();
        TableView {
            loading: state.loading,
            table: state.table.clone(),
        }
    }

    /// Returns true while a submission is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    fn lock_state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().expect("slot state lock poisoned")
    }

    fn notify(&self, severity: Severity, message: impl Into<String>) {
        // Consumers may have gone away; notices are fire-and-forget.
        let _ = self.notices.send(Notice {
            severity,
            message: message.into(),
        });
    }
}
