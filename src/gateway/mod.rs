//! Query gateway abstraction.
//!
//! Provides a trait-based interface to the external SQL-executing service,
//! allowing the remote HTTP backend and the in-memory test backend to be
//! used interchangeably.

mod http;
mod mock;

pub use http::HttpGateway;
pub use mock::{mock_record, MockGateway};

use crate::error::Result;
use crate::table::Record;
use async_trait::async_trait;

/// Trait defining the interface to the SQL-executing service.
///
/// One invocation is one remote round trip: no retry, no partial results.
/// Failures surface the remote-supplied message. Timeout and cancellation are
/// the caller's concern; the transport may additionally enforce its own.
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Executes `sql` remotely and returns the raw result records.
    async fn execute(&self, sql: &str) -> Result<Vec<Record>>;
}
