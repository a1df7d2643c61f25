//! Warehouse abstraction layer.
//!
//! Provides a trait-based interface for the asynchronous query service,
//! allowing the real BigQuery REST backend and in-memory test doubles to be
//! used interchangeably.

mod bigquery;
mod mock;
mod types;

pub use bigquery::{BigQueryClient, BigQueryConfig};
pub use mock::{FailingWarehouseClient, MockWarehouseClient};
pub use types::{ConversionRow, JobRef, QueryResponse, TableRef};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface to the warehouse query service.
///
/// Queries run as asynchronous jobs: submission returns a handle plus the
/// first status, and results arrive in pages linked by continuation tokens.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Submits a query and returns the initial job status.
    ///
    /// Fast queries may come back already complete, with the first page of
    /// rows inline.
    async fn submit_query(&self, sql: &str) -> Result<QueryResponse>;

    /// Fetches the current status of a job, or a specific result page.
    ///
    /// With `page_token: None` this is a status check; with a token it
    /// retrieves the page the token points at.
    async fn query_results(&self, job: &JobRef, page_token: Option<&str>)
        -> Result<QueryResponse>;
}
