//! Query execution stage.
//!
//! Builds the conversion query, submits it, polls for completion on the
//! backoff schedule, then walks the result pages via continuation tokens.
//! Rows are returned in warehouse-assigned order.

use tracing::{debug, info, warn};

use crate::error::{ImportError, Result};
use crate::poll::BackoffPolicy;
use crate::warehouse::{ConversionRow, TableRef, WarehouseClient};

/// Renders the conversion SELECT for the given table.
///
/// The timestamp is formatted inside the query so rows come back ready for
/// the sheet. With `lookback_days`, only conversions from the last N days
/// are selected.
pub fn conversion_query(table: &TableRef, lookback_days: Option<u32>) -> String {
    let mut query = format!(
        "SELECT\n  \
           gclId,\n  \
           FORMAT_TIMESTAMP('%Y-%m-%d %H:%M:%S', conversionDateTime) AS conversionDateTime,\n  \
           conversionValue,\n  \
           conversionType\n\
         FROM\n  \
           `{}`",
        table.fully_qualified()
    );

    if let Some(days) = lookback_days {
        query.push_str(&format!(
            "\nWHERE\n  \
               DATE(conversionDateTime) >= DATE_SUB(CURRENT_DATE(), INTERVAL {days} DAY)"
        ));
    }

    query
}

/// Executes a query job and collects every result page.
pub struct QueryExecutor<'a> {
    warehouse: &'a dyn WarehouseClient,
    backoff: BackoffPolicy,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(warehouse: &'a dyn WarehouseClient, backoff: BackoffPolicy) -> Self {
        Self { warehouse, backoff }
    }

    /// Submits the query, waits for completion, and returns all rows.
    ///
    /// Transient warehouse errors during polling consume a backoff slot and
    /// the wait continues; running out of attempts fails the run.
    pub async fn fetch_all(&self, sql: &str) -> Result<Vec<ConversionRow>> {
        debug!(query = sql, "submitting query");
        let mut response = self.warehouse.submit_query(sql).await?;
        let job = response.job.clone();

        let mut delays = self.backoff.delays();
        while !response.complete {
            let Some(delay) = delays.next() else {
                return Err(ImportError::query(format!(
                    "job {} still incomplete after {} status checks",
                    job.job_id, self.backoff.max_attempts
                )));
            };
            debug!(job_id = %job.job_id, delay_ms = delay.as_millis() as u64, "job incomplete");
            tokio::time::sleep(delay).await;

            match self.warehouse.query_results(&job, None).await {
                Ok(next) => response = next,
                Err(e) if e.is_retryable() => {
                    warn!(job_id = %job.job_id, error = %e, "transient error while polling");
                }
                Err(e) => return Err(e),
            }
        }

        let mut rows = response.rows;
        let mut page_token = response.page_token;
        while let Some(token) = page_token {
            let page = self.warehouse.query_results(&job, Some(&token)).await?;
            rows.extend(page.rows);
            page_token = page.page_token;
        }

        info!(rows = rows.len(), "retrieved conversion rows");
        Ok(rows)
    }
}
