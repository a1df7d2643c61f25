//! Polling behavior tests.
//!
//! Verifies the status-check count, the backoff schedule, and the bounded
//! attempt budget.

use std::time::Duration;

use conversion_sync::extract::QueryExecutor;
use conversion_sync::poll::BackoffPolicy;
use conversion_sync::warehouse::{ConversionRow, MockWarehouseClient};

fn row() -> ConversionRow {
    ConversionRow::new("CLICK1", "2020-01-01 10:00:00", 1.0, "PURCHASE")
}

fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy::new().with_initial_ms(1)
}

#[tokio::test]
async fn test_pending_job_produces_one_poll_per_incomplete_response() {
    // Incomplete for 5 status responses: the submit plus 4 polls, then the
    // 5th poll sees completion.
    let client = MockWarehouseClient::with_rows(vec![row()]).pending_for(5);
    let executor = QueryExecutor::new(&client, fast_backoff());

    let rows = executor.fetch_all("SELECT 1").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(client.counts().submits, 1);
    assert_eq!(client.counts().polls, 5);
}

#[tokio::test]
async fn test_complete_job_is_never_polled() {
    let client = MockWarehouseClient::with_rows(vec![row()]);
    let executor = QueryExecutor::new(&client, fast_backoff());

    executor.fetch_all("SELECT 1").await.unwrap();

    assert_eq!(client.counts().polls, 0);
}

#[tokio::test]
async fn test_attempt_budget_bounds_the_wait() {
    let client = MockWarehouseClient::with_rows(vec![row()]).pending_for(1000);
    let executor = QueryExecutor::new(&client, fast_backoff().with_max_attempts(3));

    let error = executor.fetch_all("SELECT 1").await.unwrap_err();

    assert_eq!(error.category(), "Query Error");
    assert!(error.to_string().contains("3 status checks"));
    assert_eq!(client.counts().polls, 3);
}

#[tokio::test]
async fn test_transient_poll_errors_consume_attempts() {
    let client = MockWarehouseClient::with_rows(vec![row()])
        .pending_for(1)
        .transient_failures(2);
    let executor = QueryExecutor::new(&client, fast_backoff().with_max_attempts(2));

    // Two transient failures exhaust the two attempts before the job can
    // report completion.
    let error = executor.fetch_all("SELECT 1").await.unwrap_err();
    assert!(error.to_string().contains("still incomplete"));
}

#[test]
fn test_backoff_schedule_doubles_from_500ms_without_cap() {
    let delays: Vec<Duration> = BackoffPolicy::default().delays().collect();

    assert_eq!(delays.len(), 10);
    assert_eq!(delays[0], Duration::from_millis(500));
    for pair in delays.windows(2) {
        assert_eq!(pair[1], pair[0] * 2);
    }
}
