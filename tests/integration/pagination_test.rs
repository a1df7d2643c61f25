//! Pagination tests.
//!
//! Verifies that pages linked by continuation tokens concatenate into one
//! ordered sequence.

use conversion_sync::extract::QueryExecutor;
use conversion_sync::poll::BackoffPolicy;
use conversion_sync::warehouse::{ConversionRow, MockWarehouseClient};

fn page(ids: &[&str]) -> Vec<ConversionRow> {
    ids.iter()
        .map(|id| ConversionRow::new(*id, "2020-01-01 10:00:00", 1.0, "PURCHASE"))
        .collect()
}

fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy::new().with_initial_ms(1)
}

#[tokio::test]
async fn test_pages_concatenate_to_total_size() {
    let pages = vec![page(&["A", "B", "C"]), page(&["D"]), page(&["E", "F"])];
    let client = MockWarehouseClient::with_pages(pages);
    let executor = QueryExecutor::new(&client, fast_backoff());

    let rows = executor.fetch_all("SELECT 1").await.unwrap();

    assert_eq!(rows.len(), 6);
    assert_eq!(client.counts().page_fetches, 2);
}

#[tokio::test]
async fn test_inter_and_intra_page_order_is_preserved() {
    let pages = vec![page(&["A", "B"]), page(&["C", "D"]), page(&["E"])];
    let client = MockWarehouseClient::with_pages(pages);
    let executor = QueryExecutor::new(&client, fast_backoff());

    let rows = executor.fetch_all("SELECT 1").await.unwrap();

    let gclids: Vec<&str> = rows.iter().map(|r| r.gclid.as_str()).collect();
    assert_eq!(gclids, vec!["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn test_single_page_needs_no_page_fetches() {
    let client = MockWarehouseClient::with_pages(vec![page(&["A"])]);
    let executor = QueryExecutor::new(&client, fast_backoff());

    let rows = executor.fetch_all("SELECT 1").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(client.counts().page_fetches, 0);
}

#[tokio::test]
async fn test_pagination_follows_a_pending_job() {
    let pages = vec![page(&["A"]), page(&["B"])];
    let client = MockWarehouseClient::with_pages(pages).pending_for(2);
    let executor = QueryExecutor::new(&client, fast_backoff());

    let rows = executor.fetch_all("SELECT 1").await.unwrap();

    let gclids: Vec<&str> = rows.iter().map(|r| r.gclid.as_str()).collect();
    assert_eq!(gclids, vec!["A", "B"]);
    assert_eq!(client.counts().polls, 2);
    assert_eq!(client.counts().page_fetches, 1);
}
