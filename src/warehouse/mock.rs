//! Mock warehouse clients for testing.
//!
//! `MockWarehouseClient` serves a scripted job: a configurable number of
//! incomplete status responses, then the result pages linked by continuation
//! tokens. Call counts are recorded so tests can assert on polling and
//! pagination behavior.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{ConversionRow, JobRef, QueryResponse, WarehouseClient};
use crate::error::{ImportError, Result};

/// Call counts recorded by [`MockWarehouseClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// Number of query submissions.
    pub submits: u32,
    /// Number of status checks (no page token).
    pub polls: u32,
    /// Number of page fetches (with a page token).
    pub page_fetches: u32,
}

#[derive(Debug, Default)]
struct MockState {
    /// Responses (submit or poll) left to report as incomplete.
    incomplete: u32,
    /// Polls left to fail with a transient error before answering.
    transient_failures: u32,
    counts: CallCounts,
}

/// A mock warehouse client that returns scripted result pages.
pub struct MockWarehouseClient {
    pages: Vec<Vec<ConversionRow>>,
    state: Mutex<MockState>,
}

impl MockWarehouseClient {
    /// Creates a mock whose job completes immediately with a single page.
    pub fn with_rows(rows: Vec<ConversionRow>) -> Self {
        Self::with_pages(vec![rows])
    }

    /// Creates a mock whose job completes immediately with the given pages.
    pub fn with_pages(pages: Vec<Vec<ConversionRow>>) -> Self {
        Self {
            pages,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Reports the job incomplete for the first `count` status responses.
    pub fn pending_for(self, count: u32) -> Self {
        self.state.lock().unwrap().incomplete = count;
        self
    }

    /// Fails the first `count` status checks with a transient error.
    pub fn transient_failures(self, count: u32) -> Self {
        self.state.lock().unwrap().transient_failures = count;
        self
    }

    /// Returns the call counts recorded so far.
    pub fn counts(&self) -> CallCounts {
        self.state.lock().unwrap().counts
    }

    fn job() -> JobRef {
        JobRef::new("mock-project", "mock-job")
    }

    fn incomplete_response() -> QueryResponse {
        QueryResponse {
            job: Self::job(),
            complete: false,
            rows: Vec::new(),
            page_token: None,
        }
    }

    fn page_response(&self, index: usize) -> Result<QueryResponse> {
        let rows = match self.pages.get(index) {
            Some(rows) => rows.clone(),
            None if index == 0 => Vec::new(),
            None => {
                return Err(ImportError::internal(format!(
                    "no page at index {index}"
                )))
            }
        };

        let page_token = if index + 1 < self.pages.len() {
            Some(format!("page-{}", index + 1))
        } else {
            None
        };

        Ok(QueryResponse {
            job: Self::job(),
            complete: true,
            rows,
            page_token,
        })
    }

    /// Advances the scripted job status; returns true once complete.
    fn advance_status(state: &mut MockState) -> bool {
        if state.incomplete > 0 {
            state.incomplete -= 1;
            false
        } else {
            true
        }
    }
}

#[async_trait]
impl WarehouseClient for MockWarehouseClient {
    async fn submit_query(&self, _sql: &str) -> Result<QueryResponse> {
        let mut state = self.state.lock().unwrap();
        state.counts.submits += 1;

        if Self::advance_status(&mut state) {
            drop(state);
            self.page_response(0)
        } else {
            Ok(Self::incomplete_response())
        }
    }

    async fn query_results(
        &self,
        _job: &JobRef,
        page_token: Option<&str>,
    ) -> Result<QueryResponse> {
        let mut state = self.state.lock().unwrap();

        match page_token {
            None => {
                state.counts.polls += 1;

                if state.transient_failures > 0 {
                    state.transient_failures -= 1;
                    return Err(ImportError::transient_query("mock outage"));
                }

                if Self::advance_status(&mut state) {
                    drop(state);
                    self.page_response(0)
                } else {
                    Ok(Self::incomplete_response())
                }
            }
            Some(token) => {
                state.counts.page_fetches += 1;
                drop(state);

                let index = token
                    .strip_prefix("page-")
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or_else(|| {
                        ImportError::internal(format!("unknown page token '{token}'"))
                    })?;
                self.page_response(index)
            }
        }
    }
}

/// A warehouse client whose every call fails, for error-path tests.
pub struct FailingWarehouseClient;

#[async_trait]
impl WarehouseClient for FailingWarehouseClient {
    async fn submit_query(&self, _sql: &str) -> Result<QueryResponse> {
        Err(ImportError::query("mock warehouse failure"))
    }

    async fn query_results(
        &self,
        _job: &JobRef,
        _page_token: Option<&str>,
    ) -> Result<QueryResponse> {
        Err(ImportError::query("mock warehouse failure"))
    }
}
