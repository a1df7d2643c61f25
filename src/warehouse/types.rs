//! Domain types for warehouse query results.

use std::fmt;

/// Fully-qualified reference to the conversion table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Cloud project containing the dataset.
    pub project: String,
    /// Dataset containing the conversion table.
    pub dataset: String,
    /// Table holding the conversion rows.
    pub table: String,
}

impl TableRef {
    /// Creates a new table reference.
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        }
    }

    /// Returns the `project.dataset.table` form used in queries.
    pub fn fully_qualified(&self) -> String {
        format!("{}.{}.{}", self.project, self.dataset, self.table)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fully_qualified())
    }
}

/// Opaque handle for a submitted query job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRef {
    /// Project the job runs in.
    pub project_id: String,
    /// Warehouse-assigned job identifier.
    pub job_id: String,
}

impl JobRef {
    /// Creates a new job reference.
    pub fn new(project_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            job_id: job_id.into(),
        }
    }
}

/// One conversion row retrieved from the warehouse.
///
/// Immutable once retrieved; the timestamp is pre-formatted by the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRow {
    /// Google click identifier.
    pub gclid: String,
    /// Conversion timestamp, formatted as `%Y-%m-%d %H:%M:%S`.
    pub conversion_time: String,
    /// Conversion value.
    pub value: f64,
    /// Conversion category code (key into the conversion map).
    pub category: String,
}

impl ConversionRow {
    /// Creates a new conversion row.
    pub fn new(
        gclid: impl Into<String>,
        conversion_time: impl Into<String>,
        value: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            gclid: gclid.into(),
            conversion_time: conversion_time.into(),
            value,
            category: category.into(),
        }
    }
}

/// One status/page response from the warehouse.
///
/// Returned both by query submission and by subsequent status or page
/// requests. `rows` and `page_token` are only meaningful once `complete`
/// is true.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// Handle for follow-up status and page requests.
    pub job: JobRef,
    /// Whether the job has finished.
    pub complete: bool,
    /// Rows in this page, already decoded.
    pub rows: Vec<ConversionRow>,
    /// Continuation token for the next page, if any.
    pub page_token: Option<String>,
}
