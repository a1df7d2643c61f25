//! Output sheet abstraction layer.
//!
//! Provides a trait-based interface for the tabular output destination,
//! allowing the real Google Sheets backend and in-memory test doubles to be
//! used interchangeably.

mod mock;
mod sheets;

pub use mock::{FailingSheetClient, MockSheetClient, SheetOp};
pub use sheets::{GoogleSheetsClient, SheetsConfig};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single sheet cell value.
///
/// Serializes untagged, so rows go over the wire as plain JSON arrays of
/// strings and numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// Trait defining the interface to the output sheet.
///
/// Writes are append-only and ordered; clearing a range is idempotent.
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Clears all values in the given range.
    ///
    /// Clearing an already-empty range is a no-op.
    async fn clear(&self, range: &str) -> Result<()>;

    /// Appends rows after the current content of the given range.
    async fn append(&self, range: &str, rows: &[Vec<CellValue>]) -> Result<()>;
}
