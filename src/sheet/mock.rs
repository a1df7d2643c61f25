//! Mock sheet clients for testing.
//!
//! `MockSheetClient` keeps the sheet in memory and records the order of
//! operations, so tests can assert that the header lands right after the
//! clear and that rows arrive in input order.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{CellValue, SheetClient};
use crate::error::{ImportError, Result};

/// One recorded sheet operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetOp {
    /// A clear of the given range.
    Clear(String),
    /// An append of the given number of rows.
    Append(usize),
}

#[derive(Debug, Default)]
struct SheetState {
    rows: Vec<Vec<CellValue>>,
    ops: Vec<SheetOp>,
}

/// An in-memory sheet that records every operation.
#[derive(Debug, Default)]
pub struct MockSheetClient {
    state: Mutex<SheetState>,
}

impl MockSheetClient {
    /// Creates an empty in-memory sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the sheet content.
    pub fn rows(&self) -> Vec<Vec<CellValue>> {
        self.state.lock().unwrap().rows.clone()
    }

    /// Returns the operations performed so far, in order.
    pub fn ops(&self) -> Vec<SheetOp> {
        self.state.lock().unwrap().ops.clone()
    }
}

#[async_trait]
impl SheetClient for MockSheetClient {
    async fn clear(&self, range: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.rows.clear();
        state.ops.push(SheetOp::Clear(range.to_string()));
        Ok(())
    }

    async fn append(&self, _range: &str, rows: &[Vec<CellValue>]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.rows.extend(rows.iter().cloned());
        state.ops.push(SheetOp::Append(rows.len()));
        Ok(())
    }
}

/// A sheet client whose every call fails, for error-path tests.
pub struct FailingSheetClient;

#[async_trait]
impl SheetClient for FailingSheetClient {
    async fn clear(&self, _range: &str) -> Result<()> {
        Err(ImportError::sheet("mock sheet failure"))
    }

    async fn append(&self, _range: &str, _rows: &[Vec<CellValue>]) -> Result<()> {
        Err(ImportError::sheet("mock sheet failure"))
    }
}
