//! Sheet preparation and row writing stage.
//!
//! Clears the output range, writes the header row, then appends the mapped
//! data rows. The header always lands first; data rows follow in the order
//! they were produced.

use tracing::info;

use crate::error::Result;
use crate::sheet::{CellValue, SheetClient};

/// Column headers, matching the Ads import template.
pub const HEADERS: [&str; 4] = [
    "Google Click ID",
    "Conversion Name",
    "Conversion Time",
    "Conversion value",
];

/// Writes the header and data rows into one range of a sheet.
pub struct SheetWriter<'a> {
    sheet: &'a dyn SheetClient,
    range: String,
}

impl<'a> SheetWriter<'a> {
    /// Creates a new writer for the given range, e.g. `Sheet1!A:D`.
    pub fn new(sheet: &'a dyn SheetClient, range: impl Into<String>) -> Self {
        Self {
            sheet,
            range: range.into(),
        }
    }

    /// Clears the range and writes the header row.
    pub async fn prepare(&self) -> Result<()> {
        info!(range = %self.range, "clearing output range");
        self.sheet.clear(&self.range).await?;

        info!("writing header row");
        self.sheet.append(&self.range, &[header_row()]).await
    }

    /// Appends data rows after the current content.
    pub async fn write_rows(&self, rows: &[Vec<CellValue>]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        info!(rows = rows.len(), "writing rows to sheet");
        self.sheet.append(&self.range, rows).await
    }
}

/// Returns the header as a sheet row.
pub fn header_row() -> Vec<CellValue> {
    HEADERS.iter().map(|h| CellValue::from(*h)).collect()
}
