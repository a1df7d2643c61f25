//! The import pipeline.
//!
//! Wires the three stages together: fetch conversion rows from the
//! warehouse, prepare the output sheet, then map and write the rows.
//! Stages run strictly in sequence.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::extract::{conversion_query, QueryExecutor};
use crate::load::SheetWriter;
use crate::mapping::{map_row, MissPolicy};
use crate::sheet::SheetClient;
use crate::warehouse::WarehouseClient;

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows retrieved from the warehouse.
    pub fetched: usize,
    /// Rows written to the sheet (excluding the header).
    pub written: usize,
    /// Rows dropped by the `skip` miss policy.
    pub skipped: usize,
}

/// Runs the conversion import end to end.
pub struct Importer<'a> {
    warehouse: &'a dyn WarehouseClient,
    sheet: &'a dyn SheetClient,
    config: &'a Config,
}

impl<'a> Importer<'a> {
    /// Creates a new importer over the given clients and configuration.
    pub fn new(
        warehouse: &'a dyn WarehouseClient,
        sheet: &'a dyn SheetClient,
        config: &'a Config,
    ) -> Self {
        Self {
            warehouse,
            sheet,
            config,
        }
    }

    /// Executes the import: extract, prepare, map and write.
    pub async fn run(&self) -> Result<ImportSummary> {
        let table = self.config.table_ref()?;
        info!(table = %table, "starting conversion import");

        let sql = conversion_query(&table, self.config.warehouse.lookback_days);
        let executor = QueryExecutor::new(self.warehouse, self.config.poll.clone());
        let rows = executor.fetch_all(&sql).await?;

        let writer = SheetWriter::new(self.sheet, self.config.full_range());
        writer.prepare().await?;

        let map = self.config.conversion_map();
        let policy = self.config.import.on_unmapped;

        let mut output = Vec::with_capacity(rows.len());
        let mut skipped = 0;
        for row in &rows {
            match map_row(row, &map, policy)? {
                Some(out) => output.push(out),
                None => {
                    warn!(gclid = %row.gclid, category = %row.category, "skipping unmapped row");
                    skipped += 1;
                }
            }
        }

        writer.write_rows(&output).await?;

        let summary = ImportSummary {
            fetched: rows.len(),
            written: output.len(),
            skipped,
        };
        info!(
            fetched = summary.fetched,
            written = summary.written,
            skipped = summary.skipped,
            "import complete"
        );
        Ok(summary)
    }
}
