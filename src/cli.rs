//! Command-line argument parsing for conversion-sync.
//!
//! All flags are optional overrides on top of the config file; a bare
//! invocation runs the import with the configured values.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Imports conversion rows from a BigQuery table into a Google Sheet.
#[derive(Parser, Debug)]
#[command(name = "convsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cloud project containing the conversion dataset
    #[arg(short = 'p', long, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Dataset containing the conversion table
    #[arg(short = 'd', long, value_name = "DATASET")]
    pub dataset: Option<String>,

    /// Table holding the conversion rows
    #[arg(short = 't', long, value_name = "TABLE")]
    pub table: Option<String>,

    /// Spreadsheet to write the conversions to
    #[arg(short = 's', long, value_name = "ID")]
    pub spreadsheet_id: Option<String>,

    /// Worksheet within the spreadsheet
    #[arg(long, value_name = "NAME")]
    pub worksheet: Option<String>,

    /// Column range holding the output data (e.g. "A:D")
    #[arg(long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Only import conversions from the last N days
    #[arg(long, value_name = "DAYS")]
    pub lookback_days: Option<u32>,

    /// Run the pipeline against an in-memory sheet; nothing is written
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    /// Applies CLI flags onto the loaded configuration.
    ///
    /// Flags take precedence over config file values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.project.is_some() {
            config.warehouse.project = self.project.clone();
        }
        if self.dataset.is_some() {
            config.warehouse.dataset = self.dataset.clone();
        }
        if self.table.is_some() {
            config.warehouse.table = self.table.clone();
        }
        if self.lookback_days.is_some() {
            config.warehouse.lookback_days = self.lookback_days;
        }
        if self.spreadsheet_id.is_some() {
            config.sheet.spreadsheet_id = self.spreadsheet_id.clone();
        }
        if let Some(worksheet) = &self.worksheet {
            config.sheet.worksheet = worksheet.clone();
        }
        if let Some(range) = &self.range {
            config.sheet.range = range.clone();
        }
    }
}
