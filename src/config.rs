//! Configuration management for conversion-sync.
//!
//! Handles loading configuration from TOML files with environment-variable
//! fallbacks for the warehouse and sheet identifiers. All identifiers are
//! validated before the first network call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};
use crate::mapping::{ConversionMap, MissPolicy};
use crate::poll::BackoffPolicy;
use crate::warehouse::TableRef;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Warehouse (BigQuery) settings.
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Output sheet settings.
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Row mapping settings.
    #[serde(default)]
    pub import: ImportConfig,

    /// Job-status polling schedule.
    #[serde(default)]
    pub poll: BackoffPolicy,
}

/// Warehouse settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WarehouseConfig {
    /// Cloud project containing the conversion dataset.
    pub project: Option<String>,

    /// Dataset containing the conversion table.
    pub dataset: Option<String>,

    /// Table holding the conversion rows.
    pub table: Option<String>,

    /// Only import conversions from the last N days; omit for all rows.
    pub lookback_days: Option<u32>,

    /// API base URL override (emulators, tests).
    pub api_url: Option<String>,
}

/// Output sheet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet to write the conversions to.
    pub spreadsheet_id: Option<String>,

    /// Worksheet within the spreadsheet.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// Column range holding the output data.
    #[serde(default = "default_range")]
    pub range: String,

    /// API base URL override (tests).
    pub api_url: Option<String>,
}

fn default_worksheet() -> String {
    "Sheet1".to_string()
}

fn default_range() -> String {
    "A:D".to_string()
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet: default_worksheet(),
            range: default_range(),
            api_url: None,
        }
    }
}

/// Row mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// What to do with rows whose category has no map entry.
    #[serde(default)]
    pub on_unmapped: MissPolicy,

    /// Category code to conversion action name.
    #[serde(default = "ConversionMap::default_entries")]
    pub conversion_map: HashMap<String, String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            on_unmapped: MissPolicy::default(),
            conversion_map: ConversionMap::default_entries(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("conversion-sync")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the built-in defaults; identifiers then have to
    /// come from CLI flags or the environment.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ImportError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ImportError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment variables as defaults for missing identifiers.
    pub fn apply_env_defaults(&mut self) {
        if self.warehouse.project.is_none() {
            self.warehouse.project = std::env::var("GCP_PROJECT").ok();
        }
        if self.warehouse.dataset.is_none() {
            self.warehouse.dataset = std::env::var("GCP_DATASET").ok();
        }
        if self.warehouse.table.is_none() {
            self.warehouse.table = std::env::var("GCP_TABLE").ok();
        }
        if self.sheet.spreadsheet_id.is_none() {
            self.sheet.spreadsheet_id = std::env::var("SPREADSHEET_ID").ok();
        }
    }

    /// Validates the configuration, failing fast before any network call.
    pub fn validate(&self) -> Result<()> {
        self.table_ref()?;
        self.spreadsheet_id()?;

        if self.sheet.worksheet.is_empty() {
            return Err(ImportError::config("sheet.worksheet must not be empty"));
        }
        if self.sheet.range.is_empty() {
            return Err(ImportError::config("sheet.range must not be empty"));
        }
        if self.import.conversion_map.is_empty() {
            return Err(ImportError::config(
                "import.conversion_map must not be empty",
            ));
        }
        if self.poll.multiplier < 1.0 {
            return Err(ImportError::config(
                "poll.multiplier must be at least 1.0",
            ));
        }

        Ok(())
    }

    /// Returns the fully-qualified conversion table reference.
    pub fn table_ref(&self) -> Result<TableRef> {
        let project = require(&self.warehouse.project, "warehouse.project")?;
        let dataset = require(&self.warehouse.dataset, "warehouse.dataset")?;
        let table = require(&self.warehouse.table, "warehouse.table")?;

        Ok(TableRef::new(project, dataset, table))
    }

    /// Returns the spreadsheet id.
    pub fn spreadsheet_id(&self) -> Result<&str> {
        require(&self.sheet.spreadsheet_id, "sheet.spreadsheet_id")
    }

    /// Returns the full output range, e.g. `Sheet1!A:D`.
    pub fn full_range(&self) -> String {
        format!("{}!{}", self.sheet.worksheet, self.sheet.range)
    }

    /// Returns the conversion map.
    pub fn conversion_map(&self) -> ConversionMap {
        ConversionMap::new(self.import.conversion_map.clone())
    }
}

fn require<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ImportError::config(format!("{name} is not set"))),
    }
}
