//! Conversion category mapping.
//!
//! Translates warehouse-side category codes into the conversion action
//! names the Ads import expects. The map is fixed at configuration time and
//! read-only during a run; lookups return an explicit found/not-found result
//! and misses are handled per the configured policy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ImportError, Result};
use crate::sheet::CellValue;
use crate::warehouse::ConversionRow;

/// What to do with a row whose category has no map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissPolicy {
    /// Abort the run, naming the offending category.
    #[default]
    Fail,
    /// Drop the row and count it.
    Skip,
    /// Write the raw category code as the conversion name.
    Raw,
}

impl MissPolicy {
    /// Returns the policy as a string for display purposes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Raw => "raw",
        }
    }
}

/// Static mapping from conversion category code to conversion action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionMap {
    entries: HashMap<String, String>,
}

impl ConversionMap {
    /// Creates a map from explicit entries.
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Returns the default map shipped with the tool.
    pub fn default_entries() -> HashMap<String, String> {
        HashMap::from([
            ("PURCHASE".to_string(), "Revenue".to_string()),
            ("ADD_TO_BASKET".to_string(), "Add to basket".to_string()),
            (
                "PRODUCT_DETAILS_VIEW".to_string(),
                "Landing page view".to_string(),
            ),
        ])
    }

    /// Looks up the conversion action name for a category code.
    pub fn display_name(&self, category: &str) -> Option<&str> {
        self.entries.get(category).map(String::as_str)
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ConversionMap {
    fn default() -> Self {
        Self::new(Self::default_entries())
    }
}

/// Maps one conversion row to an output row.
///
/// Output column order is gclid, conversion name, conversion time, value.
/// Returns `Ok(None)` when the category is unmapped and the policy is
/// `Skip`; fails under `Fail`; passes the raw code through under `Raw`.
pub fn map_row(
    row: &ConversionRow,
    map: &ConversionMap,
    policy: MissPolicy,
) -> Result<Option<Vec<CellValue>>> {
    let name = match map.display_name(&row.category) {
        Some(name) => name,
        None => match policy {
            MissPolicy::Fail => {
                return Err(ImportError::mapping(format!(
                    "no conversion action for category '{}'",
                    row.category
                )))
            }
            MissPolicy::Skip => return Ok(None),
            MissPolicy::Raw => row.category.as_str(),
        },
    };

    Ok(Some(vec![
        CellValue::from(row.gclid.as_str()),
        CellValue::from(name),
        CellValue::from(row.conversion_time.as_str()),
        CellValue::from(row.value),
    ]))
}
