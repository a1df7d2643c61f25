//! Google Sheets output client.
//!
//! Implements the SheetClient trait against the Sheets REST API v4
//! (`values:clear` / `values:append`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{CellValue, SheetClient};
use crate::error::{ImportError, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sheets REST API base URL.
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";

/// Environment variable holding the OAuth bearer token.
const TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// Sheets client configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// OAuth bearer token.
    pub token: String,
    /// Spreadsheet to write to.
    pub spreadsheet_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// API base URL, overridable for tests.
    pub base_url: String,
}

impl SheetsConfig {
    /// Creates a new config with the given token and spreadsheet id.
    pub fn new(token: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            spreadsheet_id: spreadsheet_id.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: SHEETS_API_URL.to_string(),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the API base URL after validating it.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| ImportError::config(format!("Invalid sheet API URL: {e}")))?;
        self.base_url = url.to_string().trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Google Sheets REST client.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    config: SheetsConfig,
    client: Client,
}

impl GoogleSheetsClient {
    /// Creates a new Sheets client with the given configuration.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImportError::sheet(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `GOOGLE_ACCESS_TOKEN` for the bearer token.
    pub fn from_env(spreadsheet_id: impl Into<String>) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| ImportError::config(format!("{TOKEN_ENV} environment variable not set")))?;

        Self::new(SheetsConfig::new(token, spreadsheet_id))
    }

    fn values_url(&self, range: &str, verb: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}:{}",
            self.config.base_url, self.config.spreadsheet_id, range, verb
        )
    }

    /// Maps an API error response to an ImportError.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> ImportError {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ImportError::sheet(format!("Authentication failed. Check your {TOKEN_ENV}."));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return ImportError::sheet("Spreadsheet not found. Check the spreadsheet id.");
        }

        let message = serde_json::from_str::<GoogleErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        ImportError::sheet(format!("Sheets API error ({status}): {message}"))
    }

    fn map_request_error(e: reqwest::Error) -> ImportError {
        if e.is_timeout() {
            ImportError::sheet("Request to Sheets API timed out.")
        } else if e.is_connect() {
            ImportError::sheet("Failed to connect to Sheets API. Check your network.")
        } else {
            ImportError::sheet(format!("Request failed: {}", e))
        }
    }

    async fn check_response(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::parse_error(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    async fn clear(&self, range: &str) -> Result<()> {
        let response = self
            .client
            .post(self.values_url(range, "clear"))
            .bearer_auth(&self.config.token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Self::check_response(response).await
    }

    async fn append(&self, range: &str, rows: &[Vec<CellValue>]) -> Result<()> {
        let request = AppendRequest {
            major_dimension: "ROWS",
            values: rows.to_vec(),
        };

        let response = self
            .client
            .post(self.values_url(range, "append"))
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Self::check_response(response).await
    }
}

// Sheets API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppendRequest {
    major_dimension: &'static str,
    values: Vec<Vec<CellValue>>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}
