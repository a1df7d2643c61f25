//! BigQuery warehouse client.
//!
//! Implements the WarehouseClient trait against the BigQuery REST API v2
//! (`jobs.query` / `jobs.getQueryResults`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{ImportError, Result};
use crate::warehouse::types::{ConversionRow, JobRef, QueryResponse};
use crate::warehouse::WarehouseClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// BigQuery REST API base URL.
const BIGQUERY_API_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Environment variable holding the OAuth bearer token.
///
/// Authentication is delegated to the host environment, e.g.
/// `GOOGLE_ACCESS_TOKEN=$(gcloud auth print-access-token)`.
const TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// BigQuery client configuration.
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// OAuth bearer token.
    pub token: String,
    /// Project the query jobs run in.
    pub project_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// API base URL, overridable for emulators and tests.
    pub base_url: String,
}

impl BigQueryConfig {
    /// Creates a new config with the given token and project.
    pub fn new(token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project_id: project_id.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: BIGQUERY_API_URL.to_string(),
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
            .map_err(|e| ImportError::config(format!("Invalid warehouse API URL: {e}")))?;
        self.base_url = url.to_string().trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// BigQuery REST client.
#[derive(Debug, Clone)]
pub struct BigQueryClient {
    config: BigQueryConfig,
    client: Client,
}

impl BigQueryClient {
    /// Creates a new BigQuery client with the given configuration.
    pub fn new(config: BigQueryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImportError::query(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `GOOGLE_ACCESS_TOKEN` for the bearer token.
    pub fn from_env(project_id: impl Into<String>) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| ImportError::config(format!("{TOKEN_ENV} environment variable not set")))?;

        Self::new(BigQueryConfig::new(token, project_id))
    }

    fn queries_url(&self) -> String {
        format!(
            "{}/projects/{}/queries",
            self.config.base_url, self.config.project_id
        )
    }

    fn results_url(&self, job: &JobRef) -> String {
        format!(
            "{}/projects/{}/queries/{}",
            self.config.base_url, job.project_id, job.job_id
        )
    }

    /// Maps an API error response to an ImportError.
    ///
    /// Rate limits and server-side failures are transient; everything else
    /// is fatal.
    fn parse_error(status: reqwest::StatusCode, body: &str) -> ImportError {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ImportError::query(format!(
                "Authentication failed. Check your {TOKEN_ENV}."
            ));
        }

        let message = serde_json::from_str::<GoogleErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return ImportError::transient_query(format!("BigQuery error ({status}): {message}"));
        }

        ImportError::query(format!("BigQuery error ({status}): {message}"))
    }

    fn map_request_error(e: reqwest::Error) -> ImportError {
        if e.is_timeout() {
            ImportError::transient_query("Request to BigQuery timed out.")
        } else if e.is_connect() {
            ImportError::transient_query("Failed to connect to BigQuery. Check your network.")
        } else {
            ImportError::query(format!("Request failed: {}", e))
        }
    }

    async fn decode_response(response: reqwest::Response) -> Result<QueryResponse> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImportError::query(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        let body: QueryResultsBody = serde_json::from_str(&body)
            .map_err(|e| ImportError::query(format!("Failed to parse response: {}", e)))?;

        body.into_query_response()
    }
}

#[async_trait]
impl WarehouseClient for BigQueryClient {
    async fn submit_query(&self, sql: &str) -> Result<QueryResponse> {
        let request = QueryRequest {
            query: sql.to_string(),
            use_legacy_sql: false,
        };

        let response = self
            .client
            .post(self.queries_url())
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Self::decode_response(response).await
    }

    async fn query_results(
        &self,
        job: &JobRef,
        page_token: Option<&str>,
    ) -> Result<QueryResponse> {
        let mut request = self
            .client
            .get(self.results_url(job))
            .bearer_auth(&self.config.token);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(Self::map_request_error)?;

        Self::decode_response(response).await
    }
}

// BigQuery API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: String,
    use_legacy_sql: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResultsBody {
    job_reference: JobReferenceBody,
    #[serde(default)]
    job_complete: bool,
    #[serde(default)]
    rows: Vec<WireRow>,
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReferenceBody {
    project_id: String,
    job_id: String,
}

/// A result row on the wire: a list of cells `f`, each with a value `v`.
#[derive(Debug, Deserialize)]
struct WireRow {
    #[serde(default)]
    f: Vec<WireCell>,
}

#[derive(Debug, Deserialize)]
struct WireCell {
    #[serde(default)]
    v: serde_json::Value,
}

impl QueryResultsBody {
    fn into_query_response(self) -> Result<QueryResponse> {
        let rows = self
            .rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryResponse {
            job: JobRef::new(self.job_reference.project_id, self.job_reference.job_id),
            complete: self.job_complete,
            rows,
            page_token: self.page_token,
        })
    }
}

/// Decodes one wire row into a ConversionRow.
///
/// The query selects exactly four columns: gclId, conversionDateTime,
/// conversionValue, conversionType.
fn decode_row(row: &WireRow) -> Result<ConversionRow> {
    if row.f.len() != 4 {
        return Err(ImportError::query(format!(
            "Expected 4 columns per row, got {}",
            row.f.len()
        )));
    }

    Ok(ConversionRow {
        gclid: cell_str(&row.f[0], "gclId")?,
        conversion_time: cell_str(&row.f[1], "conversionDateTime")?,
        value: cell_f64(&row.f[2], "conversionValue")?,
        category: cell_str(&row.f[3], "conversionType")?,
    })
}

fn cell_str(cell: &WireCell, column: &str) -> Result<String> {
    match &cell.v {
        serde_json::Value::String(s) => Ok(s.clone()),
        other => Err(ImportError::query(format!(
            "Expected string for column {column}, got {other}"
        ))),
    }
}

/// BigQuery serializes numeric cells as JSON strings; accept bare numbers too.
fn cell_f64(cell: &WireCell, column: &str) -> Result<f64> {
    match &cell.v {
        serde_json::Value::String(s) => s.parse::<f64>().map_err(|_| {
            ImportError::query(format!("Invalid number for column {column}: '{s}'"))
        }),
        serde_json::Value::Number(n) => n.as_f64().ok_or_else(|| {
            ImportError::query(format!("Invalid number for column {column}: {n}"))
        }),
        other => Err(ImportError::query(format!(
            "Expected number for column {column}, got {other}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}
