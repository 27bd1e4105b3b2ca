//! BigQuery client with builder pattern.
//!
//! Submit a query with [`BigQueryClient::submit_query`], then block on
//! [`BigQueryClient::await_job`] until the job reaches a terminal state.
//! There is deliberately no timeout on the await: the runner waits
//! unconditionally for success or failure.

use crate::{
    auth::AuthProvider,
    error::{LinkError, Result},
    models::{ErrorResponse, JobOutcome, QueryJob, QueryParameter, QueryRequest, QueryResponse},
};
use log::{debug, warn};
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// BigQuery REST client.
///
/// Use [`BigQueryClient::builder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use bqbot_link::{AuthProvider, BigQueryClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BigQueryClient::builder()
///     .project_id("my-project")
///     .auth(AuthProvider::from_env())
///     .build()?;
///
/// let job = client.submit_query("SELECT 1", None).await?;
/// let outcome = client.await_job(job).await?;
/// println!("rows: {:?}", outcome.total_rows);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BigQueryClient {
    base_url: String,
    project_id: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
}

impl BigQueryClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> BigQueryClientBuilder {
        BigQueryClientBuilder::new()
    }

    /// The project this client submits jobs under
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Probe the service with a cheap request to confirm the project is
    /// reachable with the current credentials. Used at startup; a failure
    /// here is fatal for the runner.
    pub async fn ping(&self) -> Result<()> {
        let url = format!(
            "{}/projects/{}/datasets?maxResults=1",
            self.base_url, self.project_id
        );
        debug!("[LINK_PING] GET {}", url);

        let mut req = self.http_client.get(&url);
        req = self.auth.apply_to_request(req)?;

        let response = req.send().await?;
        let status = response.status();
        debug!("[LINK_PING] status={}", status);

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(status.as_u16(), response).await)
        }
    }

    /// Submit a SQL statement as one query job.
    ///
    /// Returns immediately with a [`QueryJob`]; the job may or may not have
    /// completed yet. Call [`await_job`](Self::await_job) to block until it
    /// has.
    pub async fn submit_query(
        &self,
        sql: &str,
        params: Option<Vec<QueryParameter>>,
    ) -> Result<QueryJob> {
        let request = QueryRequest::new(sql.to_string(), params);
        let url = format!("{}/projects/{}/queries", self.base_url, self.project_id);

        debug!(
            "[LINK_QUERY] Submitting: \"{}\" (len={})",
            sql_preview(sql).replace('\n', " "),
            sql.len()
        );

        let mut req = self.http_client.post(&url).json(&request);
        req = self.auth.apply_to_request(req)?;

        let start = Instant::now();
        let response = req.send().await?;
        let status = response.status();
        debug!(
            "[LINK_QUERY] Response: status={} duration_ms={}",
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(Self::error_from_response(status.as_u16(), response).await);
        }

        let query_response: QueryResponse = response.json().await?;
        Ok(QueryJob::new(query_response))
    }

    /// Block until the job reaches a terminal state.
    ///
    /// Polls `jobs.getQueryResults` every 500ms while the job is running.
    /// A job that completed with errors returns `Err(LinkError::JobError)`.
    pub async fn await_job(&self, job: QueryJob) -> Result<JobOutcome> {
        let mut response = job.initial;

        loop {
            // `errors` alone can carry non-fatal warnings; only `errorResult`
            // marks the job as failed.
            if let Some(fatal) = &response.error_result {
                warn!(
                    "[LINK_JOB] Job failed: reason={:?} message=\"{}\"",
                    fatal.reason, fatal.message
                );
                return Err(LinkError::JobError {
                    reason: fatal.reason.clone().unwrap_or_else(|| "unknown".to_string()),
                    message: fatal.message.clone(),
                });
            }

            if response.job_complete.unwrap_or(false) {
                if let Some(warnings) = &response.errors {
                    for warning in warnings {
                        warn!(
                            "[LINK_JOB] Job warning: reason={:?} message=\"{}\"",
                            warning.reason, warning.message
                        );
                    }
                }
                return Ok(JobOutcome::from_response(response));
            }

            let job_ref = response.job_reference.as_ref().ok_or_else(|| {
                LinkError::SerializationError(
                    "incomplete job response without jobReference".to_string(),
                )
            })?;

            debug!(
                "[LINK_JOB] Job {} not complete, polling in {:?}",
                job_ref.job_id, POLL_INTERVAL
            );
            tokio::time::sleep(POLL_INTERVAL).await;

            let mut url = format!(
                "{}/projects/{}/queries/{}",
                self.base_url, job_ref.project_id, job_ref.job_id
            );
            if let Some(location) = &job_ref.location {
                url.push_str(&format!("?location={}", location));
            }

            let mut req = self.http_client.get(&url);
            req = self.auth.apply_to_request(req)?;

            let poll_response = req.send().await?;
            let status = poll_response.status();
            if !status.is_success() {
                return Err(Self::error_from_response(status.as_u16(), poll_response).await);
            }

            response = poll_response.json().await?;
        }
    }

    /// Convert a non-2xx HTTP response into a ServiceError, extracting the
    /// message from BigQuery's error envelope when the body parses as one.
    async fn error_from_response(status_code: u16, response: reqwest::Response) -> LinkError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(envelope) => envelope.error.message,
            Err(_) => body,
        };

        warn!(
            "[LINK_HTTP] Service error: status={} message=\"{}\"",
            status_code, message
        );

        LinkError::ServiceError {
            status_code,
            message,
        }
    }
}

/// First 80 chars of the SQL for log lines. Truncates on a char boundary;
/// script text is arbitrary UTF-8 (comments, string literals).
fn sql_preview(sql: &str) -> String {
    const MAX_PREVIEW_BYTES: usize = 80;
    if sql.len() <= MAX_PREVIEW_BYTES {
        return sql.to_string();
    }
    let mut end = MAX_PREVIEW_BYTES;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end])
}

/// Builder for [`BigQueryClient`]
pub struct BigQueryClientBuilder {
    base_url: String,
    project_id: Option<String>,
    auth: AuthProvider,
    timeout: Duration,
}

impl BigQueryClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: None,
            auth: AuthProvider::None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the API base URL (emulators, test servers)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the project jobs are submitted under (required)
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Per-request HTTP timeout. Does not bound how long a job may run;
    /// polling continues indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<BigQueryClient> {
        let project_id = self
            .project_id
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                LinkError::ConfigurationError("project id must not be empty".to_string())
            })?;

        let base_url = self.base_url.trim_end_matches('/').to_string();

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LinkError::ConfigurationError(e.to_string()))?;

        Ok(BigQueryClient {
            base_url,
            project_id,
            http_client,
            auth: self.auth,
        })
    }
}

impl Default for BigQueryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_requires_project_id() {
        let err = BigQueryClient::builder().build().unwrap_err();
        assert!(matches!(err, LinkError::ConfigurationError(_)));

        let err = BigQueryClient::builder().project_id("  ").build().unwrap_err();
        assert!(matches!(err, LinkError::ConfigurationError(_)));
    }

    #[test]
    fn test_sql_preview_truncates_on_char_boundary() {
        // 80th byte falls inside the two-byte 'é'; truncation backs up to 79
        let sql = format!("{}é comment", "-".repeat(79));
        let preview = sql_preview(&sql);
        assert_eq!(preview, format!("{}...", "-".repeat(79)));

        let short = "SELECT 1";
        assert_eq!(sql_preview(short), short);

        let exact = "x".repeat(80);
        assert_eq!(sql_preview(&exact), exact);
    }

    #[tokio::test]
    async fn test_await_job_fails_on_error_result_only() {
        let client = BigQueryClient::builder().project_id("demo").build().unwrap();

        let failed: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "errorResult": {"reason": "invalidQuery", "message": "Syntax error at [1:1]"},
            "errors": [{"reason": "invalidQuery", "message": "Syntax error at [1:1]"}]
        }))
        .unwrap();
        let err = client.await_job(QueryJob::new(failed)).await.unwrap_err();
        assert!(matches!(err, LinkError::JobError { .. }));
        assert!(err.is_service_error());
    }

    #[tokio::test]
    async fn test_await_job_tolerates_warnings_on_completed_job() {
        let client = BigQueryClient::builder().project_id("demo").build().unwrap();

        let completed: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "totalRows": "3",
            "errors": [{"reason": "billingTierLimitExceeded", "message": "slow query"}]
        }))
        .unwrap();
        let outcome = client.await_job(QueryJob::new(completed)).await.unwrap();
        assert_eq!(outcome.total_rows, Some(3));
    }

    #[test]
    fn test_builder_normalizes_base_url() {
        let client = BigQueryClient::builder()
            .project_id("demo")
            .base_url("http://localhost:9050/bigquery/v2/")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "http://localhost:9050/bigquery/v2");
        assert_eq!(client.project_id(), "demo");
    }
}
