//! REST job backend for the BigQuery v2 API.
//!
//! Statements are submitted through `jobs.query`, which starts a job and
//! waits server-side for up to [`SERVER_WAIT_MS`]. Jobs that outlive that
//! window are driven to completion by polling `jobs.getQueryResults`, which
//! is also used to drain additional result pages. The returned [`QueryJob`]
//! always holds the complete materialized row set.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::client::{FieldSchema, JobClient, QueryJob, Row};
use crate::error::ClientError;

/// Default BigQuery REST API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Server-side completion wait requested per `jobs.query` / `getQueryResults`
/// call (milliseconds).
pub const SERVER_WAIT_MS: u64 = 10_000;

/// Default interval between completion polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default overall deadline for a job to reach a terminal state.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(300);

/// Job client backed by the BigQuery REST API.
pub struct RestJobClient {
    http: reqwest::Client,
    endpoint: String,
    project: String,
    token: String,
    location: Option<String>,
    poll_interval: Duration,
    completion_timeout: Duration,
}

impl RestJobClient {
    /// Create a client for the given project, authenticating every request
    /// with the supplied bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the underlying HTTP client cannot be built.
    pub fn new(
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project: project.into(),
            token: token.into(),
            location: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        })
    }

    /// Set the processing location (region) for submitted jobs.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Override the API endpoint. Intended for emulators and tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the interval between completion polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall deadline for job completion.
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Fetch one page of results for a running or completed job.
    async fn get_query_results(
        &self,
        job_ref: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, ClientError> {
        let url = format!(
            "{}/projects/{}/queries/{}",
            self.endpoint, self.project, job_ref.job_id
        );
        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("timeoutMs", SERVER_WAIT_MS.to_string())]);
        if let Some(location) = job_ref.location.as_deref().or(self.location.as_deref()) {
            request = request.query(&[("location", location)]);
        }
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl JobClient for RestJobClient {
    async fn submit(&self, sql: &str) -> Result<QueryJob, ClientError> {
        let url = format!("{}/projects/{}/queries", self.endpoint, self.project);
        let request = QueryRequest {
            query: sql,
            use_legacy_sql: false,
            location: self.location.as_deref(),
            timeout_ms: SERVER_WAIT_MS,
        };

        tracing::debug!(project = %self.project, "submitting query job");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        let mut body: QueryResponse = check_status(response).await?.json().await?;

        let job_ref = body
            .job_reference
            .clone()
            .ok_or_else(|| ClientError::Malformed("response is missing jobReference".to_string()))?;

        // Drive the job to a terminal state.
        let deadline = Instant::now() + self.completion_timeout;
        while !body.job_complete.unwrap_or(false) {
            if Instant::now() >= deadline {
                return Err(ClientError::JobTimeout {
                    job_id: job_ref.job_id.clone(),
                    timeout_ms: self.completion_timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
            tracing::debug!(job_id = %job_ref.job_id, "polling for job completion");
            body = self.get_query_results(&job_ref, None).await?;
        }

        // Materialize the full row set, draining additional pages.
        let schema = body.schema.take();
        let is_dml = body.num_dml_affected_rows.is_some();
        let mut rows = collect_rows(body.rows.take());
        let mut page_token = body.page_token.take();
        while let Some(token) = page_token {
            tracing::debug!(job_id = %job_ref.job_id, "fetching next result page");
            let mut page = self.get_query_results(&job_ref, Some(&token)).await?;
            rows.extend(collect_rows(page.rows.take()));
            page_token = page.page_token.take();
        }

        Ok(build_job(&job_ref.job_id, schema, rows, is_dml))
    }
}

/// Turn a terminal API response into a [`QueryJob`].
///
/// DML jobs and jobs without a result schema carry no row set; their rows
/// are `None` so that materialization fails the way the cursor expects.
fn build_job(
    job_id: &str,
    schema: Option<TableSchema>,
    rows: Vec<Row>,
    is_dml: bool,
) -> QueryJob {
    let fields: Vec<FieldSchema> = schema
        .map(|s| {
            s.fields
                .into_iter()
                .map(|f| FieldSchema {
                    name: f.name,
                    field_type: f.field_type,
                })
                .collect()
        })
        .unwrap_or_default();

    let row_set = if is_dml || fields.is_empty() {
        None
    } else {
        Some(rows)
    };
    QueryJob::new(job_id, fields, row_set)
}

/// Flatten the API's cell encoding (`rows[].f[].v`) into plain value rows.
fn collect_rows(rows: Option<Vec<TableRow>>) -> Vec<Row> {
    rows.unwrap_or_default()
        .into_iter()
        .map(|row| row.f.into_iter().map(|cell| cell.v).collect())
        .collect()
}

/// Map non-success HTTP responses to an API error with the server's message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    job_reference: Option<JobReference>,
    job_complete: Option<bool>,
    schema: Option<TableSchema>,
    rows: Option<Vec<TableRow>>,
    page_token: Option<String>,
    num_dml_affected_rows: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Deserialize)]
struct TableFieldSchema {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    v: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn select_response() -> QueryResponse {
        serde_json::from_value(json!({
            "kind": "bigquery#queryResponse",
            "jobReference": { "projectId": "p", "jobId": "job_select", "location": "EU" },
            "jobComplete": true,
            "schema": { "fields": [
                { "name": "id", "type": "INT64", "mode": "NULLABLE" },
                { "name": "name", "type": "STRING", "mode": "NULLABLE" }
            ]},
            "totalRows": "2",
            "rows": [
                { "f": [ { "v": "1" }, { "v": "alpha" } ] },
                { "f": [ { "v": "2" }, { "v": null } ] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_select_response() {
        let body = select_response();
        assert_eq!(body.job_complete, Some(true));
        let job_ref = body.job_reference.unwrap();
        assert_eq!(job_ref.job_id, "job_select");
        assert_eq!(job_ref.location.as_deref(), Some("EU"));
        assert_eq!(body.schema.unwrap().fields.len(), 2);
    }

    #[test]
    fn test_build_job_from_select_response() {
        let mut body = select_response();
        let rows = collect_rows(body.rows.take());
        let job = build_job("job_select", body.schema.take(), rows, false);

        assert_eq!(job.schema().len(), 2);
        assert_eq!(job.schema()[0].name, "id");
        assert_eq!(job.schema()[1].field_type, "STRING");

        let rows = job.into_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![json!("1"), json!("alpha")]);
        assert_eq!(rows[1], vec![json!("2"), Value::Null]);
    }

    #[test]
    fn test_build_job_from_dml_response() {
        let body: QueryResponse = serde_json::from_value(json!({
            "jobReference": { "jobId": "job_dml" },
            "jobComplete": true,
            "numDmlAffectedRows": "3"
        }))
        .unwrap();
        assert!(body.num_dml_affected_rows.is_some());

        let job = build_job("job_dml", None, Vec::new(), true);
        assert!(matches!(job.into_rows(), Err(ClientError::NoRowSet)));
    }

    #[test]
    fn test_incomplete_response_has_no_rows_yet() {
        let body: QueryResponse = serde_json::from_value(json!({
            "jobReference": { "jobId": "job_slow" },
            "jobComplete": false
        }))
        .unwrap();
        assert_eq!(body.job_complete, Some(false));
        assert!(body.rows.is_none());
        assert!(body.schema.is_none());
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error": {"code": 403, "message": "Quota exceeded", "status": "PERMISSION_DENIED"}}"#;
        let parsed: ErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Quota exceeded");
    }

    #[test]
    fn test_query_request_serialization() {
        let request = QueryRequest {
            query: "SELECT 1",
            use_legacy_sql: false,
            location: None,
            timeout_ms: SERVER_WAIT_MS,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["query"], "SELECT 1");
        assert_eq!(value["useLegacySql"], false);
        assert!(value.get("location").is_none());
        assert_eq!(value["timeoutMs"], 10_000);
    }

    #[test]
    fn test_client_builder_options() {
        let client = RestJobClient::new("my-project", "token")
            .unwrap()
            .with_location("EU")
            .with_endpoint("http://localhost:9050/bigquery/v2")
            .with_poll_interval(Duration::from_millis(50))
            .with_completion_timeout(Duration::from_secs(5));
        assert_eq!(client.location.as_deref(), Some("EU"));
        assert_eq!(client.endpoint, "http://localhost:9050/bigquery/v2");
    }
}
