//! Data models for bqbot-link.
//!
//! Request and response structures for the BigQuery `jobs.query` and
//! `jobs.getQueryResults` REST endpoints. Field names follow the wire format
//! (camelCase); numeric counters arrive as JSON strings and are kept that way
//! in the wire structs, parsed only when building a [`JobOutcome`].

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Request payload for `jobs.query`.
///
/// # Examples
///
/// ```rust
/// use bqbot_link::{QueryParameter, QueryRequest};
///
/// // Simple query without parameters
/// let request = QueryRequest::new("SELECT 1".to_string(), None);
///
/// // Parameterized query with a named array parameter
/// let params = vec![QueryParameter::string_array("names", &["a", "b"])];
/// let request = QueryRequest::new(
///     "SELECT * FROM t WHERE name IN UNNEST(@names)".to_string(),
///     Some(params),
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// SQL text (may contain @name placeholders)
    pub query: String,

    /// Standard SQL, always
    pub use_legacy_sql: bool,

    /// "NAMED" when queryParameters is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_mode: Option<String>,

    /// Named query parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<Vec<QueryParameter>>,

    /// How long the synchronous call waits before returning jobComplete=false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl QueryRequest {
    pub fn new(query: String, params: Option<Vec<QueryParameter>>) -> Self {
        let parameter_mode = params.as_ref().map(|_| "NAMED".to_string());
        Self {
            query,
            use_legacy_sql: false,
            parameter_mode,
            query_parameters: params,
            timeout_ms: Some(10_000),
        }
    }
}

/// A named query parameter (`@name` in the SQL text)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
    pub name: String,
    pub parameter_type: ParameterType,
    pub parameter_value: ParameterValue,
}

impl QueryParameter {
    /// Build an ARRAY<STRING> parameter, the shape the verification query uses
    pub fn string_array(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: ParameterType {
                r#type: "ARRAY".to_string(),
                array_type: Some(Box::new(ParameterType {
                    r#type: "STRING".to_string(),
                    array_type: None,
                })),
            },
            parameter_value: ParameterValue {
                value: None,
                array_values: Some(
                    values
                        .iter()
                        .map(|v| ParameterValue {
                            value: Some((*v).to_string()),
                            array_values: None,
                        })
                        .collect(),
                ),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterType {
    #[serde(rename = "type")]
    pub r#type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_type: Option<Box<ParameterType>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_values: Option<Vec<ParameterValue>>,
}

/// Identifies a submitted job; needed to poll for its terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Error entry as reported inside a job or error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Schema of a result set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// One result row in BigQuery's `{"f":[{"v":...}]}` encoding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: JsonValue,
}

/// Response body of `jobs.query` and `jobs.getQueryResults`.
///
/// The two endpoints share the fields the client cares about, so one struct
/// covers both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<JobReference>,

    /// False while the job is still running; absent on some error responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_complete: Option<bool>,

    /// Total result rows, as a decimal string. Absent for DDL statements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<TableRow>>,

    /// Rows affected by a DML statement, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_dml_affected_rows: Option<String>,

    /// Errors and warnings encountered by the job. Entries here do not by
    /// themselves mean the job failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorProto>>,

    /// The fatal error, present only when the job actually failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_result: Option<ErrorProto>,
}

/// A submitted query job, possibly still running.
///
/// Returned by `submit_query`; pass to `await_job` to block until the
/// terminal state.
#[derive(Debug, Clone)]
pub struct QueryJob {
    pub(crate) initial: QueryResponse,
}

impl QueryJob {
    /// Wrap a raw response. Public so fake clients in tests can construct
    /// jobs without HTTP.
    pub fn new(initial: QueryResponse) -> Self {
        Self { initial }
    }

    /// Reference for polling, if the service assigned one
    pub fn job_reference(&self) -> Option<&JobReference> {
        self.initial.job_reference.as_ref()
    }

    /// Unwrap the raw response. Used by fake clients in tests.
    pub fn into_response(self) -> QueryResponse {
        self.initial
    }
}

/// Terminal state of a successful job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Total rows returned; `None` for statements without a result set (DDL)
    pub total_rows: Option<u64>,

    /// Rows affected by DML, when reported
    pub dml_affected_rows: Option<u64>,

    pub schema: Vec<TableFieldSchema>,
    pub rows: Vec<TableRow>,
}

impl JobOutcome {
    /// Build an outcome from a terminal response. Public so fake clients in
    /// tests can produce outcomes without HTTP.
    pub fn from_response(response: QueryResponse) -> Self {
        let total_rows = response.total_rows.as_deref().and_then(parse_count);
        let dml_affected_rows = response.num_dml_affected_rows.as_deref().and_then(parse_count);
        Self {
            total_rows,
            dml_affected_rows,
            schema: response.schema.map(|s| s.fields).unwrap_or_default(),
            rows: response.rows.unwrap_or_default(),
        }
    }

    /// Whether this was a statement with a result set
    pub fn is_query(&self) -> bool {
        self.total_rows.is_some()
    }

    /// Get column names from schema
    pub fn column_names(&self) -> Vec<String> {
        self.schema.iter().map(|f| f.name.clone()).collect()
    }

    /// Get a row as a HashMap by index (for convenience)
    pub fn row_as_map(&self, row_idx: usize) -> Option<HashMap<String, JsonValue>> {
        let row = self.rows.get(row_idx)?;
        let mut map = HashMap::with_capacity(self.schema.len());
        for (i, field) in self.schema.iter().enumerate() {
            if let Some(cell) = row.f.get(i) {
                map.insert(field.name.clone(), cell.v.clone());
            }
        }
        Some(map)
    }

    /// Get all rows as HashMaps (for convenience)
    pub fn rows_as_maps(&self) -> Vec<HashMap<String, JsonValue>> {
        let mut mapped = Vec::with_capacity(self.rows.len());
        for i in 0..self.rows.len() {
            if let Some(map) = self.row_as_map(i) {
                mapped.push(map);
            }
        }
        mapped
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

/// Error envelope returned with non-2xx status codes
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,

    pub message: String,

    #[serde(default)]
    pub errors: Option<Vec<ErrorProto>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_serialization() {
        let request = QueryRequest::new("SELECT 1".to_string(), None);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["query"], "SELECT 1");
        assert_eq!(value["useLegacySql"], false);
        assert!(value.get("queryParameters").is_none());
        assert!(value.get("parameterMode").is_none());
    }

    #[test]
    fn test_string_array_parameter_shape() {
        let param = QueryParameter::string_array("expected_tables", &["a", "b"]);
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["name"], "expected_tables");
        assert_eq!(value["parameterType"]["type"], "ARRAY");
        assert_eq!(value["parameterType"]["arrayType"]["type"], "STRING");
        assert_eq!(value["parameterValue"]["arrayValues"][0]["value"], "a");
        assert_eq!(value["parameterValue"]["arrayValues"][1]["value"], "b");
    }

    #[test]
    fn test_query_response_deserialization() {
        let body = json!({
            "jobReference": {"projectId": "demo", "jobId": "job_123"},
            "jobComplete": true,
            "totalRows": "42",
            "schema": {"fields": [
                {"name": "table_name", "type": "STRING"},
                {"name": "row_count", "type": "INTEGER"}
            ]},
            "rows": [
                {"f": [{"v": "raw_tickets"}, {"v": "1000"}]}
            ]
        });
        let response: QueryResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.job_complete, Some(true));
        assert_eq!(response.total_rows.as_deref(), Some("42"));

        let outcome = JobOutcome::from_response(response);
        assert_eq!(outcome.total_rows, Some(42));
        assert!(outcome.is_query());
        assert_eq!(outcome.column_names(), vec!["table_name", "row_count"]);

        let maps = outcome.rows_as_maps();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0]["table_name"], json!("raw_tickets"));
        assert_eq!(maps[0]["row_count"], json!("1000"));
    }

    #[test]
    fn test_ddl_response_has_no_result_set() {
        let body = json!({
            "jobReference": {"projectId": "demo", "jobId": "job_ddl"},
            "jobComplete": true
        });
        let response: QueryResponse = serde_json::from_value(body).unwrap();
        let outcome = JobOutcome::from_response(response);
        assert_eq!(outcome.total_rows, None);
        assert!(!outcome.is_query());
        assert!(outcome.rows_as_maps().is_empty());
    }

    #[test]
    fn test_error_envelope_deserialization() {
        let body = json!({
            "error": {
                "code": 403,
                "message": "Access Denied",
                "errors": [{"reason": "accessDenied", "message": "Access Denied"}]
            }
        });
        let envelope: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.error.code, Some(403));
        assert_eq!(envelope.error.message, "Access Denied");
    }
}
