//! Post-run verification: confirm the expected tables exist and report their
//! row counts and sizes.
//!
//! One parameterized metadata query against the dataset's
//! INFORMATION_SCHEMA.TABLE_STORAGE view. A failure here is reported and
//! swallowed; it never affects the exit code.

use bqbot_link::{JobOutcome, QueryParameter};
use colored::*;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::format::format_count;
use crate::runner::Warehouse;

/// Dataset the runbook populates
pub const DATASET: &str = "support_demo";

/// Tables the runbook is expected to have created, in report order
pub const EXPECTED_TABLES: &[&str] = &[
    "raw_tickets",
    "daily_insights",
    "ticket_forecast",
    "ticket_embeddings",
    "similar_tickets",
];

/// One line of the verification report
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRow {
    pub table_name: String,
    pub row_count: u64,
    pub size_mb: f64,
}

fn storage_query(project_id: &str) -> String {
    format!(
        "SELECT table_name, row_count, \
         ROUND(size_bytes/1024/1024, 2) AS size_mb \
         FROM `{}.{}.INFORMATION_SCHEMA.TABLE_STORAGE` \
         WHERE table_name IN UNNEST(@expected_tables) \
         ORDER BY table_name",
        project_id, DATASET
    )
}

/// Run the metadata query and parse the summary rows
pub async fn fetch_table_summary<W: Warehouse>(
    client: &W,
    project_id: &str,
) -> Result<Vec<VerificationRow>> {
    let params = vec![QueryParameter::string_array(
        "expected_tables",
        EXPECTED_TABLES,
    )];
    let job = client
        .submit_query(&storage_query(project_id), Some(params))
        .await?;
    let outcome = client.await_job(job).await?;
    Ok(rows_from_outcome(&outcome))
}

fn rows_from_outcome(outcome: &JobOutcome) -> Vec<VerificationRow> {
    outcome
        .rows_as_maps()
        .into_iter()
        .map(|map| VerificationRow {
            table_name: map
                .get("table_name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            row_count: map.get("row_count").and_then(parse_u64).unwrap_or(0),
            size_mb: map.get("size_mb").and_then(parse_f64).unwrap_or(0.0),
        })
        .collect()
}

/// One report line per row, preserving input order
pub fn render_rows(rows: &[VerificationRow]) -> Vec<String> {
    rows.iter()
        .map(|r| {
            format!(
                "  • {}: {} rows ({:.2} MB)",
                r.table_name,
                format_count(r.row_count),
                r.size_mb
            )
        })
        .collect()
}

/// Run verification and print the report. Failures are printed and
/// swallowed: this step never propagates an error to the caller.
pub async fn run_verification<W: Warehouse>(client: &W, project_id: &str) {
    println!("\n{}", "Verifying table creation...".cyan().bold());

    match fetch_table_summary(client, project_id).await {
        Ok(rows) => {
            println!("{}", "Table summary:".bold());
            for line in render_rows(&rows) {
                println!("{}", line);
            }
        }
        Err(e) => {
            println!("{} {}", "✗ Verification failed:".red().bold(), e);
        }
    }
}

// BigQuery cell values arrive as JSON strings; tolerate native numbers too.
fn parse_u64(v: &JsonValue) -> Option<u64> {
    match v {
        JsonValue::String(s) => s.parse().ok(),
        JsonValue::Number(n) => n.as_u64(),
        _ => None,
    }
}

fn parse_f64(v: &JsonValue) -> Option<f64> {
    match v {
        JsonValue::String(s) => s.parse().ok(),
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bqbot_link::QueryResponse;
    use serde_json::json;

    fn summary_outcome() -> JobOutcome {
        let response: QueryResponse = serde_json::from_value(json!({
            "jobComplete": true,
            "totalRows": "2",
            "schema": {"fields": [
                {"name": "table_name", "type": "STRING"},
                {"name": "row_count", "type": "INTEGER"},
                {"name": "size_mb", "type": "FLOAT"}
            ]},
            "rows": [
                {"f": [{"v": "raw_tickets"}, {"v": "1500"}, {"v": "2.35"}]},
                {"f": [{"v": "daily_insights"}, {"v": "90"}, {"v": "0.12"}]}
            ]
        }))
        .unwrap();
        JobOutcome::from_response(response)
    }

    #[test]
    fn test_rows_parse_in_input_order() {
        let rows = rows_from_outcome(&summary_outcome());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].table_name, "raw_tickets");
        assert_eq!(rows[0].row_count, 1500);
        assert_eq!(rows[0].size_mb, 2.35);
        assert_eq!(rows[1].table_name, "daily_insights");
    }

    #[test]
    fn test_render_one_line_per_row() {
        let rows = rows_from_outcome(&summary_outcome());
        let lines = render_rows(&rows);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "  • raw_tickets: 1,500 rows (2.35 MB)");
        assert_eq!(lines[1], "  • daily_insights: 90 rows (0.12 MB)");
    }

    #[test]
    fn test_storage_query_targets_project_dataset() {
        let sql = storage_query("demo-proj");
        assert!(sql.contains("`demo-proj.support_demo.INFORMATION_SCHEMA.TABLE_STORAGE`"));
        assert!(sql.contains("UNNEST(@expected_tables)"));
    }

    #[test]
    fn test_expected_tables_list() {
        assert_eq!(EXPECTED_TABLES.len(), 5);
        assert_eq!(EXPECTED_TABLES[0], "raw_tickets");
    }
}
