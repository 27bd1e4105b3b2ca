//! The sequencer: runs the execution plan in order, one blocking job at a
//! time, and decides whether the verification step fires.
//!
//! Per-step failures never abort the run and never propagate past
//! [`execute_script`]; they are printed and folded into a [`ScriptResult`].
//! Two details are load-bearing:
//!
//! - the plan length is the denominator of the summary regardless of missing
//!   files, so a skipped file (neither success nor failure) makes
//!   `success_count == planned` unreachable and verification never fires;
//! - cumulative time is wall-clock from first step start to last step end,
//!   not the max of the steps.

use bqbot_link::{BigQueryClient, JobOutcome, QueryJob, QueryParameter, Result as LinkResult};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::format::{format_count, format_secs};
use crate::script;
use crate::verify;

/// Client seam for the runner. [`BigQueryClient`] is the production
/// implementation; tests substitute a programmable fake.
#[async_trait::async_trait]
pub trait Warehouse: Send + Sync {
    /// Submit one SQL statement as a query job
    async fn submit_query(
        &self,
        sql: &str,
        params: Option<Vec<QueryParameter>>,
    ) -> LinkResult<QueryJob>;

    /// Block until the job reaches a terminal state
    async fn await_job(&self, job: QueryJob) -> LinkResult<JobOutcome>;
}

#[async_trait::async_trait]
impl Warehouse for BigQueryClient {
    async fn submit_query(
        &self,
        sql: &str,
        params: Option<Vec<QueryParameter>>,
    ) -> LinkResult<QueryJob> {
        BigQueryClient::submit_query(self, sql, params).await
    }

    async fn await_job(&self, job: QueryJob) -> LinkResult<JobOutcome> {
        BigQueryClient::await_job(self, job).await
    }
}

/// Outcome of one script execution. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct ScriptResult {
    pub name: String,
    pub succeeded: bool,
    pub duration: Duration,
}

/// What the whole run did; the binary prints nothing beyond what run_plan
/// already printed, this is for callers and tests.
#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<ScriptResult>,
    pub success_count: usize,
    /// Plan length. Skipped (missing) scripts still count here.
    pub planned: usize,
    pub total_duration: Duration,
    /// Whether the all-succeeded branch fired and verification was attempted
    pub verification_run: bool,
}

/// Execute one script: substitute the project id, submit, block until the
/// terminal state, report. Errors are classified (warehouse-reported vs
/// anything else), printed, and converted into the returned result.
pub async fn execute_script<W: Warehouse>(
    client: &W,
    name: &str,
    source: &str,
    project_id: &str,
    animations: bool,
) -> ScriptResult {
    println!("\n{} {}", "Executing:".cyan().bold(), name);

    let sql = script::substitute_project_id(source, project_id);
    debug!("[RUNNER] Submitting {} ({} bytes after substitution)", name, sql.len());

    let start = Instant::now();
    let spinner = if animations {
        Some(create_spinner())
    } else {
        None
    };

    let outcome = match client.submit_query(&sql, None).await {
        Ok(job) => client.await_job(job).await,
        Err(e) => Err(e),
    };

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let duration = start.elapsed();

    let succeeded = match outcome {
        Ok(outcome) => {
            println!("{} {}", "✓ Completed in".green(), format_secs(duration));
            report_rows(&outcome);
            true
        }
        Err(e) if e.is_service_error() => {
            println!("{} {}", "✗ BigQuery error:".red().bold(), e);
            false
        }
        Err(e) => {
            println!("{} {}", "✗ Error:".red().bold(), e);
            false
        }
    };

    ScriptResult {
        name: name.to_string(),
        succeeded,
        duration,
    }
}

fn report_rows(outcome: &JobOutcome) {
    if outcome.is_query() {
        let rows = outcome.total_rows.unwrap_or(0);
        if rows > 0 {
            println!("  {} rows", format_count(rows));
        }
    } else if let Some(affected) = outcome.dml_affected_rows {
        if affected > 0 {
            println!("  {} rows affected", format_count(affected));
        }
    }
}

/// Run the plan in order and print the summary.
///
/// Missing files are reported and skipped without an attempt; everything
/// else becomes a [`ScriptResult`]. When every planned script succeeded the
/// verification query runs and next-step guidance is printed.
pub async fn run_plan<W: Warehouse>(
    client: &W,
    project_id: &str,
    sql_dir: &Path,
    plan: &[&str],
    animations: bool,
) -> RunReport {
    debug!(
        "[RUNNER] Plan has {} scripts, dir={}",
        plan.len(),
        sql_dir.display()
    );

    let total_start = Instant::now();
    let mut results = Vec::new();
    let mut success_count = 0usize;

    for name in plan {
        let path = script::script_path(sql_dir, name);

        if !path.exists() {
            println!("{} {}", "✗ File not found:".red(), path.display());
            continue;
        }

        let result = match script::load_script(&path) {
            Ok(source) => execute_script(client, name, &source, project_id, animations).await,
            Err(e) => {
                // Present but unreadable counts as an attempted failure
                println!("{} {}", "✗ Error:".red().bold(), e);
                ScriptResult {
                    name: (*name).to_string(),
                    succeeded: false,
                    duration: Duration::ZERO,
                }
            }
        };

        if result.succeeded {
            success_count += 1;
        } else {
            println!(
                "{}",
                format!("⚠ Failed to execute {}, continuing...", name).yellow()
            );
        }
        results.push(result);
    }

    let total_duration = total_start.elapsed();
    let planned = plan.len();

    println!("\n{}", "Execution summary:".bold());
    println!("  Scripts: {}/{}", success_count, planned);
    println!("  Total time: {}", format_secs(total_duration));

    let mut verification_run = false;
    if success_count == planned {
        println!("{}", "✓ All scripts executed successfully".green().bold());

        verify::run_verification(client, project_id).await;
        verification_run = true;

        println!("\n{}", "Next steps:".bold());
        println!("  1. Open the analysis notebook in notebooks/");
        println!("  2. Build the Looker Studio dashboard from the dashboard_data table");
        println!(
            "  3. Inspect results: https://console.cloud.google.com/bigquery?project={}",
            project_id
        );
    } else {
        println!(
            "{}",
            "⚠ Some scripts failed to execute. Check the errors above."
                .yellow()
                .bold()
        );
    }

    RunReport {
        results,
        success_count,
        planned,
        total_duration,
        verification_run,
    }
}

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message("Waiting for job...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
