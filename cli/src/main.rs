//! bqbot - BigQuery support-bot runbook runner
//!
//! Executes the fixed list of runbook SQL scripts in order against a BigQuery
//! project, reports per-step timing and success/failure, then verifies the
//! expected tables exist.
//!
//! # Usage
//!
//! ```bash
//! # Project id from the environment
//! GOOGLE_CLOUD_PROJECT=my-project bqbot
//!
//! # Explicit project and script directory
//! bqbot --project my-project --sql-dir sql
//!
//! # Against an emulator
//! bqbot --project demo --api-url http://localhost:9050/bigquery/v2
//! ```

use clap::Parser;
use colored::*;
use std::path::Path;

use bqbot_cli::project::{resolve_project_id, PROJECT_ENV_VAR};
use bqbot_cli::runner::run_plan;
use bqbot_cli::script::EXECUTION_PLAN;
use bqbot_cli::CLIConfiguration;

mod args;
mod connect;

use args::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    println!("{}", "bqbot - BigQuery support-bot runbook runner".bold());
    println!("{}", "=".repeat(50));

    let config = match CLIConfiguration::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    // Fatal when unresolvable: nothing downstream can run without a project.
    let mut stdin = std::io::stdin().lock();
    let project_id = match resolve_project_id(
        cli.project.as_deref(),
        std::env::var(PROJECT_ENV_VAR).ok(),
        &config,
        &mut stdin,
    ) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    drop(stdin);

    let client = match connect::connect(&cli, &project_id).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!(
                "{} {}",
                "✗ Failed to connect to BigQuery:".red().bold(),
                e
            );
            eprintln!(
                "{}",
                "Please ensure you're authenticated: gcloud auth login && \
                 export BIGQUERY_ACCESS_TOKEN=$(gcloud auth print-access-token)"
                    .yellow()
            );
            std::process::exit(1);
        }
    };
    println!(
        "{} {}",
        "✓ Connected to BigQuery project:".green(),
        project_id
    );

    let sql_dir = cli
        .sql_dir
        .as_deref()
        .or_else(|| config.sql_dir())
        .unwrap_or_else(|| Path::new("sql"))
        .to_path_buf();

    let animations = !cli.no_animations && config.animations();

    // Per-step failures are already folded into the report; the process
    // exits 0 regardless of how many scripts failed.
    run_plan(&client, &project_id, &sql_dir, EXECUTION_PLAN, animations).await;
}
