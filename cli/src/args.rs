use clap::Parser;
use std::path::PathBuf;

/// bqbot - runs the support-bot SQL runbook against BigQuery
#[derive(Parser, Debug)]
#[command(name = "bqbot")]
#[command(version)]
#[command(about = "Executes the support-bot SQL scripts in order and verifies the results", long_about = None)]
pub struct Cli {
    /// Google Cloud project id (overrides GOOGLE_CLOUD_PROJECT and config)
    #[arg(short = 'p', long = "project")]
    pub project: Option<String>,

    /// Directory containing the runbook SQL scripts (default: sql)
    #[arg(long = "sql-dir")]
    pub sql_dir: Option<PathBuf>,

    /// BigQuery API base URL override (emulators, test servers)
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// Configuration file path
    #[arg(long = "config", default_value = "~/.bqbot/config.toml")]
    pub config: PathBuf,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Disable the spinner shown while a job is awaited
    #[arg(long = "no-animations")]
    pub no_animations: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
