//! Project-id resolution.
//!
//! Sources, highest priority first: `--project` flag, `GOOGLE_CLOUD_PROJECT`
//! env var, config file, interactive prompt. An id that is still empty after
//! all four is a fatal startup error; the runner never attempts to connect
//! without one.

use std::io::{BufRead, Write};

use crate::config::CLIConfiguration;
use crate::error::{CLIError, Result};

/// Environment variable supplying the project id
pub const PROJECT_ENV_VAR: &str = "GOOGLE_CLOUD_PROJECT";

/// Resolve the project id from the layered sources.
///
/// `env_project` is the value of [`PROJECT_ENV_VAR`] (passed in rather than
/// read here so tests don't touch process state). `input` substitutes for
/// stdin in tests.
pub fn resolve_project_id(
    flag: Option<&str>,
    env_project: Option<String>,
    config: &CLIConfiguration,
    input: &mut impl BufRead,
) -> Result<String> {
    if let Some(id) = non_empty(flag) {
        return Ok(id);
    }
    if let Some(id) = non_empty(env_project.as_deref()) {
        return Ok(id);
    }
    if let Some(id) = config.project_id() {
        return Ok(id.to_string());
    }

    print!("Enter your Google Cloud Project ID: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| CLIError::InputError(e.to_string()))?;

    non_empty(Some(line.trim()))
        .ok_or_else(|| CLIError::ConfigurationError("Project ID is required".to_string()))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
