//! Configuration file management
//!
//! Optional TOML configuration at ~/.bqbot/config.toml. Everything in it can
//! also be supplied on the command line or through the environment; the file
//! is for operators who run the runbook repeatedly against the same project.
//!
//! # Configuration Format
//!
//! ```toml
//! [project]
//! id = "my-gcp-project"        # overrides nothing; lowest-priority source
//!
//! [runner]
//! sql_dir = "sql"              # directory containing the runbook scripts
//! animations = true            # spinner while a job is awaited
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Project settings
    pub project: Option<ProjectConfig>,

    /// Runner preferences
    pub runner: Option<RunnerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Google Cloud project id
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Directory containing the runbook SQL scripts
    pub sql_dir: Option<PathBuf>,

    /// Show a spinner while a job is awaited (default: true)
    #[serde(default = "default_animations")]
    pub animations: bool,
}

fn default_animations() -> bool {
    true
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.bqbot/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::error::CLIError::ConfigurationError(format!(
                "Failed to read config file: {}",
                e
            ))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Project id from the config file, if present and non-empty
    pub fn project_id(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Configured sql directory, if any
    pub fn sql_dir(&self) -> Option<&Path> {
        self.runner.as_ref().and_then(|r| r.sql_dir.as_deref())
    }

    /// Whether spinner animations are enabled (default: true)
    pub fn animations(&self) -> bool {
        self.runner.as_ref().map(|r| r.animations).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [project]
            id = "my-demo-project"

            [runner]
            sql_dir = "scripts"
            animations = false
        "#;
        let config: CLIConfiguration = toml::from_str(toml_str).unwrap();
        assert_eq!(config.project_id(), Some("my-demo-project"));
        assert_eq!(config.sql_dir(), Some(Path::new("scripts")));
        assert!(!config.animations());
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: CLIConfiguration = toml::from_str("").unwrap();
        assert_eq!(config.project_id(), None);
        assert_eq!(config.sql_dir(), None);
        assert!(config.animations());
    }

    #[test]
    fn test_blank_project_id_is_none() {
        let toml_str = r#"
            [project]
            id = "  "
        "#;
        let config: CLIConfiguration = toml::from_str(toml_str).unwrap();
        assert_eq!(config.project_id(), None);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let config = CLIConfiguration::load(Path::new("/nonexistent/bqbot.toml")).unwrap();
        assert_eq!(config.project_id(), None);
    }
}
