//! Runbook scripts: the fixed execution plan, file loading, and project-id
//! placeholder substitution.

use std::path::{Path, PathBuf};

use crate::error::{CLIError, Result};

/// Token replaced with the resolved project id before submission.
/// Literal text replacement, no escaping or partial-match protection.
pub const PLACEHOLDER: &str = "YOUR_PROJECT_ID";

/// The runbook, in execution order. Order is significant: later scripts read
/// tables the earlier ones create.
pub const EXECUTION_PLAN: &[&str] = &[
    "01_setup_dataset.sql",
    "02_daily_insights.sql",
    "03_volume_forecast.sql",
    "04_vector_embeddings.sql",
    "05_semantic_search.sql",
    "06_dashboard_data.sql",
    "07_summary_stats.sql",
];

/// Resolve a plan entry to its path under the scripts directory
pub fn script_path(sql_dir: &Path, name: &str) -> PathBuf {
    sql_dir.join(name)
}

/// Read a script's full text
pub fn load_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CLIError::FileError(format!("{}: {}", path.display(), e)))
}

/// Replace every literal occurrence of [`PLACEHOLDER`] with the project id
pub fn substitute_project_id(sql: &str, project_id: &str) -> String {
    sql.replace(PLACEHOLDER, project_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution_replaces_every_occurrence() {
        let sql = "CREATE TABLE `YOUR_PROJECT_ID.d.t` AS \
                   SELECT * FROM `YOUR_PROJECT_ID.d.s` \
                   WHERE p = 'YOUR_PROJECT_ID'";
        let out = substitute_project_id(sql, "demo-123");
        assert_eq!(out.matches("demo-123").count(), 3);
        assert!(!out.contains(PLACEHOLDER));
    }

    #[test]
    fn test_substitution_without_placeholder_is_identity() {
        let sql = "SELECT 1";
        assert_eq!(substitute_project_id(sql, "demo-123"), sql);
    }

    #[test]
    fn test_load_missing_script() {
        let err = load_script(Path::new("/nonexistent/01.sql")).unwrap_err();
        assert!(matches!(err, CLIError::FileError(_)));
    }

    #[test]
    fn test_plan_order_is_stable() {
        assert_eq!(EXECUTION_PLAN.len(), 7);
        assert_eq!(EXECUTION_PLAN[0], "01_setup_dataset.sql");
        assert_eq!(EXECUTION_PLAN[6], "07_summary_stats.sql");
    }
}
