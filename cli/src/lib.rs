//! Library entry point for bqbot components.
//!
//! Exposes the runner, verification and config modules so integration tests
//! can drive the execution plan with a fake warehouse client without going
//! through the binary entry point.

pub mod config;
pub mod error;
pub mod format;
pub mod project;
pub mod runner;
pub mod script;
pub mod verify;

pub use config::CLIConfiguration;
pub use error::{CLIError, Result};
pub use runner::{RunReport, ScriptResult, Warehouse};
pub use verify::VerificationRow;
