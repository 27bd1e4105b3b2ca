//! Client library for running SQL jobs against the BigQuery REST API.
//!
//! Exposes the HTTP client, request/response models and error taxonomy used
//! by the `bqbot` runner. The client speaks the `jobs.query` /
//! `jobs.getQueryResults` endpoints: submit a query, then poll until the job
//! reaches a terminal state.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use auth::AuthProvider;
pub use client::{BigQueryClient, BigQueryClientBuilder};
pub use error::{LinkError, Result};
pub use models::{
    ErrorProto, JobOutcome, JobReference, QueryJob, QueryParameter, QueryRequest, QueryResponse,
    TableCell, TableFieldSchema, TableRow, TableSchema,
};
