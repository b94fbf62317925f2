//! Remote job submission.
//!
//! BigQuery executes every statement as an asynchronous job. This module
//! defines the seam between the cursor and the job backend: [`JobClient`]
//! submits rendered SQL and resolves once the remote job has reached a
//! terminal state, returning a [`QueryJob`] that exposes the result schema
//! and the fully materialized rows.
//!
//! The concrete backend is [`rest::RestJobClient`]; tests substitute their
//! own in-memory implementation.

pub mod rest;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;

pub use rest::RestJobClient;

/// One row of a materialized result, in result-schema column order.
pub type Row = Vec<Value>;

/// One field of a job's result schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Column name.
    pub name: String,
    /// BigQuery storage type name (STRING, INT64, ...).
    pub field_type: String,
}

/// A completed remote job.
///
/// Holds the result schema and, for row-returning statements, the full
/// materialized row set. DML jobs complete without a row set; asking for
/// their rows fails with [`ClientError::NoRowSet`].
#[derive(Debug, Clone)]
pub struct QueryJob {
    job_id: String,
    schema: Vec<FieldSchema>,
    rows: Option<Vec<Row>>,
}

impl QueryJob {
    /// Build a completed job from its parts.
    ///
    /// `rows` is `None` for jobs that produced no row set (DML).
    pub fn new(job_id: impl Into<String>, schema: Vec<FieldSchema>, rows: Option<Vec<Row>>) -> Self {
        Self {
            job_id: job_id.into(),
            schema,
            rows,
        }
    }

    /// Identifier assigned to the job by the backend.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Result schema fields, in column order. Empty when the job produced
    /// no schema.
    pub fn schema(&self) -> &[FieldSchema] {
        &self.schema
    }

    /// Consume the job and materialize its rows.
    ///
    /// # Errors
    ///
    /// [`ClientError::NoRowSet`] when the job completed without a row set.
    pub fn into_rows(self) -> Result<Vec<Row>, ClientError> {
        self.rows.ok_or(ClientError::NoRowSet)
    }
}

/// Job-submitting client.
///
/// Implementations submit one rendered statement and drive the remote job to
/// completion before returning. There is no cancellation at this layer; a
/// submission either resolves with a terminal job or fails.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Submit rendered SQL and wait for the resulting job to complete.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if submission fails or the job does not reach
    /// a terminal state within the backend's deadline.
    async fn submit(&self, sql: &str) -> Result<QueryJob, ClientError>;
}
