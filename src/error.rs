//! Error types for the BigQuery driver.
//!
//! Errors are split per concern (translation, transport, connection, cursor)
//! and aggregated into [`BigQueryError`]. Every error type also reports a
//! coarse [`ErrorKind`] following the standard database-driver taxonomy so
//! upstream error handling can branch on category without matching on the
//! concrete variant.

use thiserror::Error;

/// Coarse error categories mirroring the standard database-driver taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Error in the driver interface usage (e.g. operating on a closed cursor).
    Interface,
    /// Error reported by the database itself.
    Database,
    /// Error in processing data (malformed values, undecodable responses).
    Data,
    /// Error in the operation of the database or the transport to it.
    Operational,
    /// Relational integrity violation.
    Integrity,
    /// Internal error of the database.
    Internal,
    /// Programming error in the submitted statement or its parameters.
    Programming,
    /// Feature not supported by the backing warehouse.
    NotSupported,
}

/// Statement translation errors.
///
/// These are raised before anything is submitted to the warehouse; the
/// cursor that reported one remains usable.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The leading keyword is not one of SELECT, INSERT, UPDATE, DELETE.
    #[error("unsupported statement: only SELECT, INSERT, UPDATE and DELETE are supported (got `{keyword}`)")]
    UnsupportedStatement { keyword: String },

    /// The statement contains more placeholders than parameters were supplied.
    #[error("parameter underflow: statement has more placeholders than the {supplied} supplied parameter(s)")]
    ParameterUnderflow { supplied: usize },
}

impl TranslateError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::UnsupportedStatement { .. } => ErrorKind::NotSupported,
            TranslateError::ParameterUnderflow { .. } => ErrorKind::Programming,
        }
    }
}

/// Errors from the remote job backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error response from the BigQuery API.
    #[error("BigQuery API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("malformed API response: {0}")]
    Malformed(String),

    /// The job did not reach a terminal state within the configured deadline.
    #[error("job {job_id} did not complete within {timeout_ms}ms")]
    JobTimeout { job_id: String, timeout_ms: u64 },

    /// The job completed without producing a row set (DML statements).
    ///
    /// The cursor reinterprets this as "zero rows"; it is never surfaced
    /// to callers of `execute`.
    #[error("job produced no row set")]
    NoRowSet,
}

impl ClientError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Http(_) => ErrorKind::Operational,
            ClientError::Api { .. } => ErrorKind::Database,
            ClientError::Malformed(_) => ErrorKind::Data,
            ClientError::JobTimeout { .. } => ErrorKind::Operational,
            ClientError::NoRowSet => ErrorKind::Data,
        }
    }
}

/// Connection setup and lifecycle errors.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// A required connection parameter is missing.
    #[error("missing connection parameter: {0}")]
    MissingParameter(&'static str),

    /// Failed to construct the job-submitting client.
    #[error("client setup failed: {0}")]
    ClientSetup(String),

    /// The connection has been closed.
    #[error("connection is closed")]
    Closed,
}

impl ConnectionError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectionError::MissingParameter(_) => ErrorKind::Programming,
            ConnectionError::ClientSetup(_) => ErrorKind::Operational,
            ConnectionError::Closed => ErrorKind::Interface,
        }
    }
}

/// Errors surfaced by cursor operations.
#[derive(Error, Debug)]
pub enum CursorError {
    /// Statement translation failed; the cursor state is unchanged.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Job submission failed; the cursor is in the failed state.
    #[error("job submission failed: {0}")]
    Submission(#[from] ClientError),

    /// The cursor has been closed.
    #[error("cursor is closed")]
    Closed,
}

impl CursorError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CursorError::Translate(e) => e.kind(),
            CursorError::Submission(e) => e.kind(),
            CursorError::Closed => ErrorKind::Interface,
        }
    }
}

/// Aggregate error for the whole driver.
#[derive(Error, Debug)]
pub enum BigQueryError {
    /// Connection error.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Cursor error.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// Translation error.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Client error.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl BigQueryError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BigQueryError::Connection(e) => e.kind(),
            BigQueryError::Cursor(e) => e.kind(),
            BigQueryError::Translate(e) => e.kind(),
            BigQueryError::Client(e) => e.kind(),
        }
    }
}
