//! # bqbridge-rs
//!
//! Synchronous DB-API style driver shim for Google BigQuery.
//!
//! BigQuery has no native transactional SQL dialect and executes every
//! statement as an asynchronous job. This library bridges that gap for
//! relational client frameworks that expect a blocking, cursor-oriented
//! driver:
//!
//! - **Statement Translation**: parameterized statements with positional `?`
//!   placeholders are rewritten into literal BigQuery SQL, with type-correct
//!   literal rendering for null, temporal, text, and numeric parameters
//! - **Job-Backed Cursor**: rendered SQL is submitted as a remote job; the
//!   cursor blocks until the job completes, buffers the full result set, and
//!   exposes `execute` / `fetchone` / `fetchmany` / `fetchall` / `rowcount` /
//!   `close` semantics
//! - **Dialect Tables**: static type-affinity and operator-template tables
//!   for schema-generation and query-compilation collaborators
//!
//! BigQuery has no transactions: `commit` is a no-op, autocommit is always
//! effectively on, and `lastrowid` is always absent.
//!
//! ## Query Example
//!
//! ```no_run
//! use bqbridge_rs::{Connection, ConnectionParams, Parameter};
//!
//! # fn example() -> Result<(), bqbridge_rs::BigQueryError> {
//! let params = ConnectionParams::builder()
//!     .project("my-project")
//!     .credentials("ya29.token-material")
//!     .location("EU")
//!     .build()?;
//! let conn = Connection::connect(params)?;
//!
//! let mut cursor = conn.cursor()?;
//! cursor.execute(
//!     "SELECT name FROM dataset.users WHERE id = ?",
//!     &[Parameter::Int(42)],
//! )?;
//!
//! while let Some(row) = cursor.fetchone() {
//!     println!("{row:?}");
//! }
//! cursor.close();
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod client;
pub mod connection;
pub mod error;
pub mod query;
pub mod types;

// =============================================================================
// Connection Types
// =============================================================================

/// Re-export connection types.
pub use connection::{Connection, ConnectionParams, ConnectionParamsBuilder};

// =============================================================================
// Query Types
// =============================================================================

/// Re-export statement and cursor types.
pub use query::{render, Cursor, CursorState, Parameter, Statement, StatementKind};

// =============================================================================
// Client Types
// =============================================================================

/// Re-export the job submission seam and the REST backend.
pub use client::{FieldSchema, JobClient, QueryJob, RestJobClient, Row};

// =============================================================================
// Error Types
// =============================================================================

/// Re-export error types for convenient error handling.
pub use error::{
    BigQueryError, ClientError, ConnectionError, CursorError, ErrorKind, TranslateError,
};

// =============================================================================
// Dialect Tables
// =============================================================================

/// Re-export the static dialect configuration tables.
pub use types::{storage_type, template_for, OPERATOR_TEMPLATES, TYPE_AFFINITY};
