//! Job-backed cursor.
//!
//! [`Cursor`] gives callers the synchronous, row-at-a-time interface of a
//! traditional blocking database driver over BigQuery's asynchronous job
//! model. `execute` renders the statement, submits it as a remote job, blocks
//! until the job completes, and buffers the full result set; the `fetch*`
//! methods then drain the buffer without ever re-querying.
//!
//! The cursor lifecycle is an explicit state machine:
//!
//! ```text
//! idle -> executing -> { populated | empty | failed } -> closed
//! ```
//!
//! `rowcount` reports the current buffer length, not the original result
//! size: it shrinks as rows are fetched. Callers rely on this observable
//! behavior.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use tokio::runtime::Runtime;

use crate::client::{JobClient, Row};
use crate::error::CursorError;
use crate::query::statement::{self, Parameter, Statement};

/// Global tokio runtime for blocking cursor operations.
///
/// Lazily initialized on first use and shared by all cursors. `execute` is a
/// synchronous call over an async backend; this runtime is what it blocks on.
fn blocking_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime for blocking operations")
    })
}

/// Cursor lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No statement has been executed yet.
    Idle,
    /// A job is in flight.
    Executing,
    /// The last job produced a row set; the buffer holds its rows.
    Populated,
    /// The last job completed without a row set (DML).
    Empty,
    /// The last job submission failed.
    Failed,
    /// The cursor has been closed; only `close` and `fetch*` remain legal.
    Closed,
}

/// Synchronous cursor over asynchronous BigQuery jobs.
///
/// Each cursor exclusively owns its job and result buffer; multiple cursors
/// from one connection operate independently. Operations on a single cursor
/// must not be issued concurrently.
pub struct Cursor {
    client: Arc<dyn JobClient>,
    state: CursorState,
    buffer: VecDeque<Row>,
    description: Vec<String>,
}

impl Cursor {
    /// Create an idle cursor submitting jobs through `client`.
    pub fn new(client: Arc<dyn JobClient>) -> Self {
        Self {
            client,
            state: CursorState::Idle,
            buffer: VecDeque::new(),
            description: Vec::new(),
        }
    }

    /// Execute a statement, blocking until its remote job completes.
    ///
    /// On success the cursor's buffer holds the job's full result set and
    /// [`description`](Self::description) carries the result column names.
    /// Jobs that complete without a row set (DML) leave an empty buffer and
    /// an empty description rather than failing.
    ///
    /// # Errors
    ///
    /// Translation errors leave the cursor state unchanged; the cursor stays
    /// usable and the same call can be retried with corrected input. Job
    /// submission errors move the cursor to the failed state and are
    /// surfaced verbatim. Executing on a closed cursor fails with
    /// [`CursorError::Closed`].
    pub fn execute(
        &mut self,
        sql: &str,
        parameters: &[Parameter],
    ) -> Result<&mut Self, CursorError> {
        if self.state == CursorState::Closed {
            return Err(CursorError::Closed);
        }

        let rendered = statement::render(sql, parameters)?;
        tracing::debug!(sql = %rendered, "executing statement");

        self.state = CursorState::Executing;
        let client = Arc::clone(&self.client);
        let job = blocking_runtime().block_on(async move { client.submit(&rendered).await });

        let job = match job {
            Ok(job) => job,
            Err(err) => {
                self.buffer.clear();
                self.description.clear();
                self.state = CursorState::Failed;
                return Err(CursorError::Submission(err));
            }
        };

        let columns: Vec<String> = job.schema().iter().map(|f| f.name.clone()).collect();
        match job.into_rows() {
            Ok(rows) => {
                self.buffer = rows.into();
                self.description = columns;
                self.state = CursorState::Populated;
            }
            Err(err) => {
                // Non-row-returning statements expose no row set; that is
                // "ran fine, no rows", not a failure.
                tracing::debug!(error = %err, "job completed without a row set; treating as zero rows");
                self.buffer.clear();
                self.description.clear();
                self.state = CursorState::Empty;
            }
        }
        Ok(self)
    }

    /// Execute a prebuilt [`Statement`].
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn execute_statement(&mut self, stmt: &Statement) -> Result<&mut Self, CursorError> {
        self.execute(stmt.sql(), stmt.parameters())
    }

    /// Remove and return the first buffered row.
    ///
    /// Returns `None` when the buffer is empty or the cursor never
    /// populated. Never blocks, never re-queries.
    pub fn fetchone(&mut self) -> Option<Row> {
        self.buffer.pop_front()
    }

    /// Remove and return up to `size` rows from the front of the buffer
    /// (default 1), fewer if the buffer is exhausted.
    pub fn fetchmany(&mut self, size: Option<usize>) -> Vec<Row> {
        let take = size.unwrap_or(1).min(self.buffer.len());
        self.buffer.drain(..take).collect()
    }

    /// Drain and return every remaining buffered row.
    pub fn fetchall(&mut self) -> Vec<Row> {
        self.buffer.drain(..).collect()
    }

    /// Current buffer length.
    ///
    /// This is the number of rows *remaining*, not the original result
    /// cardinality: each fetch shrinks it.
    pub fn rowcount(&self) -> usize {
        self.buffer.len()
    }

    /// Always `None`: BigQuery has no autoincrement row identity.
    pub fn lastrowid(&self) -> Option<i64> {
        None
    }

    /// Column names of the last result set, in order. Empty when the last
    /// job produced no rows (DML) or nothing has been executed.
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Discard the buffer and close the cursor.
    ///
    /// Idempotent. Fetches on a closed cursor return empty results; only
    /// `execute` fails.
    pub fn close(&mut self) {
        self.buffer.clear();
        self.description.clear();
        self.state = CursorState::Closed;
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("rowcount", &self.buffer.len())
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FieldSchema, QueryJob};
    use crate::error::{ClientError, ErrorKind, TranslateError};
    use serde_json::json;

    /// In-memory job backend producing a fixed outcome per submission.
    struct FixtureClient {
        outcome: Outcome,
    }

    enum Outcome {
        Rows(Vec<(String, Vec<Row>)>),
        Dml,
        SubmitError,
    }

    #[async_trait::async_trait]
    impl JobClient for FixtureClient {
        async fn submit(&self, _sql: &str) -> Result<QueryJob, ClientError> {
            match &self.outcome {
                Outcome::Rows(columns) => {
                    let schema = columns
                        .iter()
                        .map(|(name, _)| FieldSchema {
                            name: name.clone(),
                            field_type: "STRING".to_string(),
                        })
                        .collect();
                    // Fixture stores rows under the first column entry.
                    let rows = columns
                        .first()
                        .map(|(_, rows)| rows.clone())
                        .unwrap_or_default();
                    Ok(QueryJob::new("job_fixture", schema, Some(rows)))
                }
                Outcome::Dml => Ok(QueryJob::new("job_fixture", Vec::new(), None)),
                Outcome::SubmitError => Err(ClientError::Api {
                    status: 403,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    fn cursor_with_rows(rows: Vec<Row>) -> Cursor {
        Cursor::new(Arc::new(FixtureClient {
            outcome: Outcome::Rows(vec![("id".to_string(), rows)]),
        }))
    }

    fn sample_rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| vec![json!(i.to_string())]).collect()
    }

    #[test]
    fn test_execute_populates_buffer_and_description() {
        let mut cursor = cursor_with_rows(sample_rows(3));
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(cursor.state(), CursorState::Populated);
        assert_eq!(cursor.rowcount(), 3);
        assert_eq!(cursor.description(), ["id"]);
    }

    #[test]
    fn test_rowcount_shrinks_as_rows_are_fetched() {
        let mut cursor = cursor_with_rows(sample_rows(3));
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(cursor.rowcount(), 3);

        assert!(cursor.fetchone().is_some());
        assert_eq!(cursor.rowcount(), 2);

        assert_eq!(cursor.fetchall().len(), 2);
        assert_eq!(cursor.rowcount(), 0);
        assert!(cursor.fetchone().is_none());
    }

    #[test]
    fn test_fetchone_preserves_row_order() {
        let mut cursor = cursor_with_rows(sample_rows(2));
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(cursor.fetchone().unwrap(), vec![json!("0")]);
        assert_eq!(cursor.fetchone().unwrap(), vec![json!("1")]);
        assert_eq!(cursor.fetchone(), None);
    }

    #[test]
    fn test_fetchmany_partial_and_overshoot() {
        let mut cursor = cursor_with_rows(sample_rows(5));
        cursor.execute("SELECT id FROM t", &[]).unwrap();

        assert_eq!(cursor.fetchmany(Some(2)).len(), 2);
        assert_eq!(cursor.rowcount(), 3);

        assert_eq!(cursor.fetchmany(Some(10)).len(), 3);
        assert_eq!(cursor.rowcount(), 0);
        assert!(cursor.fetchmany(Some(10)).is_empty());
    }

    #[test]
    fn test_fetchmany_defaults_to_one() {
        let mut cursor = cursor_with_rows(sample_rows(2));
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(cursor.fetchmany(None).len(), 1);
        assert_eq!(cursor.rowcount(), 1);
    }

    #[test]
    fn test_fetch_before_execute_is_empty() {
        let mut cursor = cursor_with_rows(sample_rows(2));
        assert_eq!(cursor.state(), CursorState::Idle);
        assert!(cursor.fetchone().is_none());
        assert!(cursor.fetchall().is_empty());
        assert!(cursor.fetchmany(Some(4)).is_empty());
        assert_eq!(cursor.rowcount(), 0);
    }

    #[test]
    fn test_dml_execute_is_swallowed_as_zero_rows() {
        let mut cursor = Cursor::new(Arc::new(FixtureClient {
            outcome: Outcome::Dml,
        }));
        cursor
            .execute("DELETE FROM t WHERE id = ?", &[Parameter::Int(1)])
            .unwrap();
        assert_eq!(cursor.state(), CursorState::Empty);
        assert_eq!(cursor.rowcount(), 0);
        assert!(cursor.description().is_empty());
        assert!(cursor.fetchall().is_empty());
    }

    #[test]
    fn test_zero_row_select_keeps_description() {
        let mut cursor = cursor_with_rows(Vec::new());
        cursor.execute("SELECT id FROM t WHERE 1 = 0", &[]).unwrap();
        assert_eq!(cursor.state(), CursorState::Populated);
        assert_eq!(cursor.rowcount(), 0);
        assert_eq!(cursor.description(), ["id"]);
    }

    #[test]
    fn test_translate_error_leaves_cursor_usable() {
        let mut cursor = cursor_with_rows(sample_rows(1));
        let err = cursor.execute("CREATE TABLE x (a INT64)", &[]).unwrap_err();
        assert!(matches!(
            err,
            CursorError::Translate(TranslateError::UnsupportedStatement { .. })
        ));
        assert_eq!(cursor.state(), CursorState::Idle);

        // The same cursor accepts a corrected statement.
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(cursor.rowcount(), 1);
    }

    #[test]
    fn test_parameter_underflow_propagates() {
        let mut cursor = cursor_with_rows(sample_rows(1));
        let err = cursor
            .execute("SELECT id FROM t WHERE a = ? AND b = ?", &[Parameter::Int(1)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Programming);
        assert_eq!(cursor.state(), CursorState::Idle);
    }

    #[test]
    fn test_submission_failure_moves_cursor_to_failed() {
        let mut cursor = Cursor::new(Arc::new(FixtureClient {
            outcome: Outcome::SubmitError,
        }));
        let err = cursor.execute("SELECT 1", &[]).unwrap_err();
        assert!(matches!(err, CursorError::Submission(_)));
        assert_eq!(err.kind(), ErrorKind::Database);
        assert_eq!(cursor.state(), CursorState::Failed);
        assert_eq!(cursor.rowcount(), 0);
    }

    #[test]
    fn test_close_discards_buffer_and_is_idempotent() {
        let mut cursor = cursor_with_rows(sample_rows(3));
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        cursor.close();
        assert_eq!(cursor.state(), CursorState::Closed);
        assert_eq!(cursor.rowcount(), 0);
        assert!(cursor.fetchall().is_empty());
        assert!(cursor.fetchone().is_none());

        cursor.close();
        assert_eq!(cursor.state(), CursorState::Closed);
    }

    #[test]
    fn test_execute_on_closed_cursor_fails() {
        let mut cursor = cursor_with_rows(sample_rows(1));
        cursor.close();
        let err = cursor.execute("SELECT 1", &[]).unwrap_err();
        assert!(matches!(err, CursorError::Closed));
        assert_eq!(err.kind(), ErrorKind::Interface);
    }

    #[test]
    fn test_lastrowid_is_always_absent() {
        let mut cursor = cursor_with_rows(sample_rows(1));
        assert_eq!(cursor.lastrowid(), None);
        cursor.execute("SELECT id FROM t", &[]).unwrap();
        assert_eq!(cursor.lastrowid(), None);
    }

    #[test]
    fn test_execute_statement_container() {
        let mut cursor = cursor_with_rows(sample_rows(1));
        let stmt = Statement::new("SELECT id FROM t WHERE id = ?").bind(1i64);
        cursor.execute_statement(&stmt).unwrap();
        assert_eq!(cursor.rowcount(), 1);
    }
}
