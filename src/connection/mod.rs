//! Connection management.
//!
//! A [`Connection`] owns the job-submitting client and hands out independent
//! [`Cursor`]s. BigQuery has no transactions, so `commit` is a no-op and
//! autocommit is always effectively on; there is no rollback path.

pub mod params;

use std::sync::Arc;

use crate::client::{JobClient, RestJobClient};
use crate::error::ConnectionError;
use crate::query::cursor::Cursor;
use crate::query::statement::Statement;

pub use params::{ConnectionParams, ConnectionParamsBuilder};

/// Connection to BigQuery.
///
/// Cursors created from one connection share the client but own their jobs
/// and result buffers exclusively; they can be driven independently.
pub struct Connection {
    client: Arc<dyn JobClient>,
    params: ConnectionParams,
    closed: bool,
}

impl Connection {
    /// Open a connection using the REST backend.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the client cannot be constructed.
    pub fn connect(params: ConnectionParams) -> Result<Self, ConnectionError> {
        let mut client = RestJobClient::new(&params.project, &params.credentials)
            .map_err(|e| ConnectionError::ClientSetup(e.to_string()))?
            .with_endpoint(&params.endpoint)
            .with_poll_interval(params.poll_interval)
            .with_completion_timeout(params.completion_timeout);
        if let Some(location) = &params.location {
            client = client.with_location(location);
        }
        Ok(Self::with_client(Arc::new(client), params))
    }

    /// Build a connection over an existing job client.
    ///
    /// This is the factory seam for host frameworks that construct their own
    /// client (and for tests that substitute an in-memory one).
    pub fn with_client(client: Arc<dyn JobClient>, params: ConnectionParams) -> Self {
        Self {
            client,
            params,
            closed: false,
        }
    }

    /// Create an independent cursor.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Closed` after [`close`](Self::close).
    pub fn cursor(&self) -> Result<Cursor, ConnectionError> {
        if self.closed {
            return Err(ConnectionError::Closed);
        }
        Ok(Cursor::new(Arc::clone(&self.client)))
    }

    /// Create a statement data container.
    pub fn create_statement(&self, sql: impl Into<String>) -> Statement {
        Statement::new(sql)
    }

    /// Liveness probe: issue a trivial query and report reachability.
    pub fn is_usable(&self) -> bool {
        match self.cursor() {
            Ok(mut cursor) => cursor.execute("SELECT 1", &[]).is_ok(),
            Err(_) => false,
        }
    }

    /// Commit the current transaction.
    ///
    /// BigQuery has no transactions; this is a no-op.
    pub fn commit(&self) {
        tracing::debug!("BigQuery has no transactions; commit is a no-op");
    }

    /// Autocommit is always effectively on.
    pub fn autocommit(&self) -> bool {
        true
    }

    /// Connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Whether the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the connection. Existing cursors keep working on their already
    /// buffered results; new cursors can no longer be created.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("project", &self.params.project)
            .field("location", &self.params.location)
            .field("closed", &self.closed)
            .finish()
    }
}
