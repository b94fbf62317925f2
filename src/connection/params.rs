//! Connection parameters and builder.

use std::time::Duration;

use crate::client::rest::{DEFAULT_COMPLETION_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL};
use crate::error::ConnectionError;

/// Parameter bundle for a BigQuery connection.
///
/// Credential acquisition happens above this layer; `credentials` is opaque
/// bearer-token material passed through to the REST backend.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Google Cloud project identifier.
    pub project: String,
    /// Bearer token material for API authentication.
    pub credentials: String,
    /// Processing location (region), e.g. `EU`. Optional.
    pub location: Option<String>,
    /// API endpoint; override for emulators and tests.
    pub endpoint: String,
    /// Interval between job completion polls.
    pub poll_interval: Duration,
    /// Overall deadline for a submitted job to reach a terminal state.
    pub completion_timeout: Duration,
}

impl ConnectionParams {
    /// Create parameters with defaults for everything but project and
    /// credentials.
    pub fn new(project: impl Into<String>, credentials: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            credentials: credentials.into(),
            location: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    /// Create a builder for constructing parameters.
    pub fn builder() -> ConnectionParamsBuilder {
        ConnectionParamsBuilder::new()
    }
}

/// Builder for [`ConnectionParams`].
#[derive(Debug, Default)]
pub struct ConnectionParamsBuilder {
    project: Option<String>,
    credentials: Option<String>,
    location: Option<String>,
    endpoint: Option<String>,
    poll_interval: Option<Duration>,
    completion_timeout: Option<Duration>,
}

impl ConnectionParamsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project identifier.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the credential material.
    pub fn credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Set the processing location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Override the API endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the job completion poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set the overall job completion deadline.
    pub fn completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = Some(timeout);
        self
    }

    /// Build the parameter bundle.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::MissingParameter` if project or credentials
    /// were not set.
    pub fn build(self) -> Result<ConnectionParams, ConnectionError> {
        let project = self
            .project
            .ok_or(ConnectionError::MissingParameter("project"))?;
        let credentials = self
            .credentials
            .ok_or(ConnectionError::MissingParameter("credentials"))?;

        let mut params = ConnectionParams::new(project, credentials);
        params.location = self.location;
        if let Some(endpoint) = self.endpoint {
            params.endpoint = endpoint;
        }
        if let Some(interval) = self.poll_interval {
            params.poll_interval = interval;
        }
        if let Some(timeout) = self.completion_timeout {
            params.completion_timeout = timeout;
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_required_fields() {
        let params = ConnectionParams::builder()
            .project("my-project")
            .credentials("token")
            .build()
            .unwrap();
        assert_eq!(params.project, "my-project");
        assert_eq!(params.endpoint, DEFAULT_ENDPOINT);
        assert!(params.location.is_none());
    }

    #[test]
    fn test_builder_missing_project() {
        let err = ConnectionParams::builder()
            .credentials("token")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConnectionError::MissingParameter("project")));
    }

    #[test]
    fn test_builder_missing_credentials() {
        let err = ConnectionParams::builder()
            .project("my-project")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::MissingParameter("credentials")
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let params = ConnectionParams::builder()
            .project("my-project")
            .credentials("token")
            .location("EU")
            .endpoint("http://localhost:9050/bigquery/v2")
            .poll_interval(Duration::from_millis(100))
            .completion_timeout(Duration::from_secs(30))
            .build()
            .unwrap();
        assert_eq!(params.location.as_deref(), Some("EU"));
        assert_eq!(params.endpoint, "http://localhost:9050/bigquery/v2");
        assert_eq!(params.poll_interval, Duration::from_millis(100));
        assert_eq!(params.completion_timeout, Duration::from_secs(30));
    }
}
