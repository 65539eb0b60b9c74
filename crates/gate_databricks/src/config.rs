//! Configuration for Databricks connections.

use crate::DatabricksError;
use std::fmt;
use std::time::Duration;

/// Default timeout for a single HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to a Databricks workspace.
#[derive(Clone)]
pub struct DatabricksConfig {
    /// Workspace URL, normalized to `scheme://host[:port]` without trailing slash
    pub host: String,

    /// Personal access token or OAuth bearer token
    token: String,

    /// Timeout for a single HTTP request
    pub request_timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,
}

impl DatabricksConfig {
    /// Creates a new builder for `DatabricksConfig`.
    pub fn builder() -> DatabricksConfigBuilder {
        DatabricksConfigBuilder::default()
    }

    /// Returns the bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), DatabricksError> {
        if self.host.is_empty() {
            return Err(DatabricksError::ConfigurationError(
                "host cannot be empty".to_string(),
            ));
        }

        if self.token.is_empty() {
            return Err(DatabricksError::ConfigurationError(
                "token cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for DatabricksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabricksConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for `DatabricksConfig`.
#[derive(Default)]
pub struct DatabricksConfigBuilder {
    host: Option<String>,
    token: Option<String>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl DatabricksConfigBuilder {
    /// Sets the workspace URL. A missing scheme defaults to `https://`.
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the bearer token.
    pub fn token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the timeout for a single HTTP request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Overrides the user agent.
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the `DatabricksConfig`.
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<DatabricksConfig, DatabricksError> {
        let host = self.host.ok_or_else(|| {
            DatabricksError::ConfigurationError("host is required".to_string())
        })?;
        let token = self.token.ok_or_else(|| {
            DatabricksError::ConfigurationError("token is required".to_string())
        })?;

        let config = DatabricksConfig {
            host: normalize_host(&host),
            token: token.trim().to_string(),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            user_agent: self.user_agent.unwrap_or_else(|| {
                format!("deployment-gate/{}", env!("CARGO_PKG_VERSION"))
            }),
        };

        config.validate()?;
        Ok(config)
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() || host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
