//! HTTP client for the Databricks REST APIs.

use crate::{DatabricksConfig, DatabricksError};
use async_trait::async_trait;
use gate_core::{
    JobSummary, Platform, Result as GateResult, StatementHandle, StatementRequest,
    StatementState, TableRef,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

/// Error codes the platform uses for missing resources, whatever the HTTP status.
const NOT_FOUND_CODES: &[&str] = &[
    "NOT_FOUND",
    "RESOURCE_DOES_NOT_EXIST",
    "TABLE_DOES_NOT_EXIST",
    "SCHEMA_DOES_NOT_EXIST",
    "CATALOG_DOES_NOT_EXIST",
];

const JOBS_PAGE_SIZE: u32 = 100;

/// HTTP client for a Databricks workspace.
#[derive(Clone)]
pub struct DatabricksClient {
    config: Arc<DatabricksConfig>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    statement_id: String,
    status: StatementStatus,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    state: String,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        match (&self.error_code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "no error details".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JobsPage {
    #[serde(default)]
    jobs: Vec<JobEntry>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    job_id: i64,
    #[serde(default)]
    settings: Option<JobSettings>,
}

#[derive(Debug, Deserialize)]
struct JobSettings {
    #[serde(default)]
    name: Option<String>,
}

impl StatementResponse {
    fn into_handle(self) -> GateResult<StatementHandle> {
        let state = StatementState::from_api(&self.status.state)?;
        let mut handle = StatementHandle::new(self.statement_id, state);

        if let Some(error) = &self.status.error {
            handle = handle.with_error(error.describe());
        } else if state == StatementState::Failed && self.status.state != "FAILED" {
            handle = handle.with_error(format!("statement was {}", self.status.state));
        }

        Ok(handle)
    }
}

impl DatabricksClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: DatabricksConfig) -> Result<Self, DatabricksError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                DatabricksError::ConfigurationError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DatabricksConfig {
        &self.config
    }

    /// Builds an API URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DatabricksError> {
        let mut url = Url::parse(&self.config.host).map_err(|e| {
            DatabricksError::ConfigurationError(format!(
                "Invalid host '{}': {}",
                self.config.host, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                DatabricksError::ConfigurationError(format!(
                    "Host '{}' cannot be used as a base URL",
                    self.config.host
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
    ) -> Result<T, DatabricksError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(self.config.token())
            .send()
            .await?;

        self.handle_response(response, resource).await
    }

    /// Handle a successful or error response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        resource: &str,
    ) -> Result<T, DatabricksError> {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| DatabricksError::DecodeError(e.to_string()))
        } else {
            Err(self.error_from_response(response, resource).await)
        }
    }

    /// Convert an error response to a DatabricksError.
    async fn error_from_response(&self, response: Response, resource: &str) -> DatabricksError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let details: ServiceError = serde_json::from_str(&body).unwrap_or_default();

        let not_found_code = details
            .error_code
            .as_deref()
            .is_some_and(|code| NOT_FOUND_CODES.contains(&code));
        if status == StatusCode::NOT_FOUND || not_found_code {
            return DatabricksError::NotFound(resource.to_string());
        }

        let message = details.message.unwrap_or(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                DatabricksError::AuthenticationError {
                    status: status.as_u16(),
                    message,
                }
            }
            _ => DatabricksError::ApiError {
                status: status.as_u16(),
                error_code: details.error_code,
                message,
            },
        }
    }
}

#[async_trait]
impl Platform for DatabricksClient {
    async fn get_table(&self, table: &TableRef) -> GateResult<()> {
        let full_name = table.full_name();
        let url = self.endpoint(&["api", "2.1", "unity-catalog", "tables", &full_name])?;
        let _: Value = self.get_json(url, &full_name).await?;
        Ok(())
    }

    async fn submit_statement(&self, request: &StatementRequest) -> GateResult<StatementHandle> {
        let url = self.endpoint(&["api", "2.0", "sql", "statements"])?;
        let body = json!({
            "statement": request.statement,
            "warehouse_id": request.warehouse_id,
            "catalog": request.catalog,
            "schema": request.schema,
            "wait_timeout": "0s",
            "disposition": "INLINE",
            "format": "JSON_ARRAY",
        });

        debug!("POST {} ({})", url, request.statement);
        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.token())
            .json(&body)
            .send()
            .await
            .map_err(DatabricksError::from)?;

        let statement: StatementResponse = self.handle_response(response, "statement").await?;
        statement.into_handle()
    }

    async fn get_statement(&self, statement_id: &str) -> GateResult<StatementHandle> {
        let url = self.endpoint(&["api", "2.0", "sql", "statements", statement_id])?;
        let statement: StatementResponse = self.get_json(url, statement_id).await?;
        statement.into_handle()
    }

    async fn get_statement_result(&self, statement_id: &str) -> GateResult<Value> {
        let url = self.endpoint(&["api", "2.0", "sql", "statements", statement_id])?;
        Ok(self.get_json(url, statement_id).await?)
    }

    async fn cancel_statement(&self, statement_id: &str) -> GateResult<()> {
        let url = self.endpoint(&["api", "2.0", "sql", "statements", statement_id, "cancel"])?;

        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.token())
            .send()
            .await
            .map_err(DatabricksError::from)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_from_response(response, statement_id).await.into())
        }
    }

    async fn list_jobs(&self) -> GateResult<Vec<JobSummary>> {
        let mut jobs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["api", "2.1", "jobs", "list"])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("limit", &JOBS_PAGE_SIZE.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("page_token", token);
                }
            }

            let page: JobsPage = self.get_json(url, "jobs").await?;
            jobs.extend(page.jobs.into_iter().map(|job| JobSummary {
                job_id: job.job_id,
                name: job.settings.and_then(|settings| settings.name),
            }));

            match page.next_page_token {
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    warn!("Jobs listing returned page token {} twice, stopping", token);
                    break;
                }
                Some(token) if page.has_more => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} jobs", jobs.len());
        Ok(jobs)
    }
}
