//! Environment endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
    #[serde(default)]
    pub url_code: String,
    /// Whether this environment needs a confirmation step before destructive
    /// flag changes (production environments typically do).
    #[serde(default)]
    pub require_comment: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentRequest {
    pub project_id: String,
    pub name: String,
    pub url_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub require_comment: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_comment: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvironmentsResponse {
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct EnvironmentEnvelope {
    environment: Environment,
}

/// Client for `/v1/environments`.
pub struct EnvironmentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EnvironmentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, project_id: &str, query: PageQuery) -> Result<ListEnvironmentsResponse> {
        let mut params = query.to_params();
        params.push(("projectId".to_string(), project_id.to_string()));
        self.client.get("/v1/environments", &params).await
    }

    pub async fn get(&self, id: &str) -> Result<Environment> {
        let envelope: EnvironmentEnvelope =
            self.client.get(&format!("/v1/environments/{id}"), &[]).await?;
        Ok(envelope.environment)
    }

    pub async fn create(&self, request: &CreateEnvironmentRequest) -> Result<Environment> {
        let envelope: EnvironmentEnvelope =
            self.client.post("/v1/environments", request).await?;
        Ok(envelope.environment)
    }

    pub async fn update(&self, id: &str, request: &UpdateEnvironmentRequest) -> Result<Environment> {
        let envelope: EnvironmentEnvelope = self
            .client
            .patch(&format!("/v1/environments/{id}"), request)
            .await?;
        Ok(envelope.environment)
    }
}
