//! Project endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub organization_id: String,
    #[serde(default)]
    pub url_code: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub organization_id: String,
    pub name: String,
    pub url_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsResponse {
    pub projects: Vec<Project>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct ProjectEnvelope {
    project: Project,
}

/// Client for `/v1/projects`.
pub struct ProjectsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProjectsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: PageQuery) -> Result<ListProjectsResponse> {
        self.client.get("/v1/projects", &query.to_params()).await
    }

    pub async fn get(&self, id: &str) -> Result<Project> {
        let envelope: ProjectEnvelope =
            self.client.get(&format!("/v1/projects/{id}"), &[]).await?;
        Ok(envelope.project)
    }

    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project> {
        let envelope: ProjectEnvelope = self.client.post("/v1/projects", request).await?;
        Ok(envelope.project)
    }

    pub async fn update(&self, id: &str, request: &UpdateProjectRequest) -> Result<Project> {
        let envelope: ProjectEnvelope = self
            .client
            .patch(&format!("/v1/projects/{id}"), request)
            .await?;
        Ok(envelope.project)
    }
}
