//! Experiment endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperimentStatus {
    Waiting,
    Running,
    Stopped,
    ForceStopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Flag whose variations the experiment compares.
    pub feature_id: String,
    pub feature_version: i32,
    pub goal_ids: Vec<String>,
    pub base_variation_id: String,
    pub status: ExperimentStatus,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub maintainer: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub stop_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperimentRequest {
    pub environment_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub feature_id: String,
    pub goal_ids: Vec<String>,
    pub base_variation_id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub stop_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperimentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub stop_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExperimentsResponse {
    pub experiments: Vec<Experiment>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct ExperimentEnvelope {
    experiment: Experiment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentScope<'a> {
    environment_id: &'a str,
}

/// Client for `/v1/experiments`.
pub struct ExperimentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ExperimentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        environment_id: &str,
        query: PageQuery,
    ) -> Result<ListExperimentsResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/experiments", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<Experiment> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: ExperimentEnvelope = self
            .client
            .get(&format!("/v1/experiments/{id}"), &params)
            .await?;
        Ok(envelope.experiment)
    }

    pub async fn create(&self, request: &CreateExperimentRequest) -> Result<Experiment> {
        let envelope: ExperimentEnvelope = self.client.post("/v1/experiments", request).await?;
        Ok(envelope.experiment)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateExperimentRequest,
    ) -> Result<Experiment> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: ExperimentEnvelope = self
            .client
            .patch(&format!("/v1/experiments/{id}"), &body)
            .await?;
        Ok(envelope.experiment)
    }

    /// Stop collecting results before the scheduled `stop_at`.
    pub async fn stop(&self, environment_id: &str, id: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/experiments/{id}/stop"),
                &EnvironmentScope { environment_id },
            )
            .await
    }
}
