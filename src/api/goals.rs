//! Goal endpoints. Goals name the conversion events experiments measure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Set when any experiment currently references this goal; such goals
    /// cannot be deleted.
    #[serde(default)]
    pub is_in_use_status: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub environment_id: String,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGoalsResponse {
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct GoalEnvelope {
    goal: Goal,
}

/// Client for `/v1/goals`.
pub struct GoalsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> GoalsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, environment_id: &str, query: PageQuery) -> Result<ListGoalsResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/goals", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<Goal> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: GoalEnvelope = self.client.get(&format!("/v1/goals/{id}"), &params).await?;
        Ok(envelope.goal)
    }

    pub async fn create(&self, request: &CreateGoalRequest) -> Result<Goal> {
        let envelope: GoalEnvelope = self.client.post("/v1/goals", request).await?;
        Ok(envelope.goal)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateGoalRequest,
    ) -> Result<Goal> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: GoalEnvelope =
            self.client.patch(&format!("/v1/goals/{id}"), &body).await?;
        Ok(envelope.goal)
    }

    pub async fn delete(&self, environment_id: &str, id: &str) -> Result<()> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        self.client.delete(&format!("/v1/goals/{id}"), &params).await
    }
}
