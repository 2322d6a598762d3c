//! Push configuration endpoints. A push tells connected client SDKs to
//! re-fetch flags when a tagged flag changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Push {
    pub id: String,
    pub name: String,
    /// Flag tags this push fans out for.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePushRequest {
    pub environment_id: String,
    pub name: String,
    pub tags: Vec<String>,
    /// Service-account credential blob for the push gateway.
    pub fcm_service_account: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePushRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPushesResponse {
    pub pushes: Vec<Push>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct PushEnvelope {
    push: Push,
}

/// Client for `/v1/pushes`.
pub struct PushesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PushesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, environment_id: &str, query: PageQuery) -> Result<ListPushesResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/pushes", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<Push> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: PushEnvelope = self.client.get(&format!("/v1/pushes/{id}"), &params).await?;
        Ok(envelope.push)
    }

    pub async fn create(&self, request: &CreatePushRequest) -> Result<Push> {
        let envelope: PushEnvelope = self.client.post("/v1/pushes", request).await?;
        Ok(envelope.push)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdatePushRequest,
    ) -> Result<Push> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: PushEnvelope =
            self.client.patch(&format!("/v1/pushes/{id}"), &body).await?;
        Ok(envelope.push)
    }

    pub async fn delete(&self, environment_id: &str, id: &str) -> Result<()> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        self.client
            .delete(&format!("/v1/pushes/{id}"), &params)
            .await
    }
}
