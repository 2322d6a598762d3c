//! API key endpoints. Keys authenticate the client and server SDKs against
//! an environment; the secret is only returned on creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

/// What the key is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiKeyRole {
    /// Client-side SDKs: evaluate flags for one user at a time.
    SdkClient,
    /// Server-side SDKs: fetch full flag configurations.
    SdkServer,
    PublicApiReadOnly,
    PublicApiWrite,
    PublicApiAdmin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub role: ApiKeyRole,
    #[serde(default)]
    pub disabled: bool,
    /// The key secret; empty everywhere except the create response.
    #[serde(default)]
    pub api_key: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub environment_id: String,
    pub name: String,
    pub role: ApiKeyRole,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApiKeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKey>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiKeyEnvelope {
    api_key: ApiKey,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentScope<'a> {
    environment_id: &'a str,
}

/// Client for `/v1/api_keys`.
pub struct ApiKeysApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ApiKeysApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        environment_id: &str,
        query: PageQuery,
    ) -> Result<ListApiKeysResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/api_keys", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<ApiKey> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: ApiKeyEnvelope = self
            .client
            .get(&format!("/v1/api_keys/{id}"), &params)
            .await?;
        Ok(envelope.api_key)
    }

    pub async fn create(&self, request: &CreateApiKeyRequest) -> Result<ApiKey> {
        let envelope: ApiKeyEnvelope = self.client.post("/v1/api_keys", request).await?;
        Ok(envelope.api_key)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateApiKeyRequest,
    ) -> Result<ApiKey> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: ApiKeyEnvelope = self
            .client
            .patch(&format!("/v1/api_keys/{id}"), &body)
            .await?;
        Ok(envelope.api_key)
    }

    pub async fn enable(&self, environment_id: &str, id: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/api_keys/{id}/enable"),
                &EnvironmentScope { environment_id },
            )
            .await
    }

    /// Disabled keys are rejected by the SDK endpoints but keep their
    /// configuration.
    pub async fn disable(&self, environment_id: &str, id: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/api_keys/{id}/disable"),
                &EnvironmentScope { environment_id },
            )
            .await
    }
}
