//! Feature flag endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

/// A feature flag as the admin API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub enabled: bool,
    #[serde(default)]
    pub archived: bool,
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub maintainer: String,
    pub version: i32,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

/// One serveable value of a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    #[serde(default)]
    pub id: String,
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureRequest {
    pub environment_id: String,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub variations: Vec<Variation>,
    /// Index into `variations` served when the flag is on.
    pub on_variation_index: u32,
    /// Index into `variations` served when the flag is off.
    pub off_variation_index: u32,
}

/// Partial update; unset fields are left as they are.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeatureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeaturesResponse {
    pub features: Vec<Feature>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct FeatureEnvelope {
    feature: Feature,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentScope<'a> {
    environment_id: &'a str,
}

/// Client for `/v1/features`.
pub struct FeaturesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FeaturesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        environment_id: &str,
        query: PageQuery,
    ) -> Result<ListFeaturesResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/features", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<Feature> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: FeatureEnvelope = self.client.get(&format!("/v1/features/{id}"), &params).await?;
        Ok(envelope.feature)
    }

    pub async fn create(&self, request: &CreateFeatureRequest) -> Result<Feature> {
        let envelope: FeatureEnvelope = self.client.post("/v1/features", request).await?;
        Ok(envelope.feature)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateFeatureRequest,
    ) -> Result<Feature> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: FeatureEnvelope = self
            .client
            .patch(&format!("/v1/features/{id}"), &body)
            .await?;
        Ok(envelope.feature)
    }

    /// Start serving the on-variation.
    pub async fn enable(&self, environment_id: &str, id: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/features/{id}/enable"),
                &EnvironmentScope { environment_id },
            )
            .await
    }

    /// Stop serving; clients fall back to the off-variation.
    pub async fn disable(&self, environment_id: &str, id: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/features/{id}/disable"),
                &EnvironmentScope { environment_id },
            )
            .await
    }

    /// Hide the flag from default listings. Archived flags keep serving
    /// their last configuration.
    pub async fn archive(&self, environment_id: &str, id: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/features/{id}/archive"),
                &EnvironmentScope { environment_id },
            )
            .await
    }
}
