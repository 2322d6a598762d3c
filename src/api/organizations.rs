//! Organization endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url_code: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub url_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrganizationsResponse {
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct OrganizationEnvelope {
    organization: Organization,
}

/// Client for `/v1/organizations`.
pub struct OrganizationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrganizationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: PageQuery) -> Result<ListOrganizationsResponse> {
        self.client
            .get("/v1/organizations", &query.to_params())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Organization> {
        let envelope: OrganizationEnvelope =
            self.client.get(&format!("/v1/organizations/{id}"), &[]).await?;
        Ok(envelope.organization)
    }

    pub async fn create(&self, request: &CreateOrganizationRequest) -> Result<Organization> {
        let envelope: OrganizationEnvelope =
            self.client.post("/v1/organizations", request).await?;
        Ok(envelope.organization)
    }

    pub async fn update(
        &self,
        id: &str,
        request: &UpdateOrganizationRequest,
    ) -> Result<Organization> {
        let envelope: OrganizationEnvelope = self
            .client
            .patch(&format!("/v1/organizations/{id}"), request)
            .await?;
        Ok(envelope.organization)
    }

    pub async fn archive(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(&format!("/v1/organizations/{id}/archive"), &serde_json::json!({}))
            .await
    }
}
