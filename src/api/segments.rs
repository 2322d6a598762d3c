//! User segment endpoints. A segment is a reusable list of user IDs that
//! flag targeting rules can reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Number of user IDs currently in the segment.
    #[serde(default)]
    pub included_user_count: i64,
    /// Set when any flag rule references this segment; such segments cannot
    /// be deleted.
    #[serde(default)]
    pub is_in_use_status: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSegmentRequest {
    pub environment_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSegmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSegmentsResponse {
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct SegmentEnvelope {
    segment: Segment,
}

/// Client for `/v1/segments`.
pub struct SegmentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SegmentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        environment_id: &str,
        query: PageQuery,
    ) -> Result<ListSegmentsResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/segments", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<Segment> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: SegmentEnvelope = self
            .client
            .get(&format!("/v1/segments/{id}"), &params)
            .await?;
        Ok(envelope.segment)
    }

    pub async fn create(&self, request: &CreateSegmentRequest) -> Result<Segment> {
        let envelope: SegmentEnvelope = self.client.post("/v1/segments", request).await?;
        Ok(envelope.segment)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateSegmentRequest,
    ) -> Result<Segment> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: SegmentEnvelope = self
            .client
            .patch(&format!("/v1/segments/{id}"), &body)
            .await?;
        Ok(envelope.segment)
    }

    pub async fn delete(&self, environment_id: &str, id: &str) -> Result<()> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        self.client
            .delete(&format!("/v1/segments/{id}"), &params)
            .await
    }
}
