//! Notification subscription endpoints. A subscription forwards selected
//! domain events (flag changes, experiment results, member changes) to a
//! webhook recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Feature,
    Experiment,
    Goal,
    Account,
    Push,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Webhook URL events are posted to.
    pub webhook_url: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub source_types: Vec<SourceType>,
    pub recipient: Recipient,
    #[serde(default)]
    pub disabled: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub environment_id: String,
    pub name: String,
    pub source_types: Vec<SourceType>,
    pub recipient: Recipient,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_types: Option<Vec<SourceType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubscriptionsResponse {
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct SubscriptionEnvelope {
    subscription: Subscription,
}

/// Client for `/v1/subscriptions`.
pub struct NotificationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotificationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        environment_id: &str,
        query: PageQuery,
    ) -> Result<ListSubscriptionsResponse> {
        let mut params = query.to_params();
        params.push(("environmentId".to_string(), environment_id.to_string()));
        self.client.get("/v1/subscriptions", &params).await
    }

    pub async fn get(&self, environment_id: &str, id: &str) -> Result<Subscription> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        let envelope: SubscriptionEnvelope = self
            .client
            .get(&format!("/v1/subscriptions/{id}"), &params)
            .await?;
        Ok(envelope.subscription)
    }

    pub async fn create(&self, request: &CreateSubscriptionRequest) -> Result<Subscription> {
        let envelope: SubscriptionEnvelope =
            self.client.post("/v1/subscriptions", request).await?;
        Ok(envelope.subscription)
    }

    pub async fn update(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateSubscriptionRequest,
    ) -> Result<Subscription> {
        let body = serde_json::json!({
            "environmentId": environment_id,
            "changes": request,
        });
        let envelope: SubscriptionEnvelope = self
            .client
            .patch(&format!("/v1/subscriptions/{id}"), &body)
            .await?;
        Ok(envelope.subscription)
    }

    pub async fn delete(&self, environment_id: &str, id: &str) -> Result<()> {
        let params = vec![("environmentId".to_string(), environment_id.to_string())];
        self.client
            .delete(&format!("/v1/subscriptions/{id}"), &params)
            .await
    }
}
