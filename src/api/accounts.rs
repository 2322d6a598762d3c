//! Member account endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::client::ApiClient;
use crate::error::Result;

use super::PageQuery;

/// Organization-level role of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Viewer,
    Editor,
    Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub email: String,
    pub name: String,
    pub organization_id: String,
    pub role: AccountRole,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub organization_id: String,
    pub email: String,
    pub name: String,
    pub role: AccountRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsResponse {
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    account: Account,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationScope<'a> {
    organization_id: &'a str,
}

/// Client for `/v1/accounts`. Accounts are keyed by email within an
/// organization.
pub struct AccountsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AccountsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        organization_id: &str,
        query: PageQuery,
    ) -> Result<ListAccountsResponse> {
        let mut params = query.to_params();
        params.push(("organizationId".to_string(), organization_id.to_string()));
        self.client.get("/v1/accounts", &params).await
    }

    pub async fn get(&self, organization_id: &str, email: &str) -> Result<Account> {
        let params = vec![("organizationId".to_string(), organization_id.to_string())];
        let envelope: AccountEnvelope = self
            .client
            .get(&format!("/v1/accounts/{email}"), &params)
            .await?;
        Ok(envelope.account)
    }

    pub async fn create(&self, request: &CreateAccountRequest) -> Result<Account> {
        let envelope: AccountEnvelope = self.client.post("/v1/accounts", request).await?;
        Ok(envelope.account)
    }

    pub async fn update_role(
        &self,
        organization_id: &str,
        email: &str,
        role: AccountRole,
    ) -> Result<Account> {
        let body = serde_json::json!({
            "organizationId": organization_id,
            "role": role,
        });
        let envelope: AccountEnvelope = self
            .client
            .patch(&format!("/v1/accounts/{email}"), &body)
            .await?;
        Ok(envelope.account)
    }

    /// Disabled accounts keep their history but can no longer sign in.
    pub async fn disable(&self, organization_id: &str, email: &str) -> Result<()> {
        self.client
            .post_unit(
                &format!("/v1/accounts/{email}/disable"),
                &OrganizationScope { organization_id },
            )
            .await
    }
}
