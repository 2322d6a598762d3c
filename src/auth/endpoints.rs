//! Auth endpoint calls: sign-in and token refresh.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::AuthToken;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    token: AuthToken,
}

/// Exchange credentials for a token pair via `POST /v1/auth/token`.
pub async fn sign_in(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<AuthToken, AuthError> {
    let resp = client
        .post(format!("{base_url}/v1/auth/token"))
        .json(&SignInRequest { email, password })
        .send()
        .await?;
    match resp.status() {
        status if status.is_success() => {
            let envelope: TokenEnvelope = resp.json().await?;
            Ok(envelope.token)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidCredentials),
        status => Err(AuthError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        }),
    }
}

/// Exchange a refresh token for a fresh pair via `POST /v1/auth/refresh`.
///
/// 401/403 means the refresh token itself is dead ([`AuthError::RefreshRejected`]);
/// any other failure is transient from the caller's point of view.
pub async fn refresh(
    client: &reqwest::Client,
    base_url: &str,
    refresh_token: &str,
) -> Result<AuthToken, AuthError> {
    let resp = client
        .post(format!("{base_url}/v1/auth/refresh"))
        .json(&RefreshRequest { refresh_token })
        .send()
        .await?;
    let status = resp.status();
    match status {
        _ if status.is_success() => {
            let envelope: TokenEnvelope = resp.json().await?;
            Ok(envelope.token)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::RefreshRejected {
            status: status.as_u16(),
        }),
        status => Err(AuthError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        }),
    }
}
