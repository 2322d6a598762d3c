#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use flagdeck::auth::{AuthToken, MemoryTokenStore, TokenStore};
use flagdeck::session::SessionManager;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn token(access: &str) -> AuthToken {
    AuthToken {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: Some(Utc::now() + Duration::minutes(30)),
    }
}

pub fn token_with_ttl(access: &str, ttl: Duration) -> AuthToken {
    AuthToken {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: Some(Utc::now() + ttl),
    }
}

pub fn seeded_store(token: AuthToken) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(token))
}

pub fn manager(server: &MockServer, store: Arc<MemoryTokenStore>) -> SessionManager {
    SessionManager::with_parts(
        server.uri(),
        reqwest::Client::new(),
        store as Arc<dyn TokenStore>,
    )
}

pub fn token_json(access: &str, refresh: &str, expires_at: DateTime<Utc>) -> serde_json::Value {
    json!({
        "token": {
            "accessToken": access,
            "tokenType": "Bearer",
            "refreshToken": refresh,
            "expiry": expires_at.timestamp(),
        }
    })
}

/// Mount a refresh endpoint returning a fresh token pair.
pub async fn mount_refresh_success(server: &MockServer, access: &str, ttl: Duration, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_json(access, "refresh-2", Utc::now() + ttl)),
        )
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_refresh_failure(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}
