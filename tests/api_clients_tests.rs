mod support;

use std::sync::Arc;

use flagdeck::api::api_keys::{ApiKeyRole, CreateApiKeyRequest};
use flagdeck::api::features::{CreateFeatureRequest, Variation};
use flagdeck::api::segments::UpdateSegmentRequest;
use flagdeck::api::{OrderBy, OrderDirection, PageQuery};
use flagdeck::client::ApiClient;
use flagdeck::error::FlagdeckError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{manager, seeded_store, token};

fn client(server: &MockServer) -> ApiClient {
    let session = manager(server, seeded_store(token("access-1")));
    ApiClient::with_parts(server.uri(), reqwest::Client::new(), Arc::new(session))
}

#[tokio::test]
async fn feature_list_renders_pagination_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/features"))
        .and(query_param("environmentId", "production"))
        .and(query_param("pageSize", "20"))
        .and(query_param("orderBy", "UPDATED_AT"))
        .and(query_param("orderDirection", "DESC"))
        .and(query_param("searchKeyword", "checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{
                "id": "checkout-redesign",
                "name": "Checkout redesign",
                "enabled": true,
                "variations": [
                    {"id": "v1", "value": "true", "name": "on"},
                    {"id": "v2", "value": "false", "name": "off"},
                ],
                "version": 3,
                "createdAt": 1_700_000_000,
                "updatedAt": 1_700_100_000,
            }],
            "cursor": "20",
            "totalCount": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let query = PageQuery::default()
        .page_size(20)
        .order_by(OrderBy::UpdatedAt, OrderDirection::Desc)
        .search("checkout");
    let page = client.features().list("production", query).await.unwrap();

    assert_eq!(page.total_count, 1);
    let feature = &page.features[0];
    assert_eq!(feature.id, "checkout-redesign");
    assert!(feature.enabled);
    assert_eq!(feature.variations.len(), 2);
    assert_eq!(feature.created_at.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn feature_create_sends_the_full_definition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/features"))
        .and(body_json(json!({
            "environmentId": "production",
            "id": "new-onboarding",
            "name": "New onboarding",
            "description": "Gradual rollout of the new onboarding flow",
            "variations": [
                {"id": "", "value": "true", "name": "on", "description": ""},
                {"id": "", "value": "false", "name": "off", "description": ""},
            ],
            "onVariationIndex": 0,
            "offVariationIndex": 1,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feature": {
                "id": "new-onboarding",
                "name": "New onboarding",
                "description": "Gradual rollout of the new onboarding flow",
                "enabled": false,
                "variations": [
                    {"id": "v1", "value": "true", "name": "on"},
                    {"id": "v2", "value": "false", "name": "off"},
                ],
                "version": 1,
                "createdAt": 1_700_000_000,
                "updatedAt": 1_700_000_000,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let request = CreateFeatureRequest {
        environment_id: "production".to_string(),
        id: "new-onboarding".to_string(),
        name: "New onboarding".to_string(),
        description: Some("Gradual rollout of the new onboarding flow".to_string()),
        tags: Vec::new(),
        variations: vec![
            Variation {
                id: String::new(),
                value: "true".to_string(),
                name: "on".to_string(),
                description: String::new(),
            },
            Variation {
                id: String::new(),
                value: "false".to_string(),
                name: "off".to_string(),
                description: String::new(),
            },
        ],
        on_variation_index: 0,
        off_variation_index: 1,
    };
    let feature = client.features().create(&request).await.unwrap();
    assert_eq!(feature.version, 1);
    assert!(!feature.enabled);
}

#[tokio::test]
async fn feature_enable_posts_the_environment_scope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/features/checkout-redesign/enable"))
        .and(body_json(json!({"environmentId": "production"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .features()
        .enable("production", "checkout-redesign")
        .await
        .unwrap();
}

#[tokio::test]
async fn goal_delete_targets_the_environment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/goals/purchase"))
        .and(query_param("environmentId", "staging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.goals().delete("staging", "purchase").await.unwrap();
}

#[tokio::test]
async fn account_role_update_patches_the_member() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/accounts/dev@example.com"))
        .and(body_json(json!({
            "organizationId": "org-1",
            "role": "EDITOR",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": {
                "email": "dev@example.com",
                "name": "Dev",
                "organizationId": "org-1",
                "role": "EDITOR",
                "createdAt": 1_700_000_000,
                "updatedAt": 1_700_100_000,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let account = client
        .accounts()
        .update_role(
            "org-1",
            "dev@example.com",
            flagdeck::api::accounts::AccountRole::Editor,
        )
        .await
        .unwrap();
    assert_eq!(
        account.role,
        flagdeck::api::accounts::AccountRole::Editor
    );
}

#[tokio::test]
async fn push_delete_escapes_the_environment_query() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/pushes/mobile"))
        .and(query_param("environmentId", "staging+eu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.pushes().delete("staging+eu", "mobile").await.unwrap();
}

#[tokio::test]
async fn api_key_create_returns_the_secret_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api_keys"))
        .and(body_json(json!({
            "environmentId": "production",
            "name": "ios-app",
            "role": "SDK_CLIENT",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiKey": {
                "id": "key-1",
                "name": "ios-app",
                "role": "SDK_CLIENT",
                "apiKey": "secret-value",
                "createdAt": 1_700_000_000,
                "updatedAt": 1_700_000_000,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let request = CreateApiKeyRequest {
        environment_id: "production".to_string(),
        name: "ios-app".to_string(),
        role: ApiKeyRole::SdkClient,
    };
    let key = client.api_keys().create(&request).await.unwrap();
    assert_eq!(key.api_key, "secret-value");
    assert_eq!(key.role, ApiKeyRole::SdkClient);
    assert!(!key.disabled);
}

#[tokio::test]
async fn api_key_disable_posts_the_environment_scope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api_keys/key-1/disable"))
        .and(body_json(json!({"environmentId": "production"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .api_keys()
        .disable("production", "key-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn segment_update_patches_the_changes() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/segments/beta-testers"))
        .and(body_json(json!({
            "environmentId": "staging",
            "changes": {"name": "Beta testers"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "segment": {
                "id": "beta-testers",
                "name": "Beta testers",
                "includedUserCount": 42,
                "createdAt": 1_700_000_000,
                "updatedAt": 1_700_100_000,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let request = UpdateSegmentRequest {
        name: Some("Beta testers".to_string()),
        ..Default::default()
    };
    let segment = client
        .segments()
        .update("staging", "beta-testers", &request)
        .await
        .unwrap();
    assert_eq!(segment.included_user_count, 42);
    assert!(!segment.is_in_use_status);
}

#[tokio::test]
async fn segment_delete_targets_the_environment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/segments/beta-testers"))
        .and(query_param("environmentId", "staging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .segments()
        .delete("staging", "beta-testers")
        .await
        .unwrap();
}

#[tokio::test]
async fn not_found_maps_to_an_api_error_with_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"message": "project not found"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.projects().get("missing").await.unwrap_err();
    match err {
        FlagdeckError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "project not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
