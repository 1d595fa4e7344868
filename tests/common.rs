#![allow(dead_code)]

use std::sync::Arc;

use assignmentpro::config::{extract_config, ConfigV1};
use assignmentpro::session::{Session, TOKEN_KEY};
use assignmentpro::startup::{build_state_with_storage, start};
use assignmentpro::state::AppState;
use assignmentpro::storage::{LocalStorage, MemoryStorage};
use assignmentpro::utils::notifier::MemoryNotifier;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use mockito::{Mock, ServerGuard};
use serde_json::json;

pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Arc<MemoryNotifier>,
}

pub fn test_config(base_url: &str, policy: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
api_base_url: "{}"
request_timeout_in_ms: 3000
storage:
  type: memory
guards:
  authenticated_policy: {}
logging:
  level: debug
  format: console
"#,
        base_url, policy
    );
    extract_config(Figment::new().merge(Yaml::string(&yaml))).expect("test config should parse")
}

pub fn build_app(server: &ServerGuard) -> TestApp {
    build_app_with_policy(server, "render-all")
}

pub fn build_app_with_policy(server: &ServerGuard, policy: &str) -> TestApp {
    let config = Arc::new(test_config(&server.url(), policy));
    let storage = Arc::new(MemoryStorage::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let state = build_state_with_storage(config, storage.clone(), notifier.clone())
        .expect("state should build");
    TestApp {
        state,
        storage,
        notifier,
    }
}

pub fn identity_json(role: &str) -> serde_json::Value {
    json!({
        "_id": format!("{}-1", role),
        "name": format!("Test {}", role),
        "email": format!("{}@example.com", role),
        "role": role,
    })
}

/// Mocks `GET api/auth/verify` accepting `token` and answering with an identity of `role`.
pub async fn mock_verify(server: &mut ServerGuard, token: &str, role: &str) -> Mock {
    server
        .mock("GET", "/api/auth/verify")
        .match_header("authorization", format!("Bearer {}", token).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "user": identity_json(role) }).to_string())
        .create_async()
        .await
}

/// Stores a token, lets the backend vouch for it and restores the session.
pub async fn sign_in_as(app: &TestApp, server: &mut ServerGuard, role: &str) -> Session {
    app.storage
        .set_item(TOKEN_KEY, "tok")
        .expect("memory storage never fails");
    let _verify = mock_verify(server, "tok", role).await;
    start(&app.state).await
}

pub fn assignments_json() -> serde_json::Value {
    json!([
        {
            "_id": "a1",
            "title": "Thermodynamics essay",
            "description": "Five pages on entropy",
            "assignmentFile": "uploads/a1_essay.pdf",
            "answerKeyFile": "uploads/a1_key.docx",
            "status": "pending",
            "price": 12.5,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "user": {
                "name": "Test user",
                "email": "user@example.com",
                "phone": "555-0100",
                "address": "1 Main St"
            }
        },
        {
            "_id": "a2",
            "title": "Linear algebra set",
            "description": "Ten exercises",
            "assignmentFile": "uploads/a2_set.pdf",
            "answerKeyFile": "uploads/a2_key.pdf",
            "status": "in-progress",
            "price": 8,
            "createdAt": "2024-05-02T10:00:00.000Z"
        }
    ])
}

pub fn pricing_json() -> serde_json::Value {
    json!({
        "basic": {
            "price": 80,
            "description": "For short assignments",
            "pageRange": "1-10 pages",
            "features": ["Plagiarism check", "48h delivery"]
        },
        "standard": {
            "price": 120,
            "description": "For long assignments",
            "pageRange": "10+ pages",
            "features": ["Plagiarism check", "24h delivery", "Free revisions"]
        }
    })
}
