//! Common test utilities for API tests
//!
//! Builds the full router over an [`InMemoryStore`] so requests run through
//! routing, authentication, validation and the services without a database.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use crewboard_api::app::{build_router, AppState};
use crewboard_api::config::Config;
use crewboard_shared::auth::password::HashCost;
use crewboard_shared::services::{ServiceSettings, Services};
use crewboard_shared::store::memory::InMemoryStore;
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "api-test-secret-key-at-least-32-bytes";
pub const PASSWORD: &str = "Sup3r!secret";

/// Registered user with a valid access token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

pub struct TestContext {
    pub app: axum::Router,
    pub store: InMemoryStore,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    pub fn with_page_size(per_page: i64) -> Self {
        let vars: HashMap<&str, String> = HashMap::from([
            ("DATABASE_URL", "postgresql://unused/crewboard".to_string()),
            ("JWT_SECRET", JWT_SECRET.to_string()),
            ("PROJECTS_PER_PAGE", per_page.to_string()),
        ]);
        let config = Config::from_vars(|key| vars.get(key).cloned())
            .expect("test configuration is valid");

        let store = InMemoryStore::new();
        let mut settings = ServiceSettings::new(JWT_SECRET);
        settings.projects_per_page = per_page;
        settings.hash_cost = HashCost::MINIMAL;

        let services = Services::new(Arc::new(store.clone()), settings);
        let state = AppState::with_services(Arc::new(store.clone()), services, config);

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request and decodes the JSON body (`Value::Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.send_raw(builder.body(body).unwrap()).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn register(&self, name: &str) -> TestUser {
        let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        TestUser {
            id: body["user_id"].as_str().unwrap().parse().unwrap(),
            email,
            token: body["access_token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project through the API and returns its id
    pub async fn project(&self, owner: &TestUser, name: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/v1/projects",
                Some(&owner.token),
                Some(project_body(name)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "project create failed: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn add_member(&self, project_id: Uuid, actor: &TestUser, user: &TestUser, role: &str) {
        let (status, body) = self
            .send(
                Method::POST,
                &format!("/v1/projects/{project_id}/members"),
                Some(&actor.token),
                Some(json!({ "user_id": user.id, "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add member failed: {body}");
    }
}

pub fn project_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Quarterly roadmap",
        "start_date": "2026-01-01T00:00:00Z",
        "end_date": "2026-03-31T00:00:00Z",
    })
}

pub fn task_body(title: &str, assignee: Uuid) -> Value {
    json!({
        "title": title,
        "description": "",
        "priority": "high",
        "assignee": assignee,
    })
}
