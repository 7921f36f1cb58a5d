//! Shared fixtures for core integration tests
//!
//! Every test gets its own [`InMemoryStore`]; users are inserted directly so
//! the tests never pay for password hashing.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use crewboard_shared::auth::password::HashCost;
use crewboard_shared::models::membership::ProjectRole;
use crewboard_shared::models::project::{CreateProject, Project};
use crewboard_shared::models::task::{CreateTask, TaskPriority, TaskStatus};
use crewboard_shared::models::user::{CreateUser, User};
use crewboard_shared::services::{ServiceSettings, Services};
use crewboard_shared::store::memory::InMemoryStore;
use crewboard_shared::store::{Store, UserStore};
use uuid::Uuid;

pub struct TestContext {
    pub store: InMemoryStore,
    pub services: Services,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    pub fn with_page_size(projects_per_page: i64) -> Self {
        let store = InMemoryStore::new();
        let shared: Arc<dyn Store> = Arc::new(store.clone());
        let services = Services::new(
            shared,
            ServiceSettings {
                projects_per_page,
                jwt_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                hash_cost: HashCost::MINIMAL,
            },
        );
        Self { store, services }
    }

    pub async fn user(&self, name: &str) -> Uuid {
        let user = User::new(CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "unused".to_string(),
        });
        self.store.insert_user(&user).await.unwrap().id
    }

    pub async fn project(&self, owner: Uuid, name: &str) -> Project {
        self.services
            .projects
            .create(owner, project_fields(name))
            .await
            .unwrap()
    }

    pub async fn member(&self, project_id: Uuid, owner: Uuid, user_id: Uuid, role: ProjectRole) {
        self.services
            .members
            .add(project_id, owner, user_id, role)
            .await
            .unwrap();
    }
}

pub fn project_fields(name: &str) -> CreateProject {
    let start = Utc::now();
    CreateProject {
        name: name.to_string(),
        description: format!("{name} description"),
        start_date: start,
        end_date: start + Duration::days(30),
    }
}

pub fn task_fields(project_id: Uuid, created_by: Uuid, assignee: Uuid, title: &str) -> CreateTask {
    CreateTask {
        project_id,
        created_by,
        assignee,
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        due_date: None,
    }
}
