/// Project and membership endpoints

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{project_body, task_body, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_fetch_project() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;

    let (status, created) = ctx
        .send(
            Method::POST,
            "/v1/projects",
            Some(&owner.token),
            Some(project_body("  Roadmap  ")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["owner_id"], owner.id.to_string());
    assert_eq!(created["name"], "Roadmap");

    let project_id = created["id"].as_str().unwrap();
    let (status, fetched) = ctx
        .send(Method::GET, &format!("/v1/projects/{project_id}"), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, members) = ctx
        .send(
            Method::GET,
            &format!("/v1/projects/{project_id}/members"),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["role"], "owner");
}

#[tokio::test]
async fn test_project_visibility() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;
    let stranger = ctx.register("Stranger").await;
    let project_id = ctx.project(&owner, "Private").await;

    let (status, body) = ctx
        .send(Method::GET, &format!("/v1/projects/{project_id}"), Some(&stranger.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = ctx
        .send(
            Method::GET,
            &format!("/v1/projects/{}", Uuid::new_v4()),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_requires_edit_rights() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;
    let admin = ctx.register("Admin").await;
    let member = ctx.register("Member").await;
    let project_id = ctx.project(&owner, "Roadmap").await;
    ctx.add_member(project_id, &owner, &admin, "admin").await;
    ctx.add_member(project_id, &owner, &member, "member").await;

    let changes = json!({
        "name": "Renamed",
        "description": "New scope",
        "end_date": "2026-06-30T00:00:00Z",
    });
    let uri = format!("/v1/projects/{project_id}");

    let (status, _) = ctx
        .send(Method::PUT, &uri, Some(&member.token), Some(changes.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(Method::PUT, &uri, Some(&admin.token), Some(changes))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["start_date"], "2026-01-01T00:00:00Z");
    assert_eq!(body["owner_id"], owner.id.to_string());
}

#[tokio::test]
async fn test_delete_project() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;
    let member = ctx.register("Member").await;
    let project_id = ctx.project(&owner, "Doomed").await;
    ctx.add_member(project_id, &owner, &member, "member").await;
    let uri = format!("/v1/projects/{project_id}");

    let (status, task) = ctx
        .send(
            Method::POST,
            &format!("{uri}/tasks"),
            Some(&member.token),
            Some(task_body("Cleanup", member.id)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_uri = format!("{uri}/tasks/{}", task["id"].as_str().unwrap());

    let (status, _) = ctx.send(Method::DELETE, &uri, Some(&member.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.send(Method::DELETE, &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = ctx.send(Method::GET, &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.membership_count().await, 0);

    for user in [&owner, &member] {
        let (status, _) = ctx.send(Method::GET, &task_uri, Some(&user.token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = ctx
            .send(Method::GET, &format!("{uri}/members"), Some(&user.token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_project_payload_errors() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/v1/projects",
            Some(&owner.token),
            Some(json!({
                "name": "Backwards",
                "start_date": "2026-03-01T00:00:00Z",
                "end_date": "2026-01-01T00:00:00Z",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "end_date");

    for name in ["", "   ", "ab", "  ab  "] {
        let (status, body) = ctx
            .send(Method::POST, "/v1/projects", Some(&owner.token), Some(project_body(name)))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "name {name:?}");
        assert_eq!(body["details"][0]["field"], "name");
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/projects")
        .header(header::AUTHORIZATION, format!("Bearer {}", owner.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = ctx.send_raw(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = ctx
        .send(Method::GET, "/v1/projects/not-a-uuid", Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.project_count().await, 0);
}

#[tokio::test]
async fn test_project_listing_pages_start_at_one() {
    let ctx = TestContext::with_page_size(2);
    let owner = ctx.register("Owner").await;
    let other = ctx.register("Other").await;
    for name in ["First", "Second", "Third"] {
        ctx.project(&owner, name).await;
    }
    ctx.project(&other, "Not mine").await;

    let names = |body: &serde_json::Value| -> Vec<String> {
        body["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, body) = ctx
        .send(Method::GET, "/v1/projects", Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 2);
    assert_eq!(names(&body).len(), 2);

    let (_, page_two) = ctx
        .send(Method::GET, "/v1/projects?page=2", Some(&owner.token), None)
        .await;
    assert_eq!(names(&page_two).len(), 1);

    let (_, page_zero) = ctx
        .send(Method::GET, "/v1/projects?page=0", Some(&owner.token), None)
        .await;
    assert_eq!(names(&page_zero), names(&body));

    let mut all = names(&body);
    all.extend(names(&page_two));
    all.sort();
    assert_eq!(all, vec!["First", "Second", "Third"]);

    let (status, _) = ctx
        .send(Method::GET, "/v1/projects?page=abc", Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_member_rules() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;
    let member = ctx.register("Member").await;
    let newcomer = ctx.register("Newcomer").await;
    let project_id = ctx.project(&owner, "Roadmap").await;
    let uri = format!("/v1/projects/{project_id}/members");
    ctx.add_member(project_id, &owner, &member, "member").await;

    let (status, _) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&member.token),
            Some(json!({ "user_id": newcomer.id, "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&owner.token),
            Some(json!({ "user_id": member.id, "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&owner.token),
            Some(json!({ "user_id": newcomer.id, "role": "owner" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&owner.token),
            Some(json!({ "user_id": newcomer.id, "role": "viewer" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "role");

    let (status, _) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&owner.token),
            Some(json!({ "user_id": Uuid::new_v4(), "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx
        .send(
            Method::POST,
            &uri,
            Some(&owner.token),
            Some(json!({ "user_id": newcomer.id, "role": "Admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "admin");

    let (_, members) = ctx.send(Method::GET, &uri, Some(&newcomer.token), None).await;
    let ids: Vec<&str> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            owner.id.to_string(),
            member.id.to_string(),
            newcomer.id.to_string()
        ]
    );
}

#[tokio::test]
async fn test_remove_member_rules() {
    let ctx = TestContext::new();
    let owner = ctx.register("Owner").await;
    let admin = ctx.register("Admin").await;
    let member = ctx.register("Member").await;
    let project_id = ctx.project(&owner, "Roadmap").await;
    ctx.add_member(project_id, &owner, &admin, "admin").await;
    ctx.add_member(project_id, &owner, &member, "member").await;
    let member_uri = |user_id: Uuid| format!("/v1/projects/{project_id}/members/{user_id}");

    let (status, _) = ctx
        .send(Method::DELETE, &member_uri(admin.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(Method::DELETE, &member_uri(owner.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(Method::DELETE, &member_uri(admin.id), Some(&member.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(Method::DELETE, &member_uri(member.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .send(Method::DELETE, &member_uri(member.id), Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send(
            Method::GET,
            &format!("/v1/projects/{project_id}"),
            Some(&member.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
