/// Membership directory and member management
mod common;

use common::TestContext;
use crewboard_shared::error::CoreError;
use crewboard_shared::models::membership::ProjectRole;
use crewboard_shared::services::directory::MembershipDirectory;
use crewboard_shared::store::Store;
use std::sync::Arc;
use uuid::Uuid;

fn directory(ctx: &TestContext) -> MembershipDirectory {
    let store: Arc<dyn Store> = Arc::new(ctx.store.clone());
    MembershipDirectory::new(store)
}

#[tokio::test]
async fn test_directory_rejects_duplicate_pair_for_any_role() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let project = ctx.project(owner, "Apollo").await;
    let dir = directory(&ctx);

    dir.create(project.id, bob, ProjectRole::Member).await.unwrap();

    for role in [ProjectRole::Member, ProjectRole::Admin] {
        assert!(matches!(
            dir.create(project.id, bob, role).await,
            Err(CoreError::Conflict(_))
        ));
    }
    // the owner pair is taken as well
    assert!(matches!(
        dir.create(project.id, owner, ProjectRole::Admin).await,
        Err(CoreError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_directory_get_and_delete() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let project = ctx.project(owner, "Apollo").await;
    let dir = directory(&ctx);

    assert!(matches!(
        dir.get(project.id, bob).await,
        Err(CoreError::NotFound(_))
    ));

    dir.create(project.id, bob, ProjectRole::Admin).await.unwrap();
    assert_eq!(dir.get(project.id, bob).await.unwrap().role, ProjectRole::Admin);

    dir.delete(project.id, bob).await.unwrap();
    assert!(matches!(
        dir.delete(project.id, bob).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_directory_list_keeps_join_order() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let carol = ctx.user("Carol").await;
    let project = ctx.project(owner, "Apollo").await;
    let dir = directory(&ctx);

    dir.create(project.id, carol, ProjectRole::Member).await.unwrap();
    dir.create(project.id, bob, ProjectRole::Member).await.unwrap();

    let order: Vec<Uuid> = dir
        .list(project.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.user_id)
        .collect();
    assert_eq!(order, vec![owner, carol, bob]);
}

#[tokio::test]
async fn test_add_member_requires_edit_rights() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let admin = ctx.user("Adam").await;
    let member = ctx.user("Mia").await;
    let newcomer = ctx.user("Nina").await;
    let project = ctx.project(owner, "Apollo").await;
    ctx.member(project.id, owner, admin, ProjectRole::Admin).await;
    ctx.member(project.id, owner, member, ProjectRole::Member).await;

    assert!(matches!(
        ctx.services
            .members
            .add(project.id, member, newcomer, ProjectRole::Member)
            .await,
        Err(CoreError::Forbidden(_))
    ));

    let added = ctx
        .services
        .members
        .add(project.id, admin, newcomer, ProjectRole::Member)
        .await
        .unwrap();
    assert_eq!(added.user_id, newcomer);
}

#[tokio::test]
async fn test_add_member_outcomes() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let bob = ctx.user("Bob").await;
    let project = ctx.project(owner, "Apollo").await;

    assert!(matches!(
        ctx.services
            .members
            .add(project.id, owner, bob, ProjectRole::Owner)
            .await,
        Err(CoreError::Conflict(_))
    ));
    assert!(matches!(
        ctx.services
            .members
            .add(project.id, owner, Uuid::new_v4(), ProjectRole::Member)
            .await,
        Err(CoreError::NotFound(_))
    ));

    ctx.member(project.id, owner, bob, ProjectRole::Member).await;
    assert!(matches!(
        ctx.services
            .members
            .add(project.id, owner, bob, ProjectRole::Admin)
            .await,
        Err(CoreError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_list_members_requires_membership() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let member = ctx.user("Mia").await;
    let outsider = ctx.user("Olga").await;
    let project = ctx.project(owner, "Apollo").await;
    ctx.member(project.id, owner, member, ProjectRole::Member).await;

    assert_eq!(
        ctx.services.members.list(project.id, member).await.unwrap().len(),
        2
    );
    assert!(matches!(
        ctx.services.members.list(project.id, outsider).await,
        Err(CoreError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_remove_member_rules() {
    let ctx = TestContext::new();
    let owner = ctx.user("Alice").await;
    let admin = ctx.user("Adam").await;
    let member = ctx.user("Mia").await;
    let project = ctx.project(owner, "Apollo").await;
    ctx.member(project.id, owner, admin, ProjectRole::Admin).await;
    ctx.member(project.id, owner, member, ProjectRole::Member).await;

    // members lack edit rights, even for themselves
    assert!(matches!(
        ctx.services.members.remove(project.id, member, member).await,
        Err(CoreError::Forbidden(_))
    ));
    // nobody removes themselves
    assert!(matches!(
        ctx.services.members.remove(project.id, admin, admin).await,
        Err(CoreError::Forbidden(_))
    ));
    assert!(matches!(
        ctx.services.members.remove(project.id, owner, owner).await,
        Err(CoreError::Forbidden(_))
    ));
    // the owner membership is permanent
    assert!(matches!(
        ctx.services.members.remove(project.id, admin, owner).await,
        Err(CoreError::Forbidden(_))
    ));
    assert!(matches!(
        ctx.services
            .members
            .remove(project.id, owner, Uuid::new_v4())
            .await,
        Err(CoreError::NotFound(_))
    ));

    ctx.services.members.remove(project.id, admin, member).await.unwrap();
    assert_eq!(
        ctx.services.members.list(project.id, owner).await.unwrap().len(),
        2
    );
}
