/// Core services
///
/// Each service owns one slice of the membership-and-authorization rules and
/// talks to persistence only through [`Store`]. The HTTP layer holds a
/// [`Services`] bundle and calls into it with the authenticated actor ID.
///
/// # Services
///
/// - [`directory::MembershipDirectory`]: membership lookup and mutation
/// - [`project::ProjectService`]: project lifecycle, atomic owner creation
/// - [`members::MemberService`]: adding, listing and removing members
/// - [`task::TaskService`]: task access mediation
/// - [`user::UserService`]: registration, login and token refresh

pub mod directory;
pub mod members;
pub mod project;
pub mod task;
pub mod user;

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::authorization::{authorize, ProjectAction};
use crate::auth::password::HashCost;
use crate::error::{CoreError, CoreResult};
use crate::models::membership::Membership;
use crate::store::Store;

use directory::MembershipDirectory;
use members::MemberService;
use project::ProjectService;
use task::TaskService;
use user::UserService;

/// Page size used by [`ProjectService::get_for_user`] unless configured
pub const DEFAULT_PROJECTS_PER_PAGE: i64 = 10;

/// Tunables shared by the services
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Page size for project listings
    pub projects_per_page: i64,

    /// HS256 secret for issued tokens
    pub jwt_secret: String,

    /// Argon2 cost for new password hashes
    pub hash_cost: HashCost,
}

impl ServiceSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            projects_per_page: DEFAULT_PROJECTS_PER_PAGE,
            jwt_secret: jwt_secret.into(),
            hash_cost: HashCost::default(),
        }
    }
}

/// All core services over one store
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub projects: ProjectService,
    pub members: MemberService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, settings: ServiceSettings) -> Self {
        let directory = MembershipDirectory::new(Arc::clone(&store));

        Self {
            users: UserService::new(Arc::clone(&store), settings.jwt_secret, settings.hash_cost),
            projects: ProjectService::new(
                Arc::clone(&store),
                directory.clone(),
                settings.projects_per_page,
            ),
            members: MemberService::new(Arc::clone(&store), directory.clone()),
            tasks: TaskService::new(store, directory),
        }
    }
}

/// Looks up the actor's membership and applies the policy for `action`
///
/// A missing project is `NotFound` for every actor.
pub(crate) async fn require_access(
    store: &dyn Store,
    directory: &MembershipDirectory,
    project_id: Uuid,
    actor_id: Uuid,
    action: ProjectAction,
) -> CoreResult<Membership> {
    if store.find_project(project_id).await?.is_none() {
        debug!(project_id = %project_id, actor_id = %actor_id, "Project not found");
        return Err(CoreError::NotFound(format!("Project {project_id} not found")));
    }

    let membership = directory.find(project_id, actor_id).await?;

    authorize(membership, project_id, action).map_err(|denied| {
        warn!(
            project_id = %project_id,
            actor_id = %actor_id,
            action = %action,
            reason = %denied,
            "Access denied"
        );
        denied.into()
    })
}
