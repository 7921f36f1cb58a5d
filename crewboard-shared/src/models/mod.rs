/// Domain models for Crewboard
///
/// Plain data types shared by the store implementations, the core services
/// and the HTTP layer. Persistence lives behind [`crate::store::Store`].
///
/// # Models
///
/// - `user`: User accounts
/// - `project`: Projects, the tenancy boundary
/// - `membership`: User-project relationships with roles
/// - `task`: Tasks inside a project

pub mod membership;
pub mod project;
pub mod task;
pub mod user;
