//! # Crewboard Shared Library
//!
//! Domain models, persistence and the membership-and-authorization core of
//! Crewboard, a multi-tenant project and task tracker. The API server is a
//! thin HTTP layer over the services defined here.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects, memberships and tasks
//! - `store`: Persistence traits with PostgreSQL and in-memory backends
//! - `services`: Project lifecycle, member management, task access, accounts
//! - `auth`: Password hashing, JWTs, bearer authentication and the role policy
//! - `db`: Connection pool and migrations
//! - `error`: Core error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Crewboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
