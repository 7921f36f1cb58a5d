/// HTTP route handlers
///
/// Handlers decode and validate requests, call into the core services with
/// the authenticated actor, and serialize the result. They make no
/// authorization decisions of their own.

pub mod auth;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
pub mod users;
