/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: HS256 access/refresh tokens
/// - [`middleware`]: Bearer token extraction into an [`middleware::AuthContext`]
/// - [`authorization`]: Role-based project policy

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
