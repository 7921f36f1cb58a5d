/// PostgreSQL plumbing for Crewboard
///
/// - `pool`: connection pool construction and health checks
/// - `migrations`: embedded schema migrations from `migrations/`
///
/// Query code lives in [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
