//! # Crewboard API Server Library
//!
//! HTTP surface over the `crewboard-shared` services.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers
//! - `validation`: Request payload validation

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod validation;
