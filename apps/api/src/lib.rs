//! Stafflink API: multi-tenant recruiting backend.
//!
//! Data access is row-scoped to the employer bound on the request's
//! [`tenant::TenantSession`]; recruiter links widen reads (never writes)
//! across tenants. See the `tenant`, `store` and `auth` modules for the
//! enforcement layers.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tenant;
