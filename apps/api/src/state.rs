use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenVerifier;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable bearer-token verifier. Default: HS256 keyed by JWT_SECRET.
    pub verifier: Arc<dyn TokenVerifier>,
}
