use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::token::TokenVerifier;
use crate::config::AppConfig;

/// Shared per-process state handed to every handler. Everything inside is
/// read-only after startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let verifier = TokenVerifier::new(
            &config.security.jwt_secret,
            config.security.jwt_expiry_minutes,
        );

        Self {
            config: Arc::new(config),
            pool,
            verifier,
        }
    }
}
