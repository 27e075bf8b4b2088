use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{ApiConfig, config::Environment, relay::RelayHub};

/// Settings needed to verify and issue identity tokens
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_expiry_hours: i64,
}

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub identity: IdentityConfig,
    pub relay: Arc<RelayHub>,
    pub environment: Environment,
    pub bcrypt_cost: u32,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self {
            pool,
            identity: IdentityConfig {
                jwt_secret: config.identity_jwt_secret.clone(),
                issuer: config.identity_issuer.clone(),
                token_expiry_hours: config.identity_token_expiry_hours,
            },
            relay: Arc::new(RelayHub::new()),
            environment: config.env,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

impl FromRef<ApiState> for IdentityConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.identity.clone()
    }
}

impl FromRef<ApiState> for PgPool {
    fn from_ref(state: &ApiState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiState> for Arc<RelayHub> {
    fn from_ref(state: &ApiState) -> Self {
        state.relay.clone()
    }
}
