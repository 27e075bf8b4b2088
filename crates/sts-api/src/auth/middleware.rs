use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sqlx::PgPool;
use sts_db::repositories::user as user_repo;

use super::jwt::verify_identity_token;
use crate::{error::ApiError, state::IdentityConfig};

/// Authenticated caller, resolved to an internal user row
///
/// Use this in route handlers to require a valid bearer token. A token that
/// fails verification is rejected as unauthorized; a valid token whose
/// identity has no internal account is rejected as not found.
///
/// # Example
/// ```
/// use axum::extract::State;
/// use sts_api::{ApiState, auth::AuthUser, error::ApiError};
///
/// async fn protected_route(
///     auth_user: AuthUser,
///     State(state): State<ApiState>,
/// ) -> Result<(), ApiError> {
///     let _caller = auth_user.user_id;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub external_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    IdentityConfig: FromRef<S>,
    PgPool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let identity = IdentityConfig::from_ref(state);
        let claims = verify_identity_token(bearer.token(), &identity)?;

        let pool = PgPool::from_ref(state);
        let user = user_repo::find_profile_by_external_id(&pool, &claims.sub)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        tracing::debug!(user_id = user.id, "Authenticated request");

        Ok(Self {
            user_id: user.id,
            username: user.username,
            external_id: claims.sub,
        })
    }
}
