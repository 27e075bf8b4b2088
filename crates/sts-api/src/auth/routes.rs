use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use sts_db::{models::UserProfile, repositories::user as user_repo};

use super::{
    jwt,
    middleware::AuthUser,
    models::{AuthResponse, LoginRequest, RegisterRequest, TokenResponse},
    service,
};
use crate::{ApiState, error::ApiError, metrics, validation::ValidatedJson};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

async fn register(
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let result = service::register_user(&state.pool, payload, state.bcrypt_cost).await;
    metrics::record_auth_event("register", result.is_ok());
    let user = result?;

    // Accounts created here always carry an external reference
    let external_id = user
        .external_id
        .as_deref()
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("registered user has no external id")))?;
    let token = jwt::issue_identity_token(external_id, Some(&user.email), &state.identity)?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

async fn login(
    State(state): State<ApiState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let result = service::authenticate(&state.pool, &payload.email, &payload.password).await;
    metrics::record_auth_event("login", result.is_ok());
    let external_id = result?;

    let token = jwt::issue_identity_token(&external_id, Some(&payload.email), &state.identity)?;
    Ok(Json(TokenResponse { token }))
}

async fn me(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = user_repo::find_profile_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(profile))
}
