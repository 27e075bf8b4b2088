use sqlx::PgPool;
use sts_db::{
    models::{NewUser, UserProfile},
    repositories::user as user_repo,
    violated_constraint,
};

use super::models::RegisterRequest;
use crate::error::ApiError;

const USERNAME_TAKEN: &str = "Username is already taken";
const EMAIL_TAKEN: &str = "Email is already registered";

/// Create an internal account.
///
/// Username and email uniqueness are checked separately so the caller learns
/// which one clashed; the unique constraints still catch a concurrent
/// registration that slips between the check and the insert.
pub async fn register_user(
    pool: &PgPool,
    request: RegisterRequest,
    bcrypt_cost: u32,
) -> Result<UserProfile, ApiError> {
    if user_repo::username_exists(pool, &request.username).await? {
        return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
    }
    if user_repo::email_exists(pool, &request.email).await? {
        return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password(request.password, bcrypt_cost).await?;
    let new_user = NewUser {
        username: request.username,
        email: request.email,
        password_hash,
        display_name: request.display_name,
        avatar_url: request.avatar_url,
        external_id: request
            .external_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
    };

    user_repo::create_user(pool, &new_user)
        .await
        .map_err(|err| match violated_constraint(&err) {
            Some("users_username_key") => ApiError::Conflict(USERNAME_TAKEN.to_string()),
            Some("users_email_key") => ApiError::Conflict(EMAIL_TAKEN.to_string()),
            Some("users_external_id_key") => {
                ApiError::Conflict("External identity is already linked".to_string())
            }
            _ => ApiError::Database(err),
        })
}

/// Check an email/password pair. Every failure looks the same to the caller.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<String, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let credentials = user_repo::find_credentials_by_email(pool, email)
        .await?
        .ok_or_else(invalid)?;

    let password = password.to_string();
    let hash = credentials.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .unwrap_or(false);

    if !matches {
        return Err(invalid());
    }

    credentials.external_id.ok_or_else(invalid)
}

async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(|e| ApiError::Internal(e.into()))
}
