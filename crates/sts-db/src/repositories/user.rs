use sqlx::{Executor, Postgres};

use crate::models::{NewUser, ProfilePatch, UserCredentials, UserProfile};

pub async fn find_profile_by_id<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, username, email, display_name, avatar_url, external_id, created_at
            FROM users
            WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Resolve an external identity reference to the internal account.
pub async fn find_profile_by_external_id<'e, E>(
    executor: E,
    external_id: &str,
) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, username, email, display_name, avatar_url, external_id, created_at
            FROM users
            WHERE external_id = $1
        "#,
    )
    .bind(external_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_credentials_by_email<'e, E>(
    executor: E,
    email: &str,
) -> Result<Option<UserCredentials>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, email, password_hash, external_id
            FROM users
            WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn username_exists<'e, E>(executor: E, username: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)
        "#,
    )
    .bind(username)
    .fetch_one(executor)
    .await
}

pub async fn email_exists<'e, E>(executor: E, email: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
        "#,
    )
    .bind(email)
    .fetch_one(executor)
    .await
}

pub async fn create_user<'e, E>(executor: E, new_user: &NewUser) -> Result<UserProfile, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (username, email, password_hash, display_name, avatar_url, external_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, display_name, avatar_url, external_id, created_at
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.display_name)
    .bind(&new_user.avatar_url)
    .bind(&new_user.external_id)
    .fetch_one(executor)
    .await
}

pub async fn update_profile<'e, E>(
    executor: E,
    user_id: i64,
    patch: &ProfilePatch,
) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET username = COALESCE($2, username),
                display_name = COALESCE($3, display_name),
                avatar_url = COALESCE($4, avatar_url)
            WHERE id = $1
            RETURNING id, username, email, display_name, avatar_url, external_id, created_at
        "#,
    )
    .bind(user_id)
    .bind(&patch.username)
    .bind(&patch.display_name)
    .bind(&patch.avatar_url)
    .fetch_optional(executor)
    .await
}
