use sqlx::{Executor, Postgres};

use crate::models::{JoinRequest, JoinRequestStatus, JoinRequestWithUser};

/// Name of the partial unique index guarding one pending request per (group, user).
pub const PENDING_UNIQUE_INDEX: &str = "join_requests_pending_key";

pub async fn find_by_id<'e, E>(
    executor: E,
    request_id: i64,
) -> Result<Option<JoinRequest>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, user_id, status, requested_at, resolved_at
            FROM join_requests
            WHERE id = $1
        "#,
    )
    .bind(request_id)
    .fetch_optional(executor)
    .await
}

pub async fn has_pending<'e, E>(executor: E, group_id: i64, user_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(
                SELECT 1 FROM join_requests
                WHERE group_id = $1 AND user_id = $2 AND status = 'pending'
            )
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Create a pending request. A concurrent duplicate trips [`PENDING_UNIQUE_INDEX`].
pub async fn create_pending<'e, E>(
    executor: E,
    group_id: i64,
    user_id: i64,
) -> Result<JoinRequest, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO join_requests (group_id, user_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING id, group_id, user_id, status, requested_at, resolved_at
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn list_pending_for_group<'e, E>(
    executor: E,
    group_id: i64,
) -> Result<Vec<JoinRequestWithUser>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT r.id, r.group_id, r.user_id, r.status, r.requested_at, u.username, u.display_name
            FROM join_requests r
            JOIN users u ON u.id = r.user_id
            WHERE r.group_id = $1 AND r.status = 'pending'
            ORDER BY r.requested_at
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

/// Move a pending request to a terminal status.
///
/// Returns `None` if the request is gone or no longer pending, so two leads
/// racing on the same request cannot both resolve it.
pub async fn resolve<'e, E>(
    executor: E,
    request_id: i64,
    status: JoinRequestStatus,
) -> Result<Option<JoinRequest>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE join_requests
            SET status = $2, resolved_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, group_id, user_id, status, requested_at, resolved_at
        "#,
    )
    .bind(request_id)
    .bind(status)
    .fetch_optional(executor)
    .await
}
