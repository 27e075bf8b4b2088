use sqlx::{Executor, Postgres};

use crate::models::{GroupMember, MemberRole, MemberWithUser};

/// Insert a membership row. Returns `None` when the user is already a member.
pub async fn add_member<'e, E>(
    executor: E,
    group_id: i64,
    user_id: i64,
    role: MemberRole,
) -> Result<Option<GroupMember>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id, user_id) DO NOTHING
            RETURNING id, group_id, user_id, role, joined_at
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .bind(role)
    .fetch_optional(executor)
    .await
}

pub async fn find_membership<'e, E>(
    executor: E,
    group_id: i64,
    user_id: i64,
) -> Result<Option<GroupMember>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_members<'e, E>(
    executor: E,
    group_id: i64,
) -> Result<Vec<MemberWithUser>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT m.user_id, m.role, m.joined_at, u.username, u.display_name, u.avatar_url
            FROM group_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = $1
            ORDER BY m.role, m.joined_at
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

/// Members whose test-reminder preference is on. Users with no settings row
/// count as opted in.
pub async fn list_test_reminder_recipients<'e, E>(
    executor: E,
    group_id: i64,
) -> Result<Vec<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT m.user_id
            FROM group_members m
            LEFT JOIN notification_settings s ON s.user_id = m.user_id
            WHERE m.group_id = $1
              AND COALESCE(s.test_reminders, TRUE)
            ORDER BY m.user_id
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}
