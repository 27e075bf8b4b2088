use sqlx::{Executor, Postgres};

use crate::models::{Notification, NotificationKind, NotificationSettings, NotificationSettingsPatch};

pub async fn create_notification<'e, E>(
    executor: E,
    user_id: i64,
    kind: NotificationKind,
    content: &str,
) -> Result<Notification, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO notifications (user_id, kind, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, kind, content, is_read, created_at
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(content)
    .fetch_one(executor)
    .await
}

pub async fn list_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<Notification>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, kind, content, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Set the read flag on one of the user's notifications. `None` when the
/// notification does not exist or belongs to someone else.
pub async fn set_read<'e, E>(
    executor: E,
    notification_id: i64,
    user_id: i64,
    is_read: bool,
) -> Result<Option<Notification>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE notifications
            SET is_read = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, kind, content, is_read, created_at
        "#,
    )
    .bind(notification_id)
    .bind(user_id)
    .bind(is_read)
    .fetch_optional(executor)
    .await
}

pub async fn mark_all_read<'e, E>(executor: E, user_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE notifications SET is_read = TRUE
            WHERE user_id = $1 AND is_read = FALSE
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_notification<'e, E>(
    executor: E,
    notification_id: i64,
    user_id: i64,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM notifications WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(notification_id)
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn find_settings<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Option<NotificationSettings>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, test_reminders, new_content, session_reminders, email_notifications
            FROM notification_settings
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Apply a partial update, creating the row from defaults when absent.
pub async fn upsert_settings<'e, E>(
    executor: E,
    user_id: i64,
    patch: &NotificationSettingsPatch,
) -> Result<NotificationSettings, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO notification_settings (user_id, test_reminders, new_content, session_reminders, email_notifications)
            VALUES ($1, COALESCE($2, TRUE), COALESCE($3, TRUE), COALESCE($4, TRUE), COALESCE($5, TRUE))
            ON CONFLICT (user_id)
            DO UPDATE SET
                test_reminders = COALESCE($2, notification_settings.test_reminders),
                new_content = COALESCE($3, notification_settings.new_content),
                session_reminders = COALESCE($4, notification_settings.session_reminders),
                email_notifications = COALESCE($5, notification_settings.email_notifications)
            RETURNING user_id, test_reminders, new_content, session_reminders, email_notifications
        "#,
    )
    .bind(user_id)
    .bind(patch.test_reminders)
    .bind(patch.new_content)
    .bind(patch.session_reminders)
    .bind(patch.email_notifications)
    .fetch_one(executor)
    .await
}
