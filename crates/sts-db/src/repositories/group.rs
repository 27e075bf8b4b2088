use sqlx::{Executor, Postgres};

use crate::models::{GroupPatch, NewGroup, StudyGroup};

pub async fn find_by_id<'e, E>(executor: E, group_id: i64) -> Result<Option<StudyGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, description, is_public, democratized_approval, lead_id, created_at
            FROM study_groups
            WHERE id = $1
        "#,
    )
    .bind(group_id)
    .fetch_optional(executor)
    .await
}

pub async fn create_group<'e, E>(
    executor: E,
    lead_id: i64,
    new_group: &NewGroup,
) -> Result<StudyGroup, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_groups (name, description, is_public, democratized_approval, lead_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, is_public, democratized_approval, lead_id, created_at
        "#,
    )
    .bind(&new_group.name)
    .bind(&new_group.description)
    .bind(new_group.is_public)
    .bind(new_group.democratized_approval)
    .bind(lead_id)
    .fetch_one(executor)
    .await
}

/// Groups the user leads or belongs to.
///
/// Lead-owned groups are returned even when the lead's membership row is
/// missing; `EXISTS` keeps each group to a single row.
pub async fn find_by_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<StudyGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT g.id, g.name, g.description, g.is_public, g.democratized_approval, g.lead_id, g.created_at
            FROM study_groups g
            WHERE g.lead_id = $1
               OR EXISTS (
                    SELECT 1 FROM group_members m
                    WHERE m.group_id = g.id AND m.user_id = $1
               )
            ORDER BY g.created_at DESC, g.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn update_group<'e, E>(
    executor: E,
    group_id: i64,
    patch: &GroupPatch,
) -> Result<Option<StudyGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE study_groups
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_public = COALESCE($4, is_public),
                democratized_approval = COALESCE($5, democratized_approval)
            WHERE id = $1
            RETURNING id, name, description, is_public, democratized_approval, lead_id, created_at
        "#,
    )
    .bind(group_id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(patch.is_public)
    .bind(patch.democratized_approval)
    .fetch_optional(executor)
    .await
}

/// Delete a group; courses, memberships, requests and stats cascade.
pub async fn delete_group<'e, E>(executor: E, group_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM study_groups WHERE id = $1
        "#,
    )
    .bind(group_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
