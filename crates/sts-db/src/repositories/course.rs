use sqlx::{Executor, Postgres};

use crate::models::{Course, CoursePatch, NewCourse};

pub async fn find_by_id<'e, E>(executor: E, course_id: i64) -> Result<Option<Course>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, name, description, created_at
            FROM courses
            WHERE id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_for_group<'e, E>(executor: E, group_id: i64) -> Result<Vec<Course>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, name, description, created_at
            FROM courses
            WHERE group_id = $1
            ORDER BY created_at, id
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

pub async fn create_course<'e, E>(
    executor: E,
    group_id: i64,
    new_course: &NewCourse,
) -> Result<Course, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO courses (group_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, group_id, name, description, created_at
        "#,
    )
    .bind(group_id)
    .bind(&new_course.name)
    .bind(&new_course.description)
    .fetch_one(executor)
    .await
}

pub async fn update_course<'e, E>(
    executor: E,
    course_id: i64,
    patch: &CoursePatch,
) -> Result<Option<Course>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE courses
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, group_id, name, description, created_at
        "#,
    )
    .bind(course_id)
    .bind(&patch.name)
    .bind(&patch.description)
    .fetch_optional(executor)
    .await
}

pub async fn delete_course<'e, E>(executor: E, course_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM courses WHERE id = $1
        "#,
    )
    .bind(course_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
