use sqlx::{Executor, Postgres};

use crate::models::TestResult;

pub async fn create_result<'e, E>(
    executor: E,
    test_id: i64,
    user_id: i64,
    score: i32,
    answers: Option<&serde_json::Value>,
) -> Result<TestResult, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO test_results (test_id, user_id, score, answers)
            VALUES ($1, $2, $3, $4)
            RETURNING id, test_id, user_id, score, answers, completed_at
        "#,
    )
    .bind(test_id)
    .bind(user_id)
    .bind(score)
    .bind(answers)
    .fetch_one(executor)
    .await
}

pub async fn list_for_user<'e, E>(
    executor: E,
    test_id: i64,
    user_id: i64,
) -> Result<Vec<TestResult>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, test_id, user_id, score, answers, completed_at
            FROM test_results
            WHERE test_id = $1 AND user_id = $2
            ORDER BY completed_at DESC
        "#,
    )
    .bind(test_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}
