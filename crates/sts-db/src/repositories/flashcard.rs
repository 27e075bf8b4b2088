use sqlx::{Executor, Postgres};

use crate::models::{Flashcard, FlashcardPatch, NewFlashcard};

pub async fn find_by_id<'e, E>(executor: E, flashcard_id: i64) -> Result<Option<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, deck_id, question, answer, tags, category, author_id, created_at, updated_at
            FROM flashcards
            WHERE id = $1
        "#,
    )
    .bind(flashcard_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_for_deck<'e, E>(executor: E, deck_id: i64) -> Result<Vec<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, deck_id, question, answer, tags, category, author_id, created_at, updated_at
            FROM flashcards
            WHERE deck_id = $1
            ORDER BY created_at, id
        "#,
    )
    .bind(deck_id)
    .fetch_all(executor)
    .await
}

pub async fn create_flashcard<'e, E>(
    executor: E,
    deck_id: i64,
    author_id: i64,
    card: &NewFlashcard,
) -> Result<Flashcard, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcards (deck_id, question, answer, tags, category, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, deck_id, question, answer, tags, category, author_id, created_at, updated_at
        "#,
    )
    .bind(deck_id)
    .bind(&card.question)
    .bind(&card.answer)
    .bind(&card.tags)
    .bind(&card.category)
    .bind(author_id)
    .fetch_one(executor)
    .await
}

pub async fn update_flashcard<'e, E>(
    executor: E,
    flashcard_id: i64,
    patch: &FlashcardPatch,
) -> Result<Option<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE flashcards
            SET question = COALESCE($2, question),
                answer = COALESCE($3, answer),
                tags = COALESCE($4, tags),
                category = COALESCE($5, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, deck_id, question, answer, tags, category, author_id, created_at, updated_at
        "#,
    )
    .bind(flashcard_id)
    .bind(&patch.question)
    .bind(&patch.answer)
    .bind(&patch.tags)
    .bind(&patch.category)
    .fetch_optional(executor)
    .await
}

pub async fn delete_flashcard<'e, E>(executor: E, flashcard_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM flashcards WHERE id = $1
        "#,
    )
    .bind(flashcard_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
