use sqlx::{Executor, Postgres};

use crate::models::{DeckPatch, FlashcardDeck, NewDeck};

pub async fn find_by_id<'e, E>(executor: E, deck_id: i64) -> Result<Option<FlashcardDeck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course_id, name, description, author_id, created_at, updated_at
            FROM flashcard_decks
            WHERE id = $1
        "#,
    )
    .bind(deck_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_for_course<'e, E>(
    executor: E,
    course_id: i64,
) -> Result<Vec<FlashcardDeck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course_id, name, description, author_id, created_at, updated_at
            FROM flashcard_decks
            WHERE course_id = $1
            ORDER BY updated_at DESC, id DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(executor)
    .await
}

pub async fn create_deck<'e, E>(
    executor: E,
    course_id: i64,
    author_id: i64,
    new_deck: &NewDeck,
) -> Result<FlashcardDeck, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcard_decks (course_id, name, description, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, name, description, author_id, created_at, updated_at
        "#,
    )
    .bind(course_id)
    .bind(&new_deck.name)
    .bind(&new_deck.description)
    .bind(author_id)
    .fetch_one(executor)
    .await
}

pub async fn update_deck<'e, E>(
    executor: E,
    deck_id: i64,
    patch: &DeckPatch,
) -> Result<Option<FlashcardDeck>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE flashcard_decks
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, course_id, name, description, author_id, created_at, updated_at
        "#,
    )
    .bind(deck_id)
    .bind(&patch.name)
    .bind(&patch.description)
    .fetch_optional(executor)
    .await
}

/// Bump `updated_at` after a change to one of the deck's cards.
pub async fn touch<'e, E>(executor: E, deck_id: i64) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE flashcard_decks SET updated_at = NOW() WHERE id = $1
        "#,
    )
    .bind(deck_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete_deck<'e, E>(executor: E, deck_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM flashcard_decks WHERE id = $1
        "#,
    )
    .bind(deck_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Group that owns the deck, resolved through its course.
pub async fn find_group_id<'e, E>(executor: E, deck_id: i64) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT c.group_id
            FROM flashcard_decks d
            JOIN courses c ON c.id = d.course_id
            WHERE d.id = $1
        "#,
    )
    .bind(deck_id)
    .fetch_optional(executor)
    .await
}
