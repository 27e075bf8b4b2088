use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use sts_db::{
    models::{Flashcard, FlashcardDeck, StudyGroup},
    repositories::{deck as deck_repo, flashcard as flashcard_repo},
};

use super::model::{CreateFlashcardRequest, UpdateFlashcardRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    events, policy,
    validation::{PathId, ValidatedJson, ensure_non_empty_patch},
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/flashcard-decks/{id}/flashcards",
            get(list_flashcards).post(create_flashcard),
        )
        .route(
            "/flashcards/{id}",
            patch(update_flashcard).delete(delete_flashcard),
        )
}

/// Add a card to a deck and credit the author's contribution in the group.
///
/// The card and the deck's `updated_at` change together; the credit runs
/// only once both are committed.
async fn create_flashcard(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(deck_id): PathId,
    ValidatedJson(payload): ValidatedJson<CreateFlashcardRequest>,
) -> Result<(StatusCode, Json<Flashcard>), ApiError> {
    let (_, group) = policy::group_for_deck(&state.pool, deck_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let mut tx = state.pool.begin().await?;
    let card =
        flashcard_repo::create_flashcard(&mut *tx, deck_id, auth_user.user_id, &payload.into())
            .await?;
    deck_repo::touch(&mut *tx, deck_id).await?;
    tx.commit().await?;

    events::flashcard_created(&state.pool, auth_user.user_id, group.id).await;

    tracing::info!(flashcard_id = card.id, deck_id, user_id = auth_user.user_id, "Flashcard created");
    Ok((StatusCode::CREATED, Json(card)))
}

async fn list_flashcards(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(deck_id): PathId,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let (_, group) = policy::group_for_deck(&state.pool, deck_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let cards = flashcard_repo::list_for_deck(&state.pool, deck_id).await?;
    Ok(Json(cards))
}

async fn load_card(
    state: &ApiState,
    flashcard_id: i64,
) -> Result<(Flashcard, FlashcardDeck, StudyGroup), ApiError> {
    let card = flashcard_repo::find_by_id(&state.pool, flashcard_id)
        .await?
        .ok_or(ApiError::NotFound("Flashcard"))?;
    let (deck, group) = policy::group_for_deck(&state.pool, card.deck_id).await?;
    Ok((card, deck, group))
}

async fn update_flashcard(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(flashcard_id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateFlashcardRequest>,
) -> Result<Json<Flashcard>, ApiError> {
    ensure_non_empty_patch(payload.has_changes())?;

    let (card, deck, group) = load_card(&state, flashcard_id).await?;
    policy::ensure_author_or_lead(&group, card.author_id, auth_user.user_id)?;

    let mut tx = state.pool.begin().await?;
    let updated = flashcard_repo::update_flashcard(&mut *tx, flashcard_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Flashcard"))?;
    deck_repo::touch(&mut *tx, deck.id).await?;
    tx.commit().await?;

    Ok(Json(updated))
}

/// Deleting a card does not take back the contribution credit
async fn delete_flashcard(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(flashcard_id): PathId,
) -> Result<StatusCode, ApiError> {
    let (card, deck, group) = load_card(&state, flashcard_id).await?;
    policy::ensure_author_or_lead(&group, card.author_id, auth_user.user_id)?;

    let mut tx = state.pool.begin().await?;
    if flashcard_repo::delete_flashcard(&mut *tx, flashcard_id).await? == 0 {
        return Err(ApiError::NotFound("Flashcard"));
    }
    deck_repo::touch(&mut *tx, deck.id).await?;
    tx.commit().await?;

    tracing::info!(flashcard_id, deck_id = deck.id, "Flashcard deleted");
    Ok(StatusCode::NO_CONTENT)
}
