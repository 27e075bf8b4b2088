use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use sts_db::{models::FlashcardDeck, repositories::deck as deck_repo};

use super::model::{CreateDeckRequest, UpdateDeckRequest};
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    policy,
    validation::{PathId, ValidatedJson, ensure_non_empty_patch},
};

/// Create the flashcard deck routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/courses/{id}/flashcard-decks",
            get(list_decks).post(create_deck),
        )
        .route(
            "/flashcard-decks/{id}",
            get(get_deck).patch(update_deck).delete(delete_deck),
        )
}

/// Any group member may author a deck
async fn create_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
    ValidatedJson(payload): ValidatedJson<CreateDeckRequest>,
) -> Result<(StatusCode, Json<FlashcardDeck>), ApiError> {
    let (_, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let deck =
        deck_repo::create_deck(&state.pool, course_id, auth_user.user_id, &payload.into()).await?;

    tracing::info!(deck_id = deck.id, course_id, user_id = auth_user.user_id, "Deck created");
    Ok((StatusCode::CREATED, Json(deck)))
}

async fn list_decks(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(course_id): PathId,
) -> Result<Json<Vec<FlashcardDeck>>, ApiError> {
    let (_, group) = policy::group_for_course(&state.pool, course_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let decks = deck_repo::list_for_course(&state.pool, course_id).await?;
    Ok(Json(decks))
}

async fn get_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(deck_id): PathId,
) -> Result<Json<FlashcardDeck>, ApiError> {
    let (deck, group) = policy::group_for_deck(&state.pool, deck_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;
    Ok(Json(deck))
}

async fn update_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(deck_id): PathId,
    ValidatedJson(payload): ValidatedJson<UpdateDeckRequest>,
) -> Result<Json<FlashcardDeck>, ApiError> {
    ensure_non_empty_patch(payload.has_changes())?;

    let (deck, group) = policy::group_for_deck(&state.pool, deck_id).await?;
    policy::ensure_author_or_lead(&group, deck.author_id, auth_user.user_id)?;

    let updated = deck_repo::update_deck(&state.pool, deck_id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound("Flashcard deck"))?;
    Ok(Json(updated))
}

async fn delete_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(deck_id): PathId,
) -> Result<StatusCode, ApiError> {
    let (deck, group) = policy::group_for_deck(&state.pool, deck_id).await?;
    policy::ensure_author_or_lead(&group, deck.author_id, auth_user.user_id)?;

    if deck_repo::delete_deck(&state.pool, deck_id).await? == 0 {
        return Err(ApiError::NotFound("Flashcard deck"));
    }

    tracing::info!(deck_id, "Deck deleted");
    Ok(StatusCode::NO_CONTENT)
}
