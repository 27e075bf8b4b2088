use axum::Router;

use crate::{
    assessment, auth, course, deck, flashcard, group, leaderboard, membership, notification,
    state::ApiState, user,
};

/// Every `/api` route
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(auth::routes())
        .merge(user::routes())
        .merge(group::routes())
        .merge(membership::routes())
        .merge(course::routes())
        .merge(deck::routes())
        .merge(flashcard::routes())
        .merge(assessment::routes())
        .merge(leaderboard::routes())
        .merge(notification::routes())
}
