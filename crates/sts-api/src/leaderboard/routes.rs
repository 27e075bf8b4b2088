use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sts_db::{
    models::{LeaderboardRow, UserSummary},
    repositories::stats as stats_repo,
};

use crate::{ApiState, auth::AuthUser, error::ApiError, policy, validation::PathId};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/groups/{id}/leaderboard", get(get_leaderboard))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// One ranked row with the member's public summary inlined
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: UserSummary,
    pub total_points: i64,
    pub test_score_total: i64,
    pub flashcard_contributions: i32,
    pub attendance_count: i32,
    pub last_updated: DateTime<Utc>,
}

impl LeaderboardEntry {
    fn ranked(rank: usize, row: LeaderboardRow) -> Self {
        Self {
            rank,
            user: UserSummary {
                id: row.user_id,
                username: row.username,
                display_name: row.display_name,
                avatar_url: row.avatar_url,
            },
            total_points: row.total_points,
            test_score_total: row.test_score_total,
            flashcard_contributions: row.flashcard_contributions,
            attendance_count: row.attendance_count,
            last_updated: row.last_updated,
        }
    }
}

/// Ranked by points. `limit` defaults to 10 and is clamped to 1..=100.
async fn get_leaderboard(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    PathId(group_id): PathId,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let Query(query) =
        query.map_err(|_| ApiError::invalid("limit", "limit must be an integer"))?;

    let group = policy::load_group(&state.pool, group_id).await?;
    policy::ensure_group_member(&state.pool, &group, auth_user.user_id).await?;

    let limit = stats_repo::leaderboard_limit(query.limit);
    let rows = stats_repo::leaderboard(&state.pool, group_id, limit).await?;

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| LeaderboardEntry::ranked(i + 1, row))
        .collect();
    Ok(Json(entries))
}
