use sqlx::{Executor, Postgres};

use crate::models::{LeaderboardRow, UserStat};

/// Points credited per flashcard contributed to a group
pub const FLASHCARD_POINTS: i64 = 5;
/// Points credited per attended session
pub const ATTENDANCE_POINTS: i64 = 10;

/// Default and maximum leaderboard sizes
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Increment applied to a (user, group) stats row.
///
/// Counters are deltas, never absolute values; the storage layer adds them
/// in place so concurrent contributions cannot overwrite each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatDelta {
    pub test_score: i64,
    pub attendance: i32,
    pub flashcards: i32,
}

impl StatDelta {
    pub const fn flashcard() -> Self {
        Self {
            test_score: 0,
            attendance: 0,
            flashcards: 1,
        }
    }

    pub const fn test_score(score: i32) -> Self {
        Self {
            test_score: score as i64,
            attendance: 0,
            flashcards: 0,
        }
    }

    /// Leaderboard points this delta is worth.
    pub const fn points(&self) -> i64 {
        self.test_score
            + self.flashcards as i64 * FLASHCARD_POINTS
            + self.attendance as i64 * ATTENDANCE_POINTS
    }
}

/// Clamp a caller-supplied leaderboard size into the supported range.
pub fn leaderboard_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

/// Add `delta` to the user's stats in `group_id`, creating a zeroed row first
/// if none exists. Single statement, so it is atomic under concurrency.
pub async fn add_to_user_stats<'e, E>(
    executor: E,
    user_id: i64,
    group_id: i64,
    delta: StatDelta,
) -> Result<UserStat, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_stats (user_id, group_id, test_score_total, attendance_count, flashcard_contributions, total_points, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id, group_id)
            DO UPDATE SET
                test_score_total = user_stats.test_score_total + EXCLUDED.test_score_total,
                attendance_count = user_stats.attendance_count + EXCLUDED.attendance_count,
                flashcard_contributions = user_stats.flashcard_contributions + EXCLUDED.flashcard_contributions,
                total_points = user_stats.total_points + EXCLUDED.total_points,
                last_updated = NOW()
            RETURNING id, user_id, group_id, test_score_total, attendance_count, flashcard_contributions, total_points, last_updated
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .bind(delta.test_score)
    .bind(delta.attendance)
    .bind(delta.flashcards)
    .bind(delta.points())
    .fetch_one(executor)
    .await
}

pub async fn find_user_stats<'e, E>(
    executor: E,
    user_id: i64,
    group_id: i64,
) -> Result<Option<UserStat>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, group_id, test_score_total, attendance_count, flashcard_contributions, total_points, last_updated
            FROM user_stats
            WHERE user_id = $1 AND group_id = $2
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_optional(executor)
    .await
}

/// Ranked stats for a group. Ties on points go to whoever reached the score
/// first, then to the lower user id.
pub async fn leaderboard<'e, E>(
    executor: E,
    group_id: i64,
    limit: i64,
) -> Result<Vec<LeaderboardRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT s.user_id, u.username, u.display_name, u.avatar_url,
                   s.test_score_total, s.attendance_count, s.flashcard_contributions,
                   s.total_points, s.last_updated
            FROM user_stats s
            JOIN users u ON u.id = s.user_id
            WHERE s.group_id = $1
            ORDER BY s.total_points DESC, s.last_updated ASC, s.user_id ASC
            LIMIT $2
        "#,
    )
    .bind(group_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}
