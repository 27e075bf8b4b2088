//! Follow-up work fired after a write has committed.
//!
//! None of these return an error: the triggering request already succeeded,
//! so failures are logged and dropped.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sts_db::{
    models::{NotificationKind, Test},
    repositories::{
        member as member_repo,
        notification as notification_repo,
        stats::{self as stats_repo, StatDelta},
    },
};

use crate::metrics;

/// Credit one flashcard contribution to the author in `group_id`
pub async fn flashcard_created(pool: &PgPool, user_id: i64, group_id: i64) {
    metrics::record_contribution("flashcard");
    if let Err(e) = stats_repo::add_to_user_stats(pool, user_id, group_id, StatDelta::flashcard()).await
    {
        tracing::error!(error = %e, user_id, group_id, "Failed to credit flashcard contribution");
    }
}

/// Add a submitted score to the user's running total in `group_id`
pub async fn test_result_submitted(pool: &PgPool, user_id: i64, group_id: i64, score: i32) {
    metrics::record_contribution("test_result");
    if let Err(e) =
        stats_repo::add_to_user_stats(pool, user_id, group_id, StatDelta::test_score(score)).await
    {
        tracing::error!(error = %e, user_id, group_id, score, "Failed to credit test score");
    }
}

/// Send a test reminder to every member who has not switched them off.
///
/// Returns how many notifications were written. Each insert stands alone, so
/// a failure for one member does not skip the rest.
pub async fn test_created(pool: &PgPool, test: &Test, group_id: i64) -> usize {
    let recipients = match member_repo::list_test_reminder_recipients(pool, group_id).await {
        Ok(recipients) => recipients,
        Err(e) => {
            tracing::error!(error = %e, test_id = test.id, group_id, "Failed to load reminder recipients");
            return 0;
        }
    };

    let content = reminder_content(&test.name, test.test_date);
    let mut created = 0;
    for user_id in recipients {
        match notification_repo::create_notification(
            pool,
            user_id,
            NotificationKind::TestReminder,
            &content,
        )
        .await
        {
            Ok(_) => created += 1,
            Err(e) => {
                tracing::warn!(error = %e, user_id, test_id = test.id, "Failed to create test reminder");
            }
        }
    }

    metrics::record_notifications_created("test_reminder", created as u64);
    tracing::debug!(test_id = test.id, group_id, created, "Test reminders sent");
    created
}

fn reminder_content(test_name: &str, test_date: DateTime<Utc>) -> String {
    format!(
        "New test \"{}\" scheduled for {}",
        test_name,
        test_date.format("%B %-d, %Y")
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_reminder_content() {
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).unwrap();
        assert_eq!(
            reminder_content("Midterm 1", date),
            "New test \"Midterm 1\" scheduled for March 4, 2025"
        );
    }

    #[test]
    fn test_reminder_content_two_digit_day() {
        let date = Utc.with_ymd_and_hms(2026, 11, 21, 0, 0, 0).unwrap();
        assert_eq!(
            reminder_content("Final", date),
            "New test \"Final\" scheduled for November 21, 2026"
        );
    }
}
