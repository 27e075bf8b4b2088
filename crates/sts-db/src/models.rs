use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role of a user inside a study group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Lead,
    Member,
}

/// Join request lifecycle: `pending` moves to one of the two terminal states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "join_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl JoinRequestStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "test_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    MultipleChoice,
    ShortAnswer,
    Essay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TestReminder,
    NewContent,
    SessionReminder,
    JoinRequest,
}

/// Public view of an account. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row used by the password login flow
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub external_id: Option<String>,
}

/// Compact user shape embedded in member lists and leaderboard entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyGroup {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// Stored for clients; resolution still goes through the lead.
    pub democratized_approval: bool,
    pub lead_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Membership row joined with the member's public profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberWithUser {
    pub user_id: i64,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JoinRequest {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub status: JoinRequestStatus,
    pub requested_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Pending request as shown to a group lead
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JoinRequestWithUser {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub status: JoinRequestStatus,
    pub requested_at: DateTime<Utc>,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardDeck {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    pub id: i64,
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub test_date: DateTime<Utc>,
    pub test_type: TestType,
    pub question_count: i32,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub id: i64,
    pub test_id: i64,
    pub user_id: i64,
    pub score: i32,
    pub answers: Option<serde_json::Value>,
    pub completed_at: DateTime<Utc>,
}

/// Per-(user, group) aggregate powering the leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserStat {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    pub test_score_total: i64,
    pub attendance_count: i32,
    pub flashcard_contributions: i32,
    pub total_points: i64,
    pub last_updated: DateTime<Utc>,
}

/// Flat leaderboard row: stats joined with the user's summary columns
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub test_score_total: i64,
    pub attendance_count: i32,
    pub flashcard_contributions: i32,
    pub total_points: i64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationSettings {
    pub user_id: i64,
    pub test_reminders: bool,
    pub new_content: bool,
    pub session_reminders: bool,
    pub email_notifications: bool,
}

impl NotificationSettings {
    /// Settings assumed for a user who never saved any preferences
    pub const fn defaults_for(user_id: i64) -> Self {
        Self {
            user_id,
            test_reminders: true,
            new_content: true,
            session_reminders: true,
            email_notifications: true,
        }
    }
}

// Insert and patch records. Patches carry only allow-listed columns; `None`
// leaves the stored value untouched.

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub external_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub democratized_approval: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub democratized_approval: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDeck {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeckPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub question: String,
    pub answer: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FlashcardPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTest {
    pub name: String,
    pub description: Option<String>,
    pub test_date: DateTime<Utc>,
    pub test_type: TestType,
    pub question_count: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TestPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub test_date: Option<DateTime<Utc>>,
    pub test_type: Option<TestType>,
    pub question_count: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationSettingsPatch {
    pub test_reminders: Option<bool>,
    pub new_content: Option<bool>,
    pub session_reminders: Option<bool>,
    pub email_notifications: Option<bool>,
}
