use serde::{Deserialize, Serialize};
use sts_db::models::NotificationSettingsPatch;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNotificationRequest {
    pub is_read: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub test_reminders: Option<bool>,
    pub new_content: Option<bool>,
    pub session_reminders: Option<bool>,
    pub email_notifications: Option<bool>,
}

impl UpdateSettingsRequest {
    pub fn has_changes(&self) -> bool {
        self.test_reminders.is_some()
            || self.new_content.is_some()
            || self.session_reminders.is_some()
            || self.email_notifications.is_some()
    }
}

impl From<UpdateSettingsRequest> for NotificationSettingsPatch {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            test_reminders: req.test_reminders,
            new_content: req.new_content,
            session_reminders: req.session_reminders,
            email_notifications: req.email_notifications,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
