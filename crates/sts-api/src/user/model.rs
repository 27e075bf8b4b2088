use serde::Deserialize;
use sts_db::models::ProfilePatch;
use validator::Validate;

use crate::auth::validation::{validate_avatar_url, validate_username};

/// Allow-listed profile fields; email and credentials are not editable here
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(custom(function = "validate_avatar_url"))]
    pub avatar_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn has_changes(&self) -> bool {
        self.username.is_some() || self.display_name.is_some() || self.avatar_url.is_some()
    }
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username,
            display_name: req.display_name,
            avatar_url: req.avatar_url,
        }
    }
}
