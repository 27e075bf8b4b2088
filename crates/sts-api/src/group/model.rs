use serde::Deserialize;
use sts_db::models::{GroupPatch, NewGroup};
use validator::Validate;

use crate::validation::not_blank;

const fn default_public() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub democratized_approval: bool,
}

impl From<CreateGroupRequest> for NewGroup {
    fn from(req: CreateGroupRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
            is_public: req.is_public,
            democratized_approval: req.democratized_approval,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub democratized_approval: Option<bool>,
}

impl UpdateGroupRequest {
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.is_public.is_some()
            || self.democratized_approval.is_some()
    }
}

impl From<UpdateGroupRequest> for GroupPatch {
    fn from(req: UpdateGroupRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            is_public: req.is_public,
            democratized_approval: req.democratized_approval,
        }
    }
}
