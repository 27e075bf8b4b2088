use serde::Deserialize;
use sts_db::models::{DeckPatch, NewDeck};
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeckRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl From<CreateDeckRequest> for NewDeck {
    fn from(req: CreateDeckRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDeckRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl UpdateDeckRequest {
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }
}

impl From<UpdateDeckRequest> for DeckPatch {
    fn from(req: UpdateDeckRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
        }
    }
}
