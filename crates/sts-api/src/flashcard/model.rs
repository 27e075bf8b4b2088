use serde::Deserialize;
use sts_db::models::{FlashcardPatch, NewFlashcard};
use validator::Validate;

use crate::validation::{not_blank, validate_tags};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlashcardRequest {
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub question: String,
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    pub answer: String,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
}

impl From<CreateFlashcardRequest> for NewFlashcard {
    fn from(req: CreateFlashcardRequest) -> Self {
        Self {
            question: req.question,
            answer: req.answer,
            tags: normalize_tags(req.tags),
            category: req.category,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFlashcardRequest {
    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub question: Option<String>,
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    pub answer: Option<String>,
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
}

impl UpdateFlashcardRequest {
    pub fn has_changes(&self) -> bool {
        self.question.is_some()
            || self.answer.is_some()
            || self.tags.is_some()
            || self.category.is_some()
    }
}

impl From<UpdateFlashcardRequest> for FlashcardPatch {
    fn from(req: UpdateFlashcardRequest) -> Self {
        Self {
            question: req.question,
            answer: req.answer,
            tags: req.tags.map(normalize_tags),
            category: req.category,
        }
    }
}

/// Trim and drop repeats, keeping first-seen order
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
