use chrono::{DateTime, Utc};
use serde::Deserialize;
use sts_db::models::{NewTest, TestPatch, TestType};
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub test_date: DateTime<Utc>,
    pub test_type: TestType,
    #[validate(range(min = 1, max = 500))]
    pub question_count: i32,
}

impl From<CreateTestRequest> for NewTest {
    fn from(req: CreateTestRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
            test_date: req.test_date,
            test_type: req.test_type,
            question_count: req.question_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTestRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub test_date: Option<DateTime<Utc>>,
    pub test_type: Option<TestType>,
    #[validate(range(min = 1, max = 500))]
    pub question_count: Option<i32>,
}

impl UpdateTestRequest {
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.test_date.is_some()
            || self.test_type.is_some()
            || self.question_count.is_some()
    }
}

impl From<UpdateTestRequest> for TestPatch {
    fn from(req: UpdateTestRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            test_date: req.test_date,
            test_type: req.test_type,
            question_count: req.question_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitResultRequest {
    #[validate(range(min = 0, message = "score must not be negative"))]
    pub score: i32,
    /// Free-form answer sheet, stored as given
    pub answers: Option<serde_json::Value>,
}
