//! Request payload validation.
//!
//! Payloads are checked at the boundary with the `validator` crate; the
//! [`ValidatedJson`] extractor rejects malformed JSON and failed checks before
//! a handler runs, so nothing invalid reaches the database.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::{ApiError, FieldError};

/// JSON body that has passed its `Validate` rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
}

/// Numeric id from the route path.
///
/// A segment that is not an integer is rejected with the same `invalid_data`
/// body as a bad payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid("id", "id must be an integer"))?;
        Ok(Self(id))
    }
}

/// Fields that are optional in a patch must still not be blank when present.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Tags are short labels: non-blank, at most 50 characters each, 20 per card.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > 20 {
        let mut err = ValidationError::new("too_many_tags");
        err.message = Some("at most 20 tags are allowed".into());
        return Err(err);
    }
    if tags.iter().any(|t| t.trim().is_empty() || t.chars().count() > 50) {
        let mut err = ValidationError::new("invalid_tag");
        err.message = Some("tags must be 1-50 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Reject a patch that changes nothing.
pub fn ensure_non_empty_patch(has_changes: bool) -> Result<(), ApiError> {
    if has_changes {
        Ok(())
    } else {
        Err(ApiError::invalid("body", "at least one field must be provided"))
    }
}
