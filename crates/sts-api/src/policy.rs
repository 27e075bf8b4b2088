//! Authorization predicates shared by the route modules.
//!
//! Every gated handler follows the same shape: load the target resource (404
//! if absent), walk up to its group, then check the caller's relation to that
//! group before touching anything.

use sqlx::PgPool;
use sts_db::{
    models::{Course, FlashcardDeck, StudyGroup, Test},
    repositories::{
        course as course_repo, deck as deck_repo, group as group_repo, member as member_repo,
        test as test_repo,
    },
};

use crate::error::ApiError;

pub fn is_group_lead(group: &StudyGroup, user_id: i64) -> bool {
    group.lead_id == user_id
}

pub fn ensure_group_lead(group: &StudyGroup, user_id: i64) -> Result<(), ApiError> {
    if is_group_lead(group, user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the group lead can perform this action".to_string(),
        ))
    }
}

/// The lead counts as a member even if their membership row is missing.
pub async fn is_group_member(
    pool: &PgPool,
    group: &StudyGroup,
    user_id: i64,
) -> Result<bool, ApiError> {
    if is_group_lead(group, user_id) {
        return Ok(true);
    }
    Ok(member_repo::find_membership(pool, group.id, user_id)
        .await?
        .is_some())
}

pub async fn ensure_group_member(
    pool: &PgPool,
    group: &StudyGroup,
    user_id: i64,
) -> Result<(), ApiError> {
    if is_group_member(pool, group, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You are not a member of this group".to_string(),
        ))
    }
}

/// Authors may edit what they wrote; the lead may edit anything in the group.
pub fn ensure_author_or_lead(
    group: &StudyGroup,
    author_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    if author_id == user_id || is_group_lead(group, user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the author or the group lead can change this".to_string(),
        ))
    }
}

pub async fn load_group(pool: &PgPool, group_id: i64) -> Result<StudyGroup, ApiError> {
    group_repo::find_by_id(pool, group_id)
        .await?
        .ok_or(ApiError::NotFound("Group"))
}

pub async fn group_for_course(
    pool: &PgPool,
    course_id: i64,
) -> Result<(Course, StudyGroup), ApiError> {
    let course = course_repo::find_by_id(pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("Course"))?;
    let group = load_group(pool, course.group_id).await?;
    Ok((course, group))
}

pub async fn group_for_deck(
    pool: &PgPool,
    deck_id: i64,
) -> Result<(FlashcardDeck, StudyGroup), ApiError> {
    let deck = deck_repo::find_by_id(pool, deck_id)
        .await?
        .ok_or(ApiError::NotFound("Flashcard deck"))?;
    let (_, group) = group_for_course(pool, deck.course_id).await?;
    Ok((deck, group))
}

pub async fn group_for_test(pool: &PgPool, test_id: i64) -> Result<(Test, StudyGroup), ApiError> {
    let test = test_repo::find_by_id(pool, test_id)
        .await?
        .ok_or(ApiError::NotFound("Test"))?;
    let (_, group) = group_for_course(pool, test.course_id).await?;
    Ok((test, group))
}
