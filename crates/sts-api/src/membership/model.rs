use serde::{Deserialize, Serialize};
use sts_db::models::{GroupMember, JoinRequest, JoinRequestStatus};
use validator::Validate;

/// Result of `POST /groups/{id}/join`: public groups admit directly, private
/// ones queue a request for the lead.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined { membership: GroupMember },
    Pending { request: JoinRequest },
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResolveJoinRequest {
    pub status: JoinRequestStatus,
}
