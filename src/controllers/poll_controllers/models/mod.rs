use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::poll_models::{Poll, PollOption};
use crate::models::vote_models::Vote;

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub title: String,
    pub description: Option<String>,
    pub options: Vec<String>,
    pub is_public: bool,
    pub allow_multiple_votes: bool,
    pub expiration_days: Option<String>,
}

/// Partial update: absent fields are left untouched. A supplied
/// `expiration_days` always recomputes `expires_at`, including back to
/// "never".
#[derive(Debug, Deserialize)]
pub struct UpdatePollRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub allow_multiple_votes: Option<bool>,
    pub expiration_days: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub option_id: String,
}

/// Attached to a poll only when the caller owns it.
#[derive(Debug, Serialize)]
pub struct PollCreator {
    pub id: String,
    pub email: String,
}

/// The caller's own ballot on a poll, when one exists.
#[derive(Debug, Serialize)]
pub struct UserVote {
    pub id: String,
    pub option_id: String,
}

#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub is_public: bool,
    pub allow_multiple_votes: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_votes: i64,
    pub options: Vec<PollOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<PollCreator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<UserVote>,
}

impl PollResponse {
    pub fn from_poll(poll: Poll, creator: Option<PollCreator>, user_vote: Option<UserVote>) -> Self {
        Self {
            id: poll.id.to_hex(),
            title: poll.title,
            description: poll.description,
            created_by: poll.created_by.to_hex(),
            is_public: poll.is_public,
            allow_multiple_votes: poll.allow_multiple_votes,
            expires_at: poll.expires_at,
            created_at: poll.created_at,
            updated_at: poll.updated_at,
            total_votes: poll.total_votes,
            options: poll.options,
            creator,
            user_vote,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub id: String,
    pub poll_id: String,
    pub option_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Vote> for VoteResponse {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id.to_hex(),
            poll_id: vote.poll_id.to_hex(),
            option_id: vote.option_id,
            user_id: vote.user_id.map(|id| id.to_hex()),
            anonymous_id: vote.anonymous_id,
            created_at: vote.created_at,
        }
    }
}

/// Absolute deadline from the relative "days from now" form input.
/// `None` and the "never" sentinel mean no expiration; anything
/// unparseable also falls back to no expiration (validation has already
/// rejected malformed values on the create path).
pub fn expiration_from_days(days: Option<&str>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let days = days?;
    if days == "never" {
        return None;
    }
    days.trim()
        .parse::<i64>()
        .ok()
        .map(|days| now + Duration::days(days))
}
