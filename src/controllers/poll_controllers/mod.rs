pub mod models;

pub mod cast_vote;
pub mod create_poll;
pub mod delete_poll;
pub mod get_poll;
pub mod get_user_polls;
pub mod polls;
pub mod update_poll;

use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection,
};

use crate::models::vote_models::Vote;
use crate::utils::error::AppResult;
use models::UserVote;

/// The caller's own ballot on a poll, looked up for response enrichment.
/// Anonymous callers never have one.
pub(crate) async fn find_user_vote(
    votes: &Collection<Vote>,
    poll_id: ObjectId,
    user_id: Option<ObjectId>,
) -> AppResult<Option<UserVote>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let vote = votes
        .find_one(doc! { "poll_id": poll_id, "user_id": user_id })
        .await?;

    Ok(vote.map(|vote| UserVote {
        id: vote.id.to_hex(),
        option_id: vote.option_id,
    }))
}
