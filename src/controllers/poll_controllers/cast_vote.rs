use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId};

use crate::controllers::poll_controllers::models::{CastVoteRequest, VoteResponse};
use crate::models::poll_models::Poll;
use crate::models::vote_models::{anonymous_voter_id, Vote};
use crate::state::AppState;
use crate::utils::error::{is_duplicate_key, AppError, AppResult};
use crate::utils::session::MaybeClaims;
use crate::utils::{auth, validation};

/// The vote-casting protocol. Checks run cheapest-first and
/// short-circuit; nothing is written until every one has passed, and the
/// insert itself is the single atomic effect.
pub async fn cast_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
    Json(payload): Json<CastVoteRequest>,
) -> AppResult<Json<VoteResponse>> {
    let validation = validation::validate_vote(&poll_id, &payload.option_id);
    if !validation.is_valid {
        return Err(AppError::ValidationFailed(validation.errors));
    }

    let polls = state.db.collection::<Poll>("polls");
    let votes = state.db.collection::<Vote>("votes");

    // An id that does not even parse cannot name an existing poll.
    let poll_obj_id = ObjectId::parse_str(&poll_id).map_err(|_| AppError::PollNotFound)?;

    let poll = polls
        .find_one(doc! { "_id": poll_obj_id })
        .await?
        .ok_or(AppError::PollNotFound)?;

    check_poll_open(&poll, Utc::now())?;

    let user = auth::current_user(&session).user;
    let user_obj_id = match &user {
        Some(user) => Some(
            ObjectId::parse_str(&user.id)
                .map_err(|_| AppError::AuthError("Invalid user id in session".to_string()))?,
        ),
        None => None,
    };

    // Fast path for the friendlier error; the partial unique index below
    // is what actually guarantees one ballot under concurrency.
    if let Some(user_id) = user_obj_id {
        if !poll.allow_multiple_votes {
            let existing = votes
                .find_one(doc! { "poll_id": poll_obj_id, "user_id": user_id })
                .await?;
            if existing.is_some() {
                return Err(AppError::AlreadyVoted);
            }
        }
    }

    check_option(&poll, &payload.option_id)?;

    let vote = Vote {
        id: ObjectId::new(),
        poll_id: poll_obj_id,
        option_id: payload.option_id.clone(),
        user_id: user_obj_id,
        anonymous_id: user_obj_id.is_none().then(anonymous_voter_id),
        single_vote: user_obj_id.is_some() && !poll.allow_multiple_votes,
        created_at: Utc::now(),
    };

    if let Err(err) = votes.insert_one(&vote).await {
        if is_duplicate_key(&err) {
            return Err(AppError::AlreadyVoted);
        }
        return Err(err.into());
    }

    polls
        .update_one(
            doc! { "_id": poll_obj_id, "options.id": &payload.option_id },
            doc! { "$inc": { "options.$.vote_count": 1, "total_votes": 1 } },
        )
        .await?;

    Ok(Json(VoteResponse::from(vote)))
}

/// Only public, unexpired polls accept votes. Visibility is checked
/// before expiry so a private poll never leaks whether it has ended.
fn check_poll_open(poll: &Poll, now: DateTime<Utc>) -> AppResult<()> {
    if !poll.is_public {
        return Err(AppError::PollPrivate);
    }
    if poll.is_expired(now) {
        return Err(AppError::PollExpired);
    }
    Ok(())
}

fn check_option(poll: &Poll, option_id: &str) -> AppResult<()> {
    poll.find_option(option_id)
        .map(|_| ())
        .ok_or(AppError::OptionNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::poll_models::PollOption;
    use chrono::Duration;

    fn poll() -> Poll {
        Poll {
            id: ObjectId::new(),
            title: "Lunch?".to_string(),
            description: None,
            created_by: ObjectId::new(),
            is_public: true,
            allow_multiple_votes: false,
            expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            total_votes: 0,
            options: vec![
                PollOption {
                    id: "pizza".to_string(),
                    option_text: "Pizza".to_string(),
                    vote_count: 0,
                },
                PollOption {
                    id: "salad".to_string(),
                    option_text: "Salad".to_string(),
                    vote_count: 0,
                },
            ],
        }
    }

    #[test]
    fn open_public_polls_accept_votes() {
        assert!(check_poll_open(&poll(), Utc::now()).is_ok());
    }

    #[test]
    fn private_polls_reject_votes_regardless_of_option() {
        let mut poll = poll();
        poll.is_public = false;
        let err = check_poll_open(&poll, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::PollPrivate));
    }

    #[test]
    fn private_wins_over_expired() {
        let now = Utc::now();
        let mut poll = poll();
        poll.is_public = false;
        poll.expires_at = Some(now - Duration::days(1));
        let err = check_poll_open(&poll, now).unwrap_err();
        assert!(matches!(err, AppError::PollPrivate));
    }

    #[test]
    fn expired_polls_reject_votes() {
        let now = Utc::now();
        let mut poll = poll();
        poll.expires_at = Some(now - Duration::seconds(1));
        let err = check_poll_open(&poll, now).unwrap_err();
        assert!(matches!(err, AppError::PollExpired));
    }

    #[test]
    fn a_deadline_still_ahead_keeps_the_poll_open() {
        let now = Utc::now();
        let mut poll = poll();
        poll.expires_at = Some(now + Duration::days(7));
        assert!(check_poll_open(&poll, now).is_ok());
    }

    #[test]
    fn options_from_other_polls_are_not_found() {
        let err = check_option(&poll(), "an-option-of-some-other-poll").unwrap_err();
        assert!(matches!(err, AppError::OptionNotFound));
        assert!(check_option(&poll(), "salad").is_ok());
    }
}
