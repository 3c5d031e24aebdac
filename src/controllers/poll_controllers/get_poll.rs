use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::bson::{doc, oid::ObjectId};

use crate::controllers::poll_controllers::find_user_vote;
use crate::controllers::poll_controllers::models::{PollCreator, PollResponse};
use crate::models::poll_models::Poll;
use crate::models::vote_models::Vote;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::MaybeClaims;
use crate::utils::{auth, validation};

pub async fn get_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
) -> AppResult<Json<PollResponse>> {
    let validation = validation::validate_poll_id(&poll_id);
    if !validation.is_valid {
        return Err(AppError::ValidationFailed(validation.errors));
    }

    let obj_id = ObjectId::parse_str(&poll_id).map_err(|_| AppError::PollNotFound)?;

    let poll = state
        .db
        .collection::<Poll>("polls")
        .find_one(doc! { "_id": obj_id })
        .await?
        .ok_or(AppError::PollNotFound)?;

    let user = auth::current_user(&session).user;
    let user_obj_id = user
        .as_ref()
        .and_then(|user| ObjectId::parse_str(&user.id).ok());

    let votes = state.db.collection::<Vote>("votes");
    let user_vote = find_user_vote(&votes, poll.id, user_obj_id).await?;

    // Creator details are only disclosed to the poll's owner.
    let creator = user
        .filter(|_| user_obj_id == Some(poll.created_by))
        .map(|user| PollCreator {
            id: user.id,
            email: user.email,
        });

    Ok(Json(PollResponse::from_poll(poll, creator, user_vote)))
}
