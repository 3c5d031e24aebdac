use axum::{
    extract::{Extension, State},
    Json,
};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use crate::controllers::poll_controllers::find_user_vote;
use crate::controllers::poll_controllers::models::{PollCreator, PollResponse};
use crate::models::poll_models::Poll;
use crate::models::vote_models::Vote;
use crate::state::AppState;
use crate::utils::auth;
use crate::utils::error::AppResult;
use crate::utils::session::MaybeClaims;

/// Public listing, newest first. Each returned poll carries the caller's
/// own vote (when authenticated) and creator details for the polls the
/// caller owns.
pub async fn get_public_polls(
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
) -> AppResult<Json<Vec<PollResponse>>> {
    let polls_collection = state.db.collection::<Poll>("polls");
    let votes = state.db.collection::<Vote>("votes");

    let user = auth::current_user(&session).user;
    let user_obj_id = user
        .as_ref()
        .and_then(|user| ObjectId::parse_str(&user.id).ok());

    let mut cursor = polls_collection
        .find(doc! { "is_public": true })
        .sort(doc! { "created_at": -1 })
        .await?;

    let mut responses = Vec::new();

    while let Some(poll) = cursor.try_next().await? {
        let user_vote = find_user_vote(&votes, poll.id, user_obj_id).await?;

        let creator = user
            .as_ref()
            .filter(|_| user_obj_id == Some(poll.created_by))
            .map(|user| PollCreator {
                id: user.id.clone(),
                email: user.email.clone(),
            });

        responses.push(PollResponse::from_poll(poll, creator, user_vote));
    }

    Ok(Json(responses))
}
