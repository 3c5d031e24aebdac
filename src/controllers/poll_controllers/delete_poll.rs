use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};
use mongodb::bson::{doc, oid::ObjectId};

use crate::models::poll_models::Poll;
use crate::models::vote_models::Vote;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::MaybeClaims;
use crate::utils::{auth, validation};

pub async fn delete_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
) -> AppResult<StatusCode> {
    let user = auth::require_auth(&session)?;

    let validation = validation::validate_poll_id(&poll_id);
    if !validation.is_valid {
        return Err(AppError::ValidationFailed(validation.errors));
    }

    let obj_id = ObjectId::parse_str(&poll_id).map_err(|_| AppError::PollNotFound)?;

    let polls = state.db.collection::<Poll>("polls");

    let existing = polls
        .find_one(doc! { "_id": obj_id })
        .await?
        .ok_or(AppError::PollNotFound)?;

    let caller = ObjectId::parse_str(&user.id)
        .map_err(|_| AppError::AuthError("Invalid user id in session".to_string()))?;

    if existing.created_by != caller {
        return Err(AppError::PermissionDenied);
    }

    polls
        .delete_one(doc! { "_id": obj_id, "created_by": caller })
        .await?;

    // Options are embedded and go with the document; ballots live in
    // their own collection and are cascaded here.
    state
        .db
        .collection::<Vote>("votes")
        .delete_many(doc! { "poll_id": obj_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
