use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, to_bson, Bson, Document};

use crate::controllers::poll_controllers::find_user_vote;
use crate::controllers::poll_controllers::models::{
    expiration_from_days, PollCreator, PollResponse, UpdatePollRequest,
};
use crate::models::poll_models::Poll;
use crate::models::vote_models::Vote;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::MaybeClaims;
use crate::utils::{auth, validation};

pub async fn update_poll(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
    Json(payload): Json<UpdatePollRequest>,
) -> AppResult<Json<PollResponse>> {
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

    let now = Utc::now();
    let mut changes = Document::new();

    if let Some(title) = &payload.title {
        changes.insert("title", title.trim());
    }
    if let Some(description) = &payload.description {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            changes.insert("description", Bson::Null);
        } else {
            changes.insert("description", trimmed);
        }
    }
    if let Some(is_public) = payload.is_public {
        changes.insert("is_public", is_public);
    }
    if let Some(allow_multiple_votes) = payload.allow_multiple_votes {
        changes.insert("allow_multiple_votes", allow_multiple_votes);
    }
    if payload.expiration_days.is_some() {
        let expires_at = expiration_from_days(payload.expiration_days.as_deref(), now);
        changes.insert("expires_at", to_bson(&expires_at)?);
    }
    changes.insert("updated_at", to_bson(&now)?);

    // The write is scoped by owner as well, so a stale ownership read can
    // never update somebody else's poll.
    polls
        .update_one(
            doc! { "_id": obj_id, "created_by": caller },
            doc! { "$set": changes },
        )
        .await?;

    let updated = polls
        .find_one(doc! { "_id": obj_id })
        .await?
        .ok_or(AppError::PollNotFound)?;

    let votes = state.db.collection::<Vote>("votes");
    let user_vote = find_user_vote(&votes, updated.id, Some(caller)).await?;

    let creator = PollCreator {
        id: user.id,
        email: user.email,
    };

    Ok(Json(PollResponse::from_poll(updated, Some(creator), user_vote)))
}
