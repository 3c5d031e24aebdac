use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::controllers::poll_controllers::models::{
    expiration_from_days, CreatePollRequest, PollCreator, PollResponse,
};
use crate::models::poll_models::{Poll, PollOption};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::MaybeClaims;
use crate::utils::{auth, validation};

/// Creating a poll is one document insert: the options are embedded, so
/// there is no window in which a poll exists without them.
pub async fn create_poll(
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
    Json(payload): Json<CreatePollRequest>,
) -> AppResult<Json<PollResponse>> {
    let user = auth::require_auth(&session)?;

    let validation = validation::validate_create_poll(&payload);
    if !validation.is_valid {
        return Err(AppError::ValidationFailed(validation.errors));
    }

    let created_by = ObjectId::parse_str(&user.id)
        .map_err(|_| AppError::AuthError("Invalid user id in session".to_string()))?;

    let now = Utc::now();

    let options: Vec<PollOption> = payload
        .options
        .iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .map(|text| PollOption {
            id: ObjectId::new().to_hex(),
            option_text: text.to_string(),
            vote_count: 0,
        })
        .collect();

    let poll = Poll {
        id: ObjectId::new(),
        title: payload.title.trim().to_string(),
        description: payload
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(String::from),
        created_by,
        is_public: payload.is_public,
        allow_multiple_votes: payload.allow_multiple_votes,
        expires_at: expiration_from_days(payload.expiration_days.as_deref(), now),
        created_at: now,
        updated_at: now,
        total_votes: 0,
        options,
    };

    state
        .db
        .collection::<Poll>("polls")
        .insert_one(&poll)
        .await?;

    let creator = PollCreator {
        id: user.id,
        email: user.email,
    };

    Ok(Json(PollResponse::from_poll(poll, Some(creator), None)))
}
