use axum::{
    extract::{Extension, State},
    Json,
};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use crate::controllers::poll_controllers::models::{PollCreator, PollResponse};
use crate::models::poll_models::Poll;
use crate::state::AppState;
use crate::utils::auth;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::MaybeClaims;

pub async fn get_user_polls(
    State(state): State<AppState>,
    Extension(session): Extension<MaybeClaims>,
) -> AppResult<Json<Vec<PollResponse>>> {
    let user = auth::require_auth(&session)?;

    let created_by = ObjectId::parse_str(&user.id)
        .map_err(|_| AppError::AuthError("Invalid user id in session".to_string()))?;

    let mut cursor = state
        .db
        .collection::<Poll>("polls")
        .find(doc! { "created_by": created_by })
        .sort(doc! { "created_at": -1 })
        .await?;

    let mut responses = Vec::new();

    while let Some(poll) = cursor.try_next().await? {
        let creator = PollCreator {
            id: user.id.clone(),
            email: user.email.clone(),
        };
        responses.push(PollResponse::from_poll(poll, Some(creator), None));
    }

    Ok(Json(responses))
}
