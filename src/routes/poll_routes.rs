use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::controllers::poll_controllers::{
    cast_vote, create_poll, delete_poll, get_poll, get_user_polls, polls, update_poll,
};
use crate::middleware::{jwt::jwt_session, rate_limit::rate_limit};
use crate::state::AppState;

pub fn poll_routes(state: AppState) -> Router {
    Router::new()
        .route("/create", post(create_poll::create_poll))
        .route("/", get(polls::get_public_polls))
        .route("/user", get(get_user_polls::get_user_polls))
        .route(
            "/:poll_id",
            get(get_poll::get_poll)
                .put(update_poll::update_poll)
                .delete(delete_poll::delete_poll),
        )
        .route("/:poll_id/vote", post(cast_vote::cast_vote))
        .layer(middleware::from_fn(jwt_session))
        .layer(middleware::from_fn(rate_limit))
        .with_state(state)
}
