pub mod poll_models;
pub mod user_models;
pub mod vote_models;
