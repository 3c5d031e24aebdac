use dotenvy::dotenv;
use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use std::env;
use tracing::info;

use crate::models::vote_models::Vote;
use crate::utils::error::{AppError, AppResult};

pub async fn init_db() -> AppResult<Database> {
    dotenv().ok();

    let mongo_uri = env::var("MONGO_URI")
        .map_err(|_| AppError::DatabaseError("MONGO_URI must be set in .env".to_string()))?;
    let db_name = env::var("DB_NAME")
        .map_err(|_| AppError::DatabaseError("DB_NAME must be set in .env".to_string()))?;

    let mut client_options = ClientOptions::parse(&mongo_uri)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse MongoDB URI: {}", e)))?;

    client_options.app_name = Some("polling-backend".to_string());

    let client = Client::with_options(client_options)
        .map_err(|e| AppError::DatabaseError(format!("Failed to initialize MongoDB client: {}", e)))?;

    let db = client.database(&db_name);
    ensure_indexes(&db).await?;

    info!("database connection established");

    Ok(db)
}

/// The partial unique index is the real one-vote-per-user guarantee for
/// single-vote polls; the in-handler existence check only produces the
/// friendlier ALREADY_VOTED before paying for an insert. Votes on
/// multiple-vote polls and anonymous ballots carry `single_vote: false`
/// and are outside the index.
async fn ensure_indexes(db: &Database) -> AppResult<()> {
    let votes = db.collection::<Vote>("votes");

    let options = IndexOptions::builder()
        .unique(true)
        .partial_filter_expression(doc! { "single_vote": true })
        .build();

    let model = IndexModel::builder()
        .keys(doc! { "poll_id": 1, "user_id": 1 })
        .options(options)
        .build();

    votes.create_index(model).await?;

    Ok(())
}
