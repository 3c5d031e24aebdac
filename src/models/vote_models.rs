use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ballot in the `votes` collection. Exactly one of `user_id` and
/// `anonymous_id` is set. `single_vote` is stamped from the owning poll's
/// settings at insert time: the partial unique index on
/// `(poll_id, user_id)` applies only to documents where it is true.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub poll_id: ObjectId,
    pub option_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,
    pub single_vote: bool,
    pub created_at: DateTime<Utc>,
}

/// Marker attached to ballots from unauthenticated callers. Fresh per
/// call; repeat anonymous voters are not deduplicated.
pub fn anonymous_voter_id() -> String {
    format!(
        "anon_{}_{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_markers_are_tagged_and_distinct() {
        let first = anonymous_voter_id();
        let second = anonymous_voter_id();

        assert!(first.starts_with("anon_"));
        assert_eq!(first.split('_').count(), 3);
        assert_ne!(first, second);
    }
}
