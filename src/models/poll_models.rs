use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A poll document in the `polls` collection. Options are embedded, so a
/// poll and its options are created in a single atomic insert and a poll
/// can never exist without them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub created_by: ObjectId,
    pub is_public: bool,
    pub allow_multiple_votes: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_votes: i64,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollOption {
    pub id: String,
    pub option_text: String,
    pub vote_count: i64,
}

impl Poll {
    /// A poll with no `expires_at` never expires; otherwise it is closed
    /// once the deadline is strictly in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |expires_at| expires_at < now)
    }

    pub fn find_option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn poll(expires_at: Option<DateTime<Utc>>) -> Poll {
        Poll {
            id: ObjectId::new(),
            title: "Lunch?".to_string(),
            description: None,
            created_by: ObjectId::new(),
            is_public: true,
            allow_multiple_votes: false,
            expires_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            total_votes: 0,
            options: vec![
                PollOption {
                    id: "opt-1".to_string(),
                    option_text: "Pizza".to_string(),
                    vote_count: 0,
                },
                PollOption {
                    id: "opt-2".to_string(),
                    option_text: "Salad".to_string(),
                    vote_count: 0,
                },
            ],
        }
    }

    #[test]
    fn polls_without_deadline_never_expire() {
        assert!(!poll(None).is_expired(Utc::now()));
    }

    #[test]
    fn expiry_is_strictly_before_now() {
        let now = Utc::now();
        assert!(poll(Some(now - Duration::seconds(1))).is_expired(now));
        assert!(!poll(Some(now)).is_expired(now));
        assert!(!poll(Some(now + Duration::days(7))).is_expired(now));
    }

    #[test]
    fn find_option_only_matches_this_poll() {
        let poll = poll(None);
        assert_eq!(poll.find_option("opt-2").unwrap().option_text, "Salad");
        assert!(poll.find_option("opt-from-another-poll").is_none());
    }
}
