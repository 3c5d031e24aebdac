use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::models::user_models::AuthUser;

pub const SESSION_COOKIE: &str = "session_token";

/// Identity carried by the session token. `sub` is the user id as issued
/// by the identity provider; the profile fields ride along so requests
/// never need a user lookup.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub exp: usize,
}

/// Session claims resolved for the current request, or `None` for an
/// anonymous caller. Inserted into request extensions by the session
/// middleware.
#[derive(Debug, Clone, Default)]
pub struct MaybeClaims(pub Option<Claims>);

fn secret() -> String {
    env::var("SESSION_SECRET").unwrap_or_else(|_| "default-secret-key".to_string())
}

pub fn create_token(user: &AuthUser) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        avatar: user.avatar.clone(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret().as_bytes()),
    )
}

pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_carries_the_identity() {
        let user = AuthUser {
            id: "64f0c2a5e13f4a0001a1b2c3".to_string(),
            email: "voter@example.com".to_string(),
            name: Some("Voter".to_string()),
            avatar: None,
        };

        let token = create_token(&user).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.name.as_deref(), Some("Voter"));
        assert!(claims.avatar.is_none());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(verify_token("not-a-jwt").is_err());
        assert!(verify_token("").is_err());
    }
}
