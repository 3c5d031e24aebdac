use crate::models::user_models::AuthUser;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::{Claims, MaybeClaims};

/// Non-failing identity resolution: either a user or a reason there is
/// none, never both absent.
pub struct AuthResult {
    pub user: Option<AuthUser>,
    pub error: Option<String>,
}

pub fn current_user(session: &MaybeClaims) -> AuthResult {
    match &session.0 {
        Some(claims) => AuthResult {
            user: Some(user_from_claims(claims)),
            error: None,
        },
        None => AuthResult {
            user: None,
            error: Some("User not authenticated".to_string()),
        },
    }
}

pub fn require_auth(session: &MaybeClaims) -> AppResult<AuthUser> {
    current_user(session).user.ok_or(AppError::AuthRequired)
}

fn user_from_claims(claims: &Claims) -> AuthUser {
    AuthUser {
        id: claims.sub.clone(),
        email: claims.email.clone(),
        name: claims.name.clone(),
        avatar: claims.avatar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        Claims {
            sub: "64f0c2a5e13f4a0001a1b2c3".to_string(),
            email: "owner@example.com".to_string(),
            name: None,
            avatar: Some("https://example.com/a.png".to_string()),
            exp: 0,
        }
    }

    #[test]
    fn current_user_maps_claims_without_failing() {
        let resolved = current_user(&MaybeClaims(Some(claims())));
        let user = resolved.user.unwrap();
        assert_eq!(user.id, "64f0c2a5e13f4a0001a1b2c3");
        assert_eq!(user.email, "owner@example.com");
        assert!(resolved.error.is_none());
    }

    #[test]
    fn missing_session_is_a_non_fatal_result() {
        let resolved = current_user(&MaybeClaims(None));
        assert!(resolved.user.is_none());
        assert_eq!(resolved.error.as_deref(), Some("User not authenticated"));
    }

    #[test]
    fn require_auth_rejects_anonymous_callers() {
        let err = require_auth(&MaybeClaims(None)).unwrap_err();
        assert!(matches!(err, AppError::AuthRequired));

        assert!(require_auth(&MaybeClaims(Some(claims()))).is_ok());
    }
}
