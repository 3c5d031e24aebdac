use serde::{Deserialize, Serialize};

/// The caller's identity as the external provider presents it. Users are
/// never written from this service; this is the read-only shape resolved
/// from session claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
