use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;

use crate::utils::session::{verify_token, MaybeClaims, SESSION_COOKIE};

/// Resolves the caller's session for every request under the poll routes.
/// A missing or invalid token resolves to an anonymous caller rather than
/// a rejection: public reads and anonymous voting are legitimate, and
/// operations that need a user enforce it themselves via `require_auth`.
pub async fn jwt_session(cookie_jar: CookieJar, mut req: Request, next: Next) -> Response {
    let claims = cookie_jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| verify_token(cookie.value()).ok());

    req.extensions_mut().insert(MaybeClaims(claims));

    next.run(req).await
}
