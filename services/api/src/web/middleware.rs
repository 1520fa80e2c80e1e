//! services/api/src/web/middleware.rs
//!
//! Session middleware: resolves (or creates) the caller's session context.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "mindreflect_session";

/// Reads the session id from the `Cookie` header, ignoring malformed values.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|c| {
            let c = c.trim();
            c.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

pub fn session_cookie(session_id: Uuid) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Middleware that attaches the caller's session to the request.
///
/// Sessions are created on first access; the new id is returned to the
/// browser in a `Set-Cookie` header.
pub async fn with_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Look up the session, creating one if the cookie is missing or stale
    let requested = session_id_from_headers(req.headers());
    let (session, created) = state.sessions.resolve(requested, Utc::now()).await;
    let session_id = session.id;
    if created {
        info!("Started new journaling session {}", session_id);
    }

    // 2. Insert the session into request extensions
    req.extensions_mut().insert(session);

    // 3. Continue to the handler
    let mut response = next.run(req).await;

    // 4. Hand new session ids back to the browser
    if created && !response.headers().contains_key(header::SET_COOKIE) {
        match HeaderValue::from_str(&session_cookie(session_id)) {
            Ok(cookie) => {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            Err(e) => error!("Failed to build session cookie: {:?}", e),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_session_among_other_cookies() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; other=1", SESSION_COOKIE, id))
                .unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn ignores_missing_or_malformed_cookies() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("mindreflect_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("mindreflect_session_old=0b5e0d8c-8f4e-4b5e-9a61-2f2b8c1d7e11"),
        );
        assert_eq!(session_id_from_headers(&headers), None);
    }
}
