//! Authentication middleware resolving the session cookie
//!
//! Every request passes through here. A missing cookie leaves the request
//! anonymous; a valid one attaches the requester's identity to the request
//! extensions for handlers to pick up. A cookie whose token no longer
//! resolves is cleared in the response. Identity is derived from the
//! request's own cookie on every call and is never cached across requests.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::error;
use uuid::Uuid;

use crate::cookies::{SESSION_COOKIE, removal_cookie, session_cookie};
use crate::state::AppState;

/// Identity of an authenticated requester, attached per request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub session_id: String,
}

/// Resolve the session cookie into an identity for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_string();

        match state.session_service.validate(&token).await {
            Ok(Some(validated)) => {
                if validated.refreshed {
                    // Sliding expiration moved the deadline; re-issue the
                    // cookie so the client tracks it.
                    jar = jar.add(session_cookie(&token, validated.session.expires_at));
                }

                req.extensions_mut().insert(AuthUser {
                    user_id: validated.session.user_id,
                    session_id: validated.session.id,
                });
            }
            Ok(None) => {
                // Stale token; clear it and continue anonymously.
                jar = jar.add(removal_cookie());
            }
            Err(e) => {
                // Store trouble resolves to an anonymous request rather
                // than failing reads that need no identity.
                error!("Session validation failed: {}", e);
            }
        }
    }

    (jar, next.run(req).await).into_response()
}
