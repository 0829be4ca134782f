//! Session lifecycle management
//!
//! Sessions are durable rows keyed by an opaque token that rides an
//! HTTP-only cookie. Expiration is sliding: a session validated past the
//! half-life of its TTL is extended to a full TTL from now, and an expired
//! session is deleted lazily by the validation that discovers it. That is
//! the only cleanup; there is no background sweep.

use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use common::error::DatabaseResult;

use crate::models::Session;
use crate::repositories::SessionRepository;

/// Sessions live this long from issue or last extension.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Result of a successful token validation.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub session: Session,
    /// True when the expiry was just extended and the cookie should be
    /// re-issued with the new deadline.
    pub refreshed: bool,
}

/// Session manager for issuing, validating, and revoking sessions
#[derive(Clone)]
pub struct SessionService {
    sessions: SessionRepository,
}

impl SessionService {
    /// Create a new session service
    pub fn new(sessions: SessionRepository) -> Self {
        Self { sessions }
    }

    /// Issue a new session for a user.
    pub async fn create_session(&self, user_id: Uuid) -> DatabaseResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: generate_token(),
            user_id,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
            created_at: now,
        };

        self.sessions.insert(&session).await?;
        info!("Created session for user: {}", user_id);

        Ok(session)
    }

    /// Resolve a token to a live session.
    ///
    /// An expired session is deleted on sight and the token reported as
    /// invalid. A session past half its TTL gets a fresh full TTL.
    pub async fn validate(&self, token: &str) -> DatabaseResult<Option<ValidatedSession>> {
        let Some(mut session) = self.sessions.find(token).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if session.expires_at <= now {
            self.sessions.delete(token).await?;
            info!("Deleted expired session for user: {}", session.user_id);
            return Ok(None);
        }

        let mut refreshed = false;
        if session.expires_at - now < Duration::days(SESSION_TTL_DAYS / 2) {
            session.expires_at = now + Duration::days(SESSION_TTL_DAYS);
            self.sessions
                .update_expiry(token, session.expires_at)
                .await?;
            refreshed = true;
        }

        Ok(Some(ValidatedSession { session, refreshed }))
    }

    /// Revoke the session behind a token. Unknown tokens are a no-op.
    pub async fn revoke(&self, token: &str) -> DatabaseResult<()> {
        self.sessions.delete(token).await
    }
}

/// 256 bits from the thread RNG, hex encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
