//! Session cookie construction
//!
//! The session token rides an HTTP-only, same-site-lax cookie scoped to the
//! whole site. It is marked secure only when the deployment says it serves
//! over encrypted transport.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use time::OffsetDateTime;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

fn secure_cookies() -> bool {
    std::env::var("COOKIE_SECURE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Cookie carrying a freshly issued or refreshed session token.
pub fn session_cookie(token: &str, expires_at: DateTime<Utc>) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure_cookies());
    cookie.set_path("/");

    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
        cookie.set_expires(expires);
    }

    cookie
}

/// Cookie that clears the session on the client: empty value, zero max-age.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure_cookies());
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::ZERO);

    cookie
}
