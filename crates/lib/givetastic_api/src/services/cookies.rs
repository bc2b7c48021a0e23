//! Session cookie helpers.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::sessions::SESSION_TTL;

/// Name of the httpOnly cookie carrying the session token.
pub const SESSION_COOKIE: &str = "givetastic_session";

/// Session cookie lifetime, the same as the server-side entry.
const SESSION_MAX_AGE: Duration = Duration::seconds(SESSION_TTL.as_secs() as i64);

fn base(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE.to_string(), value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Build the cookie handed out after a successful entry.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = base(token.to_string(), secure);
    cookie.set_max_age(SESSION_MAX_AGE);
    cookie
}

/// Build an expired cookie that clears the session on the client.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = base(String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc", false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(SESSION_MAX_AGE));
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = clear_session_cookie(true);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
