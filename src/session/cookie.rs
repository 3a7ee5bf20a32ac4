//! Reads and writes the session cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    session::{SessionUser, token::SessionToken},
};

pub(crate) const COOKIE_SESSION: &str = "user";
/// How long a session lasts without any request.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add the session cookie for `user` to `jar`, expiring `duration` from now.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the session could not be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    user: SessionUser,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc() + duration;
    set_session_token(
        jar,
        &SessionToken {
            user,
            expires_at,
        },
    )
}

fn set_session_token(jar: PrivateCookieJar, token: &SessionToken) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, token_string))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and its max age to zero so the browser drops it.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session stored in `jar`.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no session cookie,
/// - [Error::InvalidCredentials] if the cookie does not hold a session,
/// - [Error::SessionExpired] if the session has ended.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<SessionToken, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::CookieMissing)?;
    let token: SessionToken =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidCredentials)?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::SessionExpired);
    }

    Ok(token)
}

/// Push the session expiry back to now plus `duration`, unless it already ends later.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
/// See [get_session_from_cookies] for the possible errors.
pub(crate) fn extend_session_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let mut token = get_session_from_cookies(&jar)?;
    let new_expiry = OffsetDateTime::now_utc() + duration;
    token.expires_at = max(token.expires_at, new_expiry);

    set_session_token(jar, &token)
}
