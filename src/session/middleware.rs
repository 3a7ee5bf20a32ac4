//! Middleware that reads the session cookie, extends the session and redirects anonymous users.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState, endpoints,
    session::cookie::{extend_session_cookie_duration_if_needed, get_session_from_cookies},
};

/// The state needed for the session middleware.
#[derive(Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How far each request pushes back the end of the session.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

#[inline]
async fn session_guard_internal(
    state: SessionState,
    request: Request,
    next: Next,
    get_redirect: impl Fn() -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect();
        }
    };
    let user = match get_session_from_cookies(&jar) {
        Ok(token) => token.user,
        Err(error) => {
            tracing::debug!("No valid session for {}: {error}", parts.uri.path());
            return get_redirect();
        }
    };

    parts.extensions.insert(user);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_session_cookie_duration_if_needed(jar.clone(), state.cookie_duration)
    {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware that checks for a valid session cookie.
///
/// The [crate::SessionUser] is placed into the request extensions and the request runs normally
/// if the session is valid, otherwise the client is redirected to the log-in page.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user): Extension<SessionUser>` to receive the user.
pub async fn session_guard(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, || {
        Redirect::to(endpoints::LOG_IN_VIEW).into_response()
    })
    .await
}

/// Same as [session_guard], but redirects with the `HX-Redirect` header for htmx requests.
pub async fn session_guard_hx(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, || {
        (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response()
    })
    .await
}
