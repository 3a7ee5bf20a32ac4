//! Log-out route handler that ends the session and redirects users to the log-in page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{endpoints, session::invalidate_session_cookie};

/// Invalidate the session cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        SessionUser, UserType, endpoints,
        log_out::get_log_out,
        session::{COOKIE_SESSION, DEFAULT_COOKIE_DURATION, set_session_cookie},
        test_utils::get_header,
    };

    #[tokio::test]
    async fn log_out_invalidates_session_cookie_and_redirects() {
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("42")));
        let jar = set_session_cookie(
            jar,
            SessionUser {
                user_type: UserType::Employee,
                email: "a@a".to_owned(),
            },
            DEFAULT_COOKIE_DURATION,
        )
        .unwrap();

        let response = get_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);

        let set_cookie = get_header(&response, SET_COOKIE.as_str());
        let cookie = Cookie::parse(set_cookie).unwrap();
        assert_eq!(cookie.name(), COOKIE_SESSION);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }
}
