//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The session module handles the lower level cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, SessionUser, UserType, ValidatedPassword,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner,
        log_in_layout,
    },
    session::{invalidate_session_cookie, set_session_cookie},
    user::{User, create_user, get_user_by_email},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Email ou mot de passe incorrect.";
const INTERNAL_ERROR_MSG: &str = "Une erreur interne est survenue. Réessayez plus tard.";

fn log_in_form(user_type: UserType, email: &str, error_message: Option<&str>) -> Markup {
    let (test_id, title, prefix) = match user_type {
        UserType::Employee => ("form-employee", "Employé", "employee"),
        UserType::Admin => ("form-admin", "Administration", "admin"),
    };
    let email_id = format!("{prefix}-email-input");
    let password_id = format!("{prefix}-password-input");
    let indicator_id = format!("{prefix}-indicator");

    html! {
        form
            data-testid=(test_id)
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator={ "#" (indicator_id) }
            class="space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
            {
                (title)
            }

            input type="hidden" name="user_type" value=(user_type.as_str());

            div
            {
                label for=(email_id) class=(FORM_LABEL_STYLE) { "Votre email" }

                input
                    type="email"
                    name="email"
                    id=(email_id)
                    data-testid=(email_id)
                    placeholder="johndoe@email.com"
                    required
                    value=(email)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for=(password_id) class=(FORM_LABEL_STYLE) { "Mot de passe" }

                input
                    type="password"
                    name="password"
                    id=(password_id)
                    data-testid=(password_id)
                    placeholder="••••••••"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id=(indicator_id)
                {
                    (loading_spinner())
                }
                "Se connecter"
            }
        }
    }
}

/// Display the log-in page with one form for employees and one for admins.
pub async fn get_log_in_page() -> Response {
    let content = log_in_layout(&[
        log_in_form(UserType::Employee, "", None),
        log_in_form(UserType::Admin, "", None),
    ]);

    base("Connexion", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts without any request.
    pub cookie_duration: Duration,
    /// The database holding the users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in one of the log-in forms.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Which of the two forms was submitted.
    pub user_type: UserType,
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Find the user registered with `data.email` and check their password.
///
/// An email that is not registered yet gets a new employee account, as long
/// as the password is strong enough. Admin accounts are only created with the
/// `create_admin` binary.
fn authenticate(data: &LogInData, connection: &Connection) -> Result<User, Error> {
    match get_user_by_email(&data.email, connection) {
        Ok(user) => {
            if user.user_type != data.user_type || !user.password_hash.verify(&data.password)? {
                return Err(Error::InvalidCredentials);
            }

            Ok(user)
        }
        Err(Error::NotFound) if data.user_type == UserType::Admin => {
            tracing::warn!("Refused admin log in for unknown email {}", data.email);
            Err(Error::InvalidCredentials)
        }
        Err(Error::NotFound) => {
            let password = ValidatedPassword::new(&data.password, &[&data.email])?;
            let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;
            let user = create_user(&data.email, data.user_type, password_hash, connection)?;
            tracing::info!("Created {} account for {}", user.user_type, user.email);

            Ok(user)
        }
        Err(error) => Err(error),
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session cookie is set and the client
/// is redirected to the bills page. Otherwise, the submitted form is
/// returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(data): Form<LogInData>,
) -> Response {
    let email = data.email.trim().to_owned();
    let data = LogInData { email, ..data };

    let result = match state.db_connection.lock() {
        Ok(connection) => authenticate(&data, &connection),
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let user = match result {
        Ok(user) => user,
        Err(error) => {
            let message = match &error {
                Error::InvalidCredentials => INVALID_CREDENTIALS_ERROR_MSG.to_owned(),
                Error::TooWeak(feedback) => {
                    format!("Mot de passe trop faible. {feedback}")
                }
                error => {
                    tracing::error!("Unhandled error while verifying credentials: {error}");
                    INTERNAL_ERROR_MSG.to_owned()
                }
            };

            return log_in_form(data.user_type, &data.email, Some(&message)).into_response();
        }
    };

    let session_user = SessionUser {
        user_type: user.user_type,
        email: user.email,
    };

    set_session_cookie(jar.clone(), session_user, state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::BILLS_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting session cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
        })
        .into_response()
}

#[cfg(test)]
mod log_in_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
    };
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        Error, PasswordHash, UserType,
        app_state::create_cookie_key,
        endpoints,
        session::{COOKIE_SESSION, DEFAULT_COOKIE_DURATION},
        test_utils::{
            assert_form_error_message, assert_form_input, assert_hx_endpoint,
            assert_hx_redirect, assert_valid_html, parse_html_document, parse_html_fragment,
        },
        user::{create_user, create_user_table, get_user_by_email},
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LogInState, get_log_in_page, post_log_in,
    };

    /// The bcrypt hash of "okon".
    const OKON_HASH: &str = "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm";

    fn get_test_state() -> LogInState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        LogInState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn add_user(state: &LogInState, email: &str, user_type: UserType) {
        create_user(
            email,
            user_type,
            PasswordHash::new_unchecked(OKON_HASH),
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test user");
    }

    fn log_in_data(user_type: UserType, email: &str, password: &str) -> Form<LogInData> {
        Form(LogInData {
            user_type,
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    #[tokio::test]
    async fn log_in_page_displays_employee_and_admin_forms() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        for test_id in ["form-employee", "form-admin"] {
            let selector = Selector::parse(&format!("form[data-testid=\"{test_id}\"]")).unwrap();
            let form = document
                .select(&selector)
                .next()
                .unwrap_or_else(|| panic!("No form with data-testid={test_id}"));

            assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
            assert_form_input(&form, "email", "email");
            assert_form_input(&form, "password", "password");
        }
    }

    #[tokio::test]
    async fn registered_user_logs_in() {
        let state = get_test_state();
        add_user(&state, "employee@test.tld", UserType::Employee);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state),
            jar,
            log_in_data(UserType::Employee, "employee@test.tld", "okon"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BILLS_VIEW);
        let set_cookie = response
            .headers()
            .get("set-cookie")
            .expect("No session cookie set")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(&format!("{COOKIE_SESSION}=")));
    }

    #[tokio::test]
    async fn unknown_email_creates_employee_account() {
        let state = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state.clone()),
            jar,
            log_in_data(
                UserType::Employee,
                "employee@test.tld",
                "averysecureemployeepassword!",
            ),
        )
        .await;

        assert_hx_redirect(&response, endpoints::BILLS_VIEW);
        let user = get_user_by_email("employee@test.tld", &state.db_connection.lock().unwrap())
            .expect("The user should have been created");
        assert_eq!(user.user_type, UserType::Employee);
        assert!(
            user.password_hash
                .verify("averysecureemployeepassword!")
                .unwrap()
        );
    }

    #[tokio::test]
    async fn unknown_email_cannot_register_as_admin() {
        let state = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state.clone()),
            jar,
            log_in_data(UserType::Admin, "stranger@test.tld", "averysecureadminpassword!"),
        )
        .await;

        assert!(response.headers().get("hx-redirect").is_none());
        assert!(response.headers().get("set-cookie").is_none());
        let html = parse_html_fragment(response).await;
        let form = html
            .select(&Selector::parse("form[data-testid=\"form-admin\"]").unwrap())
            .next()
            .expect("No admin form found");
        assert_form_error_message(&form, INVALID_CREDENTIALS_ERROR_MSG);
        assert_eq!(
            get_user_by_email("stranger@test.tld", &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn registered_admin_logs_in() {
        let state = get_test_state();
        add_user(&state, "admin@test.tld", UserType::Admin);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state),
            jar,
            log_in_data(UserType::Admin, "admin@test.tld", "okon"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BILLS_VIEW);
    }

    #[tokio::test]
    async fn unknown_email_with_weak_password_is_rejected() {
        let state = get_test_state();
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state.clone()),
            jar,
            log_in_data(UserType::Employee, "employee@test.tld", "password"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("hx-redirect").is_none());
        let html = parse_html_fragment(response).await;
        let error = html
            .select(&Selector::parse("p.text-red-500").unwrap())
            .next()
            .expect("No error message found")
            .text()
            .collect::<String>();
        assert!(error.starts_with("Mot de passe trop faible."));
        assert!(
            get_user_by_email("employee@test.tld", &state.db_connection.lock().unwrap()).is_err()
        );
    }

    #[tokio::test]
    async fn wrong_password_displays_error_message() {
        let state = get_test_state();
        add_user(&state, "employee@test.tld", UserType::Employee);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state),
            jar,
            log_in_data(UserType::Employee, "employee@test.tld", "wrongpassword"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = html
            .select(&Selector::parse("form[data-testid=\"form-employee\"]").unwrap())
            .next()
            .expect("No employee form found");
        assert_form_error_message(&form, INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn employee_cannot_log_in_with_admin_form() {
        let state = get_test_state();
        add_user(&state, "employee@test.tld", UserType::Employee);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_log_in(
            State(state),
            jar,
            log_in_data(UserType::Admin, "employee@test.tld", "okon"),
        )
        .await;

        assert!(response.headers().get("hx-redirect").is_none());
        let html = parse_html_fragment(response).await;
        let form = html
            .select(&Selector::parse("form[data-testid=\"form-admin\"]").unwrap())
            .next()
            .expect("No admin form found");
        assert_form_error_message(&form, INVALID_CREDENTIALS_ERROR_MSG);
    }
}
