//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    bill::{get_bill_file, get_bills_page, get_new_bill_page, submit_bill, upload_bill_file},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    session::{session_guard, session_guard_hx},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::BILLS_VIEW, get(get_bills_page))
        .route(endpoints::NEW_BILL_VIEW, get(get_new_bill_page))
        .route(endpoints::BILL_FILE_VIEW, get(get_bill_file))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::BILL_FILE_API, post(upload_bill_file))
            .route(endpoints::BILLS_API, post(submit_bill))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                session_guard_hx,
            )),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the bills page.
///
/// Anonymous users are sent to the log in page by the session guard first.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::BILLS_VIEW)
}
