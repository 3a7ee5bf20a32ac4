//! The page shown when the server fails to handle a request.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// An error page with a short description of what failed and what the user can do about it.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Une erreur est survenue.",
            fix: "Réessayez plus tard ou contactez votre administrateur.",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Erreur interne", "500", self.description, self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}

/// Route handler for the page htmx requests are redirected to after a server error.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
