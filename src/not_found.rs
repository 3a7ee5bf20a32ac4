//! The page shown for routes and resources that do not exist.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The response for a page, bill or attachment that does not exist or that
/// the user may not see.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        let page = error_view(
            "Page introuvable",
            "404",
            "Cette page n'existe pas.",
            "Vérifiez l'adresse ou revenez à vos notes de frais.",
        );

        (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
    }
}

/// Fallback route handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
