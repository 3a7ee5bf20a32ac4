//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, bill::INVALID_FILE_TYPE_MESSAGE, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar :(")]
    CookieMissing,

    /// The session cookie was found, but it has expired.
    #[error("the session has expired")]
    SessionExpired,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A user with the same email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The uploaded file is not a JPG or PNG image.
    ///
    /// Callers should pass in the name of the rejected file.
    #[error("the file \"{0}\" is not a JPG or PNG image")]
    InvalidFileType(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// A bill was submitted before an attachment was uploaded for it.
    #[error("the bill has no attachment")]
    MissingAttachment,

    /// The store rejected a request.
    ///
    /// The message is meant for the user as is, e.g. "Erreur 404".
    #[error("{0}")]
    Fetch(String),

    /// The app is not connected to a bill store.
    #[error("no bill store is configured")]
    StoreUnavailable,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a bill that does not exist
    #[error("tried to update a bill that is not in the database")]
    UpdateMissingBill,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::StoreUnavailable => InternalServerError {
                description: "Service indisponible",
                fix: "Le serveur n'est relié à aucune base de notes de frais. Vérifiez sa configuration.",
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = self.into_alert();

        (status_code, alert.into_html()).into_response()
    }

    /// The status code and the alert to show the user for this error.
    pub(crate) fn into_alert(self) -> (StatusCode, Alert) {
        match self {
            Error::InvalidFileType(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: INVALID_FILE_TYPE_MESSAGE.to_owned(),
                },
            ),
            Error::MissingAttachment => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Justificatif manquant".to_owned(),
                    details: "Joignez un justificatif au format JPG ou PNG avant d'envoyer \
                        la note de frais."
                        .to_owned(),
                },
            ),
            Error::MultipartError(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the uploaded file".to_owned(),
                    details: "Try selecting the file again.".to_owned(),
                },
            ),
            Error::Fetch(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple { message },
            ),
            Error::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Alert::Error {
                    message: "Not connected".to_owned(),
                    details: "The server is not connected to a bill store.".to_owned(),
                },
            ),
            Error::UpdateMissingBill => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update bill".to_owned(),
                    details: "The bill could not be found. Try uploading the attachment again."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        }
    }
}
