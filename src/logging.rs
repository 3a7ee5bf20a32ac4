//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many characters are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 1] = ["password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and logged in full at the `debug` level. Passwords in form
/// bodies are redacted and only the size of binary bodies (uploaded files,
/// attachments) is logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    log_request(&parts, &body_text(&parts.headers, &body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text(&parts.headers, &body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// The text to log for a body with the given headers.
fn body_text(headers: &HeaderMap, body: &Bytes) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        redact_form(body)
    } else if body.is_empty()
        || content_type.is_empty()
        || content_type.starts_with("text/")
        || content_type.starts_with("application/json")
    {
        String::from_utf8_lossy(body).to_string()
    } else {
        format!("<{} bytes of {content_type}>", body.len())
    }
}

fn redact_form(body: &[u8]) -> String {
    let fields: Vec<(String, String)> = match serde_urlencoded::from_bytes(body) {
        Ok(fields) => fields,
        Err(_) => return String::from_utf8_lossy(body).to_string(),
    };

    let redacted: Vec<(String, String)> = fields
        .into_iter()
        .map(|(name, value)| {
            if REDACTED_FIELDS.contains(&name.as_str()) {
                (name, "********".to_owned())
            } else {
                (name, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&redacted).unwrap_or_default()
}

fn truncate(body: &str) -> Option<String> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| body[..end].to_owned())
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {headers:#?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {headers:#?}\nbody: {body:?}"),
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {headers:#?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {headers:#?}\nbody: {body:?}"),
    }
}
