//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/bills/{bill_id}/file', use [format_endpoint].

/// The root route which redirects to the bills page or log in page.
pub const ROOT: &str = "/";
/// The page listing the bills of the logged in user.
pub const BILLS_VIEW: &str = "/employee/bills";
/// The page for sending a new bill.
pub const NEW_BILL_VIEW: &str = "/employee/bill/new";
/// The attachment of a bill.
pub const BILL_FILE_VIEW: &str = "/bills/{bill_id}/file";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to submit a bill.
pub const BILLS_API: &str = "/api/bills";
/// The route to upload the attachment of a new bill.
pub const BILL_FILE_API: &str = "/api/bills/file";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/bills/{bill_id}/file', '{bill_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
