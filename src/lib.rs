//! Billed is a web app for employees to submit their expense reports (bills)
//! and follow the status of the bills they have already sent.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod bill;
mod db;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod password;
mod routing;
mod session;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use bill::{
    Attachment, Bill, BillId, BillStatus, BillStore, DisplayBill, SQLiteBillStore, UploadedFile,
    get_bills,
};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use session::SessionUser;
pub use user::{User, UserID, UserType, create_user};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
