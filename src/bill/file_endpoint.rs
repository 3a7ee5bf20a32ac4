//! Serves the attachment of a bill.

use axum::{
    Extension,
    extract::{Path, State},
    http::{HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    Error, SessionUser,
    bill::{
        core::BillId,
        store::{BillStoreState, run_blocking},
    },
};

/// Route handler for downloading the attachment of the bill `bill_id`.
///
/// Employees can only download their own attachments, anyone else gets a 404.
pub async fn get_bill_file(
    State(state): State<BillStoreState>,
    Extension(user): Extension<SessionUser>,
    Path(bill_id): Path<BillId>,
) -> Response {
    let Some(store) = state.bill_store else {
        return Error::StoreUnavailable.into_response();
    };

    let attachment = match run_blocking(store, move |store| store.attachment(bill_id)).await {
        Ok(attachment) => attachment,
        Err(error) => return error.into_response(),
    };

    if !user.can_view_bills_of(&attachment.email) {
        tracing::warn!(
            "{} tried to download the attachment of bill {bill_id}",
            user.email
        );
        return Error::NotFound.into_response();
    }

    let content_type = match HeaderValue::from_str(&attachment.content_type) {
        Ok(content_type) => content_type,
        Err(error) => {
            tracing::error!("Bill {bill_id} has an invalid content type: {error}");
            HeaderValue::from_static("application/octet-stream")
        }
    };

    ([(CONTENT_TYPE, content_type)], attachment.data).into_response()
}
