//! Handles the attachment chosen in the new bill form.

use axum::{
    Extension,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error, SessionUser,
    bill::{
        core::Attachment,
        new_bill_page::file_field,
        store::{BillStoreState, run_blocking},
    },
};

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const ACCEPTED_CONTENT_TYPES: [&str; 3] = ["image/jpg", "image/jpeg", "image/png"];

/// Whether a file is a JPG or PNG image, going by its extension and, when
/// the browser sent one, its MIME type.
pub fn is_accepted_file(file_name: &str, content_type: Option<&str>) -> bool {
    let has_accepted_extension = file_name
        .rsplit_once('.')
        .is_some_and(|(_, extension)| {
            ACCEPTED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        });
    let has_accepted_content_type =
        content_type.is_none_or(|content_type| ACCEPTED_CONTENT_TYPES.contains(&content_type));

    has_accepted_extension && has_accepted_content_type
}

fn content_type_from_extension(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

async fn read_attachment(multipart: &mut Multipart, email: &str) -> Result<Attachment, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(str::to_owned);

        if !is_accepted_file(&file_name, content_type.as_deref()) {
            return Err(Error::InvalidFileType(file_name));
        }

        let data = field.bytes().await.map_err(|error| {
            tracing::error!("Could not read data from multipart form field: {error}");
            Error::MultipartError(error.to_string())
        })?;
        let content_type =
            content_type.unwrap_or_else(|| content_type_from_extension(&file_name).to_owned());

        return Ok(Attachment {
            email: email.to_owned(),
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(Error::MissingAttachment)
}

/// An empty file field and an alert explaining what went wrong.
fn upload_error_response(error: Error) -> Response {
    let (status_code, alert) = error.into_alert();

    (
        status_code,
        html! {
            (file_field(None))
            (alert.into_html())
        },
    )
        .into_response()
}

/// Route handler for uploading the attachment of a new bill.
///
/// A JPG or PNG file is sent to the store, which starts a new bill for it,
/// and the file field is returned with the new bill's details. Any other
/// file is rejected without reaching the store and the field is cleared.
pub async fn upload_bill_file(
    State(state): State<BillStoreState>,
    Extension(user): Extension<SessionUser>,
    mut multipart: Multipart,
) -> Response {
    let attachment = match read_attachment(&mut multipart, &user.email).await {
        Ok(attachment) => attachment,
        Err(error) => {
            tracing::warn!("Rejected attachment from {}: {error}", user.email);
            return upload_error_response(error);
        }
    };

    let Some(store) = state.bill_store else {
        tracing::error!("Cannot upload {}: no bill store", attachment.file_name);
        return upload_error_response(Error::StoreUnavailable);
    };

    let file_name = attachment.file_name.clone();

    match run_blocking(store, move |store| store.create(attachment)).await {
        Ok(uploaded) => file_field(Some((&uploaded, &file_name))).into_response(),
        Err(error) => {
            tracing::error!("Could not upload {file_name}: {error}");
            upload_error_response(error)
        }
    }
}

#[cfg(test)]
mod is_accepted_file_tests {
    use super::is_accepted_file;

    #[test]
    fn accepts_images_by_extension() {
        assert!(is_accepted_file("ticket.jpg", None));
        assert!(is_accepted_file("ticket.jpeg", None));
        assert!(is_accepted_file("ticket.png", None));
        assert!(is_accepted_file("TICKET.PNG", None));
        assert!(is_accepted_file("ticket.jpg", Some("image/jpg")));
        assert!(is_accepted_file("ticket.jpg", Some("image/jpeg")));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_accepted_file("file.txt", Some("text/plain")));
        assert!(!is_accepted_file("file.pdf", None));
        assert!(!is_accepted_file("png", None));
        assert!(!is_accepted_file("", None));
    }

    #[test]
    fn rejects_mismatched_content_type() {
        assert!(!is_accepted_file("file.jpg", Some("text/plain")));
    }
}
