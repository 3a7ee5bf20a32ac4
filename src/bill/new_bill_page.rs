//! The page with the form for sending a new bill.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    SessionUser, endpoints,
    bill::core::{BILL_TYPES, DEFAULT_VAT_PCT, UploadedFile},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

/// Display the new bill form.
pub async fn get_new_bill_page(Extension(user): Extension<SessionUser>) -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_BILL_VIEW, user.user_type).into_html();

    let content = html! {
        (nav_bar)

        div class={ "ml-20 " (FORM_CONTAINER_STYLE) }
        {
            (new_bill_form())
        }
    };

    base("Envoyer une note de frais", &[], &content).into_response()
}

fn new_bill_form() -> Markup {
    html! {
        form
            data-testid="form-new-bill"
            hx-post=(endpoints::BILLS_API)
            hx-target-error="#alert-container"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "Envoyer une note de frais" }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type de dépense" }

                select name="type" id="type" data-testid="expense-type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for bill_type in BILL_TYPES {
                        option value=(bill_type) { (bill_type) }
                    }
                }
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Nom de la dépense" }

                input
                    name="name"
                    id="name"
                    type="text"
                    data-testid="expense-name"
                    placeholder="Vol Paris Londres"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    data-testid="datepicker"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Montant TTC" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    data-testid="amount"
                    placeholder="348"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4"
            {
                div class="flex-1"
                {
                    label for="vat" class=(FORM_LABEL_STYLE) { "TVA" }

                    input
                        name="vat"
                        id="vat"
                        type="number"
                        step="0.01"
                        data-testid="vat"
                        placeholder="70"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="w-24"
                {
                    label for="pct" class=(FORM_LABEL_STYLE) { "%" }

                    input
                        name="pct"
                        id="pct"
                        type="number"
                        min="0"
                        data-testid="pct"
                        placeholder=(DEFAULT_VAT_PCT)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="commentary" class=(FORM_LABEL_STYLE) { "Commentaire" }

                textarea
                    name="commentary"
                    id="commentary"
                    rows="3"
                    data-testid="commentary"
                    class=(FORM_TEXT_INPUT_STYLE)
                {}
            }

            (file_field(None))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator"
                {
                    (loading_spinner())
                }
                " Envoyer"
            }
        }
    }
}

/// The attachment input of the new bill form.
///
/// Choosing a file uploads it straight away and the response replaces this
/// field. After an upload the field carries the new bill's id, URL and name
/// as hidden inputs, so the form submission can complete the bill.
pub(super) fn file_field(upload: Option<(&UploadedFile, &str)>) -> Markup {
    html! {
        div id="file-field"
        {
            label for="file" class=(FORM_LABEL_STYLE) { "Justificatif" }

            input
                name="file"
                id="file"
                type="file"
                data-testid="file"
                accept=".jpg,.jpeg,.png"
                value=""
                required[upload.is_none()]
                hx-post=(endpoints::BILL_FILE_API)
                hx-trigger="change"
                hx-encoding="multipart/form-data"
                hx-target="#file-field"
                hx-target-error="#file-field"
                hx-swap="outerHTML"
                class=(FORM_TEXT_INPUT_STYLE);

            @if let Some((uploaded, file_name)) = upload {
                input type="hidden" name="bill_id" value=(uploaded.key);
                input type="hidden" name="file_url" value=(uploaded.file_url);
                input type="hidden" name="file_name" value=(file_name);

                p class="mt-2 text-sm"
                {
                    a href=(uploaded.file_url) target="_blank" class=(LINK_STYLE) { (file_name) }
                }
            }
        }
    }
}
