//! The page listing the bills an employee has sent.

use std::cmp::Reverse;

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    Error, SessionUser, endpoints,
    bill::{
        core::{Bill, DisplayBill},
        format::{format_date, parse_bill_date},
        store::{BillStore, BillStoreState, run_blocking},
    },
    html::{
        BUTTON_PRIMARY_STYLE, HeadElement, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_euros,
    },
    navigation::NavBar,
};

/// Fetch every bill from `store`, latest first, ready for display.
///
/// Returns `Ok(None)` without fetching anything if there is no store.
/// Bills whose date cannot be parsed are placed last and keep their raw date.
///
/// # Errors
///
/// Returns the store's error if the bills could not be listed.
pub fn get_bills(store: Option<&dyn BillStore>) -> Result<Option<Vec<DisplayBill>>, Error> {
    let Some(store) = store else {
        return Ok(None);
    };

    let mut bills = store.list()?;
    bills.sort_by_cached_key(|bill| Reverse(parse_bill_date(&bill.date).ok()));

    Ok(Some(bills.into_iter().map(into_display_bill).collect()))
}

fn into_display_bill(mut bill: Bill) -> DisplayBill {
    match format_date(&bill.date) {
        Ok(date) => bill.date = date,
        Err(error) => tracing::error!("Could not format the date of {bill:?}: {error}"),
    }

    let status = bill.status.label();
    DisplayBill { bill, status }
}

const PREVIEW_SCRIPT: &str = r#"
document.addEventListener("click", (event) => {
    const icon = event.target.closest('[data-testid="icon-eye"]');
    if (!icon) {
        return;
    }

    const modal = document.getElementById("modaleFile");
    modal.querySelector("img").src = icon.dataset.billUrl;
    modal.showModal();
});
"#;

/// Display the bills of the logged in user.
///
/// Admins see the bills of every employee.
pub async fn get_bills_page(
    State(state): State<BillStoreState>,
    Extension(user): Extension<SessionUser>,
) -> Response {
    let bills = match state.bill_store {
        Some(store) => run_blocking(store, |store| get_bills(Some(store))).await,
        None => get_bills(None),
    };
    let bills = bills.map(|bills| {
        bills
            .unwrap_or_default()
            .into_iter()
            .filter(|bill| user.can_view_bills_of(&bill.bill.email))
            .collect::<Vec<_>>()
    });

    let nav_bar = NavBar::new(endpoints::BILLS_VIEW, user.user_type).into_html();
    let content = html! {
        (nav_bar)

        div class={ "ml-20 " (PAGE_CONTAINER_STYLE) }
        {
            div class="flex items-center justify-between w-full max-w-5xl mb-4"
            {
                h1 class="text-xl font-bold" { "Mes notes de frais" }

                a
                    href=(endpoints::NEW_BILL_VIEW)
                    data-testid="btn-new-bill"
                    class={ "max-w-xs text-center " (BUTTON_PRIMARY_STYLE) }
                {
                    "Nouvelle note de frais"
                }
            }

            @match bills {
                Ok(bills) => (bills_table(&bills)),
                Err(error) => {
                    div data-testid="error-message" class="text-red-600 dark:text-red-400"
                    {
                        (error.to_string())
                    }
                }
            }

            (preview_modal())
        }
    };

    base(
        "Mes notes de frais",
        &[HeadElement::ScriptSource(PreEscaped(
            PREVIEW_SCRIPT.to_owned(),
        ))],
        &content,
    )
    .into_response()
}

fn bills_table(bills: &[DisplayBill]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded-lg w-full max-w-5xl"
        {
            table id="data-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Nom" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Montant" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Statut" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody data-testid="tbody"
                {
                    @for display_bill in bills {
                        (bill_row(display_bill))
                    }
                }
            }
        }
    }
}

fn bill_row(display_bill: &DisplayBill) -> Markup {
    let bill = &display_bill.bill;

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (bill.bill_type) }
            td class=(TABLE_CELL_STYLE) { (bill.name) }
            td class=(TABLE_CELL_STYLE) data-testid="bill-date" { (bill.date) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(amount) = bill.amount {
                    (format_euros(amount))
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(STATUS_BADGE_STYLE) { (display_bill.status) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(file_url) = &bill.file_url {
                    button
                        type="button"
                        data-testid="icon-eye"
                        data-bill-url=(file_url)
                        title="Voir le justificatif"
                        class="text-blue-600 hover:text-blue-500 dark:text-blue-500"
                    {
                        "👁"
                    }
                }
            }
        }
    }
}

fn preview_modal() -> Markup {
    html! {
        dialog
            id="modaleFile"
            class="rounded-lg p-0 backdrop:bg-gray-900/50 bg-white dark:bg-gray-800"
        {
            div class="flex items-center justify-between p-4 border-b dark:border-gray-700"
            {
                h5 class="text-lg font-semibold text-gray-900 dark:text-white" { "Justificatif" }

                form method="dialog"
                {
                    button type="submit" aria-label="Fermer" class="text-gray-400 hover:text-gray-900 dark:hover:text-white"
                    {
                        "×"
                    }
                }
            }

            div class="modal-body p-4"
            {
                img alt="Justificatif" class="max-w-full";
            }
        }
    }
}
