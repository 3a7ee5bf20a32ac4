//! Handles the submission of the new bill form.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error, SessionUser,
    bill::{
        core::{Bill, BillId, BillStatus, DEFAULT_VAT_PCT},
        store::BillStoreState,
    },
    endpoints,
};

/// The values of the new bill form.
///
/// `bill_id`, `file_url` and `file_name` come from the hidden inputs added
/// once the attachment has been uploaded.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBillForm {
    #[serde(rename = "type")]
    pub bill_type: String,
    #[serde(default)]
    pub name: String,
    pub date: String,
    pub amount: Option<f64>,
    pub vat: Option<f64>,
    pub pct: Option<u32>,
    #[serde(default)]
    pub commentary: String,
    pub bill_id: Option<BillId>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl NewBillForm {
    fn into_bill(self, id: BillId, email: String) -> Bill {
        Bill {
            id,
            email,
            bill_type: self.bill_type,
            name: self.name,
            date: self.date,
            amount: self.amount,
            vat: self.vat,
            pct: Some(self.pct.unwrap_or(DEFAULT_VAT_PCT)),
            commentary: self.commentary,
            status: BillStatus::Pending,
            file_url: self.file_url,
            file_name: self.file_name,
        }
    }
}

/// Route handler for sending a new bill.
///
/// The bill started by the attachment upload is filled in with the form
/// values in the background and the client is sent to the bills page
/// straight away. The outcome of the update is only logged.
pub async fn submit_bill(
    State(state): State<BillStoreState>,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<NewBillForm>,
) -> Response {
    let Some(bill_id) = form.bill_id else {
        tracing::warn!("{} submitted a bill without an attachment", user.email);
        return Error::MissingAttachment.into_alert_response();
    };

    let Some(store) = state.bill_store else {
        tracing::error!("Cannot update bill {bill_id}: no bill store");
        return Error::StoreUnavailable.into_alert_response();
    };

    let bill = form.into_bill(bill_id, user.email);

    tokio::task::spawn_blocking(move || match store.update(&bill) {
        Ok(bill) => tracing::info!("Bill {} submitted by {}", bill.id, bill.email),
        Err(error) => tracing::error!("Could not update bill {}: {error}", bill.id),
    });

    (
        HxRedirect(endpoints::BILLS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod submit_bill_tests {
    use std::{
        sync::{Arc, mpsc},
        time::Duration,
    };

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;

    use crate::{
        SessionUser, UserType,
        bill::{
            core::{Bill, BillStatus},
            fake_store::FakeBillStore,
            store::{BillStore, BillStoreState},
        },
        endpoints,
        test_utils::{assert_hx_redirect, parse_html_fragment},
    };

    use super::{NewBillForm, submit_bill};

    fn form(bill_id: Option<i64>) -> NewBillForm {
        NewBillForm {
            bill_type: "Transports".to_owned(),
            name: "Vol Paris Londres".to_owned(),
            date: "2022-01-01".to_owned(),
            amount: Some(348.0),
            vat: Some(70.0),
            pct: None,
            commentary: String::new(),
            bill_id,
            file_url: Some("https://localhost:3456/images/test.jpg".to_owned()),
            file_name: Some("test.jpg".to_owned()),
        }
    }

    fn employee() -> Extension<SessionUser> {
        Extension(SessionUser {
            user_type: UserType::Employee,
            email: "a@a".to_owned(),
        })
    }

    fn state_with_channel() -> (State<BillStoreState>, mpsc::Receiver<Bill>) {
        let (sender, receiver) = mpsc::channel();
        let bill_store: Arc<dyn BillStore> =
            Arc::new(FakeBillStore::default().with_update_sender(sender));

        (
            State(BillStoreState {
                bill_store: Some(bill_store),
            }),
            receiver,
        )
    }

    #[tokio::test]
    async fn submit_updates_bill_and_redirects_once() {
        let (state, updates) = state_with_channel();

        let response = submit_bill(state, employee(), Form(form(Some(12345)))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BILLS_VIEW);
        assert_eq!(response.headers().get_all("hx-redirect").iter().count(), 1);

        let bill = updates
            .recv_timeout(Duration::from_secs(5))
            .expect("The store was not updated");
        assert_eq!(bill.id, 12345);
        assert_eq!(bill.email, "a@a");
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.pct, Some(20));
        assert_eq!(bill.file_name.as_deref(), Some("test.jpg"));
    }

    #[tokio::test]
    async fn update_failure_still_redirects() {
        let bill_store: Arc<dyn BillStore> = Arc::new(FakeBillStore::failing("Erreur 500"));
        let state = State(BillStoreState {
            bill_store: Some(bill_store),
        });

        let response = submit_bill(state, employee(), Form(form(Some(1)))).await;

        assert_hx_redirect(&response, endpoints::BILLS_VIEW);
    }

    #[tokio::test]
    async fn submit_without_attachment_shows_alert() {
        let (state, updates) = state_with_channel();

        let response = submit_bill(state, employee(), Form(form(None))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get("hx-redirect").is_none());
        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Justificatif manquant"));
        assert!(updates.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn empty_numbers_deserialize_as_none() {
        let form: NewBillForm = serde_html_form::from_str(
            "type=Transports&name=&date=2022-01-01&amount=&vat=&pct=&commentary=&bill_id=3",
        )
        .unwrap();

        assert_eq!(form.amount, None);
        assert_eq!(form.pct, None);
        assert_eq!(form.bill_id, Some(3));
    }
}
