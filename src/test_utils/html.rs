use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Check that `html` contains an alert whose main message is `want_message`.
#[track_caller]
pub(crate) fn assert_alert_message(html: &Html, want_message: &str) {
    let selector = Selector::parse("#alert-container [role=\"alert\"] p.text-sm.font-medium")
        .unwrap();
    let message = html
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No alert found in {}", html.html()))
        .text()
        .collect::<String>();

    assert_eq!(message.trim(), want_message);
}
