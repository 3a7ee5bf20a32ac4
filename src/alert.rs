//! Alert system for displaying error messages to users.
//!
//! Alerts are rendered as an out-of-band swap that replaces the
//! `#alert-container` element of the base page, so they can be returned on
//! their own or alongside another fragment.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An alert message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error message with details.
    Error { message: String, details: String },
    /// An error message without details.
    ErrorSimple { message: String },
}

const ERROR_STYLE: &str = "p-4 rounded-lg shadow-lg border text-red-800 bg-red-50 \
    border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::ErrorSimple { message } => (message, None),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(ERROR_STYLE) role="alert"
                {
                    div class="flex items-start justify-between gap-4"
                    {
                        div
                        {
                            p class="text-sm font-medium" { (message) }

                            @if let Some(details) = details.filter(|details| !details.is_empty()) {
                                p class="mt-1 text-sm opacity-80" { (details) }
                            }
                        }

                        button
                            type="button"
                            aria-label="Dismiss"
                            class="text-sm font-semibold opacity-70 hover:opacity-100"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "×"
                        }
                    }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{alert::Alert, test_utils::assert_alert_message};

    #[test]
    fn error_alert_renders_message_and_details() {
        let html = Alert::Error {
            message: "Could not update bill".to_owned(),
            details: "The bill could not be found.".to_owned(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&html);
        assert_alert_message(&html, "Could not update bill");
        let details = html
            .select(&Selector::parse("p.mt-1.text-sm.opacity-80").unwrap())
            .next()
            .expect("No alert details found")
            .text()
            .collect::<String>();
        assert_eq!(details.trim(), "The bill could not be found.");
    }

    #[test]
    fn simple_alert_has_no_details() {
        let html = Alert::ErrorSimple {
            message: "Format de fichier non valide".to_owned(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&html);
        assert_alert_message(&html, "Format de fichier non valide");
        assert!(
            html.select(&Selector::parse("p.mt-1").unwrap())
                .next()
                .is_none()
        );
    }
}
