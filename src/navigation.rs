//! The vertical navigation bar on the left of every page behind log in.

use maud::{Markup, PreEscaped, html};

use crate::{UserType, endpoints};

// Icons adapted from https://heroicons.com/
const WINDOW_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor" class="w-7 h-7"><path stroke-linecap="round" stroke-linejoin="round" d="M3 8.25V18a2.25 2.25 0 0 0 2.25 2.25h13.5A2.25 2.25 0 0 0 21 18V8.25m-18 0V6a2.25 2.25 0 0 1 2.25-2.25h13.5A2.25 2.25 0 0 1 21 6v2.25m-18 0h18"/></svg>"#;
const MAIL_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor" class="w-7 h-7"><path stroke-linecap="round" stroke-linejoin="round" d="M21.75 6.75v10.5a2.25 2.25 0 0 1-2.25 2.25h-15a2.25 2.25 0 0 1-2.25-2.25V6.75m19.5 0A2.25 2.25 0 0 0 19.5 4.5h-15a2.25 2.25 0 0 0-2.25 2.25m19.5 0v.243a2.25 2.25 0 0 1-1.07 1.916l-7.5 4.615a2.25 2.25 0 0 1-2.36 0L3.32 8.91a2.25 2.25 0 0 1-1.07-1.916V6.75"/></svg>"#;
const LOG_OUT_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="1.5" stroke="currentColor" class="w-7 h-7"><path stroke-linecap="round" stroke-linejoin="round" d="M15.75 9V5.25A2.25 2.25 0 0 0 13.5 3h-6a2.25 2.25 0 0 0-2.25 2.25v13.5A2.25 2.25 0 0 0 7.5 21h6a2.25 2.25 0 0 0 2.25-2.25V15m3 0 3-3m0 0-3-3m3 3H9"/></svg>"#;

/// An icon link in the navigation bar.
///
/// Only one link should be current at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    test_id: &'a str,
    icon: &'static str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "active-icon flex items-center justify-center w-12 h-12 rounded-lg \
            text-white bg-blue-700 dark:bg-blue-600"
        } else {
            "flex items-center justify-center w-12 h-12 rounded-lg text-gray-400 \
            hover:text-white hover:bg-gray-700"
        };

        html!(
            a
                href=(self.url)
                title=(self.title)
                data-testid=(self.test_id)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (PreEscaped(self.icon))
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar for a user of type `user_type`.
    ///
    /// Employees get the links to their bills and to the new bill form. If a
    /// link matches `active_endpoint`, then that link is marked as current.
    /// Every user gets the log out link.
    pub fn new(active_endpoint: &str, user_type: UserType) -> NavBar<'_> {
        let mut links = Vec::new();

        if user_type == UserType::Employee {
            links.push(Link {
                url: endpoints::BILLS_VIEW,
                title: "Mes notes de frais",
                test_id: "icon-window",
                icon: WINDOW_ICON,
                is_current: active_endpoint == endpoints::BILLS_VIEW,
            });
            links.push(Link {
                url: endpoints::NEW_BILL_VIEW,
                title: "Nouvelle note de frais",
                test_id: "icon-mail",
                icon: MAIL_ICON,
                is_current: active_endpoint == endpoints::NEW_BILL_VIEW,
            });
        }

        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "Se déconnecter",
            test_id: "layout-disconnect",
            icon: LOG_OUT_ICON,
            is_current: false,
        });

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav
                class="fixed inset-y-0 left-0 z-40 flex flex-col items-center w-20
                    py-6 gap-6 bg-gray-900 dark:bg-gray-950"
                aria-label="Primary"
            {
                span class="text-lg font-semibold text-white" { "Billed" }

                @for link in self.links {
                    (link.into_html())
                }
            }
        )
    }
}
