//! Assertions and helpers shared by the unit tests of the handlers.
#![allow(missing_docs)]

mod form;
mod html;
mod http;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    assert_alert_message, assert_valid_html, parse_html_document, parse_html_fragment,
};
pub(crate) use http::{assert_content_type, assert_hx_redirect, assert_status_ok, get_header};
