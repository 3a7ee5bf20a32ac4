use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

/// Check that `element` sends its request to `endpoint` with the htmx `attribute`, e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_endpoint(element: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = element
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        got, endpoint,
        "want element with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// Check that `form` has a required input named `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let selector = Selector::parse(&format!("input[name=\"{name}\"]")).unwrap();
    let input = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""));

    let input_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(
        input_type, type_,
        "want input {name} with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

/// Check the text of the first paragraph in `form`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let error_message = form
        .select(&Selector::parse("p").unwrap())
        .next()
        .expect("No error message found")
        .text()
        .collect::<String>();

    assert_eq!(want_error_message, error_message.trim());
}
