use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        got, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    let selector = Selector::parse(&format!("input[name=\"{name}\"]")).unwrap();

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

/// Assert that the form has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);
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

/// Assert that the form has an input called `name` of type `type_` that may be
/// left blank.
#[track_caller]
pub(crate) fn assert_optional_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);
    let input_type = input.value().attr("type").unwrap_or_default();

    assert_eq!(
        input_type, type_,
        "want input {name} with type \"{type_}\", got {input_type:?}"
    );
    assert!(
        input.value().attr("required").is_none(),
        "want input with name {name} to be optional but it is required"
    );
}

/// The value of the input called `name`, or an empty string when unset.
#[track_caller]
pub(crate) fn get_input_value(form: &ElementRef<'_>, name: &str) -> String {
    must_get_input(form, name)
        .value()
        .attr("value")
        .unwrap_or_default()
        .to_owned()
}

/// The value of the selected option of the select called `name`.
#[track_caller]
pub(crate) fn get_selected_option(form: &ElementRef<'_>, name: &str) -> String {
    let selector = Selector::parse(&format!("select[name=\"{name}\"] option[selected]")).unwrap();

    form.select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No selected option for select \"{name}\""))
        .value()
        .attr("value")
        .unwrap_or_default()
        .to_owned()
}
