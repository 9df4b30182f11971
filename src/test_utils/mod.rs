#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod multipart;

pub(crate) use db::{TEST_PASSWORD, create_other_user, create_test_user, get_test_connection};
pub(crate) use form::{
    assert_form_input, assert_hx_endpoint, assert_optional_form_input, get_input_value,
    get_selected_option, must_get_form,
};
pub(crate) use html::{
    assert_valid_html, get_alert_message, parse_html_document, parse_html_fragment, select_text,
};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, assert_redirect, get_header, read_body,
};
pub(crate) use multipart::{FormPart, multipart_body, multipart_content_type, must_make_multipart};
