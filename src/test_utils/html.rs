use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

use super::http::read_body;

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = read_body(response).await;

    Html::parse_document(&String::from_utf8_lossy(&body))
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    let body = read_body(response).await;

    Html::parse_fragment(&String::from_utf8_lossy(&body))
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The trimmed text of every element matching `selector`.
#[track_caller]
pub(crate) fn select_text(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).expect("Invalid selector");

    html.select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .collect()
}

/// The message of the alert in `#alert-container`, if any.
#[track_caller]
pub(crate) fn get_alert_message(html: &Html) -> Option<String> {
    select_text(html, "#alert-container [role=alert] p")
        .into_iter()
        .next()
}
