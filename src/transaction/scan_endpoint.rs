//! The endpoint that fills the transaction form from a photo of a receipt.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Multipart, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    receipt_scanner::ReceiptScanner,
    transaction::{
        core::get_description_suggestions, form::TransactionForm, view::transaction_fields,
    },
    user::UserID,
};

/// The state needed to scan receipts.
#[derive(Clone)]
pub struct ScanReceiptState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub receipt_scanner: Arc<dyn ReceiptScanner>,
}

impl FromRef<AppState> for ScanReceiptState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            receipt_scanner: state.receipt_scanner.clone(),
        }
    }
}

/// Read the receipt in the `scan_image` field and re-render the form fields
/// with what was read merged into the submitted values.
///
/// If the scan fails the form on the page is left as it was.
pub async fn scan_receipt_endpoint(
    State(state): State<ScanReceiptState>,
    Extension(user_id): Extension<UserID>,
    multipart: Multipart,
) -> Response {
    let mut form = match TransactionForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(error) => {
            tracing::warn!("could not read transaction form: {error}");
            return error.into_alert_response();
        }
    };

    let Some(image) = form.scan_image.take() else {
        return Error::InvalidForm("Selecione a foto do cupom fiscal.".to_owned())
            .into_alert_response();
    };

    match state
        .receipt_scanner
        .scan(&image.bytes, &image.mime_type)
        .await
    {
        Ok(receipt) => receipt.merge_into(&mut form),
        Err(error) => {
            tracing::error!("could not scan receipt for user {user_id}: {error}");
            return error.into_alert_response();
        }
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match get_description_suggestions(user_id, form.transaction_type, &connection) {
        Ok(suggestions) => transaction_fields(&form, &suggestions).into_response(),
        Err(error) => {
            tracing::error!("could not get description suggestions: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        Error,
        receipt_scanner::{ReceiptScanner, ScannedItem, ScannedReceipt, UnavailableReceiptScanner},
        test_utils::{
            FormPart, create_test_user, get_alert_message, get_test_connection,
            must_make_multipart, parse_html_fragment,
        },
        user::UserID,
    };

    use super::{ScanReceiptState, scan_receipt_endpoint};

    struct StubScanner(ScannedReceipt);

    #[async_trait]
    impl ReceiptScanner for StubScanner {
        async fn scan(&self, image: &[u8], mime_type: &str) -> Result<ScannedReceipt, Error> {
            assert_eq!(image, b"foto");
            assert_eq!(mime_type, "image/jpeg");
            Ok(self.0.clone())
        }
    }

    fn get_test_state(scanner: Arc<dyn ReceiptScanner>) -> (ScanReceiptState, UserID) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);

        (
            ScanReceiptState {
                db_connection: Arc::new(Mutex::new(connection)),
                receipt_scanner: scanner,
            },
            user.id,
        )
    }

    fn input_value(html: &scraper::Html, name: &str) -> Option<String> {
        html.select(&Selector::parse(&format!("input[name={name}]")).unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn merges_scanned_receipt_into_form() {
        let (state, user_id) = get_test_state(Arc::new(StubScanner(ScannedReceipt {
            date: Some("2025-03-08".to_owned()),
            time: None,
            description: Some("Padaria Pão Quente".to_owned()),
            total_amount: Some(18.5),
            items: vec![ScannedItem {
                name: "pão francês".to_owned(),
                price: 0.75,
                quantity: 10.0,
                total: 7.5,
            }],
        })));
        let multipart = must_make_multipart(&[
            FormPart::Text("transaction_type", "saida"),
            FormPart::Text("description", ""),
            FormPart::Text("date", "2025-03-10"),
            FormPart::Text("time", "09:00"),
            FormPart::Text("payment_type", "pix"),
            FormPart::File {
                name: "scan_image",
                content_type: "image/jpeg",
                bytes: b"foto",
            },
        ])
        .await;

        let response = scan_receipt_endpoint(State(state), Extension(user_id), multipart).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            input_value(&html, "description").as_deref(),
            Some("Padaria Pão Quente")
        );
        assert_eq!(input_value(&html, "date").as_deref(), Some("2025-03-08"));
        assert_eq!(input_value(&html, "time").as_deref(), Some("09:00"));
        assert_eq!(input_value(&html, "item_name").as_deref(), Some("PÃO FRANCÊS"));
    }

    #[tokio::test]
    async fn failed_scan_shows_error_alert() {
        let (state, user_id) = get_test_state(Arc::new(UnavailableReceiptScanner));
        let multipart = must_make_multipart(&[
            FormPart::Text("transaction_type", "saida"),
            FormPart::File {
                name: "scan_image",
                content_type: "image/jpeg",
                bytes: b"foto",
            },
        ])
        .await;

        let response = scan_receipt_endpoint(State(state), Extension(user_id), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        assert_eq!(get_alert_message(&html).as_deref(), Some("Erro na IA."));
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let (state, user_id) = get_test_state(Arc::new(UnavailableReceiptScanner));
        let multipart =
            must_make_multipart(&[FormPart::Text("transaction_type", "saida")]).await;

        let response = scan_receipt_endpoint(State(state), Extension(user_id), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
