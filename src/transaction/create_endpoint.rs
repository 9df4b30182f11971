//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Notice,
    endpoints,
    transaction::{core::create_transaction, form::TransactionForm},
    user::UserID,
};

/// The state needed to create, update or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to the
/// dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    multipart: Multipart,
) -> Response {
    let draft = match TransactionForm::from_multipart(multipart)
        .await
        .and_then(TransactionForm::into_draft)
    {
        Ok(draft) => draft,
        Err(error) => {
            tracing::warn!("rejected transaction form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(user_id, draft, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "User {user_id} recorded transaction {} with {} items",
                transaction.id,
                transaction.items.len()
            );
            (
                HxRedirect(Notice::TransacaoSalva.append_to(endpoints::DASHBOARD_VIEW)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        test_utils::{
            FormPart, assert_hx_redirect, create_test_user, get_alert_message,
            get_test_connection, must_make_multipart, parse_html_fragment,
        },
        transaction::core::{PaymentType, TransactionType, count_items, get_transactions_for_user},
    };

    use super::{TransactionState, create_transaction_endpoint};

    fn get_test_state() -> (TransactionState, crate::user::UserID) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);

        (
            TransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn creates_itemized_expense_with_computed_amount() {
        let (state, user_id) = get_test_state();
        let multipart = must_make_multipart(&[
            FormPart::Text("transaction_type", "saida"),
            FormPart::Text("description", "Supermercado"),
            FormPart::Text("amount", "999"),
            FormPart::Text("category", "Alimentação"),
            FormPart::Text("date", "2025-03-10"),
            FormPart::Text("time", "18:30"),
            FormPart::Text("payment_type", "débito"),
            FormPart::Text("account", "Nubank"),
            FormPart::Text("is_paid", "true"),
            FormPart::Text("item_name", "arroz"),
            FormPart::Text("item_price", "25,90"),
            FormPart::Text("item_quantity", "2"),
            FormPart::Text("item_necessary", "sim"),
            FormPart::Text("item_name", "chocolate"),
            FormPart::Text("item_price", "8.50"),
            FormPart::Text("item_quantity", ""),
            FormPart::Text("item_necessary", "nao"),
            FormPart::File {
                name: "receipt_image",
                content_type: "application/octet-stream",
                bytes: b"",
            },
        ])
        .await;

        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user_id), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/dashboard?alerta=transacao_salva");

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_for_user(user_id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0];
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.amount, 25.90 * 2.0 + 8.50);
        assert_eq!(transaction.payment_type, PaymentType::Debit);
        assert_eq!(transaction.account, "Nubank");
        assert!(transaction.is_paid);
        assert!(!transaction.is_recurring);
        assert_eq!(transaction.items[0].name, "ARROZ");
        assert!(!transaction.items[1].is_necessary);
        assert_eq!(transaction.receipt_url, None);
        assert_eq!(count_items(&connection).unwrap(), 2);
    }

    #[tokio::test]
    async fn stores_receipt_image_as_data_url() {
        let (state, user_id) = get_test_state();
        let multipart = must_make_multipart(&[
            FormPart::Text("transaction_type", "saida"),
            FormPart::Text("amount", "12.00"),
            FormPart::Text("date", "2025-03-10"),
            FormPart::Text("time", "08:00"),
            FormPart::Text("payment_type", "dinheiro"),
            FormPart::Text("account", "Nubank"),
            FormPart::File {
                name: "receipt_image",
                content_type: "image/png",
                bytes: b"abc",
            },
        ])
        .await;

        create_transaction_endpoint(State(state.clone()), Extension(user_id), multipart).await;

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transactions_for_user(user_id, &connection)
            .unwrap()
            .remove(0);
        assert_eq!(
            transaction.receipt_url.as_deref(),
            Some("data:image/png;base64,YWJj")
        );
        assert_eq!(transaction.account, "", "cash payments have no account");
    }

    #[tokio::test]
    async fn invalid_date_shows_alert_and_saves_nothing() {
        let (state, user_id) = get_test_state();
        let multipart = must_make_multipart(&[
            FormPart::Text("transaction_type", "entrada"),
            FormPart::Text("amount", "100"),
            FormPart::Text("date", "10/03/2025"),
            FormPart::Text("time", "08:00"),
        ])
        .await;

        let response =
            create_transaction_endpoint(State(state.clone()), Extension(user_id), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            get_alert_message(&html).as_deref(),
            Some("Erro ao processar.")
        );
        let connection = state.db_connection.lock().unwrap();
        assert!(
            get_transactions_for_user(user_id, &connection)
                .unwrap()
                .is_empty()
        );
    }
}
