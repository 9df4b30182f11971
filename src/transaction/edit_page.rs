//! Defines the route handler for the page for editing a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::TransactionId,
    preferences::get_preferences,
    transaction::{
        core::{get_description_suggestions, get_transaction},
        create_endpoint::TransactionState,
        form::TransactionForm,
        view::{FormAction, transaction_form_page},
    },
    user::UserID,
};

/// Renders the transaction form filled with the transaction `transaction_id`.
///
/// Another user's transaction renders the 404 page.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user_id, &connection)?;
    let suggestions =
        get_description_suggestions(user_id, transaction.transaction_type, &connection)?;
    let preferences = get_preferences(user_id, &connection)?;

    Ok(transaction_form_page(
        &TransactionForm::from(&transaction),
        &suggestions,
        FormAction::Edit(transaction.id),
        preferences,
        None,
    )
    .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_hx_endpoint, assert_valid_html, create_other_user, create_test_user,
            get_input_value, get_test_connection, must_get_form, parse_html_document,
            select_text,
        },
        transaction::{
            core::{NewTransaction, TransactionItem, TransactionType, create_transaction},
            create_endpoint::TransactionState,
        },
    };

    use super::get_edit_transaction_page;

    #[tokio::test]
    async fn renders_form_with_transaction_values() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let transaction = create_transaction(
            user.id,
            NewTransaction::build(TransactionType::Expense, 0.0, date!(2025 - 02 - 20), "Feira")
                .items(vec![TransactionItem::new("banana", 6.0, 1.5, true)]),
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_transaction_page(
            State(state),
            Extension(user.id),
            Path(transaction.id),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION, transaction.id),
            "hx-put",
        );
        assert_eq!(get_input_value(&form, "description"), "Feira");
        assert_eq!(get_input_value(&form, "date"), "2025-02-20");
        assert_eq!(get_input_value(&form, "amount"), "9.00");
        assert_eq!(get_input_value(&form, "item_name"), "BANANA");
        assert_eq!(select_text(&html, "h2"), ["Editar Registro"]);
    }

    #[tokio::test]
    async fn boleto_shows_due_date_without_prefix() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let mut boleto =
            NewTransaction::build(TransactionType::Expense, 150.0, date!(2025 - 02 - 20), "Luz")
                .category("Boleto");
        boleto.observations = "Vencimento: 2025-02-25. Conta de fevereiro".to_owned();
        let transaction = create_transaction(user.id, boleto, &connection).unwrap();
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_transaction_page(
            State(state),
            Extension(user.id),
            Path(transaction.id),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html);
        assert_eq!(get_input_value(&form, "due_date"), "2025-02-25");
        assert_eq!(select_text(&html, "textarea"), ["Conta de fevereiro"]);
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_found() {
        let connection = get_test_connection();
        let user = create_test_user(&connection);
        let other_user = create_other_user(&connection);
        let transaction = create_transaction(
            user.id,
            NewTransaction::build(TransactionType::Income, 10.0, date!(2025 - 02 - 20), "Pix"),
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_transaction_page(
            State(state),
            Extension(other_user.id),
            Path(transaction.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
