//! Defines the endpoint for updating a transaction.

use axum::{
    Extension,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    alert::Notice,
    database_id::TransactionId,
    endpoints,
    transaction::{
        core::update_transaction, create_endpoint::TransactionState, form::TransactionForm,
    },
    user::UserID,
};

/// A route handler for replacing a transaction with the submitted form,
/// redirects to the dashboard on success.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    multipart: Multipart,
) -> Response {
    let draft = match TransactionForm::from_multipart(multipart)
        .await
        .and_then(TransactionForm::into_draft)
    {
        Ok(draft) => draft,
        Err(error) => {
            tracing::warn!("rejected form for transaction {transaction_id}: {error}");
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

    match update_transaction(transaction_id, user_id, draft, &connection) {
        Ok(_) => (
            HxRedirect(Notice::TransacaoSalva.append_to(endpoints::DASHBOARD_VIEW)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
