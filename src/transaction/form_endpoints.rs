//! Endpoints that re-render parts of the transaction form while it is being
//! filled in. Nothing is saved here.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;

use crate::{
    Error,
    transaction::{
        core::get_description_suggestions,
        create_endpoint::TransactionState,
        form::{ItemFields, TransactionForm},
        view::{amount_field, item_entry_row, item_row, transaction_fields},
    },
    user::UserID,
};

/// The submitted form as name/value pairs, in order.
///
/// Repeated fields such as `item_name` rule out deserializing into a struct.
type FormFields = Vec<(String, String)>;

/// Render one item row from the item entry inputs for htmx to append to the
/// item table.
///
/// The response also replaces the amount with the new item sum, clears the
/// entry inputs and removes the empty table placeholder.
pub async fn add_item_endpoint(Form(fields): Form<FormFields>) -> Response {
    let mut entry = ItemFields {
        is_necessary: true,
        ..Default::default()
    };
    let mut form_fields = Vec::with_capacity(fields.len());

    for (name, value) in fields {
        match name.as_str() {
            "new_item_name" => entry.name = value,
            "new_item_price" => entry.price = value,
            "new_item_quantity" => entry.quantity = value,
            "new_item_necessary" => entry.is_necessary = value != "nao",
            _ => form_fields.push((name, value)),
        }
    }

    let Some(item) = entry.to_item() else {
        return Error::InvalidForm("Informe o nome e o preço do item.".to_owned())
            .into_alert_response();
    };

    let mut form = match TransactionForm::from_fields(form_fields) {
        Ok(form) => form,
        Err(error) => {
            tracing::warn!("could not read transaction form: {error}");
            return error.into_alert_response();
        }
    };
    form.items.push(ItemFields::from(&item));

    html! {
        (item_row(&item))
        (amount_field(&form, true))
        (item_entry_row(true))
        tr id="no-items" hx-swap-oob="delete" {}
    }
    .into_response()
}

/// Re-render the form fields after the transaction type, boleto flag or
/// payment type changed, applying the rules for the new mode.
pub async fn refresh_form_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(fields): Form<FormFields>,
) -> Response {
    let mut form = match TransactionForm::from_fields(fields) {
        Ok(form) => form,
        Err(error) => {
            tracing::warn!("could not read transaction form: {error}");
            return error.into_alert_response();
        }
    };
    form.normalize();

    if form.is_boleto && form.due_date.is_empty() {
        form.due_date = form.date.clone();
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
