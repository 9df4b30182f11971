//! Detailed CSV reports with one row per purchased item.
//!
//! The files are laid out for spreadsheet apps set to pt-BR: semicolon
//! delimited, decimal commas and a byte order mark so the accents survive.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    alert::Notice,
    endpoints,
    html::format_decimal_comma,
    timezone::get_local_offset,
    transaction::{Transaction, TransactionType, format_quantity, get_transactions_for_user},
    user::UserID,
};

const UTF8_BOM: &str = "\u{FEFF}";

const HEADER: [&str; 10] = [
    "Data",
    "Transacao_Descricao",
    "Categoria",
    "Metodo",
    "Item_Nome",
    "Item_Qtd",
    "Item_Preco_Unit",
    "Item_Total",
    "Status",
    "Obs",
];

/// Write the transactions of `transaction_type` as CSV.
///
/// Itemized transactions produce one row per item. The rest produce a single
/// row with "N/A" as the item and the transaction amount as the price.
///
/// The description, item name and observations are always quoted. The
/// category is quoted only when it needs to be, the other columns never do.
///
/// Returns `Ok(None)` when there are no transactions of that type.
///
/// # Errors
/// Returns [Error::CsvError] if a record could not be written.
pub fn export_csv(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Result<Option<Vec<u8>>, Error> {
    let mut transactions = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .peekable();

    if transactions.peek().is_none() {
        return Ok(None);
    }

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.as_bytes().to_vec());

    writer.write_record(HEADER).map_err(csv_error)?;

    for transaction in transactions {
        let status = if transaction.is_paid {
            "Liquidado"
        } else {
            "Pendente"
        };
        let date = transaction.date.to_string();
        let description = quoted(&transaction.description);
        let category = quoted_if_needed(&transaction.category);
        let observations = quoted(&transaction.observations);

        if transaction.items.is_empty() {
            let amount = format_decimal_comma(transaction.amount);

            writer
                .write_record([
                    date.as_str(),
                    description.as_str(),
                    category.as_str(),
                    transaction.payment_type.as_str(),
                    "N/A",
                    "1",
                    amount.as_str(),
                    amount.as_str(),
                    status,
                    observations.as_str(),
                ])
                .map_err(csv_error)?;

            continue;
        }

        for item in &transaction.items {
            writer
                .write_record([
                    date.as_str(),
                    description.as_str(),
                    category.as_str(),
                    transaction.payment_type.as_str(),
                    quoted(&item.name).as_str(),
                    format_quantity(item.quantity).as_str(),
                    format_decimal_comma(item.price).as_str(),
                    format_decimal_comma(item.total).as_str(),
                    status,
                    observations.as_str(),
                ])
                .map_err(csv_error)?;
        }
    }

    writer
        .into_inner()
        .map(Some)
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// Wrap `text` in double quotes, doubling any quotes inside it.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn quoted_if_needed(text: &str) -> String {
    if text.contains([';', '"', '\n', '\r']) {
        quoted(text)
    } else {
        text.to_owned()
    }
}

fn csv_error(error: csv::Error) -> Error {
    Error::CsvError(error.to_string())
}

/// The name of the downloaded file, e.g. "Econo_Detalhado_Saidas_08-03-2025.csv".
pub fn export_file_name(transaction_type: TransactionType, today: Date) -> String {
    let kind = match transaction_type {
        TransactionType::Income => "Receitas",
        TransactionType::Expense => "Saidas",
    };

    format!(
        "Econo_Detalhado_{kind}_{:02}-{:02}-{}.csv",
        today.day(),
        u8::from(today.month()),
        today.year()
    )
}

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download the user's transactions of one type as a CSV file.
///
/// Redirects back to the dashboard with an info alert when there is nothing
/// to export.
pub async fn export_csv_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_type): Path<TransactionType>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_for_user(user_id, &connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let Some(csv) = export_csv(&transactions, transaction_type)? else {
        return Ok(Redirect::to(
            &Notice::SemDadosParaExportar.append_to(endpoints::DASHBOARD_VIEW),
        )
        .into_response());
    };

    tracing::debug!(
        "Exporting {} bytes of {transaction_type} transactions for user {user_id}",
        csv.len()
    );

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    export_file_name(transaction_type, today)
                ),
            ),
        ],
        csv,
    )
        .into_response())
}
