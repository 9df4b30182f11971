//! Defines the core data models and database queries for transactions.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money earned, "entrada".
    #[serde(rename = "entrada")]
    Income,
    /// Money spent, "saida".
    #[default]
    #[serde(rename = "saida")]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "entrada",
            TransactionType::Expense => "saida",
        }
    }

    /// The name shown on buttons and headings.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Receita",
            TransactionType::Expense => "Despesa",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(TransactionType::Income),
            "saida" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidForm(format!(
                "tipo de transação desconhecido \"{other}\""
            ))),
        }
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[default]
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "dinheiro")]
    Cash,
    #[serde(rename = "crédito")]
    Credit,
    #[serde(rename = "débito")]
    Debit,
}

impl PaymentType {
    pub const ALL: [PaymentType; 4] = [
        PaymentType::Pix,
        PaymentType::Cash,
        PaymentType::Credit,
        PaymentType::Debit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Pix => "pix",
            PaymentType::Cash => "dinheiro",
            PaymentType::Credit => "crédito",
            PaymentType::Debit => "débito",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Pix => "PIX",
            PaymentType::Cash => "DINHEIRO",
            PaymentType::Credit => "CRÉDITO",
            PaymentType::Debit => "DÉBITO",
        }
    }

    /// Whether the bank or wallet the money moved through is worth recording.
    pub fn shows_account(&self) -> bool {
        !matches!(self, PaymentType::Cash)
    }
}

impl FromStr for PaymentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pix" => Ok(PaymentType::Pix),
            "dinheiro" => Ok(PaymentType::Cash),
            "crédito" => Ok(PaymentType::Credit),
            "débito" => Ok(PaymentType::Debit),
            other => Err(Error::InvalidForm(format!(
                "forma de pagamento desconhecida \"{other}\""
            ))),
        }
    }
}

/// One line of an itemized expense, e.g. a product on a supermarket receipt.
///
/// Items belong to exactly one transaction and are stored in the order they
/// were entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub name: String,
    /// The unit price.
    pub price: f64,
    pub quantity: f64,
    /// `price * quantity`.
    pub total: f64,
    /// Whether the item was a necessity rather than a treat.
    pub is_necessary: bool,
}

impl TransactionItem {
    /// Create an item, uppercasing the name and computing the total.
    pub fn new(name: &str, price: f64, quantity: f64, is_necessary: bool) -> Self {
        Self {
            name: name.trim().to_uppercase(),
            price,
            quantity,
            total: price * quantity,
            is_necessary,
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    pub transaction_type: TransactionType,
    /// The value of the transaction in reais. Always positive, the direction
    /// is given by `transaction_type`.
    pub amount: f64,
    pub date: Date,
    /// The time of day as "HH:MM".
    pub time: String,
    pub description: String,
    pub category: String,
    pub payment_type: PaymentType,
    /// The bank or wallet, empty when paid with cash.
    pub account: String,
    /// Paid transactions are "Liquidado", the rest are "Pendente".
    pub is_paid: bool,
    pub is_recurring: bool,
    pub items: Vec<TransactionItem>,
    pub observations: String,
    /// The receipt image as a `data:` URL.
    pub receipt_url: Option<String>,
}

/// The data needed to create or replace a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub date: Date,
    pub time: String,
    pub description: String,
    pub category: String,
    pub payment_type: PaymentType,
    pub account: String,
    pub is_paid: bool,
    pub is_recurring: bool,
    pub items: Vec<TransactionItem>,
    pub observations: String,
    pub receipt_url: Option<String>,
}

impl NewTransaction {
    /// An unitemized transaction with the defaults of the new transaction form.
    pub fn build(
        transaction_type: TransactionType,
        amount: f64,
        date: Date,
        description: &str,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            date,
            time: "12:00".to_owned(),
            description: description.to_owned(),
            category: match transaction_type {
                TransactionType::Income => "Receita".to_owned(),
                TransactionType::Expense => "Outros".to_owned(),
            },
            payment_type: PaymentType::Pix,
            account: "PicPay".to_owned(),
            is_paid: true,
            is_recurring: false,
            items: Vec::new(),
            observations: String::new(),
            receipt_url: None,
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    pub fn time(mut self, time: &str) -> Self {
        self.time = time.to_owned();
        self
    }

    pub fn is_paid(mut self, is_paid: bool) -> Self {
        self.is_paid = is_paid;
        self
    }

    pub fn payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = payment_type;
        self
    }

    /// Set the items and make the amount their sum.
    pub fn items(mut self, items: Vec<TransactionItem>) -> Self {
        self.amount = items.iter().map(|item| item.total).sum();
        self.items = items;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction and transaction item tables in the database.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                payment_type TEXT NOT NULL,
                account TEXT NOT NULL,
                is_paid INTEGER NOT NULL,
                is_recurring INTEGER NOT NULL,
                observations TEXT NOT NULL,
                receipt_url TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_item (
                id INTEGER PRIMARY KEY,
                transaction_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                quantity REAL NOT NULL,
                total REAL NOT NULL,
                is_necessary INTEGER NOT NULL,
                FOREIGN KEY(transaction_id) REFERENCES \"transaction\"(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the dashboard, which lists a user's transactions newest first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date, time);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_item_transaction ON transaction_item(transaction_id, position);",
        (),
    )?;

    Ok(())
}

const TRANSACTION_COLUMNS: &str = "id, user_id, type, amount, date, time, description, category, \
    payment_type, account, is_paid, is_recurring, observations, receipt_url";

fn parse_column<T: FromStr<Err = Error>>(
    row: &Row,
    index: usize,
) -> Result<T, rusqlite::Error> {
    let raw: String = row.get(index)?;

    raw.parse()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Map a database row to a [Transaction] without its items.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        transaction_type: parse_column(row, 2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        description: row.get(6)?,
        category: row.get(7)?,
        payment_type: parse_column(row, 8)?,
        account: row.get(9)?,
        is_paid: row.get(10)?,
        is_recurring: row.get(11)?,
        items: Vec::new(),
        observations: row.get(12)?,
        receipt_url: row.get(13)?,
    })
}

fn map_item_row(row: &Row) -> Result<(TransactionId, TransactionItem), rusqlite::Error> {
    Ok((
        row.get(0)?,
        TransactionItem {
            name: row.get(1)?,
            price: row.get(2)?,
            quantity: row.get(3)?,
            total: row.get(4)?,
            is_necessary: row.get(5)?,
        },
    ))
}

fn insert_items(
    transaction_id: TransactionId,
    items: &[TransactionItem],
    connection: &Connection,
) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "INSERT INTO transaction_item
            (transaction_id, position, name, price, quantity, total, is_necessary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for (position, item) in items.iter().enumerate() {
        statement.execute((
            transaction_id,
            position as i64,
            &item.name,
            item.price,
            item.quantity,
            item.total,
            item.is_necessary,
        ))?;
    }

    Ok(())
}

fn get_items(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Vec<TransactionItem>, Error> {
    connection
        .prepare(
            "SELECT transaction_id, name, price, quantity, total, is_necessary
             FROM transaction_item WHERE transaction_id = :id ORDER BY position",
        )?
        .query_map(&[(":id", &transaction_id)], map_item_row)?
        .map(|row| row.map(|(_, item)| item).map_err(Error::from))
        .collect()
}

/// Create a new transaction for `user_id`, along with its items.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let mut transaction = sql_transaction
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, type, amount, date, time, description, \
                category, payment_type, account, is_paid, is_recurring, observations, receipt_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                user_id.as_i64(),
                new_transaction.transaction_type.as_str(),
                new_transaction.amount,
                new_transaction.date,
                new_transaction.time,
                new_transaction.description,
                new_transaction.category,
                new_transaction.payment_type.as_str(),
                new_transaction.account,
                new_transaction.is_paid,
                new_transaction.is_recurring,
                new_transaction.observations,
                new_transaction.receipt_url,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })?;

    insert_items(transaction.id, &new_transaction.items, &sql_transaction)?;
    sql_transaction.commit()?;

    transaction.items = new_transaction.items;

    Ok(transaction)
}

/// Retrieve the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction of `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((id, user_id.as_i64()), map_transaction_row)?;

    transaction.items = get_items(id, connection)?;

    Ok(transaction)
}

/// Get every transaction of `user_id`, newest first.
///
/// Transactions are ordered by date and then time, both descending.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut transactions = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = :user_id
             ORDER BY date DESC, time DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut items_by_transaction: HashMap<TransactionId, Vec<TransactionItem>> = HashMap::new();
    let mut statement = connection.prepare(
        "SELECT item.transaction_id, item.name, item.price, item.quantity, item.total, item.is_necessary
         FROM transaction_item item
         INNER JOIN \"transaction\" t ON t.id = item.transaction_id
         WHERE t.user_id = :user_id
         ORDER BY item.transaction_id, item.position",
    )?;

    for row in statement.query_map(&[(":user_id", &user_id.as_i64())], map_item_row)? {
        let (transaction_id, item) = row?;
        items_by_transaction
            .entry(transaction_id)
            .or_default()
            .push(item);
    }

    for transaction in &mut transactions {
        if let Some(items) = items_by_transaction.remove(&transaction.id) {
            transaction.items = items;
        }
    }

    Ok(transactions)
}

/// Replace the fields and items of the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction of `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    update: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let rows_affected = sql_transaction.execute(
        "UPDATE \"transaction\"
         SET type = ?1, amount = ?2, date = ?3, time = ?4, description = ?5, category = ?6,
             payment_type = ?7, account = ?8, is_paid = ?9, is_recurring = ?10,
             observations = ?11, receipt_url = ?12
         WHERE id = ?13 AND user_id = ?14",
        rusqlite::params![
            update.transaction_type.as_str(),
            update.amount,
            update.date,
            update.time,
            update.description,
            update.category,
            update.payment_type.as_str(),
            update.account,
            update.is_paid,
            update.is_recurring,
            update.observations,
            update.receipt_url,
            id,
            user_id.as_i64(),
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    sql_transaction.execute(
        "DELETE FROM transaction_item WHERE transaction_id = ?1",
        [id],
    )?;
    insert_items(id, &update.items, &sql_transaction)?;
    sql_transaction.commit()?;

    get_transaction(id, user_id, connection)
}

/// Delete the transaction `id` owned by `user_id` and its items.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction of `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::DeleteMissingTransaction),
        _ => Ok(()),
    }
}

/// The distinct, non-blank descriptions `user_id` has used for
/// `transaction_type`, for autocompleting the description field.
pub fn get_description_suggestions(
    user_id: UserID,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<Vec<String>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT description FROM \"transaction\"
             WHERE user_id = ?1 AND type = ?2 AND TRIM(description) != ''
             ORDER BY description",
        )?
        .query_map((user_id.as_i64(), transaction_type.as_str()), |row| {
            row.get(0)
        })?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Get the number of items stored for all transactions.
#[cfg(test)]
pub fn count_items(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transaction_item;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{create_other_user, create_test_user, get_test_connection},
        user::UserID,
    };

    use super::{
        NewTransaction, PaymentType, TransactionItem, TransactionType, count_items,
        create_transaction, delete_transaction, get_description_suggestions, get_transaction,
        get_transactions_for_user, update_transaction,
    };

    fn itemized_expense() -> NewTransaction {
        NewTransaction::build(TransactionType::Expense, 0.0, date!(2025 - 03 - 14), "Mercado")
            .category("Alimentação")
            .items(vec![
                TransactionItem::new("arroz", 25.9, 2.0, true),
                TransactionItem::new("chocolate", 7.5, 1.0, false),
            ])
    }

    #[test]
    fn create_succeeds_with_items() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);

        let transaction = create_transaction(user.id, itemized_expense(), &conn).unwrap();

        assert_eq!(transaction.user_id, user.id);
        assert_eq!(transaction.amount, 25.9 * 2.0 + 7.5);
        assert_eq!(transaction.items.len(), 2);
        assert_eq!(transaction.items[0].name, "ARROZ");
        assert_eq!(
            get_transaction(transaction.id, user.id, &conn).unwrap(),
            transaction
        );
    }

    #[test]
    fn create_fails_for_unknown_user() {
        let conn = get_test_connection();

        let result = create_transaction(
            UserID::new(42),
            NewTransaction::build(TransactionType::Income, 10.0, date!(2025 - 03 - 14), ""),
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_hides_other_users_transactions() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let other_user = create_other_user(&conn);
        let transaction = create_transaction(user.id, itemized_expense(), &conn).unwrap();

        let result = get_transaction(transaction.id, other_user.id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_is_ordered_by_date_then_time_descending() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let other_user = create_other_user(&conn);
        let entries = [
            (date!(2025 - 03 - 01), "09:00", "A"),
            (date!(2025 - 03 - 02), "08:00", "B"),
            (date!(2025 - 03 - 02), "18:30", "C"),
            (date!(2025 - 02 - 28), "23:59", "D"),
        ];
        for (date, time, description) in entries {
            create_transaction(
                user.id,
                NewTransaction::build(TransactionType::Expense, 1.0, date, description).time(time),
                &conn,
            )
            .unwrap();
        }
        create_transaction(
            other_user.id,
            NewTransaction::build(TransactionType::Expense, 1.0, date!(2025 - 03 - 03), "E"),
            &conn,
        )
        .unwrap();

        let descriptions = get_transactions_for_user(user.id, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.description)
            .collect::<Vec<_>>();

        assert_eq!(descriptions, ["C", "B", "A", "D"]);
    }

    #[test]
    fn list_attaches_items_to_their_transactions() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        create_transaction(
            user.id,
            NewTransaction::build(TransactionType::Income, 3000.0, date!(2025 - 03 - 01), "Salário"),
            &conn,
        )
        .unwrap();
        create_transaction(user.id, itemized_expense(), &conn).unwrap();

        let transactions = get_transactions_for_user(user.id, &conn).unwrap();

        assert_eq!(transactions[0].description, "Mercado");
        assert_eq!(transactions[0].items.len(), 2);
        assert!(transactions[1].items.is_empty());
    }

    #[test]
    fn update_replaces_fields_and_items() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let transaction = create_transaction(user.id, itemized_expense(), &conn).unwrap();
        let update = NewTransaction::build(
            TransactionType::Expense,
            0.0,
            date!(2025 - 03 - 15),
            "Feira",
        )
        .payment_type(PaymentType::Cash)
        .items(vec![TransactionItem::new("banana", 0.5, 12.0, true)]);

        let updated = update_transaction(transaction.id, user.id, update, &conn).unwrap();

        assert_eq!(updated.description, "Feira");
        assert_eq!(updated.payment_type, PaymentType::Cash);
        assert_eq!(updated.amount, 6.0);
        assert_eq!(updated.items, [TransactionItem::new("BANANA", 0.5, 12.0, true)]);
        assert_eq!(count_items(&conn).unwrap(), 1);
    }

    #[test]
    fn update_fails_for_other_user() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let other_user = create_other_user(&conn);
        let transaction = create_transaction(user.id, itemized_expense(), &conn).unwrap();

        let result = update_transaction(transaction.id, other_user.id, itemized_expense(), &conn);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_removes_transaction_and_items() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let transaction = create_transaction(user.id, itemized_expense(), &conn).unwrap();

        delete_transaction(transaction.id, user.id, &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, user.id, &conn),
            Err(Error::NotFound)
        );
        assert_eq!(count_items(&conn).unwrap(), 0);
    }

    #[test]
    fn delete_fails_for_missing_transaction() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);

        assert_eq!(
            delete_transaction(1337, user.id, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn suggestions_are_distinct_non_blank_and_of_same_type() {
        let conn = get_test_connection();
        let user = create_test_user(&conn);
        let today = date!(2025 - 03 - 14);
        for (transaction_type, description) in [
            (TransactionType::Expense, "Padaria"),
            (TransactionType::Expense, "Padaria"),
            (TransactionType::Expense, "  "),
            (TransactionType::Expense, "Farmácia"),
            (TransactionType::Income, "Salário"),
        ] {
            create_transaction(
                user.id,
                NewTransaction::build(transaction_type, 1.0, today, description),
                &conn,
            )
            .unwrap();
        }

        let suggestions =
            get_description_suggestions(user.id, TransactionType::Expense, &conn).unwrap();

        assert_eq!(suggestions, ["Farmácia", "Padaria"]);
    }

    #[test]
    fn payment_type_shows_account_except_for_cash() {
        assert!(PaymentType::Pix.shows_account());
        assert!(PaymentType::Debit.shows_account());
        assert!(PaymentType::Credit.shows_account());
        assert!(!PaymentType::Cash.shows_account());
    }
}
