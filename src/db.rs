//! Creates the tables for the domain models.

use rusqlite::Connection;

use crate::{
    feedback::create_feedback_table, preferences::create_preferences_table,
    transaction::create_transaction_tables, user::create_user_table,
};

/// Create all the tables in an exclusive transaction and enable foreign keys.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_preferences_table(&transaction)?;
    create_transaction_tables(&transaction)?;
    create_feedback_table(&transaction)?;

    transaction.commit()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let mut tables: Vec<String> = connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        tables.retain(|name| !name.starts_with("sqlite_"));

        assert_eq!(
            tables,
            [
                "feedback",
                "transaction",
                "transaction_item",
                "user",
                "user_preferences"
            ]
        );
    }
}
