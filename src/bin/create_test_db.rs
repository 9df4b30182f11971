use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use econo::{
    NewTransaction, NewUser, PasswordHash, PaymentType, ProfileSetup, TransactionItem,
    TransactionType, ValidatedPassword, complete_profile, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the Econo server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user demo@econo.app with the password \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        NewUser {
            email: EmailAddress::from_str("demo@econo.app")?,
            display_name: "Usuário Demo".to_owned(),
            password_hash,
        },
        &conn,
    )?;
    complete_profile(
        user.id,
        ProfileSetup {
            age: Some(30),
            birth_date: None,
            photo_url: None,
        },
        &conn,
    )?;

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();
    let transactions = [
        NewTransaction::build(TransactionType::Income, 4200.0, today - Duration::days(20), "Salário"),
        NewTransaction::build(TransactionType::Income, 350.0, today - Duration::days(6), "Freela de design"),
        NewTransaction::build(TransactionType::Expense, 0.0, today - Duration::days(12), "Supermercado")
            .category("Mercado")
            .payment_type(PaymentType::Debit)
            .items(vec![
                TransactionItem::new("Arroz 5kg", 27.9, 1.0, true),
                TransactionItem::new("Feijão", 8.49, 2.0, true),
                TransactionItem::new("Chocolate", 7.5, 1.5, false),
            ]),
        NewTransaction::build(TransactionType::Expense, 89.9, today - Duration::days(9), "Cinema e pipoca")
            .category("Lazer")
            .payment_type(PaymentType::Credit),
        NewTransaction::build(TransactionType::Expense, 210.35, today - Duration::days(3), "Conta de luz")
            .category("Casa")
            .is_paid(false),
        NewTransaction::build(TransactionType::Expense, 45.0, today - Duration::days(1), "Farmácia")
            .category("Saúde")
            .payment_type(PaymentType::Cash)
            .time("18:40"),
    ];

    for transaction in transactions {
        create_transaction(user.id, transaction, &conn)?;
    }

    println!("Success!");

    Ok(())
}
