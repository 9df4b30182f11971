//! Transactions: the income and expenses a user records.
//!
//! This module contains:
//! - The `Transaction` model, its items and the database functions for them
//! - The transaction form and the rules that turn it into a transaction
//! - The pages and endpoints for creating, editing and deleting transactions

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod form_endpoints;
mod scan_endpoint;
mod view;

pub use core::{
    NewTransaction, PaymentType, Transaction, TransactionItem, TransactionType,
    create_transaction, create_transaction_tables, get_transactions_for_user,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use form::{ItemFields, TransactionForm, format_decimal, format_quantity};
pub use form_endpoints::{add_item_endpoint, refresh_form_endpoint};
pub use scan_endpoint::scan_receipt_endpoint;
