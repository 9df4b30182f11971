//! The totals shown on the balance cards.

use crate::transaction::{Transaction, TransactionType};

/// Money in, money out and the difference, over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Balance {
    pub total_in: f64,
    pub total_out: f64,
    pub net: f64,
}

/// Sum the paid transactions into a [Balance].
///
/// Pending transactions are left out until they are paid.
pub fn compute_balance(transactions: &[Transaction]) -> Balance {
    transactions
        .iter()
        .filter(|transaction| transaction.is_paid)
        .fold(Balance::default(), |mut balance, transaction| {
            match transaction.transaction_type {
                TransactionType::Income => {
                    balance.total_in += transaction.amount;
                    balance.net += transaction.amount;
                }
                TransactionType::Expense => {
                    balance.total_out += transaction.amount;
                    balance.net -= transaction.amount;
                }
            }

            balance
        })
}
