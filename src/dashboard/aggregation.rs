//! Grouping transactions for the charts.

use std::collections::HashMap;

use crate::transaction::{Transaction, TransactionType};

/// The paid expenses of one category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    /// The category name in upper case.
    pub name: String,
    pub value: f64,
}

/// Sum the paid expenses by category, largest first.
///
/// Categories are compared ignoring case, so "Mercado" and "mercado" end up
/// in the same slice of the chart.
pub(super) fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.transaction_type != TransactionType::Expense || !transaction.is_paid {
            continue;
        }

        *totals
            .entry(transaction.category.trim().to_uppercase())
            .or_insert(0.0) += transaction.amount;
    }

    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(name, value)| CategoryTotal { name, value })
        .collect();
    // Ties are ordered by name.
    totals.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

    totals
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        transaction::{PaymentType, Transaction, TransactionType},
        user::UserID,
    };

    use super::{CategoryTotal, expenses_by_category};

    fn transaction(
        transaction_type: TransactionType,
        category: &str,
        amount: f64,
        is_paid: bool,
    ) -> Transaction {
        Transaction {
            id: 0,
            user_id: UserID::new(1),
            transaction_type,
            amount,
            date: date!(2025 - 03 - 08),
            time: "12:00".to_owned(),
            description: "Teste".to_owned(),
            category: category.to_owned(),
            payment_type: PaymentType::Pix,
            account: "PicPay".to_owned(),
            is_paid,
            is_recurring: false,
            items: Vec::new(),
            observations: String::new(),
            receipt_url: None,
        }
    }

    #[test]
    fn groups_paid_expenses_largest_first() {
        let transactions = [
            transaction(TransactionType::Expense, "Mercado", 100.0, true),
            transaction(TransactionType::Expense, "Lazer", 250.0, true),
            transaction(TransactionType::Expense, "mercado", 200.0, true),
            transaction(TransactionType::Expense, "Saúde", 80.0, false),
            transaction(TransactionType::Income, "Receita", 5000.0, true),
        ];

        assert_eq!(
            expenses_by_category(&transactions),
            [
                CategoryTotal {
                    name: "MERCADO".to_owned(),
                    value: 300.0
                },
                CategoryTotal {
                    name: "LAZER".to_owned(),
                    value: 250.0
                },
            ]
        );
    }

    #[test]
    fn no_expenses_gives_no_categories() {
        let transactions = [transaction(TransactionType::Income, "Receita", 10.0, true)];

        assert!(expenses_by_category(&transactions).is_empty());
    }
}
