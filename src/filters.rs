//! Filtering the transaction list on the dashboard.
//!
//! The filter is read from the dashboard's query string so a filtered list
//! can be bookmarked and survives a page reload.

use serde::{Deserialize, Deserializer};
use time::{Date, macros::format_description};

use crate::transaction::{Transaction, TransactionType};

/// Which transaction types to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    Entrada,
    Saida,
    #[default]
    #[serde(other)]
    Todos,
}

impl KindFilter {
    pub const ALL: [KindFilter; 3] = [KindFilter::Todos, KindFilter::Entrada, KindFilter::Saida];

    pub fn as_str(&self) -> &'static str {
        match self {
            KindFilter::Todos => "todos",
            KindFilter::Entrada => "entrada",
            KindFilter::Saida => "saida",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::Todos => "Todos",
            KindFilter::Entrada => "Receitas",
            KindFilter::Saida => "Saídas",
        }
    }

    fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            KindFilter::Todos => true,
            KindFilter::Entrada => transaction_type == TransactionType::Income,
            KindFilter::Saida => transaction_type == TransactionType::Expense,
        }
    }
}

/// Which payment statuses to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Pago,
    Pendente,
    #[default]
    #[serde(other)]
    Todos,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::Todos,
        StatusFilter::Pago,
        StatusFilter::Pendente,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Todos => "todos",
            StatusFilter::Pago => "pago",
            StatusFilter::Pendente => "pendente",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::Todos => "Status: Todos",
            StatusFilter::Pago => "Liquidado",
            StatusFilter::Pendente => "Pendente",
        }
    }

    fn matches(&self, is_paid: bool) -> bool {
        match self {
            StatusFilter::Todos => true,
            StatusFilter::Pago => is_paid,
            StatusFilter::Pendente => !is_paid,
        }
    }
}

/// The dashboard query string, e.g. `?busca=mercado&tipo=saida&inicio=2025-03-01`.
///
/// Unknown values for `tipo`, `status` or the dates fall back to showing
/// everything, so an outdated bookmark still opens the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilter {
    /// Text the description must contain, ignoring case.
    #[serde(default, rename = "busca")]
    pub search: String,
    /// The category to show, ignoring case. Empty shows every category.
    #[serde(default, rename = "categoria")]
    pub category: String,
    #[serde(default, rename = "tipo")]
    pub kind: KindFilter,
    #[serde(default)]
    pub status: StatusFilter,
    /// The earliest date to show, inclusive.
    #[serde(default, rename = "inicio", deserialize_with = "empty_date_as_none")]
    pub start_date: Option<Date>,
    /// The latest date to show, inclusive.
    #[serde(default, rename = "fim", deserialize_with = "empty_date_as_none")]
    pub end_date: Option<Date>,
}

impl TransactionFilter {
    /// Whether `transaction` passes every part of the filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let search = self.search.trim().to_lowercase();

        transaction.description.to_lowercase().contains(&search)
            && self.matches_category(&transaction.category)
            && self.kind.matches(transaction.transaction_type)
            && self.status.matches(transaction.is_paid)
            && self.start_date.is_none_or(|start| transaction.date >= start)
            && self.end_date.is_none_or(|end| transaction.date <= end)
    }

    fn matches_category(&self, category: &str) -> bool {
        let wanted = self.category.trim();

        wanted.is_empty() || category.trim().to_lowercase() == wanted.to_lowercase()
    }

    /// The transactions that pass the filter, in their original order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }

    /// Whether the user narrowed the list with a search, a category, a date
    /// or a status.
    ///
    /// The type toggle does not count, it is always visible.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.category.trim().is_empty()
            || self.has_period()
            || self.status != StatusFilter::Todos
    }

    pub fn has_period(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// The heading above the transaction list.
    pub fn heading(&self) -> &'static str {
        if self.has_period() {
            "Movimentações no Período"
        } else {
            "Movimentações Recentes"
        }
    }
}

/// The badge next to the heading when a filter is active.
pub fn active_filters_label(match_count: usize) -> String {
    format!("Filtros Ativos ({match_count} encontrados)")
}

/// Date inputs submit an empty string when cleared. A malformed date is
/// dropped rather than rejecting the whole query.
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => match Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            Ok(date) => Ok(Some(date)),
            Err(error) => {
                tracing::debug!("ignoring invalid date filter \"{raw}\": {error}");
                Ok(None)
            }
        },
    }
}

/// The distinct categories of `transactions`, sorted, for the category
/// select. Categories differing only in case are listed once.
pub fn category_options(transactions: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for transaction in transactions {
        let category = transaction.category.trim();
        if category.is_empty()
            || categories
                .iter()
                .any(|known| known.to_lowercase() == category.to_lowercase())
        {
            continue;
        }
        categories.push(category.to_owned());
    }

    categories.sort_by_key(|category| category.to_lowercase());
    categories
}
