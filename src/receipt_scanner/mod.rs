//! Reading transaction details from photos of receipts.
//!
//! The work is done by an external AI service behind the [ReceiptScanner]
//! trait so that handlers can be tested with a stub.

mod gemini;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    Error,
    transaction::{ItemFields, TransactionForm, format_decimal},
};

pub use gemini::GeminiReceiptScanner;

/// A service that extracts transaction details from a receipt image.
#[async_trait]
pub trait ReceiptScanner: Send + Sync {
    /// Read the receipt in `image`, an image file of type `mime_type`.
    ///
    /// # Errors
    /// Returns [Error::ReceiptScanFailed] if the service could not be reached
    /// or its answer could not be understood.
    async fn scan(&self, image: &[u8], mime_type: &str) -> Result<ScannedReceipt, Error>;
}

/// A scanner for when no AI service is configured. Every scan fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableReceiptScanner;

#[async_trait]
impl ReceiptScanner for UnavailableReceiptScanner {
    async fn scan(&self, _image: &[u8], _mime_type: &str) -> Result<ScannedReceipt, Error> {
        Err(Error::ReceiptScanFailed(
            "no receipt scanner is configured, set GEMINI_API_KEY to enable it".to_owned(),
        ))
    }
}

/// A line read from a receipt.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScannedItem {
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    pub total: f64,
}

/// The details read from a receipt. Anything the service could not read is
/// left empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScannedReceipt {
    /// "YYYY-MM-DD"
    pub date: Option<String>,
    /// "HH:MM"
    pub time: Option<String>,
    pub description: Option<String>,
    pub total_amount: Option<f64>,
    pub items: Vec<ScannedItem>,
}

impl ScannedReceipt {
    /// Fill `form` with the scanned details.
    ///
    /// Fields the scan left empty keep the value already in the form. The
    /// items are always replaced and count as necessary.
    pub fn merge_into(self, form: &mut TransactionForm) {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        }

        if let Some(date) = non_empty(self.date) {
            form.date = date;
        }

        if let Some(time) = non_empty(self.time) {
            form.time = time;
        }

        if let Some(description) = non_empty(self.description) {
            form.description = description;
        }

        if let Some(total_amount) = self.total_amount.filter(|amount| *amount != 0.0) {
            form.amount = format_decimal(total_amount);
        }

        form.items = self
            .items
            .into_iter()
            .map(|item| ItemFields {
                name: item.name.trim().to_uppercase(),
                price: format_decimal(item.price),
                quantity: if item.quantity == 0.0 {
                    "1".to_owned()
                } else {
                    item.quantity.to_string()
                },
                is_necessary: true,
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::transaction::{ItemFields, TransactionForm};

    use super::{ScannedItem, ScannedReceipt};

    fn form() -> TransactionForm {
        let mut form = TransactionForm::new_default(datetime!(2025-03-14 9:05 -3));
        form.description = "Mercado".to_owned();
        form.amount = "10.00".to_owned();
        form.items = vec![ItemFields {
            name: "VELHO".to_owned(),
            price: "1.00".to_owned(),
            quantity: "1".to_owned(),
            is_necessary: false,
        }];
        form
    }

    #[test]
    fn scanned_values_replace_form_values() {
        let mut form = form();

        ScannedReceipt {
            date: Some("2025-03-10".to_owned()),
            time: Some("18:42".to_owned()),
            description: Some("Supermercado Pão de Açúcar".to_owned()),
            total_amount: Some(57.3),
            items: vec![ScannedItem {
                name: "leite".to_owned(),
                price: 5.49,
                quantity: 2.0,
                total: 10.98,
            }],
        }
        .merge_into(&mut form);

        assert_eq!(form.date, "2025-03-10");
        assert_eq!(form.time, "18:42");
        assert_eq!(form.description, "Supermercado Pão de Açúcar");
        assert_eq!(form.amount, "57.30");
        assert_eq!(
            form.items,
            [ItemFields {
                name: "LEITE".to_owned(),
                price: "5.49".to_owned(),
                quantity: "2".to_owned(),
                is_necessary: true,
            }]
        );
    }

    #[test]
    fn missing_values_keep_form_values() {
        let mut form = form();

        ScannedReceipt {
            date: Some("".to_owned()),
            total_amount: Some(0.0),
            ..Default::default()
        }
        .merge_into(&mut form);

        assert_eq!(form.date, "2025-03-14");
        assert_eq!(form.time, "09:05");
        assert_eq!(form.description, "Mercado");
        assert_eq!(form.amount, "10.00");
        assert!(form.items.is_empty());
    }

    #[test]
    fn deserializes_partial_json() {
        let receipt: ScannedReceipt =
            serde_json::from_str(r#"{"totalAmount": 12.5, "items": [{"name": "café"}]}"#).unwrap();

        assert_eq!(receipt.total_amount, Some(12.5));
        assert_eq!(receipt.date, None);
        assert_eq!(receipt.items[0].name, "café");
        assert_eq!(receipt.items[0].price, 0.0);
    }
}
