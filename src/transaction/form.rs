//! The raw transaction form and the rules that turn it into a transaction.
//!
//! The form is submitted as `multipart/form-data` since it may carry a
//! receipt image. Item rows repeat the `item_*` fields once per row.

use axum::extract::{Multipart, multipart::Field};
use base64::{Engine, engine::general_purpose::STANDARD};
use time::{Date, OffsetDateTime, Time, macros::format_description};

use crate::{
    Error,
    transaction::core::{NewTransaction, PaymentType, Transaction, TransactionItem, TransactionType},
};

/// The category given to income.
pub const INCOME_CATEGORY: &str = "Receita";
/// The category given to expenses paid with a boleto.
pub const BOLETO_CATEGORY: &str = "Boleto";
/// The category of a new expense.
pub const DEFAULT_EXPENSE_CATEGORY: &str = "Outros";
const DEFAULT_ACCOUNT: &str = "PicPay";

/// One item row as typed in the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFields {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub is_necessary: bool,
}

impl ItemFields {
    /// Convert the row into an item, or `None` if the name or price is missing.
    ///
    /// A missing or zero quantity counts as one.
    pub fn to_item(&self) -> Option<TransactionItem> {
        let name = self.name.trim();
        let price = parse_decimal(&self.price).filter(|price| *price != 0.0)?;

        if name.is_empty() {
            return None;
        }

        let quantity = parse_decimal(&self.quantity)
            .filter(|quantity| *quantity != 0.0)
            .unwrap_or(1.0);

        Some(TransactionItem::new(name, price, quantity, self.is_necessary))
    }
}

impl From<&TransactionItem> for ItemFields {
    fn from(item: &TransactionItem) -> Self {
        Self {
            name: item.name.clone(),
            price: format_decimal(item.price),
            quantity: format_quantity(item.quantity),
            is_necessary: item.is_necessary,
        }
    }
}

/// An image uploaded with the form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    /// E.g. "image/jpeg".
    pub mime_type: String,
}

impl UploadedImage {
    /// The image as a `data:` URL that can be stored and used as an `<img>` source.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// The transaction form exactly as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub transaction_type: TransactionType,
    pub is_boleto: bool,
    /// The boleto due date as "YYYY-MM-DD".
    pub due_date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    pub payment_type: PaymentType,
    pub account: String,
    pub is_paid: bool,
    pub is_recurring: bool,
    pub observations: String,
    /// The receipt already attached to the transaction being edited.
    pub receipt_url: Option<String>,
    /// A new receipt image replacing `receipt_url`.
    pub receipt_image: Option<UploadedImage>,
    /// An image of a receipt to read the transaction details from.
    pub scan_image: Option<UploadedImage>,
    pub items: Vec<ItemFields>,
}

impl TransactionForm {
    /// The form for a new transaction at `now` (in local time).
    pub fn new_default(now: OffsetDateTime) -> Self {
        let today = now.date().to_string();

        Self {
            transaction_type: TransactionType::Expense,
            is_boleto: false,
            due_date: today.clone(),
            description: String::new(),
            amount: String::new(),
            category: DEFAULT_EXPENSE_CATEGORY.to_owned(),
            date: today,
            time: format!("{:02}:{:02}", now.hour(), now.minute()),
            payment_type: PaymentType::Pix,
            account: DEFAULT_ACCOUNT.to_owned(),
            is_paid: true,
            is_recurring: true,
            observations: String::new(),
            receipt_url: None,
            receipt_image: None,
            scan_image: None,
            items: Vec::new(),
        }
    }

    /// An empty form, the starting point for reading a submitted form where
    /// unchecked checkboxes are simply missing.
    fn empty() -> Self {
        Self {
            transaction_type: TransactionType::Expense,
            is_boleto: false,
            due_date: String::new(),
            description: String::new(),
            amount: String::new(),
            category: String::new(),
            date: String::new(),
            time: String::new(),
            payment_type: PaymentType::Pix,
            account: String::new(),
            is_paid: false,
            is_recurring: false,
            observations: String::new(),
            receipt_url: None,
            receipt_image: None,
            scan_image: None,
            items: Vec::new(),
        }
    }

    /// Read the form from a multipart request body.
    ///
    /// # Errors
    /// Returns [Error::MultipartError] if the body cannot be read and
    /// [Error::InvalidForm] if a field holds an unexpected value.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut fields = Vec::new();
        let mut form = Self::empty();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match name.as_str() {
                "receipt_image" => form.receipt_image = read_image(field).await?,
                "scan_image" => form.scan_image = read_image(field).await?,
                _ => {
                    let value = field
                        .text()
                        .await
                        .map_err(|error| Error::MultipartError(error.to_string()))?;
                    fields.push((name, value));
                }
            }
        }

        form.set_fields(fields)?;

        Ok(form)
    }

    /// Read the form from its text fields, in the order they were submitted.
    ///
    /// # Errors
    /// Returns [Error::InvalidForm] if the transaction or payment type is unknown.
    pub fn from_fields(fields: Vec<(String, String)>) -> Result<Self, Error> {
        let mut form = Self::empty();
        form.set_fields(fields)?;

        Ok(form)
    }

    fn set_fields(&mut self, fields: Vec<(String, String)>) -> Result<(), Error> {
        let mut item_names = Vec::new();
        let mut item_prices = Vec::new();
        let mut item_quantities = Vec::new();
        let mut item_necessary = Vec::new();

        for (name, value) in fields {
            match name.as_str() {
                "transaction_type" => self.transaction_type = value.parse()?,
                "is_boleto" => self.is_boleto = true,
                "due_date" => self.due_date = value,
                "description" => self.description = value,
                "amount" => self.amount = value,
                "category" => self.category = value,
                "date" => self.date = value,
                "time" => self.time = value,
                "payment_type" => self.payment_type = value.parse()?,
                "account" => self.account = value,
                "is_paid" => self.is_paid = true,
                "is_recurring" => self.is_recurring = true,
                "observations" => self.observations = value,
                "receipt_url" => {
                    self.receipt_url = Some(value).filter(|url| url.starts_with("data:image/"))
                }
                "item_name" => item_names.push(value),
                "item_price" => item_prices.push(value),
                "item_quantity" => item_quantities.push(value),
                "item_necessary" => item_necessary.push(value != "nao"),
                _ => {}
            }
        }

        self.items = item_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ItemFields {
                name,
                price: item_prices.get(index).cloned().unwrap_or_default(),
                quantity: item_quantities.get(index).cloned().unwrap_or_default(),
                is_necessary: item_necessary.get(index).copied().unwrap_or(true),
            })
            .collect();

        Ok(())
    }

    /// Apply the rules that follow from switching the transaction type or
    /// the boleto mode.
    ///
    /// Income has the category "Receita" and no items. A boleto is an expense
    /// with the category "Boleto" and no items. Leaving either mode resets the
    /// category to "Outros".
    pub fn normalize(&mut self) {
        match self.transaction_type {
            TransactionType::Income => {
                self.is_boleto = false;
                self.category = INCOME_CATEGORY.to_owned();
                self.items.clear();
            }
            TransactionType::Expense if self.is_boleto => {
                self.category = BOLETO_CATEGORY.to_owned();
                self.items.clear();
            }
            TransactionType::Expense => {
                if self.category == INCOME_CATEGORY || self.category == BOLETO_CATEGORY {
                    self.category = DEFAULT_EXPENSE_CATEGORY.to_owned();
                }
            }
        }
    }

    /// The complete item rows.
    pub fn complete_items(&self) -> Vec<TransactionItem> {
        self.items.iter().filter_map(ItemFields::to_item).collect()
    }

    /// Whether the amount is the sum of the items rather than typed in.
    pub fn is_amount_computed(&self) -> bool {
        self.transaction_type == TransactionType::Expense
            && !self.is_boleto
            && !self.complete_items().is_empty()
    }

    /// The amount to show in the form.
    pub fn display_amount(&self) -> String {
        if self.is_amount_computed() {
            format_decimal(self.complete_items().iter().map(|item| item.total).sum())
        } else {
            self.amount.clone()
        }
    }

    /// Validate the form and apply the form rules.
    ///
    /// # Errors
    /// Returns [Error::InvalidForm] with a pt-BR message if the date, time or
    /// amount cannot be read.
    pub fn into_draft(mut self) -> Result<NewTransaction, Error> {
        self.normalize();

        let date = parse_date(&self.date)
            .ok_or_else(|| Error::InvalidForm("Informe uma data válida.".to_owned()))?;
        let time = parse_time(&self.time)
            .ok_or_else(|| Error::InvalidForm("Informe um horário válido.".to_owned()))?;

        let items = self.complete_items();
        let amount = if self.is_amount_computed() {
            items.iter().map(|item| item.total).sum()
        } else if self.amount.trim().is_empty() {
            0.0
        } else {
            parse_decimal(&self.amount)
                .filter(|amount| *amount >= 0.0)
                .ok_or_else(|| Error::InvalidForm("Informe um valor válido.".to_owned()))?
        };

        let observations = if self.is_boleto {
            let due_date = parse_date(&self.due_date).ok_or_else(|| {
                Error::InvalidForm("Informe uma data de vencimento válida.".to_owned())
            })?;
            format!("Vencimento: {due_date}. {}", self.observations)
        } else {
            self.observations
        };

        let account = if self.payment_type.shows_account() {
            self.account.trim().to_owned()
        } else {
            String::new()
        };

        let receipt_url = match self.receipt_image {
            Some(image) => Some(image.to_data_url()),
            None => self.receipt_url,
        };

        Ok(NewTransaction {
            transaction_type: self.transaction_type,
            amount,
            date,
            time,
            description: self.description.trim().to_owned(),
            category: self.category.trim().to_owned(),
            payment_type: self.payment_type,
            account,
            is_paid: self.is_paid,
            is_recurring: self.is_recurring,
            items,
            observations,
            receipt_url,
        })
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        let is_boleto = transaction.transaction_type == TransactionType::Expense
            && transaction.category == BOLETO_CATEGORY;

        // The due date was folded into the observations when the boleto was
        // saved, so take it back out to avoid stacking prefixes on every edit.
        let (due_date, observations) = if is_boleto {
            split_due_date(&transaction.observations).map_or_else(
                || (transaction.date.to_string(), transaction.observations.clone()),
                |(due_date, rest)| (due_date.to_string(), rest.to_owned()),
            )
        } else {
            (
                transaction.date.to_string(),
                transaction.observations.clone(),
            )
        };

        Self {
            transaction_type: transaction.transaction_type,
            is_boleto,
            due_date,
            description: transaction.description.clone(),
            amount: format_decimal(transaction.amount),
            category: transaction.category.clone(),
            date: transaction.date.to_string(),
            time: transaction.time.clone(),
            payment_type: transaction.payment_type,
            account: transaction.account.clone(),
            is_paid: transaction.is_paid,
            is_recurring: transaction.is_recurring,
            observations,
            receipt_url: transaction.receipt_url.clone(),
            receipt_image: None,
            scan_image: None,
            items: transaction.items.iter().map(ItemFields::from).collect(),
        }
    }
}

async fn read_image(field: Field<'_>) -> Result<Option<UploadedImage>, Error> {
    let mime_type = field.content_type().unwrap_or_default().to_owned();
    let bytes = field
        .bytes()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?;

    // Browsers send an empty part for file inputs left blank.
    if bytes.is_empty() {
        return Ok(None);
    }

    if !mime_type.starts_with("image/") {
        return Err(Error::InvalidForm(
            "O arquivo enviado deve ser uma imagem.".to_owned(),
        ));
    }

    tracing::debug!("Received {mime_type} image that is {} bytes", bytes.len());

    Ok(Some(UploadedImage {
        bytes: bytes.to_vec(),
        mime_type,
    }))
}

/// Parse a number typed with either a comma or a dot as the decimal separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Format a number for a number input, e.g. "12.50".
pub fn format_decimal(number: f64) -> String {
    format!("{number:.2}")
}

/// Format a quantity without a trailing ".0" for whole numbers, e.g. "2" or "1.5".
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        quantity.to_string()
    }
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Parse "HH:MM" (seconds are accepted and dropped) and return it as "HH:MM".
fn parse_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let time = Time::parse(raw, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(raw, format_description!("[hour]:[minute]:[second]")))
        .ok()?;

    Some(format!("{:02}:{:02}", time.hour(), time.minute()))
}

fn split_due_date(observations: &str) -> Option<(Date, &str)> {
    let rest = observations.strip_prefix("Vencimento: ")?;
    let (raw_date, rest) = rest.split_once(". ")?;

    parse_date(raw_date).map(|date| (date, rest))
}
