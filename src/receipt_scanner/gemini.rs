//! A [ReceiptScanner] backed by the Gemini `generateContent` REST API.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Error;

use super::{ReceiptScanner, ScannedReceipt};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-3-flash-preview";
const PROMPT: &str = "Extraia os dados em JSON: date(YYYY-MM-DD), time(HH:mm), description, \
    totalAmount, items(name, price, quantity, total).";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads receipts with Google's Gemini models.
#[derive(Debug, Clone)]
pub struct GeminiReceiptScanner {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiReceiptScanner {
    /// Create a scanner that authenticates with `api_key`.
    ///
    /// # Errors
    /// Returns [Error::ReceiptScanFailed] if the HTTP client cannot be built.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| Error::ReceiptScanFailed(format!("could not build client: {error}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: API_BASE_URL.to_owned(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{MODEL}:generateContent", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "date": { "type": "STRING" },
            "time": { "type": "STRING" },
            "description": { "type": "STRING" },
            "totalAmount": { "type": "NUMBER" },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "price": { "type": "NUMBER" },
                        "quantity": { "type": "NUMBER" },
                        "total": { "type": "NUMBER" }
                    }
                }
            }
        }
    })
}

fn build_request(image: &[u8], mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.to_owned(),
                        data: STANDARD.encode(image),
                    },
                },
                Part::Text {
                    text: PROMPT.to_owned(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pull the receipt out of the text of the first candidate.
///
/// An empty answer counts as a receipt where nothing could be read.
fn parse_response(response: GenerateContentResponse) -> Result<ScannedReceipt, Error> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    let text = text.trim();
    let text = if text.is_empty() { "{}" } else { text };

    serde_json::from_str(text)
        .map_err(|error| Error::ReceiptScanFailed(format!("invalid JSON in response: {error}")))
}

#[async_trait]
impl ReceiptScanner for GeminiReceiptScanner {
    async fn scan(&self, image: &[u8], mime_type: &str) -> Result<ScannedReceipt, Error> {
        let request = build_request(image, mime_type);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| Error::ReceiptScanFailed(format!("request failed: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ReceiptScanFailed(format!(
                "service responded with {status}: {body}"
            )));
        }

        let response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|error| Error::ReceiptScanFailed(format!("invalid response: {error}")))?;

        let receipt = parse_response(response)?;
        tracing::debug!(
            "Scanned receipt with {} items and total {:?}",
            receipt.items.len(),
            receipt.total_amount
        );

        Ok(receipt)
    }
}
