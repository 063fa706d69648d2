//! Uniform translation of raw HTTP responses.
//!
//! Every client operation funnels its response through [`translate`],
//! which pairs the status code with either the decoded JSON body or,
//! when the body is not well-formed JSON, the raw text. Decoding never
//! fails — a malformed body is handed back verbatim for the caller to
//! report.

use serde_json::Value;

/// A transport response reduced to status plus decoded-or-raw body.
#[derive(Debug, Clone)]
pub struct TranslatedResponse {
    /// HTTP status code.
    pub status: u16,
    pub body: TranslatedBody,
}

/// The response body, decoded when possible.
#[derive(Debug, Clone)]
pub enum TranslatedBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The raw body text, kept when JSON decoding fails.
    Text(String),
}

impl TranslatedResponse {
    /// The body rendered as text, for error messages and logs.
    pub fn body_text(&self) -> String {
        match &self.body {
            TranslatedBody::Json(value) => value.to_string(),
            TranslatedBody::Text(text) => text.clone(),
        }
    }
}

/// Consume a [`reqwest::Response`] into a [`TranslatedResponse`].
///
/// An unreadable body (connection dropped mid-read) becomes a
/// placeholder text rather than an error, so status-code handling
/// stays uniform across operations.
pub async fn translate(response: reqwest::Response) -> TranslatedResponse {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    translate_parts(status, text)
}

/// Pair a status code with its body, decoding JSON when possible.
pub fn translate_parts(status: u16, text: String) -> TranslatedResponse {
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(value) => TranslatedBody::Json(value),
        Err(_) => TranslatedBody::Text(text),
    };
    TranslatedResponse { status, body }
}
