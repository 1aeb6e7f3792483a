//! LibreTranslate provider.
//!
//! Supports batch requests: `q` may be an array, in which case
//! `translatedText` comes back as an array (or, on some servers, as one
//! newline-joined string).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::provider::TranslationProvider;

pub struct LibreTranslateProvider {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// `/translate` request body.
#[derive(Serialize)]
struct LibreRequest<'a, Q: Serialize> {
    q: Q,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

impl LibreTranslateProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    async fn post<Q: Serialize + Send>(
        &self,
        q: Q,
        source: &str,
        target: &str,
    ) -> Result<serde_json::Value, String> {
        let body = LibreRequest {
            q,
            source,
            target,
            format: "text",
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }
        resp.json()
            .await
            .map_err(|e| format!("invalid response: {e}"))
    }
}

/// Split a batch answer into one string per input, if the count matches.
fn parse_batch(body: &serde_json::Value, expected: usize) -> Option<Vec<String>> {
    let parts: Vec<String> = match body.get("translatedText")? {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .collect(),
        serde_json::Value::String(s) => s.split('\n').map(|p| p.trim().to_string()).collect(),
        _ => return None,
    };
    (parts.len() == expected).then_some(parts)
}

fn parse_single(body: &serde_json::Value) -> Option<String> {
    match body.get("translatedText")? {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &str {
        "LibreTranslate"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Option<String> {
        match self.post(text, source, target).await {
            Ok(body) => parse_single(&body),
            Err(e) => {
                tracing::debug!("LibreTranslate failed for '{}': {e}", text.trim());
                None
            }
        }
    }

    async fn translate_many(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Vec<Option<String>> {
        if texts.is_empty() {
            return Vec::new();
        }
        let body = match self.post(texts, source, target).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("LibreTranslate batch of {} failed: {e}", texts.len());
                return vec![None; texts.len()];
            }
        };
        match parse_batch(&body, texts.len()) {
            Some(parts) => parts.into_iter().map(Some).collect(),
            None => {
                // Mismatched answer: retry item by item
                let mut out = Vec::with_capacity(texts.len());
                for text in texts {
                    out.push(self.translate(text, source, target).await);
                }
                out
            }
        }
    }
}
