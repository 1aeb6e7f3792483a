//! Google translate provider (public `translate_a/single` endpoint).
//!
//! No API key; the `gtx` client answers with nested arrays whose first
//! element holds the translated segments.

use std::time::Duration;

use async_trait::async_trait;

use super::provider::TranslationProvider;

pub struct GoogleProvider {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| format!("invalid response: {e}"))?;
        parse_response(&body).ok_or_else(|| "unexpected response shape".to_string())
    }
}

/// Join the translated segments of a `translate_a/single` answer.
fn parse_response(body: &serde_json::Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let joined: String = segments
        .iter()
        .filter_map(|segment| segment.get(0)?.as_str())
        .collect();
    Some(joined.trim().to_string())
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &str {
        "Google"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Option<String> {
        if text.trim().is_empty() {
            return Some(String::new());
        }
        match self.request(text, source, target).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                tracing::debug!("Google translate failed for '{}': {e}", text.trim());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([[["红色 ", "red ", null], ["头发", "hair", null]], null, "en"]);
        assert_eq!(parse_response(&body).as_deref(), Some("红色 头发"));
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        assert_eq!(parse_response(&json!({"error": "nope"})), None);
        assert_eq!(parse_response(&json!([null])), None);
    }

    #[tokio::test]
    async fn test_blank_input_skips_request() {
        // Unroutable endpoint: a request would fail, a blank never makes one
        let provider = GoogleProvider::new("http://127.0.0.1:9/", Duration::from_millis(50));
        assert_eq!(provider.translate("   ", "en", "zh").await.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_none() {
        let provider = GoogleProvider::new("http://127.0.0.1:9/", Duration::from_millis(200));
        assert_eq!(provider.translate("cat", "en", "zh").await, None);
    }
}
