//! Qwant web search client.
//!
//! Talks to the public v3 endpoint with browser-equivalent headers and
//! consent cookies; without those the API answers with a bot challenge. The
//! endpoint is strict about paging: `count` must be exactly 10 and `offset`
//! a multiple of 10 no greater than 40.

use async_trait::async_trait;
use serde_json::Value;

use super::{SearchClient, SearchError, SearchHit};

const BASE_URL: &str = "https://api.qwant.com/v3/search/web";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:141.0) Gecko/20100101 Firefox/141.0";

// Consent cookies accepted by the endpoint for a generic EU visitor.
const CONSENT_COOKIES: &str = concat!(
    "didomi_token=eyJ1c2VyX2lkIjoiMTkyNzY2ZTItMTUwYS02ZjVlLThkMzMtMjcxMDA4MzZlNGRiIiwiY3JlYXRlZCI6IjIwMjQtMTAtMTBUMTI6MzY6MjEuOTY4WiIsInVwZGF0ZWQiOiIyMDI0LTEwLTEwVDEyOjM2OjQ0LjY4NloiLCJ2ZW5kb3JzIjp7ImRpc2FibGVkIjpbImM6cXdhbnQtM01LS0paZHkiLCJjOnBpd2l3a3Byby1lQXJaREhXRCIsImM6bXNjbGFyaXR5LU1NcnBSSnJwIl19LCJ2ZW5kb3JzX2xpIjp7ImRpc2FibGVkIjpbImM6cXdhbnQtM01LS0paZHkiLCJjOnBpd2l3a3Byby1lQXJaREhXRCJdfSwidmVyc2lvbiI6Mn0",
    "; euconsent-v2=CQGRvoAQGRvoAAHABBENBKFgAAAAAAAAAAqIAAAAAAAA.YAAAAAAAAAAA",
);

/// Qwant search client with fixed paging defaults.
pub struct QwantSearch {
    client: reqwest::Client,
    count: u32,
    offset: u32,
    locale: String,
    device: String,
    safesearch: u8,
}

impl QwantSearch {
    pub fn new() -> Self {
        QwantSearch {
            client: reqwest::Client::new(),
            count: 10,
            offset: 0,
            locale: "en_gb".to_string(),
            device: "desktop".to_string(),
            safesearch: 1,
        }
    }

    /// Result page offset; must be a multiple of 10, at most 40 (builder).
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Locale code such as `en_gb`; lowercased on the wire (builder).
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    fn check_params(&self) -> Result<(), SearchError> {
        if self.count != 10 {
            return Err(SearchError::InvalidParam("count must be 10".to_string()));
        }
        if self.offset % 10 != 0 || self.offset > 40 {
            return Err(SearchError::InvalidParam(
                "offset must be a multiple of 10, at most 40".to_string(),
            ));
        }
        if !matches!(self.device.as_str(), "smartphone" | "tablet" | "desktop") {
            return Err(SearchError::InvalidParam(format!(
                "device {:?} is not one of smartphone, tablet, desktop",
                self.device
            )));
        }
        Ok(())
    }
}

impl Default for QwantSearch {
    fn default() -> Self {
        QwantSearch::new()
    }
}

#[async_trait]
impl SearchClient for QwantSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.check_params()?;
        let res = self
            .client
            .get(BASE_URL)
            .query(&[
                ("q", query),
                ("count", &self.count.to_string()),
                ("locale", &self.locale.to_lowercase()),
                ("offset", &self.offset.to_string()),
                ("device", &self.device),
                ("tgp", "4"),
                ("safesearch", &self.safesearch.to_string()),
                ("displayed", "true"),
                ("llm", "true"),
            ])
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Referer", "https://www.qwant.com/")
            .header("Origin", "https://www.qwant.com")
            .header("DNT", "1")
            .header("Cache-Control", "no-cache")
            .header("Cookie", CONSENT_COOKIES)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let err_body = res.text().await.unwrap_or_default();
            return Err(SearchError::Transport(format!(
                "Qwant API error {}: {}",
                status, err_body
            )));
        }
        let out: Value = res
            .json()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        parse_web_results(&out)
    }
}

/// Walks `data.result.items.mainline` picking every result of the `web`
/// item groups. A non-`success` status becomes [`SearchError::Api`].
fn parse_web_results(response: &Value) -> Result<Vec<SearchHit>, SearchError> {
    if response.get("status").and_then(Value::as_str) != Some("success") {
        let message = response["data"]["message"]
            .as_str()
            .unwrap_or("unknown error");
        return Err(SearchError::Api(message.to_string()));
    }
    let mainline = response["data"]["result"]["items"]["mainline"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let mut hits = Vec::new();
    for group in mainline {
        if group.get("type").and_then(Value::as_str) != Some("web") {
            continue;
        }
        let items = group
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for item in items {
            let source = item.get("source").and_then(Value::as_str).unwrap_or("");
            hits.push(SearchHit {
                title: item
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                url: item
                    .get("url")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                domain: strip_to_host(source),
                description: item
                    .get("desc")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
            });
        }
    }
    Ok(hits)
}

fn strip_to_host(source: &str) -> String {
    let s = source
        .strip_prefix("https://")
        .or_else(|| source.strip_prefix("http://"))
        .unwrap_or(source);
    s.split('/').next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The mainline payload parses into hits; non-web groups
    /// are skipped.
    #[test]
    fn parses_mainline_web_items() {
        let response = serde_json::json!({
            "status": "success",
            "data": { "result": { "items": { "mainline": [
                { "type": "ads", "items": [{ "title": "buy now" }] },
                { "type": "web", "items": [
                    { "title": "Rust", "url": "https://rust-lang.org/learn",
                      "source": "https://rust-lang.org/learn", "desc": "A language" }
                ] }
            ] } } }
        });
        let hits = parse_web_results(&response).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust");
        assert_eq!(hits[0].domain, "rust-lang.org");
    }

    /// **Scenario**: A non-success status surfaces the API's message.
    #[test]
    fn error_status_surfaces_message() {
        let response = serde_json::json!({
            "status": "error",
            "data": { "message": "rate limited" }
        });
        match parse_web_results(&response) {
            Err(SearchError::Api(m)) => assert_eq!(m, "rate limited"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    /// **Scenario**: Paging constraints are enforced before any request.
    #[test]
    fn invalid_offset_is_rejected() {
        assert!(QwantSearch::new().with_offset(15).check_params().is_err());
        assert!(QwantSearch::new().with_offset(50).check_params().is_err());
        assert!(QwantSearch::new().with_offset(40).check_params().is_ok());
    }
}
