//! Page fetcher: HTTP retrieval plus plain-text extraction from HTML.
//!
//! Infallible by contract. Invalid URLs, timeouts, HTTP errors, and exhausted
//! retries all come back as tagged `FetchedPage` failures so one dead link
//! never aborts a reasoning run.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::{FetchedPage, PageFetcher};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:141.0) Gecko/20100101 Firefox/141.0";

const MAX_CONTENT_CHARS: usize = 5000;

fn dropped_blocks_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?is)<(script|style|nav|footer|header|aside)\b.*?</(script|style|nav|footer|header|aside)>",
        )
        .expect("static regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]+>").expect("static regex"))
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"))
}

fn h1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("static regex"))
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// HTTP page fetcher with bounded retries and exponential backoff.
pub struct PageScraper {
    client: reqwest::Client,
    max_retries: u32,
    delay: Duration,
}

impl PageScraper {
    /// Client with a 10 second timeout, 3 attempts, 1 second base delay.
    pub fn new() -> Self {
        PageScraper::with_limits(Duration::from_secs(10), 3, Duration::from_secs(1))
    }

    pub fn with_limits(timeout: Duration, max_retries: u32, delay: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        PageScraper {
            client,
            max_retries: max_retries.max(1),
            delay,
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, String> {
        let res = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            return Err(format!("HTTP status {}", res.status()));
        }
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if !content_type.contains("text/html") {
            return Ok(FetchedPage {
                url: url.to_string(),
                success: true,
                title: url.to_string(),
                content: format!("Non-HTML content (Content-Type: {content_type})"),
                error: None,
            });
        }
        let html = res.text().await.map_err(|e| e.to_string())?;
        Ok(FetchedPage {
            url: url.to_string(),
            success: true,
            title: extract_title(&html),
            content: extract_content(&html),
            error: None,
        })
    }
}

impl Default for PageScraper {
    fn default() -> Self {
        PageScraper::new()
    }
}

#[async_trait]
impl PageFetcher for PageScraper {
    async fn fetch(&self, url: &str) -> FetchedPage {
        if !is_valid_url(url) {
            return FetchedPage::failure(url, "invalid URL format");
        }
        let mut last_error = String::new();
        for attempt in 0..self.max_retries {
            match self.fetch_once(url).await {
                Ok(page) => return page,
                Err(err) => {
                    tracing::warn!(url, attempt, error = %err, "page fetch failed");
                    last_error = err;
                    if attempt + 1 < self.max_retries {
                        tokio::time::sleep(self.delay * 2u32.pow(attempt)).await;
                    }
                }
            }
        }
        FetchedPage::failure(url, last_error)
    }
}

fn is_valid_url(url: &str) -> bool {
    let rest = match url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };
    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty()
}

/// `<title>` text, falling back to the first `<h1>`, falling back to a
/// placeholder.
fn extract_title(html: &str) -> String {
    for re in [title_re(), h1_re()] {
        if let Some(caps) = re.captures(html) {
            let text = text_of(&caps[1]);
            if !text.is_empty() {
                return text;
            }
        }
    }
    "No title found".to_string()
}

/// Visible text of the page: boilerplate blocks dropped, tags stripped,
/// entities decoded, whitespace collapsed, truncated with a marker.
fn extract_content(html: &str) -> String {
    let body = dropped_blocks_re().replace_all(html, " ");
    let mut text = text_of(&body);
    if text.chars().count() > MAX_CONTENT_CHARS {
        text = text.chars().take(MAX_CONTENT_CHARS).collect();
        text.push_str("... [content truncated]");
    }
    text
}

fn text_of(html: &str) -> String {
    let stripped = tag_re().replace_all(html, " ");
    let decoded = stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    ws_re().replace_all(&decoded, " ").trim().to_string()
}
