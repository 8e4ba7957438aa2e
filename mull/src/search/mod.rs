//! External information collaborators: web search and page fetching.
//!
//! Both boundaries are traits so the augmenter can be tested against stubs.
//! Failure semantics differ deliberately: a search failure surfaces as a
//! `SearchError` (the augmenter recovers it as an empty result list), while a
//! page fetch never errors and always returns a tagged [`FetchedPage`].

mod qwant;
mod scrape;

pub use qwant::QwantSearch;
pub use scrape::PageScraper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One web search result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Host of the result's source, scheme and path stripped.
    pub domain: String,
    pub description: String,
}

/// Search collaborator failure. Never aborts a run; the augmenter records an
/// empty result list for the failed query.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Service unreachable, timed out, or returned a non-success status.
    #[error("search transport error: {0}")]
    Transport(String),

    /// The service answered but reported an error payload.
    #[error("search API error: {0}")]
    Api(String),

    /// A request parameter outside the service's accepted range.
    #[error("invalid search parameter: {0}")]
    InvalidParam(String),
}

/// Web search boundary.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// Outcome of fetching one page, success or not.
///
/// `success` is the only discriminator: on failure `error` names the cause
/// and `content` is empty. Prompts render failed fetches too, so the model
/// can see which sources were unavailable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub success: bool,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchedPage {
    /// A tagged failure for `url`.
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        FetchedPage {
            url: url.into(),
            success: false,
            title: String::new(),
            content: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Page fetch boundary. Infallible by contract: implementations fold every
/// failure into a tagged [`FetchedPage`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchedPage;
}
