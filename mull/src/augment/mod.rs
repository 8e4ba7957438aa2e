//! Augmentation cache: resolves plan search queries into prompt text.
//!
//! Works against the run's two caches (query to hits, url to fetched page).
//! A query is searched at most once per run and a URL fetched at most once;
//! collaborator failures degrade to empty hit lists or tagged fetch failures
//! and never abort the reasoning loop.

use std::collections::HashMap;
use std::sync::Arc;

use crate::search::{FetchedPage, PageFetcher, SearchClient, SearchHit};

/// Search-and-scrape resolver with per-run caching.
pub struct Augmenter {
    search: Arc<dyn SearchClient>,
    fetcher: Arc<dyn PageFetcher>,
    max_urls_per_query: usize,
    max_content_chars: usize,
}

impl Augmenter {
    pub fn new(search: Arc<dyn SearchClient>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Augmenter {
            search,
            fetcher,
            max_urls_per_query: 5,
            max_content_chars: 5000,
        }
    }

    /// URLs fetched per query, after deduplication (builder).
    pub fn with_max_urls_per_query(mut self, max: usize) -> Self {
        self.max_urls_per_query = max;
        self
    }

    /// Page body budget when rendering into a prompt (builder).
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    /// Fills both caches for `queries`: searches each uncached query, then
    /// fetches the uncached result URLs concurrently.
    ///
    /// A failed search logs a warning and caches an empty hit list so the
    /// query is not retried within the run. Fetch outcomes are always cached,
    /// tagged failures included.
    pub async fn resolve(
        &self,
        search_results: &mut HashMap<String, Vec<SearchHit>>,
        scraped: &mut HashMap<String, FetchedPage>,
        queries: &[String],
    ) {
        for query in queries {
            if search_results.contains_key(query) {
                continue;
            }
            let hits = match self.search.search(query).await {
                Ok(hits) => hits,
                Err(err) => {
                    tracing::warn!(query, error = %err, "search failed, caching empty result");
                    Vec::new()
                }
            };
            search_results.insert(query.clone(), hits);
        }

        let mut pending: Vec<String> = Vec::new();
        for query in queries {
            let hits = match search_results.get(query) {
                Some(hits) => hits,
                None => continue,
            };
            for hit in hits.iter().take(self.max_urls_per_query) {
                if hit.url.is_empty()
                    || scraped.contains_key(&hit.url)
                    || pending.contains(&hit.url)
                {
                    continue;
                }
                pending.push(hit.url.clone());
            }
        }

        let fetches = pending.iter().map(|url| self.fetcher.fetch(url));
        for page in futures::future::join_all(fetches).await {
            scraped.insert(page.url.clone(), page);
        }
    }

    /// Renders the cached material for `queries` as prompt text: per query
    /// the hit list, then each fetched page with its body truncated to the
    /// content budget. Empty when nothing is cached for any query.
    pub fn render(
        &self,
        search_results: &HashMap<String, Vec<SearchHit>>,
        scraped: &HashMap<String, FetchedPage>,
        queries: &[String],
    ) -> String {
        let mut out = String::new();
        for query in queries {
            let hits = match search_results.get(query) {
                Some(hits) if !hits.is_empty() => hits,
                _ => continue,
            };
            out.push_str(&format!("Search results for {query:?}:\n"));
            for hit in hits.iter().take(self.max_urls_per_query) {
                out.push_str(&format!(
                    "- {} ({})\n  {}\n",
                    hit.title, hit.url, hit.description
                ));
            }
            for hit in hits.iter().take(self.max_urls_per_query) {
                let page = match scraped.get(&hit.url) {
                    Some(page) => page,
                    None => continue,
                };
                if page.success {
                    out.push_str(&format!(
                        "Content of {} ({}):\n{}\n",
                        page.title,
                        page.url,
                        truncate_chars(&page.content, self.max_content_chars)
                    ));
                } else {
                    out.push_str(&format!(
                        "Could not fetch {}: {}\n",
                        page.url,
                        page.error.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
            out.push('\n');
        }
        out
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("… [truncated]");
    out
}
