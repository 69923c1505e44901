use crate::error::{ClonerError, Result};
use crate::models::{Page, RateLimitState};
use crate::types::{Organization, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

pub const PER_PAGE: u32 = 100;
const MAX_RETRIES: u32 = 3;
const MAX_RATE_LIMIT_WAITS: u32 = 3;

/// Anything that can return one page of a GitHub collection endpoint.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<Page>;
}

pub struct GitHubClient {
    client: Client,
    token: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gh-org-clone/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient { client, token })
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut retries = 0;
        let mut rate_limit_waits = 0;

        loop {
            debug!(url, "GET");
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/vnd.github+json")
                .header(AUTHORIZATION, format!("Bearer {}", self.token))
                .send()
                .await?;

            let rate_limit = rate_limit_state(response.headers());

            match response.status() {
                status if status.is_success() => {
                    if let Some(state) = &rate_limit {
                        debug!(remaining = state.remaining, limit = state.limit, "Rate limit");
                        if state.remaining < 10 {
                            warn!("Rate limit low ({} remaining)", state.remaining);
                        }
                    }
                    return Ok(response);
                }
                reqwest::StatusCode::NOT_FOUND => {
                    return Err(ClonerError::NotFound(url.to_string()));
                }
                reqwest::StatusCode::UNAUTHORIZED => {
                    return Err(ClonerError::AuthError(
                        "GitHub rejected the token (401 Unauthorized)".to_string(),
                    ));
                }
                reqwest::StatusCode::FORBIDDEN
                    if rate_limit.as_ref().map(|s| s.is_limited).unwrap_or(false) =>
                {
                    let reset_time = rate_limit
                        .map(|s| SystemTime::from(s.reset_time))
                        .unwrap_or_else(SystemTime::now);
                    let wait_time = reset_time
                        .duration_since(SystemTime::now())
                        .unwrap_or(Duration::from_secs(0));

                    if wait_time > Duration::from_secs(60) || rate_limit_waits >= MAX_RATE_LIMIT_WAITS {
                        return Err(ClonerError::RateLimitExceeded(format!(
                            "API rate limit exceeded. Reset at: {}",
                            DateTime::<Utc>::from(reset_time)
                        )));
                    }
                    warn!("Rate limit reached. Waiting {} seconds...", wait_time.as_secs() + 1);
                    sleep(wait_time + Duration::from_secs(1)).await;
                    rate_limit_waits += 1;
                }
                status if status.is_server_error() && retries < MAX_RETRIES => {
                    warn!("Server error ({}). Retrying in 2 seconds...", status);
                    sleep(Duration::from_secs(2)).await;
                    retries += 1;
                }
                status => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(ClonerError::ApiError(format!(
                        "API request failed with status {}: {}",
                        status, error_text
                    )));
                }
            }
        }
    }
}

#[async_trait]
impl PageSource for GitHubClient {
    async fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self.make_request(url).await?;
        let link = response
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;
        let records: Vec<Value> = serde_json::from_str(&body)?;
        Ok(Page::new(records, link))
    }
}

/// Rate limit state from response headers, `None` when the server sends none.
pub fn rate_limit_state(headers: &HeaderMap) -> Option<RateLimitState> {
    let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

    let remaining = header("X-RateLimit-Remaining")?.parse::<u32>().ok()?;

    let limit = header("X-RateLimit-Limit")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(5000);

    let reset_time = header("X-RateLimit-Reset")
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    Some(RateLimitState {
        remaining,
        limit,
        reset_time,
        is_limited: remaining == 0,
    })
}

/// Extract the `rel="next"` URL from a `Link` header.
///
/// Entries look like `<https://...>; rel="next"` and are comma separated.
/// Order does not matter, so a leading `rel="prev"` entry is skipped.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?;

        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });
        if !is_next {
            return None;
        }

        let url = target.trim().trim_matches(|c| c == '<' || c == '>' || c == ' ');
        (!url.is_empty()).then(|| url.to_string())
    })
}

/// Walk a paginated collection starting at `url`, appending every page's
/// records to `dest` in arrival order. Returns the number of pages fetched.
///
/// The walk stops when there is no next link, when the next link points back
/// at the page just fetched, or after `max_pages` pages.
pub async fn fetch_all<S>(source: &S, url: &str, max_pages: usize, dest: &mut Vec<Value>) -> Result<usize>
where
    S: PageSource + ?Sized,
{
    let mut current = url.to_string();
    let mut pages = 0;

    loop {
        let page = source.fetch_page(&current).await?;
        pages += 1;
        debug!(url = %current, records = page.records.len(), page = pages, "Fetched page");

        let next = page.next_url();
        dest.extend(page.records);

        match next {
            None => break,
            Some(next) if next == current => {
                debug!("Next link points at the current page, stopping");
                break;
            }
            Some(next) if pages >= max_pages => {
                warn!("Stopped after {} pages, {} not fetched", pages, next);
                break;
            }
            Some(next) => current = next,
        }
    }

    Ok(pages)
}

/// Organizations of the authenticated user.
///
/// Only the first page (up to 100 organizations) is fetched.
pub async fn list_organizations<S>(source: &S, api_url: &str) -> Result<Vec<Organization>>
where
    S: PageSource + ?Sized,
{
    let url = collection_url(api_url, &["user", "orgs"])?;
    let page = source.fetch_page(&url).await?;

    if page.next_url().is_some() {
        warn!("More than {} organizations; only the first page is listed", PER_PAGE);
    }

    Ok(decode_records(page.records, "organization"))
}

/// Every repository of `org`, following pagination.
pub async fn list_org_repositories<S>(
    source: &S,
    api_url: &str,
    org: &str,
    max_pages: usize,
) -> Result<Vec<Repository>>
where
    S: PageSource + ?Sized,
{
    let url = collection_url(api_url, &["orgs", org, "repos"])?;
    let mut records = Vec::new();
    fetch_all(source, &url, max_pages, &mut records).await?;

    Ok(decode_records(records, "repository"))
}

/// First page URL of a collection endpoint under `api_url`.
///
/// Each segment is percent-encoded on its own, so `/`, `?` or `#` inside an
/// organization login cannot change which endpoint is called.
pub fn collection_url(api_url: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(api_url)
        .map_err(|e| ClonerError::ConfigError(format!("invalid API URL '{}': {}", api_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| ClonerError::ConfigError(format!("invalid API URL '{}'", api_url)))?
        .pop_if_empty()
        .extend(segments);
    url.set_query(Some(&format!("per_page={}&page=1", PER_PAGE)));

    Ok(url.into())
}

fn decode_records<T: DeserializeOwned>(records: Vec<Value>, kind: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<T>(record) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping {} record: {}", kind, e);
                None
            }
        })
        .collect()
}
