//! The fetch module retrieves the raw HTML of the source webpage,
//! short-circuiting through the response cache when the URL was fetched
//! before.

use anyhow::{Context, Result};
use log::{debug, info};
use url::Url;

use crate::storage::{FETCH_OP, ResponseCache};

/// Fetches the raw response body for `url`, consulting the cache first.
///
/// On a cache miss the page is requested once, a non-2xx status is treated
/// as a failure, and the body is stored under the URL before being returned.
/// No retries; a failed fetch aborts the run.
///
/// # Arguments
///
/// * `client` - The HTTP client to use for the request
/// * `cache` - The response cache keyed by URL
/// * `url` - The URL of the webpage to fetch
///
/// # Errors
///
/// Returns an error if:
/// * The resource cannot be retrieved (unreachable host, timeout)
/// * The response status is not a success
/// * Cache operations fail
pub async fn fetch_page(
    client: &reqwest::Client,
    cache: &dyn ResponseCache,
    url: &Url,
) -> Result<String> {
    if let Some(body) = cache.lookup(FETCH_OP, url.as_str())? {
        debug!("Cache hit for {url}");
        return Ok(body);
    }

    info!("Fetching {url}");
    let response = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("Failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("Request to {url} returned an error status"))?;

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {url}"))?;

    cache.store(FETCH_OP, url.as_str(), &body)?;

    Ok(body)
}
