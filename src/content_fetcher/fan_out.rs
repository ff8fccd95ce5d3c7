//! Bounded concurrent fetching

use futures::StreamExt;
use futures::stream;
use tracing::info;

use super::PageFetcher;
use crate::evidence::FetchedContent;

/// Fetch every URL with at most `concurrency` requests in flight
///
/// Results come back in input order. A failed fetch is just a failed
/// [`FetchedContent`]; it never cancels its siblings.
pub async fn fetch_all<F>(fetcher: &F, urls: &[String], concurrency: usize) -> Vec<FetchedContent>
where
    F: PageFetcher,
{
    if urls.is_empty() {
        return Vec::new();
    }

    let contents: Vec<FetchedContent> = stream::iter(urls)
        .map(|url| fetcher.fetch(url))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let succeeded = contents.iter().filter(|c| c.success()).count();
    info!(
        requested = urls.len(),
        succeeded,
        failed = urls.len() - succeeded,
        "Fetch batch completed"
    );
    contents
}
