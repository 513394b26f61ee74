// src/fetch/mod.rs
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

pub mod cache;
pub mod sheet;

pub use cache::Revalidating;
pub use sheet::{build_client, export_url, HttpSource};

/// Anything that can hand back the raw CSV text of the opportunities sheet.
pub trait TextSource: Send + Sync {
    fn fetch_text(&self) -> BoxFuture<'_, Result<String>>;
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

/// Connection-level failures are worth another attempt; an HTTP status is not.
fn is_transient(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<reqwest::Error>() {
        Some(e) => e.status().is_none(),
        None => false,
    }
}

pub(crate) async fn get_text_with_retry(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff_ms: u64,
) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < max_retries && is_transient(&e) => {
                attempts += 1;
                let backoff = initial_backoff_ms * 2u64.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                error!(%url, attempts, error = %e, "Giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_reqwest_errors_are_not_transient() {
        let err = anyhow::anyhow!("boom");
        assert!(!is_transient(&err));
    }

    #[tokio::test]
    async fn test_unreachable_host_gives_up() {
        // port 9 on localhost: nothing listens there, connection is refused
        let url = Url::parse("http://127.0.0.1:9/sheet.csv").unwrap();
        let res = get_text_with_retry(&Client::new(), &url, 1, 1).await;
        assert!(res.is_err());
    }
}
