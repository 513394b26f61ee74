use anyhow::Result;
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use super::TextSource;

struct Cached {
    body: String,
    fetched_at: Instant,
}

/// Serves the last successful body for `ttl`, then fetches again.
///
/// The lock is held across the refetch so concurrent requests share one
/// upstream call. Failures are not cached and never fall back to a stale body.
pub struct Revalidating<S> {
    inner: S,
    ttl: Duration,
    cached: Mutex<Option<Cached>>,
}

impl<S: TextSource> Revalidating<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Mutex::new(None),
        }
    }

    async fn get(&self) -> Result<String> {
        let mut slot = self.cached.lock().await;
        if let Some(c) = slot.as_ref() {
            if c.fetched_at.elapsed() < self.ttl {
                debug!(age = ?c.fetched_at.elapsed(), "serving cached sheet");
                return Ok(c.body.clone());
            }
        }

        let body = self.inner.fetch_text().await?;
        info!(bytes = body.len(), "fetched sheet");
        *slot = Some(Cached {
            body: body.clone(),
            fetched_at: Instant::now(),
        });
        Ok(body)
    }
}

impl<S: TextSource> TextSource for Revalidating<S> {
    fn fetch_text(&self) -> BoxFuture<'_, Result<String>> {
        Box::pin(self.get())
    }
}
