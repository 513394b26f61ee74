use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::{get_text_with_retry, TextSource};

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d/";
const INITIAL_BACKOFF_MS: u64 = 500;

/// Public CSV export link for one tab of a shared spreadsheet.
pub fn export_url(spreadsheet_id: &str, gid: &str) -> Result<Url> {
    let mut url = Url::parse(EXPORT_BASE)?
        .join(&format!("{}/export", spreadsheet_id))
        .with_context(|| format!("building export URL for sheet {}", spreadsheet_id))?;
    url.query_pairs_mut()
        .append_pair("format", "csv")
        .append_pair("gid", gid);
    Ok(url)
}

/// HTTP client for upstream fetches. Every request is cut off after `timeout`
/// so a host that never answers surfaces as an error instead of a hang.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

/// Plain HTTP GET of a CSV export, retried on connection errors.
pub struct HttpSource {
    client: Client,
    url: Url,
    max_retries: u32,
}

impl HttpSource {
    pub fn new(client: Client, url: Url, max_retries: u32) -> Self {
        Self {
            client,
            url,
            max_retries,
        }
    }
}

impl TextSource for HttpSource {
    fn fetch_text(&self) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            get_text_with_retry(&self.client, &self.url, self.max_retries, INITIAL_BACKOFF_MS)
                .await
                .with_context(|| format!("Failed to fetch spreadsheet {}", self.url))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local server answering every request with `status_line`; returns its
    /// base URL and a hit counter.
    async fn serve_status(status_line: &'static str) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = sock.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    status_line
                );
                let _ = sock.write_all(resp.as_bytes()).await;
            }
        });
        let url = Url::parse(&format!("http://{}/export", addr)).unwrap();
        (url, hits)
    }

    #[test]
    fn test_export_url() {
        let url = export_url("1jYhSlvDi9_w23T1Oy6EOTQC0xVrTcuRZtYgw4a8N5bE", "0").unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/1jYhSlvDi9_w23T1Oy6EOTQC0xVrTcuRZtYgw4a8N5bE/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_export_url_keeps_id_inside_path() {
        let url = export_url("abc", "123").unwrap();
        assert_eq!(url.path(), "/spreadsheets/d/abc/export");
        assert_eq!(url.query(), Some("format=csv&gid=123"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let url = Url::parse("http://127.0.0.1:9/export").unwrap();
        let source = HttpSource::new(Client::new(), url, 0);
        let err = source.fetch_text().await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch spreadsheet"));
    }

    #[tokio::test]
    async fn test_http_status_fails_without_retry() {
        let (url, hits) = serve_status("500 Internal Server Error").await;
        let client = build_client(Duration::from_secs(5)).unwrap();
        let source = HttpSource::new(client, url, 3);

        let err = source.fetch_text().await.unwrap_err();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(format!("{:#}", err).contains("500"), "error: {:#}", err);
    }
}
