//! Live menu retrieval from the KAIST campus website
//!
//! [`MenuFetcher`] is the seam the resolver calls on a cache miss.
//! [`KaistFetcher`] is the production implementation: one GET per lookup,
//! no retries, the page parsed down to [`MenuData`](crate::menu::MenuData)
//! and returned in its cache text form.

pub mod parser;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use thiserror::Error;

use crate::cafeteria::Cafeteria;
use parser::parse_menu_page;

/// Menu page on the campus website
const MENU_BASE_URL: &str = "https://www.kaist.ac.kr/kr/html/campus/053001.html";

/// Errors that can occur when fetching a menu
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Response did not contain a menu
    #[error("unexpected response: {0}")]
    UnexpectedShape(String),
}

/// Retrieves the menu text for a cafeteria on a given day
#[async_trait(?Send)]
pub trait MenuFetcher {
    async fn fetch(&self, cafeteria: Cafeteria, date: NaiveDate) -> Result<String, FetchError>;
}

/// Client for the KAIST cafeteria menu page
#[derive(Debug, Clone)]
pub struct KaistFetcher {
    client: Client,
    /// Base URL for the page (allows override for testing)
    base_url: String,
}

impl KaistFetcher {
    /// Creates a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Self::with_base_url(MENU_BASE_URL.to_string(), timeout)
    }

    /// Creates a fetcher against a custom base URL
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kaistmenu/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// URL of the menu page for `cafeteria` on `date`
    pub fn menu_url(&self, cafeteria: Cafeteria, date: NaiveDate) -> String {
        format!(
            "{}?dvs_cd={}&stt_dt={}",
            self.base_url,
            cafeteria.remote_code(),
            date.format("%Y-%m-%d")
        )
    }
}

#[async_trait(?Send)]
impl MenuFetcher for KaistFetcher {
    async fn fetch(&self, cafeteria: Cafeteria, date: NaiveDate) -> Result<String, FetchError> {
        let url = self.menu_url(cafeteria, date);
        tracing::info!(%cafeteria, %date, %url, "fetching menu");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let html = response.text().await?;
        let menu = parse_menu_page(&html)
            .ok_or_else(|| FetchError::UnexpectedShape("no menu table on the page".to_string()))?;

        if menu.is_empty() {
            tracing::debug!(%cafeteria, %date, "menu page lists no dishes");
        }
        Ok(menu.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const MENU_PAGE: &str = r#"<html><body><table class="table"><tbody><tr>
        <td>Toast</td><td>Rice<br>Soup</td><td>Noodles</td>
        </tr></tbody></table></body></html>"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// Serves a single canned HTTP response and returns the base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/menu.html", addr)
    }

    #[test]
    fn test_menu_url_uses_remote_code_and_date() {
        let fetcher = KaistFetcher::new(Duration::from_secs(10)).unwrap();
        let url = fetcher.menu_url(Cafeteria::N6, date());
        assert_eq!(
            url,
            "https://www.kaist.ac.kr/kr/html/campus/053001.html?dvs_cd=emp&stt_dt=2024-03-01"
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_menu_page() {
        let base_url = serve_once("HTTP/1.1 200 OK", MENU_PAGE).await;
        let fetcher = KaistFetcher::with_base_url(base_url, Duration::from_secs(5)).unwrap();

        let text = fetcher.fetch(Cafeteria::West, date()).await.expect("fetch should succeed");

        assert_eq!(text, "[breakfast]\nToast\n[lunch]\nRice\nSoup\n[dinner]\nNoodles\n");
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let base_url = serve_once("HTTP/1.1 503 Service Unavailable", "down").await;
        let fetcher = KaistFetcher::with_base_url(base_url, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch(Cafeteria::N6, date()).await.unwrap_err();

        match err {
            FetchError::Status { status, url } => {
                assert_eq!(status, 503);
                assert!(url.contains("dvs_cd=emp"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_page_without_menu() {
        let base_url = serve_once("HTTP/1.1 200 OK", "<html><body>maintenance</body></html>").await;
        let fetcher = KaistFetcher::with_base_url(base_url, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch(Cafeteria::N6, date()).await.unwrap_err();

        assert!(matches!(err, FetchError::UnexpectedShape(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fetcher =
            KaistFetcher::with_base_url(format!("http://{}/", addr), Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch(Cafeteria::N6, date()).await.unwrap_err();

        assert!(matches!(err, FetchError::Request(_)));
    }
}
