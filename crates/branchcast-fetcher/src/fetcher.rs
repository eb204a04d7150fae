//! HTTP implementation of `ArticleSource`

use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::extract::extract_text;
use async_trait::async_trait;
use branchcast_domain::traits::ArticleSource;
use branchcast_domain::ArticleText;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, info};

/// Fetches articles with a single GET request
pub struct HttpArticleFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl HttpArticleFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Parse and check a locator
    pub fn parse_locator(locator: &str) -> Result<Url, FetchError> {
        let url = Url::parse(locator.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", locator, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FetchError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                other, locator
            ))),
        }
    }
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

#[async_trait]
impl ArticleSource for HttpArticleFetcher {
    type Error = FetchError;

    async fn fetch(&self, locator: &str) -> Result<ArticleText, Self::Error> {
        let url = Self::parse_locator(locator)?;

        info!("Fetching article from {}", url);

        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_textual(content_type) {
                return Err(FetchError::Unparseable(format!(
                    "content type '{}' is not a document",
                    content_type
                )));
            }
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.config.max_document_bytes {
                return Err(FetchError::Unparseable(format!(
                    "document is {} bytes (max: {})",
                    len, self.config.max_document_bytes
                )));
            }
        }

        // Chunked responses carry no Content-Length; stop reading past the cap
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > self.config.max_document_bytes {
                return Err(FetchError::Unparseable(format!(
                    "document exceeds {} bytes",
                    self.config.max_document_bytes
                )));
            }
        }
        let body = String::from_utf8_lossy(&bytes);

        debug!("Fetched {} bytes from {}", bytes.len(), url);

        let text = ArticleText::new(extract_text(&body)).ok_or(FetchError::EmptyContent)?;

        info!("Extracted {} chars from {}", text.char_count(), url);

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpArticleFetcher {
        HttpArticleFetcher::new(FetcherConfig::default()).unwrap()
    }

    async fn serve(route: &str, template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_parse_locator_rejects_bad_urls() {
        assert!(matches!(
            HttpArticleFetcher::parse_locator("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpArticleFetcher::parse_locator("ftp://example.com/a"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(HttpArticleFetcher::parse_locator("https://example.com/a").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_extracts_body_text() {
        let server = serve(
            "/news/1",
            ResponseTemplate::new(200).set_body_raw(
                "<html><body><h1>Flood relief</h1><p>Volunteers   arrived.</p></body></html>",
                "text/html; charset=utf-8",
            ),
        )
        .await;

        let text = fetcher()
            .fetch(&format!("{}/news/1", server.uri()))
            .await
            .unwrap();
        assert_eq!(text.as_str(), "Flood relief Volunteers arrived.");
    }

    #[tokio::test]
    async fn test_empty_page_is_fetch_error() {
        let server = serve(
            "/empty-page",
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>   </body></html>", "text/html"),
        )
        .await;

        let result = fetcher()
            .fetch(&format!("{}/empty-page", server.uri()))
            .await;
        assert!(matches!(result, Err(FetchError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = serve("/gone", ResponseTemplate::new(404)).await;

        let result = fetcher().fetch(&format!("{}/gone", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_binary_content_is_unparseable() {
        let server = serve(
            "/image",
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "image/png"),
        )
        .await;

        let result = fetcher().fetch(&format!("{}/image", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Unparseable(_))));
    }

    #[tokio::test]
    async fn test_oversized_document_is_rejected() {
        let server = serve(
            "/big",
            ResponseTemplate::new(200).set_body_raw("<body>".to_string() + &"a".repeat(200), "text/html"),
        )
        .await;

        let fetcher = HttpArticleFetcher::new(FetcherConfig {
            max_document_bytes: 100,
            ..FetcherConfig::default()
        })
        .unwrap();
        let result = fetcher.fetch(&format!("{}/big", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Unparseable(_))));
    }

    /// One-shot server sending a chunked body with no Content-Length
    async fn serve_chunked(chunk: &'static str, count: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;

            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nTransfer-Encoding: chunked\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            for _ in 0..count {
                let frame = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
                if socket.write_all(frame.as_bytes()).await.is_err() {
                    return;
                }
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
        });

        format!("http://{}/article", addr)
    }

    #[tokio::test]
    async fn test_chunked_document_over_cap_is_rejected() {
        let url = serve_chunked("<p>aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa</p>", 200).await;

        let fetcher = HttpArticleFetcher::new(FetcherConfig {
            max_document_bytes: 1_000,
            ..FetcherConfig::default()
        })
        .unwrap();
        let result = fetcher.fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Unparseable(msg)) if msg.contains("1000")));
    }

    #[tokio::test]
    async fn test_chunked_document_under_cap_is_read() {
        let url = serve_chunked("<p>word</p>", 3).await;

        let text = fetcher().fetch(&url).await.unwrap();
        assert_eq!(text.as_str(), "word word word");
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let server = serve(
            "/slow",
            ResponseTemplate::new(200)
                .set_body_raw("<body>late</body>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let fetcher = HttpArticleFetcher::new(FetcherConfig {
            timeout_secs: 1,
            ..FetcherConfig::default()
        })
        .unwrap();
        let result = fetcher.fetch(&format!("{}/slow", server.uri())).await;
        assert!(matches!(result, Err(FetchError::Timeout)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let result = fetcher().fetch("http://127.0.0.1:1/article").await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }
}
