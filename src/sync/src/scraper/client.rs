//! HTTP client for the draw notice endpoint using reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::parsers::DrawParser;
use super::{draw_notice_query, DrawSource, Throttle};
use crate::config::SourceConfig;
use crate::error::{Result, SyncError};
use crate::types::RawDraw;

/// Draw source backed by the public endpoint
pub struct HttpDrawSource {
    client: Client,
    source: SourceConfig,
    throttle: Throttle,
}

impl HttpDrawSource {
    /// Build the client without touching the network
    pub fn new(source: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(source.timeout())
            .cookie_store(true)
            .default_headers(build_headers(&source.headers)?)
            .build()?;
        let throttle = Throttle::from_config(&source);

        Ok(Self {
            client,
            source,
            throttle,
        })
    }

    /// Build the client and visit the warm-up page so the session has cookies
    pub async fn connect(source: SourceConfig) -> Result<Self> {
        let draw_source = Self::new(source)?;
        draw_source.warm_up().await?;
        Ok(draw_source)
    }

    async fn warm_up(&self) -> Result<()> {
        let Some(ref url) = self.source.warmup_url else {
            return Ok(());
        };

        // Status is not checked; only the cookies matter
        let response = self.client.get(url).send().await?;
        debug!("Warm-up {} returned {}", url, response.status());
        Ok(())
    }
}

#[async_trait]
impl DrawSource for HttpDrawSource {
    async fn fetch_page(&self, page_no: u32) -> Result<Vec<RawDraw>> {
        self.throttle.acquire().await;

        debug!("Fetching page {}", page_no);
        let body = self
            .client
            .get(&self.source.endpoint)
            .query(&draw_notice_query(&self.source, page_no))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let page = DrawParser::parse_page(&body)?;
        if page.state != 0 {
            warn!(
                "Page {} returned state {} ({}), ending pagination",
                page_no,
                page.state,
                page.message.as_deref().unwrap_or("no message")
            );
            return Ok(Vec::new());
        }

        debug!("Page {} returned {} draws", page_no, page.result.len());
        Ok(page.result)
    }
}

/// Convert the configured header map into request headers
pub fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| invalid_header(name, e))?;
        let value = HeaderValue::from_str(value).map_err(|e| invalid_header(name.as_str(), e))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn invalid_header(name: &str, err: impl std::fmt::Display) -> SyncError {
    config::ConfigError::Message(format!("invalid header '{}': {}", name, err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const PAGE_OK: &str = r#"{"state": 0, "message": "查询成功", "result": [
        {"code": "2024124", "date": "2024-10-29(二)", "red": "02,14,15,17,25,30", "blue": "11"}
    ]}"#;

    /// Serve one canned response on a local port
    ///
    /// Returns the endpoint URL and a handle yielding the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{}/findDrawNotice", addr), handle)
    }

    fn local_source(endpoint: String) -> HttpDrawSource {
        HttpDrawSource::new(SourceConfig {
            endpoint,
            warmup_url: None,
            min_delay_secs: 0.0,
            max_delay_secs: 0.0,
            ..SourceConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_and_decodes() {
        let (endpoint, server) = serve_once("200 OK", PAGE_OK).await;
        let source = local_source(endpoint);

        let draws = source.fetch_page(3).await.unwrap();
        let request_line = server.await.unwrap();

        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].code, "2024124");
        assert_eq!(draws[0].red, "02,14,15,17,25,30");
        assert!(request_line.starts_with("GET /findDrawNotice?"));
        assert!(request_line.contains("name=ssq&pageNo=3&pageSize=30&systemType=PC"));
    }

    #[tokio::test]
    async fn test_fetch_page_nonzero_state_is_empty() {
        let (endpoint, server) = serve_once("200 OK", r#"{"state": 1, "message": "busy"}"#).await;
        let source = local_source(endpoint);

        let draws = source.fetch_page(1).await.unwrap();
        server.await.unwrap();

        assert!(draws.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_server_error() {
        let (endpoint, server) = serve_once("500 Internal Server Error", "oops").await;
        let source = local_source(endpoint);

        let err = source.fetch_page(1).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, SyncError::Request(_)));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_fetch_page_non_json_body() {
        let (endpoint, server) = serve_once("200 OK", "<html>blocked</html>").await;
        let source = local_source(endpoint);

        let err = source.fetch_page(1).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_build_default_headers() {
        let headers = build_headers(&SourceConfig::default().headers).unwrap();

        assert_eq!(headers.len(), 5);
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
        assert!(headers["referer"].to_str().unwrap().starts_with("https://www.cwl.gov.cn/"));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "x".to_string());

        let err = build_headers(&headers).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_new_does_not_need_network() {
        let source = HttpDrawSource::new(SourceConfig::default());
        assert!(source.is_ok());
    }
}
