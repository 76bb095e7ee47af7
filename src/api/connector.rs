//! HTTP connector for JSON APIs.

use crate::error::FetchError;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Something that turns an endpoint path into a parsed JSON payload.
pub trait JsonApi: Send + Sync {
    /// Request `endpoint` (relative to the API root) and parse the response.
    fn request<'a>(&'a self, endpoint: &'a str) -> BoxFuture<'a, Result<Value, FetchError>>;
}

/// [`JsonApi`] over plain HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpConnector {
    /// Create a connector rooted at `base_url`.
    ///
    /// A trailing `/` is appended when missing so endpoints can be given
    /// without a leading slash.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            http_client,
        })
    }

    /// Full URL for an endpoint.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl JsonApi for HttpConnector {
    fn request<'a>(&'a self, endpoint: &'a str) -> BoxFuture<'a, Result<Value, FetchError>> {
        async move {
            let url = self.url_for(endpoint);
            debug!("GET {}", url);

            let response = self
                .http_client
                .get(&url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(FetchError::UnexpectedStatus {
                    code: status.as_u16(),
                    url,
                });
            }

            let body = response.text().await?;
            debug!("Received {} bytes from {}", body.len(), url);

            Ok(serde_json::from_str(&body)?)
        }
        .boxed()
    }
}

fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the API root URL.
    async fn serve_once(status_code: u16, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0; 4096];
                let _ = socket.read(&mut buf).await;

                let reason = match status_code {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_code,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/api", addr)
    }

    #[tokio::test]
    async fn test_not_found_is_unexpected_status() {
        let base = serve_once(404, "404 NotFound - Not Found - Brak danych").await;
        let connector = HttpConnector::new(&base, 5).unwrap();

        let err = connector.request("cenyzlota/2020-01-01").await.unwrap_err();

        match err {
            FetchError::UnexpectedStatus { code, url } => {
                assert_eq!(code, 404);
                assert_eq!(url, format!("{}/cenyzlota/2020-01-01", base));
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected_status() {
        let base = serve_once(500, "").await;
        let connector = HttpConnector::new(&base, 5).unwrap();

        let err = connector.request("cenyzlota").await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_invalid_body_is_payload_error() {
        let base = serve_once(200, "abc").await;
        let connector = HttpConnector::new(&base, 5).unwrap();

        let err = connector.request("cenyzlota").await.unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_json_body_is_parsed() {
        let base = serve_once(200, r#"[{"data": "2020-01-02", "cena": 201.59}]"#).await;
        let connector = HttpConnector::new(&base, 5).unwrap();

        let payload = connector.request("cenyzlota/2020-01-02").await.unwrap();
        assert_eq!(payload[0]["cena"], 201.59);
        assert_eq!(payload.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_url_for_joins_with_single_slash() {
        let connector = HttpConnector::new("http://api.nbp.pl/api", 5).unwrap();
        assert_eq!(
            connector.url_for("cenyzlota/2020-01-02"),
            "http://api.nbp.pl/api/cenyzlota/2020-01-02"
        );
        assert_eq!(
            connector.url_for("/cenyzlota"),
            "http://api.nbp.pl/api/cenyzlota"
        );
    }

    #[test]
    fn test_base_url_kept_when_already_terminated() {
        assert_eq!(
            normalize_base_url("http://api.nbp.pl/api/"),
            "http://api.nbp.pl/api/"
        );
    }
}
