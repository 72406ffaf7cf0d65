//! HTTP client for the upstream site.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use racedocs_config::FetchSettings;
use reqwest::{Client, ClientBuilder, Response};

/// Shared HTTP client; cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let inner = ClientBuilder::new()
            .timeout(settings.timeout())
            .user_agent(&settings.user_agent)
            .gzip(true)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { inner })
    }

    /// Send a GET request, treating any non-2xx response as an error.
    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!(url, "GET");
        let response = self.inner.get(url).send().await.or_raise(|| ErrorKind::Request(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        Ok(response)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.get(url).await?.text().await.or_raise(|| ErrorKind::Request(url.to_string()))
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.get(url).await?.bytes().await.or_raise(|| ErrorKind::Request(url.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(&FetchSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_get_text_sends_user_agent() {
        let server = MockServer::start().await;
        // The header matcher splits on commas, so use an agent without any.
        Mock::given(method("GET"))
            .and(path("/season"))
            .and(header("user-agent", "racedocs-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        let settings = FetchSettings { user_agent: "racedocs-test/1.0".to_string(), ..FetchSettings::default() };
        let client = HttpClient::new(&settings).unwrap();
        let text = client.get_text(&format!("{}/season", server.uri())).await.unwrap();
        assert_eq!(text, "<html></html>");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;
        let err = client().get_bytes(&format!("{}/file.pdf", server.uri())).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Status(503)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        // Nothing listens on a port that was just released.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/gone", listener.local_addr().unwrap());
        drop(listener);
        let err = client().get_bytes(&url).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Request(_)));
    }
}
