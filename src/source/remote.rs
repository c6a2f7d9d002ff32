//! Transport for calling third-party update sources

use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use reqwest::{Url, redirect};
use tracing::debug;

use crate::config::{FETCH_REDIRECT_LIMIT, FETCH_TIMEOUT_SECS};
use crate::source::error::FetchError;

/// Transport used to call third-party update sources
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SourceTransport: Send + Sync {
    /// Sends a single POST with an empty body and returns the raw response
    /// body.
    async fn post_empty(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed transport with the bounds sources are held to.
///
/// Certificate verification is off: sources sit on plugin-author
/// infrastructure where self-signed and shared-hosting certificates are
/// common. Every other bound is tight: a few seconds of timeout and a
/// capped redirect chain, with no cookie store.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("sideload-updates")
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .redirect(redirect::Policy::limited(FETCH_REDIRECT_LIMIT))
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl SourceTransport for HttpTransport {
    async fn post_empty(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.client.post(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("source {} answered with status {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn source_url(server: &Server, path: &str) -> Url {
        Url::parse(&format!("{}{}", server.url(), path)).unwrap()
    }

    #[tokio::test]
    async fn post_empty_returns_response_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/meta.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"new_version":"1.1"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let body = transport
            .post_empty(&source_url(&server, "/meta.json"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, br#"{"new_version":"1.1"}"#);
    }

    #[tokio::test]
    async fn post_empty_rejects_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/meta.json")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let result = transport.post_empty(&source_url(&server, "/meta.json")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::Status(500))));
    }

    #[tokio::test]
    async fn post_empty_rejects_empty_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/meta.json")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let result = transport.post_empty(&source_url(&server, "/meta.json")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::EmptyBody)));
    }
}
