//! Reqwest-backed transport with connection pooling
//!
//! The body is read as a chunk stream so that every chunk surfaces as a
//! `Loading` state change.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use super::{HttpRequest, HttpTransport, ReadyState, StateNotifier};
use crate::constants::{
    HTTP_CONNECT_TIMEOUT_SECS, HTTP_POOL_IDLE_TIMEOUT_SECS, HTTP_POOL_MAX_IDLE_PER_HOST,
};
use crate::error::Result;

/// Settings of the HTTP client used for service requests
///
/// - Connection pooling with keep-alive for repeated calls to one host
/// - A connect timeout only: once connected, an exchange may take as long as
///   the service needs
fn client_builder() -> ClientBuilder {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
}

fn build_client() -> Client {
    client_builder().build().unwrap_or_else(|_| Client::new())
}

/// [`HttpTransport`] sending requests with `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default pooled client
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    /// Create a transport around an existing client
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn exchange(
        &self,
        request: HttpRequest,
        notify: StateNotifier,
    ) -> BoxFuture<'static, Result<String>> {
        let client = self.client.clone();

        async move {
            let response = client
                .request(request.method, &request.url)
                .header(CONTENT_TYPE, request.content_type)
                .body(request.body)
                .send()
                .await?;
            notify(ReadyState::HeadersReceived);

            // Status is not interpreted, the body goes to the caller either way
            let status = response.status();
            debug!("Service answered with HTTP {}", status);

            let mut body = Vec::new();
            let mut chunks = response.bytes_stream();
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(chunk) => {
                        notify(ReadyState::Loading);
                        body.extend_from_slice(&chunk);
                    }
                    Err(e) => {
                        // Keep what arrived, the caller gets the partial text
                        warn!("Response body cut short after {} bytes: {}", body.len(), e);
                        break;
                    }
                }
            }

            Ok(String::from_utf8_lossy(&body).into_owned())
        }
        .boxed()
    }
}
