//! hyper-util client transport with rustls

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use rustls::{ClientConfig, RootCertStore};
use url::Url;

use super::Transport;
use crate::config::ConfigurationError;
use crate::error::{self, NetworkErrorKind, Result};
use crate::http::{CacheRequest, CacheResponse};

/// HTTP and HTTPS transport over a pooled hyper client
///
/// Redirects are not followed; a 3xx reaches the controller as-is and is
/// never stored.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport trusting the platform's root certificates
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Tls` when the TLS configuration cannot be
    /// built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let native = rustls_native_certs::load_native_certs();
        for err in &native.errors {
            tracing::warn!(
                target: "swcache::transport",
                error = %err,
                "Skipping unreadable platform certificate"
            );
        }

        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(native.certs);
        tracing::debug!(
            target: "swcache::transport",
            added,
            ignored,
            "Loaded platform root certificates"
        );
        if roots.is_empty() {
            tracing::warn!(
                target: "swcache::transport",
                "No platform root certificates; https requests will fail to connect"
            );
        }

        Ok(Self::with_tls_config(timeout, client_config(roots)?))
    }

    /// Create a transport with caller-supplied TLS settings
    ///
    /// Plain `http` URLs are still served without TLS.
    #[must_use]
    pub fn with_tls_config(timeout: Duration, tls: ClientConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, timeout }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, request: &CacheRequest) -> Result<CacheResponse> {
        let url = request.url();

        let mut builder = http::Request::builder()
            .method(request.method().clone())
            .uri(url.as_str());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(request.headers().clone());
        }
        let outgoing = builder
            .body(Empty::<Bytes>::new())
            .map_err(|e| error::invalid_request(format!("cannot build request for {url}: {e}")))?;

        let response = self.client.request(outgoing).await.map_err(|e| {
            let kind = if e.is_connect() {
                NetworkErrorKind::Connect
            } else {
                NetworkErrorKind::Protocol
            };
            error::network(url, kind, e.to_string())
        })?;

        buffer_response(url, response).await
    }
}

/// TLS client settings on the ring provider trusting `roots`
///
/// # Errors
///
/// Returns `ConfigurationError::Tls` when the provider rejects the default
/// protocol versions.
pub fn client_config(roots: RootCertStore) -> Result<ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ConfigurationError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}

/// Read the whole body so the response can be both served and stored
async fn buffer_response(url: &Url, response: http::Response<Incoming>) -> Result<CacheResponse> {
    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| error::network(url, NetworkErrorKind::Protocol, e.to_string()))?
        .to_bytes();

    Ok(CacheResponse::from_parts(parts.status, parts.headers, body).with_url(url.clone()))
}

impl Transport for HttpTransport {
    fn fetch<'a>(&'a self, request: &'a CacheRequest) -> BoxFuture<'a, Result<CacheResponse>> {
        async move {
            match tokio::time::timeout(self.timeout, self.send(request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(error::timeout(request.url(), self.timeout)),
            }
        }
        .boxed()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
