use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use rcgen::{CertificateParams, KeyPair, SanType};
use rustls::RootCertStore;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use swcache_client::prelude::*;
use swcache_client::transport::client_config;

const BODY: &str = r#"{"USD":1.0}"#;

fn self_signed() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let key_pair = KeyPair::generate().unwrap();
    let mut params = CertificateParams::default();
    params.subject_alt_names = vec![SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST))];
    let cert = params.self_signed(&key_pair).unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
    (CertificateDer::from(cert.der().to_vec()), key)
}

/// Answer one HTTP/1.1 request with a fixed JSON body
async fn respond<S: AsyncRead + AsyncWrite + Unpin>(mut stream: S) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
    }
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{BODY}",
        BODY.len()
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    let _ = stream.shutdown().await;
}

async fn tls_origin(cert: CertificateDer<'static>, key: PrivateKeyDer<'static>) -> SocketAddr {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(stream) = acceptor.accept(socket).await {
                    respond(stream).await;
                }
            });
        }
    });
    addr
}

async fn plain_origin() -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(respond(socket));
        }
    });
    addr
}

fn transport_trusting(cert: Option<CertificateDer<'static>>) -> HttpTransport {
    let mut roots = RootCertStore::empty();
    if let Some(cert) = cert {
        roots.add(cert).unwrap();
    }
    HttpTransport::with_tls_config(Duration::from_secs(5), client_config(roots).unwrap())
}

#[tokio::test]
async fn fetches_https_origin() {
    let (cert, key) = self_signed();
    let addr = tls_origin(cert.clone(), key).await;
    let transport = transport_trusting(Some(cert));

    let request = CacheRequest::parse(Method::GET, &format!("https://{addr}/currency-rates.json")).unwrap();
    let response = transport.fetch(&request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().as_ref(), BODY.as_bytes());
    assert_eq!(response.url().map(|u| u.scheme()), Some("https"));
}

#[tokio::test]
async fn untrusted_certificate_is_a_network_error() {
    let (cert, key) = self_signed();
    let addr = tls_origin(cert, key).await;
    let transport = transport_trusting(None);

    let request = CacheRequest::parse(Method::GET, &format!("https://{addr}/currency-rates.json")).unwrap();
    let err = transport.fetch(&request).await.unwrap_err();

    assert!(err.is_network(), "unexpected error: {err}");
}

#[tokio::test]
async fn same_transport_still_speaks_plain_http() {
    let addr = plain_origin().await;
    let transport = transport_trusting(None);

    let request = CacheRequest::parse(Method::GET, &format!("http://{addr}/currency-rates.json")).unwrap();
    let response = transport.fetch(&request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().as_ref(), BODY.as_bytes());
}

#[tokio::test]
async fn platform_roots_transport_builds() {
    assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
}
