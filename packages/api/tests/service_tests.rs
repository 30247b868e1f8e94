//! End-to-end resolution against an in-process axum origin

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode as AxumStatus, Uri, header};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::FutureExt;
use futures::future::BoxFuture;
use swcache::error::{self, NetworkErrorKind};
use swcache::*;
use url::Url;

#[derive(Clone, Default)]
struct Origin {
    rates_hits: Arc<AtomicUsize>,
}

async fn rates(State(origin): State<Origin>) -> impl IntoResponse {
    let revision = origin.rates_hits.fetch_add(1, Ordering::SeqCst) + 1;
    (
        [
            (header::CACHE_CONTROL, "public,max-age=60"),
            (header::CONTENT_TYPE, "application/json"),
        ],
        format!(r#"{{"USD":1.0,"revision":{revision}}}"#),
    )
}

async fn page(uri: Uri) -> impl IntoResponse {
    (
        [
            (header::CACHE_CONTROL, "max-age=600"),
            (header::CONTENT_TYPE, "text/html"),
        ],
        format!("<html>{}</html>", uri.path()),
    )
}

async fn spawn_origin() -> (String, Origin) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let origin = Origin::default();
    let app = Router::new()
        .route("/currency-rates.json", get(rates))
        .route("/missing", get(|| async { AxumStatus::NOT_FOUND }))
        .fallback(page)
        .with_state(origin.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/"), origin)
}

/// HTTP transport that can be switched off to simulate losing the network
struct Switchable {
    inner: HttpTransport,
    down: Arc<AtomicBool>,
}

impl Switchable {
    fn new() -> (Self, Arc<AtomicBool>) {
        let down = Arc::new(AtomicBool::new(false));
        let transport = Self {
            inner: HttpTransport::new(Duration::from_secs(5)).unwrap(),
            down: Arc::clone(&down),
        };
        (transport, down)
    }
}

impl Transport for Switchable {
    fn fetch<'a>(&'a self, request: &'a CacheRequest) -> BoxFuture<'a, swcache::Result<CacheResponse>> {
        if self.down.load(Ordering::SeqCst) {
            let url: &Url = request.url();
            let err = error::network(url, NetworkErrorKind::Connect, "network switched off");
            return async move { Err(err) }.boxed();
        }
        self.inner.fetch(request)
    }
}

fn revision(response: &CacheResponse) -> u64 {
    let json: serde_json::Value = serde_json::from_slice(response.bytes()).unwrap();
    json["revision"].as_u64().unwrap()
}

#[tokio::test]
async fn install_activate_and_serve_from_cache() {
    let (base, origin) = spawn_origin().await;
    let cache = ServiceCache::builder()
        .generation("v2")
        .origin(&base)
        .build()
        .unwrap();

    let report = cache.start().await.unwrap();
    assert!(report.is_clean());
    assert!(report.navigation_preload);
    assert_eq!(origin.rates_hits.load(Ordering::SeqCst), 1);

    let request = cache.request("/currency-rates.json").unwrap().build();
    let resolution = cache.resolve_detailed(&request, None).await.unwrap();
    assert!(matches!(resolution, Resolution::Fresh(_)));
    assert_eq!(revision(resolution.response()), 1);

    cache.wait_for_refreshes().await;
    assert_eq!(origin.rates_hits.load(Ordering::SeqCst), 2);

    let again = cache.resolve(&request).await.unwrap();
    assert_eq!(revision(&again), 2);
    cache.wait_for_refreshes().await;

    let stats = cache.stats();
    assert_eq!(stats.fresh_hits, 2);
    assert_eq!(stats.refreshes_failed, 0);
}

#[tokio::test]
async fn stale_rates_served_when_network_lost() {
    let (base, _origin) = spawn_origin().await;
    let (transport, down) = Switchable::new();
    let clock = Arc::new(ManualClock::new(SystemTime::now()));
    let cache = ServiceCache::builder()
        .origin(&base)
        .seed(["/currency-rates.json"])
        .transport(transport)
        .clock(clock.clone())
        .build()
        .unwrap();
    cache.install().await.unwrap();

    down.store(true, Ordering::SeqCst);
    clock.advance(Duration::from_secs(3600));

    let request = cache.request("/currency-rates.json?t=1700000000").unwrap().build();
    let resolution = cache.resolve_detailed(&request, None).await.unwrap();
    assert!(matches!(resolution, Resolution::Stale(_)));
    assert_eq!(revision(resolution.response()), 1);
}

#[tokio::test]
async fn unknown_resource_offline_yields_synthetic_error() {
    let (base, _origin) = spawn_origin().await;
    let (transport, down) = Switchable::new();
    let cache = ServiceCache::builder()
        .origin(&base)
        .seed(Vec::<String>::new())
        .transport(transport)
        .build()
        .unwrap();
    down.store(true, Ordering::SeqCst);

    let response = cache
        .resolve(&cache.request("/js/chart.js").unwrap().build())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.text(), Some("Network error happened"));
}

#[tokio::test]
async fn offline_navigation_gets_app_shell() {
    let (base, _origin) = spawn_origin().await;
    let (transport, down) = Switchable::new();
    let cache = ServiceCache::builder()
        .origin(&base)
        .offline_fallback("/index.html")
        .transport(transport)
        .build()
        .unwrap();
    cache.start().await.unwrap();
    down.store(true, Ordering::SeqCst);

    let navigation = cache.navigate("/history/2024").unwrap();
    let resolution = cache.resolve_detailed(&navigation, None).await.unwrap();

    assert!(matches!(resolution, Resolution::Fallback(_)));
    assert_eq!(resolution.response().text(), Some("<html>/index.html</html>"));
}

#[tokio::test]
async fn preload_answers_navigation_after_activation() {
    let (base, _origin) = spawn_origin().await;
    let cache = ServiceCache::builder()
        .origin(&base)
        .seed(Vec::<String>::new())
        .build()
        .unwrap();
    cache.activate().await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    let preloaded = CacheResponse::new(StatusCode::OK).body("<html>preloaded</html>");
    tx.send(Some(preloaded)).unwrap();

    let navigation = cache.navigate("/settings/index.html").unwrap();
    let response = cache
        .resolve_with_preload(&navigation, Preload::from_receiver(rx))
        .await
        .unwrap();
    assert_eq!(response.text(), Some("<html>preloaded</html>"));
    assert_eq!(cache.stats().preload_serves, 1);
}

#[tokio::test]
async fn error_status_passes_through_uncached() {
    let (base, _origin) = spawn_origin().await;
    let cache = ServiceCache::builder()
        .origin(&base)
        .seed(Vec::<String>::new())
        .build()
        .unwrap();

    let request = cache.request("/missing").unwrap().build();
    let response = cache.resolve(&request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let store = cache.controller().storage().open("v1").await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn seeded_store_survives_restart() {
    let (base, origin) = spawn_origin().await;
    let dir = tempfile::tempdir().unwrap();

    let first = ServiceCache::builder()
        .origin(&base)
        .storage_dir(dir.path())
        .build()
        .unwrap();
    first.install().await.unwrap();
    drop(first);

    let (transport, down) = Switchable::new();
    down.store(true, Ordering::SeqCst);
    let second = ServiceCache::builder()
        .origin(&base)
        .storage_dir(dir.path())
        .transport(transport)
        .build()
        .unwrap();

    let resolution = second
        .resolve_detailed(&second.request("/index.html").unwrap().build(), None)
        .await
        .unwrap();
    assert!(matches!(resolution, Resolution::Fresh(_)));
    second.wait_for_refreshes().await;
    assert_eq!(second.stats().refreshes_failed, 1);
    assert_eq!(origin.rates_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn new_generation_sweeps_previous_one() {
    let (base, _origin) = spawn_origin().await;
    let dir = tempfile::tempdir().unwrap();

    let v1 = ServiceCache::builder()
        .generation("v1")
        .origin(&base)
        .storage_dir(dir.path())
        .build()
        .unwrap();
    v1.start().await.unwrap();

    let v2 = ServiceCache::builder()
        .generation("v2")
        .origin(&base)
        .storage_dir(dir.path())
        .build()
        .unwrap();
    let report = v2.start().await.unwrap();

    assert_eq!(report.deleted, ["v1"]);
    assert!(!dir.path().join("v1").exists());
    assert!(dir.path().join("v2").is_dir());
}

#[tokio::test]
async fn failed_seed_does_not_block_resolution() {
    let (base, _origin) = spawn_origin().await;
    let cache = ServiceCache::builder()
        .origin(&base)
        .seed(["/", "/missing"])
        .build()
        .unwrap();

    let err = cache.install().await.unwrap_err();
    assert!(err.is_seed());

    let response = cache.resolve(&cache.navigate("/").unwrap()).await.unwrap();
    assert_eq!(response.text(), Some("<html>/</html>"));
}

#[tokio::test]
async fn built_from_json_config() {
    let (base, _origin) = spawn_origin().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swcache.json");
    std::fs::write(
        &path,
        format!(
            r#"{{
                "generation": "v3",
                "origin": "{base}",
                "seed": ["/", "/currency-rates.json"],
                "offline_fallback": "/",
                "network_timeout_secs": 5
            }}"#
        ),
    )
    .unwrap();

    let cache = ServiceCache::from_config_path(&path).unwrap();
    assert_eq!(cache.generation(), "v3");
    cache.install().await.unwrap();

    let store = cache.controller().storage().open("v3").await.unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn unknown_config_field_rejected() {
    let err = CacheConfig::from_json_str(r#"{"generation": "v3", "cache_name": "x"}"#).unwrap_err();
    assert!(err.to_string().contains("cache_name"), "{err}");
}
