#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use url::Url;

use swcache_client::cache::httpdate;
use swcache_client::error::{self, NetworkErrorKind};
use swcache_client::prelude::*;

pub const ORIGIN: &str = "http://localhost:8000";

/// 2023-11-14T22:13:20Z
pub fn epoch() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

pub fn url(path: &str) -> Url {
    Url::parse(&format!("{ORIGIN}{path}")).unwrap()
}

pub fn get(path: &str) -> CacheRequest {
    CacheRequest::get(url(path))
}

/// 200 response dated `date` with the given `Cache-Control`
pub fn ok(body: &str, cache_control: &str, date: SystemTime) -> CacheResponse {
    CacheResponse::new(StatusCode::OK)
        .header(
            ::http::header::DATE,
            HeaderValue::from_str(&httpdate::fmt_http_date(date)).unwrap(),
        )
        .header(
            ::http::header::CACHE_CONTROL,
            HeaderValue::from_str(cache_control).unwrap(),
        )
        .body(body.to_string())
}

enum Route {
    Respond(CacheResponse),
    Fail(NetworkErrorKind),
}

/// Scripted origin: responses per URL, call counting and an optional gate
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
    completed: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits for a permit from the returned semaphore
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (transport, gate)
    }

    pub fn respond(&self, path: &str, response: CacheResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(url(path).to_string(), Route::Respond(response));
    }

    pub fn fail(&self, path: &str, kind: NetworkErrorKind) {
        self.routes
            .lock()
            .unwrap()
            .insert(url(path).to_string(), Route::Fail(kind));
    }

    /// Fetches started
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, path: &str) -> usize {
        let target = url(path).to_string();
        self.calls.lock().unwrap().iter().filter(|u| **u == target).count()
    }

    /// Fetches that got past the gate
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn fetch<'a>(&'a self, request: &'a CacheRequest) -> BoxFuture<'a, swcache_client::Result<CacheResponse>> {
        async move {
            self.calls.lock().unwrap().push(request.url().to_string());
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            self.completed.fetch_add(1, Ordering::SeqCst);

            let routes = self.routes.lock().unwrap();
            match routes.get(request.url().as_str()) {
                Some(Route::Respond(response)) => Ok(response.clone().with_url(request.url().clone())),
                Some(Route::Fail(kind)) => Err(error::network(request.url(), *kind, "scripted failure")),
                None => Err(error::network(request.url(), NetworkErrorKind::Connect, "no route")),
            }
        }
        .boxed()
    }
}

/// Controller over in-memory storage with a manual clock at [`epoch`]
pub struct Harness {
    pub storage: Arc<CacheStorage>,
    pub transport: Arc<MockTransport>,
    pub clock: Arc<ManualClock>,
    pub controller: InterceptionController,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(MockTransport::new())
    }

    pub fn with_transport(transport: MockTransport) -> Self {
        let clock = Arc::new(ManualClock::new(epoch()));
        let storage = Arc::new(CacheStorage::in_memory().with_clock(clock.clone()));
        let transport = Arc::new(transport);
        let controller = InterceptionController::new(Arc::clone(&storage), "v2", transport.clone())
            .with_clock(clock.clone())
            .with_navigation_preload(Arc::new(NavigationPreload::enabled()));

        Self {
            storage,
            transport,
            clock,
            controller,
        }
    }

    pub async fn store(&self) -> Arc<CacheStore> {
        self.storage.open("v2").await.unwrap()
    }

    /// Put `response` for GET `path` straight into the current generation
    pub async fn seed(&self, path: &str, response: CacheResponse) {
        assert!(self.store().await.put(&get(path), response).await.unwrap());
    }
}
