//! Shared fixtures: a local stub for both remote feeds and a fully wired
//! pipeline (HTTP source, in-memory store, render queue, worker).

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use lib_countries::{
    render_queue, HttpCountrySource, MemoryStore, PngSummaryRenderer, QueryEngine, RenderWorker,
    SourceEndpoints, SyncEngine,
};

/// What the stub feeds currently answer with. `None` means HTTP 503.
#[derive(Clone, Default)]
pub struct FeedState {
    pub countries: Arc<Mutex<Option<Value>>>,
    pub rates: Arc<Mutex<Option<Value>>>,
}

impl FeedState {
    pub fn set_countries(&self, body: Value) {
        *self.countries.lock().unwrap() = Some(body);
    }

    pub fn set_rates(&self, body: Value) {
        *self.rates.lock().unwrap() = Some(body);
    }

    pub fn take_countries_down(&self) {
        *self.countries.lock().unwrap() = None;
    }
}

fn reply(body: Option<Value>) -> Response {
    match body {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "feed down").into_response(),
    }
}

async fn countries(State(feeds): State<FeedState>) -> Response {
    let body = feeds.countries.lock().unwrap().clone();
    reply(body)
}

async fn rates(State(feeds): State<FeedState>) -> Response {
    let body = feeds.rates.lock().unwrap().clone();
    reply(body)
}

/// Starts both stub feeds on an ephemeral port.
pub async fn spawn_feeds(feeds: FeedState) -> SourceEndpoints {
    let router = Router::new()
        .route("/countries", get(countries))
        .route("/rates", get(rates))
        .with_state(feeds);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    SourceEndpoints {
        countries_url: format!("http://{addr}/countries"),
        rates_url: format!("http://{addr}/rates"),
        timeout: Duration::from_secs(5),
    }
}

/// A pipeline wired the way the server wires it.
pub struct Pipeline {
    pub feeds: FeedState,
    pub store: Arc<MemoryStore>,
    pub sync: SyncEngine,
    pub query: QueryEngine,
    pub renderer: Arc<PngSummaryRenderer>,
    pub shutdown: broadcast::Sender<()>,
    pub worker: JoinHandle<()>,
    pub cache: tempfile::TempDir,
}

impl Pipeline {
    pub async fn start() -> Pipeline {
        let feeds = FeedState::default();
        let endpoints = spawn_feeds(feeds.clone()).await;
        let store = Arc::new(MemoryStore::new());
        let cache = tempfile::tempdir().unwrap();

        let (shutdown, _) = broadcast::channel(1);
        let (tx, rx) = render_queue(lib_countries::RENDER_QUEUE_CAPACITY);
        let renderer = Arc::new(PngSummaryRenderer::new(cache.path()));
        let worker = RenderWorker::new(rx, renderer.clone(), shutdown.subscribe()).spawn();

        let sync = SyncEngine::new(
            Arc::new(HttpCountrySource::new(endpoints).unwrap()),
            store.clone(),
            tx,
        );
        let query = QueryEngine::new(store.clone());

        Pipeline {
            feeds,
            store,
            sync,
            query,
            renderer,
            shutdown,
            worker,
            cache,
        }
    }

    /// Waits until the summary image exists and decodes as a PNG header.
    pub async fn wait_for_artifact(&self) -> Vec<u8> {
        let path = self.renderer.path().to_path_buf();
        tokio::time::timeout(Duration::from_secs(10), async move {
            loop {
                if let Some(bytes) = lib_countries::load_artifact(&path).await {
                    return bytes;
                }
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
        })
        .await
        .expect("summary image was not rendered in time")
    }
}

pub fn wakanda(population: u64) -> Value {
    serde_json::json!({
        "name": "Wakanda",
        "capital": "Birnin Zana",
        "region": "Africa",
        "population": population,
        "flag": "https://flags.example/wakanda.svg",
        "currencies": [{"code": "WAK", "name": "Wakandan Dollar", "symbol": "W"}]
    })
}

pub fn rates_body(pairs: &[(&str, f64)]) -> Value {
    let rates: serde_json::Map<String, Value> = pairs
        .iter()
        .map(|(code, rate)| (code.to_string(), serde_json::json!(rate)))
        .collect();
    serde_json::json!({"result": "success", "base_code": "USD", "rates": rates})
}
