//! In-process fake of the `/_snapshot` API
//!
//! Runs an axum server on an ephemeral port in a background thread so the
//! blocking client can be exercised from ordinary `#[test]` functions.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

/// A request as seen by the fake
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub repository: String,
    pub target: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[allow(dead_code)]
#[derive(Default)]
pub struct ClusterState {
    /// (name, state) in creation order
    pub snapshots: Vec<(String, String)>,
    pub requests: Vec<Recorded>,
    /// Raw body returned by list/status calls instead of the real listing
    pub raw_listing: Option<String>,
    /// Snapshots whose deletion is answered with `acknowledged: false`
    pub refuse_delete: Vec<String>,
    /// Status code for create calls
    pub create_status: Option<u16>,
    /// Delay before answering status calls
    pub status_delay: Option<Duration>,
}

pub type Shared = Arc<Mutex<ClusterState>>;

#[allow(dead_code)]
pub struct FakeCluster {
    pub addr: SocketAddr,
    pub state: Shared,
}

#[allow(dead_code)]
impl FakeCluster {
    pub fn start(snapshots: &[(&str, &str)]) -> Self {
        let state: Shared = Arc::new(Mutex::new(ClusterState {
            snapshots: snapshots
                .iter()
                .map(|(name, st)| (name.to_string(), st.to_string()))
                .collect(),
            ..ClusterState::default()
        }));

        let app = Router::new()
            .route(
                "/_snapshot/:repo/:target",
                get(get_snapshots).put(create_snapshot).delete(delete_snapshot),
            )
            .with_state(state.clone());

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind");
                tx.send(listener.local_addr().expect("addr")).expect("send addr");
                axum::serve(listener, app).await.expect("serve");
            });
        });

        let addr = rx.recv().expect("fake cluster did not start");
        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut ClusterState) -> R) -> R {
        let mut state = self.state.lock().expect("state lock");
        f(&mut state)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.with(|s| s.requests.clone())
    }

    pub fn snapshot_names(&self) -> Vec<String> {
        self.with(|s| s.snapshots.iter().map(|(n, _)| n.clone()).collect())
    }
}

fn record(
    state: &mut ClusterState,
    method: &str,
    repo: &str,
    target: &str,
    query: HashMap<String, String>,
    headers: &HeaderMap,
) {
    state.requests.push(Recorded {
        method: method.to_string(),
        repository: repo.to_string(),
        target: target.to_string(),
        query,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
}

fn listing<'a>(entries: impl Iterator<Item = &'a (String, String)>) -> serde_json::Value {
    let snapshots: Vec<_> = entries
        .map(|(name, state)| {
            json!({
                "snapshot": name,
                "uuid": format!("uuid-{}", name),
                "state": state,
                "indices": ["logs"],
            })
        })
        .collect();
    json!({ "snapshots": snapshots })
}

async fn get_snapshots(
    State(state): State<Shared>,
    Path((repo, target)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let delay = {
        let mut s = state.lock().expect("state lock");
        record(&mut s, "GET", &repo, &target, query, &headers);
        if target == "_all" {
            None
        } else {
            s.status_delay
        }
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let s = state.lock().expect("state lock");
    if let Some(raw) = &s.raw_listing {
        return (StatusCode::OK, raw.clone()).into_response();
    }
    if target == "_all" {
        return axum::Json(listing(s.snapshots.iter())).into_response();
    }
    if s.snapshots.iter().any(|(name, _)| *name == target) {
        axum::Json(listing(s.snapshots.iter().filter(|(name, _)| *name == target)))
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": {"type": "snapshot_missing_exception"},
                "status": 404
            })),
        )
            .into_response()
    }
}

async fn create_snapshot(
    State(state): State<Shared>,
    Path((repo, target)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().expect("state lock");
    record(&mut s, "PUT", &repo, &target, query, &headers);
    let status = StatusCode::from_u16(s.create_status.unwrap_or(200))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_success() {
        s.snapshots.push((target.clone(), "SUCCESS".to_string()));
    }
    (status, axum::Json(json!({ "snapshot": { "snapshot": target } }))).into_response()
}

async fn delete_snapshot(
    State(state): State<Shared>,
    Path((repo, target)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().expect("state lock");
    record(&mut s, "DELETE", &repo, &target, query, &headers);
    if s.refuse_delete.contains(&target) {
        return axum::Json(json!({ "acknowledged": false })).into_response();
    }
    let before = s.snapshots.len();
    s.snapshots.retain(|(name, _)| *name != target);
    if s.snapshots.len() == before {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "snapshot_missing_exception", "status": 404 })),
        )
            .into_response();
    }
    axum::Json(json!({ "acknowledged": true })).into_response()
}
