//! A server that answers every request with one configurable response and
//! records what it received.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

/// A received request as it arrived on the wire.
///
/// Header names are lowercase; repeated headers are joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug)]
struct StubState {
    status: u16,
    body: String,
    captured: Vec<CapturedRequest>,
}

#[derive(Debug, Clone)]
pub struct Stub {
    state: Arc<Mutex<StubState>>,
}

impl Stub {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState {
                status,
                body: body.into(),
                captured: Vec::new(),
            })),
        }
    }

    /// Change the response for subsequent requests.
    pub fn respond_with(&self, status: u16, body: impl Into<String>) {
        let mut state = self.lock();
        state.status = status;
        state.body = body.into();
    }

    /// Drain the requests received so far.
    pub fn take_captured(&self) -> Vec<CapturedRequest> {
        std::mem::take(&mut self.lock().captured)
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(respond).with_state(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .map(|value| value.to_str().unwrap_or("<non-ascii>"))
            .collect();
        map.insert(name.as_str().to_string(), values.join(", "));
    }
    map
}

async fn respond(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = stub.lock();
    state.captured.push(CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: header_map(&headers),
        body,
    });
    let status = StatusCode::from_u16(state.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}
