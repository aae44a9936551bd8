//! In-memory emulation of the OpenVidu REST API, for tests and local runs.
//!
//! Serves `/openvidu/api/{sessions,recordings}` behind Basic authentication
//! and answers with the status codes the real server documents. `stub`
//! provides a fixed-response server that records what it receives.

use std::{
    collections::BTreeMap,
    net::SocketAddr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub mod stub;

pub const API_ROOT: &str = "/openvidu/api";

/// Server settings.
#[derive(Debug, Clone)]
pub struct Options {
    pub secret: String,
    /// When false, every recording route answers 501.
    pub recording_enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            secret: "MY_SECRET".to_string(),
            recording_enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    id: String,
    created_at: u64,
    media_mode: String,
    recording_mode: String,
    custom_session_id: String,
    recording: bool,
    connections: BTreeMap<String, Connection>,
}

impl Session {
    fn to_json(&self) -> Value {
        let connections: Vec<Value> = self.connections.values().map(Connection::to_json).collect();
        json!({
            "id": self.id,
            "object": "session",
            "createdAt": self.created_at,
            "mediaMode": self.media_mode,
            "recordingMode": self.recording_mode,
            "customSessionId": self.custom_session_id,
            "recording": self.recording,
            "connections": { "numberOfElements": connections.len(), "content": connections },
        })
    }

    fn has_active_connections(&self) -> bool {
        self.connections.values().any(|c| c.status == "active")
    }
}

#[derive(Debug, Clone)]
struct Connection {
    id: String,
    kind: String,
    status: String,
    session_id: String,
    created_at: u64,
    role: String,
    record: bool,
    data: String,
    rtsp_uri: Option<String>,
    token: Option<String>,
}

impl Connection {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "object": "connection",
            "type": self.kind,
            "status": self.status,
            "sessionId": self.session_id,
            "createdAt": self.created_at,
            "role": self.role,
            "record": self.record,
            "serverData": self.data,
            "rtspUri": self.rtsp_uri,
            "token": self.token,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordingStatus {
    Started,
    Stopped,
}

#[derive(Debug, Clone)]
struct Recording {
    id: String,
    session_id: String,
    name: String,
    output_mode: String,
    has_audio: bool,
    has_video: bool,
    created_at: u64,
    status: RecordingStatus,
}

impl Recording {
    fn to_json(&self) -> Value {
        let status = match self.status {
            RecordingStatus::Started => "started",
            RecordingStatus::Stopped => "stopped",
        };
        json!({
            "id": self.id,
            "object": "recording",
            "name": self.name,
            "outputMode": self.output_mode,
            "hasAudio": self.has_audio,
            "hasVideo": self.has_video,
            "sessionId": self.session_id,
            "createdAt": self.created_at,
            "size": 0,
            "duration": 0.0,
            "url": null,
            "status": status,
        })
    }
}

#[derive(Debug, Default)]
struct Db {
    sessions: BTreeMap<String, Session>,
    recordings: BTreeMap<String, Recording>,
    /// Recordings ever started per session; never decremented, so deleted
    /// recordings do not free their id.
    recordings_started: BTreeMap<String, u32>,
}

struct Inner {
    expected_authorization: String,
    recording_enabled: bool,
    db: RwLock<Db>,
}

type AppState = Arc<Inner>;

pub fn app(options: Options) -> Router {
    let credentials = format!("OPENVIDUAPP:{}", options.secret);
    let state: AppState = Arc::new(Inner {
        expected_authorization: format!("Basic {}", STANDARD.encode(credentials)),
        recording_enabled: options.recording_enabled,
        db: RwLock::new(Db::default()),
    });

    let api = Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{session_id}", get(get_session).delete(delete_session))
        .route(
            "/sessions/{session_id}/connection",
            get(list_connections).post(create_connection),
        )
        .route(
            "/sessions/{session_id}/connection/{connection_id}",
            get(get_connection).patch(update_connection).delete(delete_connection),
        )
        .route("/recordings", get(list_recordings))
        .route("/recordings/start", post(start_recording))
        .route("/recordings/stop/{recording_id}", post(stop_recording))
        .route(
            "/recordings/{recording_id}",
            get(get_recording).delete(delete_recording),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state);

    Router::new().nest(API_ROOT, api)
}

pub async fn run(listener: TcpListener, options: Options) -> Result<(), std::io::Error> {
    serve(listener, app(options)).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

/// Serve `router` on a random local port from a dedicated thread.
///
/// The server lives until the process exits.
pub fn spawn(router: Router) -> Result<SocketAddr, std::io::Error> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::spawn(move || {
        let result = runtime.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            serve(listener, router).await
        });
        if let Err(e) = result {
            tracing::error!(error = %e, "mock server stopped");
        }
    });
    Ok(addr)
}

async fn require_basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == state.expected_authorization);
    if !authorized {
        tracing::debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Body helpers
// ---------------------------------------------------------------------------

/// An empty body is an empty object; anything but a JSON object is a 400.
fn parse_body(raw: &str) -> Result<Map<String, Value>, StatusCode> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

fn opt_str(body: &Map<String, Value>, key: &str) -> Result<Option<String>, StatusCode> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StatusCode::BAD_REQUEST),
    }
}

fn opt_bool(body: &Map<String, Value>, key: &str) -> Result<Option<bool>, StatusCode> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(StatusCode::BAD_REQUEST),
    }
}

fn opt_enum(
    body: &Map<String, Value>,
    key: &str,
    allowed: &[&str],
) -> Result<Option<String>, StatusCode> {
    match opt_str(body, key)? {
        Some(value) if !allowed.contains(&value.as_str()) => Err(StatusCode::BAD_REQUEST),
        other => Ok(other),
    }
}

const ROLES: &[&str] = &["SUBSCRIBER", "PUBLISHER", "MODERATOR"];

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn listing(items: Vec<Value>) -> Json<Value> {
    Json(json!({ "numberOfElements": items.len(), "content": items }))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

async fn create_session(State(state): State<AppState>, raw: String) -> Result<Json<Value>, StatusCode> {
    let body = parse_body(&raw)?;
    let media_mode = opt_enum(&body, "mediaMode", &["ROUTED", "RELAYED"])?;
    let recording_mode = opt_enum(&body, "recordingMode", &["MANUAL", "ALWAYS"])?;
    let custom_session_id = opt_str(&body, "customSessionId")?.unwrap_or_default();

    let mut db = state.db.write().await;
    let id = if custom_session_id.is_empty() {
        format!("ses_{}", short_id())
    } else if db.sessions.contains_key(&custom_session_id) {
        return Err(StatusCode::CONFLICT);
    } else {
        custom_session_id.clone()
    };

    let session = Session {
        id: id.clone(),
        created_at: now_millis(),
        media_mode: media_mode.unwrap_or_else(|| "ROUTED".to_string()),
        recording_mode: recording_mode.unwrap_or_else(|| "MANUAL".to_string()),
        custom_session_id,
        recording: false,
        connections: BTreeMap::new(),
    };
    let rendered = session.to_json();
    db.sessions.insert(id.clone(), session);
    tracing::debug!(session_id = %id, "session created");
    Ok(Json(rendered))
}

async fn list_sessions(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.read().await;
    listing(db.sessions.values().map(Session::to_json).collect())
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let db = state.db.read().await;
    db.sessions
        .get(&session_id)
        .map(|s| Json(s.to_json()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut db = state.db.write().await;
    db.sessions.remove(&session_id).ok_or(StatusCode::NOT_FOUND)?;
    for recording in db.recordings.values_mut() {
        if recording.session_id == session_id {
            recording.status = RecordingStatus::Stopped;
        }
    }
    tracing::debug!(%session_id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

async fn create_connection(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    raw: String,
) -> Result<Json<Value>, StatusCode> {
    let mut db = state.db.write().await;
    let session = db.sessions.get_mut(&session_id).ok_or(StatusCode::NOT_FOUND)?;

    let body = parse_body(&raw)?;
    let kind = opt_enum(&body, "type", &["WEBRTC", "IPCAM"])?.unwrap_or_else(|| "WEBRTC".to_string());
    let role = opt_enum(&body, "role", ROLES)?.unwrap_or_else(|| "PUBLISHER".to_string());
    let record = opt_bool(&body, "record")?.unwrap_or(true);
    let data = opt_str(&body, "data")?.unwrap_or_default();
    let rtsp_uri = opt_str(&body, "rtspUri")?;

    let id = format!("con_{}", short_id());
    let connection = if kind == "IPCAM" {
        let uri = rtsp_uri.ok_or(StatusCode::BAD_REQUEST)?;
        if !(uri.starts_with("rtsp://") || uri.starts_with("rtsps://")) {
            return Err(StatusCode::BAD_REQUEST);
        }
        // Stands in for a camera the media node cannot reach.
        if uri.contains("unreachable") {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Connection {
            id: id.clone(),
            kind,
            status: "active".to_string(),
            session_id: session_id.clone(),
            created_at: now_millis(),
            role: "PUBLISHER".to_string(),
            record,
            data,
            rtsp_uri: Some(uri),
            token: None,
        }
    } else {
        Connection {
            id: id.clone(),
            kind,
            status: "pending".to_string(),
            session_id: session_id.clone(),
            created_at: now_millis(),
            role,
            record,
            data,
            rtsp_uri: None,
            token: Some(format!(
                "wss://localhost:4443?sessionId={session_id}&token=tok_{}",
                short_id()
            )),
        }
    };

    let rendered = connection.to_json();
    session.connections.insert(id, connection);
    Ok(Json(rendered))
}

async fn list_connections(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let db = state.db.read().await;
    let session = db.sessions.get(&session_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(listing(session.connections.values().map(Connection::to_json).collect()))
}

async fn get_connection(
    State(state): State<AppState>,
    Path((session_id, connection_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let db = state.db.read().await;
    let session = db.sessions.get(&session_id).ok_or(StatusCode::BAD_REQUEST)?;
    session
        .connections
        .get(&connection_id)
        .map(|c| Json(c.to_json()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_connection(
    State(state): State<AppState>,
    Path((session_id, connection_id)): Path<(String, String)>,
    raw: String,
) -> Result<Json<Value>, StatusCode> {
    let mut db = state.db.write().await;
    let connection = db
        .sessions
        .get_mut(&session_id)
        .and_then(|s| s.connections.get_mut(&connection_id))
        .ok_or(StatusCode::NOT_FOUND)?;

    let body = parse_body(&raw)?;
    let role = opt_enum(&body, "role", ROLES)?;
    let record = opt_bool(&body, "record")?;
    if let Some(role) = role {
        connection.role = role;
    }
    if let Some(record) = record {
        connection.record = record;
    }
    Ok(Json(connection.to_json()))
}

async fn delete_connection(
    State(state): State<AppState>,
    Path((session_id, connection_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut db = state.db.write().await;
    let session = db.sessions.get_mut(&session_id).ok_or(StatusCode::BAD_REQUEST)?;
    session
        .connections
        .remove(&connection_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

// ---------------------------------------------------------------------------
// Recordings
// ---------------------------------------------------------------------------

fn recording_enabled(state: &AppState) -> Result<(), StatusCode> {
    if state.recording_enabled {
        Ok(())
    } else {
        Err(StatusCode::NOT_IMPLEMENTED)
    }
}

/// `WIDTHxHEIGHT`; 400 when malformed, 422 when outside 100..=1999.
fn check_resolution(resolution: &str) -> Result<(), StatusCode> {
    let (width, height) = resolution.split_once('x').ok_or(StatusCode::BAD_REQUEST)?;
    let width: u32 = width.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let height: u32 = height.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let range = 100..=1999;
    if range.contains(&width) && range.contains(&height) {
        Ok(())
    } else {
        Err(StatusCode::UNPROCESSABLE_ENTITY)
    }
}

async fn start_recording(State(state): State<AppState>, raw: String) -> Result<Json<Value>, StatusCode> {
    recording_enabled(&state)?;

    let body = parse_body(&raw)?;
    let session_id = opt_str(&body, "session")?.ok_or(StatusCode::BAD_REQUEST)?;
    let output_mode = opt_enum(&body, "outputMode", &["COMPOSED", "COMPOSED_QUICK", "INDIVIDUAL"])?
        .unwrap_or_else(|| "COMPOSED".to_string());
    let has_audio = opt_bool(&body, "hasAudio")?.unwrap_or(true);
    let has_video = opt_bool(&body, "hasVideo")?.unwrap_or(true);
    let name = opt_str(&body, "name")?;
    if let Some(resolution) = opt_str(&body, "resolution")? {
        check_resolution(&resolution)?;
    }
    if !has_audio && !has_video {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let mut guard = state.db.write().await;
    let db = &mut *guard;
    let session = db.sessions.get_mut(&session_id).ok_or(StatusCode::NOT_FOUND)?;
    if session.media_mode != "ROUTED" || session.recording {
        return Err(StatusCode::CONFLICT);
    }
    if !session.has_active_connections() {
        return Err(StatusCode::NOT_ACCEPTABLE);
    }

    let started = db.recordings_started.entry(session_id.clone()).or_insert(0);
    *started += 1;
    let id = if *started == 1 {
        session_id.clone()
    } else {
        format!("{session_id}~{started}")
    };
    let recording = Recording {
        id: id.clone(),
        session_id: session_id.clone(),
        name: name.unwrap_or_else(|| id.clone()),
        output_mode,
        has_audio,
        has_video,
        created_at: now_millis(),
        status: RecordingStatus::Started,
    };
    session.recording = true;
    let rendered = recording.to_json();
    db.recordings.insert(id.clone(), recording);
    tracing::debug!(recording_id = %id, %session_id, "recording started");
    Ok(Json(rendered))
}

async fn stop_recording(
    State(state): State<AppState>,
    Path(recording_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    recording_enabled(&state)?;

    let mut guard = state.db.write().await;
    let db = &mut *guard;
    let recording = db.recordings.get_mut(&recording_id).ok_or(StatusCode::NOT_FOUND)?;
    recording.status = RecordingStatus::Stopped;
    if let Some(session) = db.sessions.get_mut(&recording.session_id) {
        session.recording = false;
    }
    Ok(Json(recording.to_json()))
}

async fn get_recording(
    State(state): State<AppState>,
    Path(recording_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    recording_enabled(&state)?;

    let db = state.db.read().await;
    db.recordings
        .get(&recording_id)
        .map(|r| Json(r.to_json()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_recordings(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    recording_enabled(&state)?;

    let db = state.db.read().await;
    let items: Vec<Value> = db.recordings.values().map(Recording::to_json).collect();
    Ok(Json(json!({ "count": items.len(), "items": items })))
}

async fn delete_recording(
    State(state): State<AppState>,
    Path(recording_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    recording_enabled(&state)?;

    let mut db = state.db.write().await;
    let recording = db.recordings.get(&recording_id).ok_or(StatusCode::NOT_FOUND)?;
    if recording.status == RecordingStatus::Started {
        return Err(StatusCode::CONFLICT);
    }
    db.recordings.remove(&recording_id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_an_empty_object() {
        assert!(parse_body("").unwrap().is_empty());
        assert!(parse_body("  ").unwrap().is_empty());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert_eq!(parse_body("[1,2]").unwrap_err(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_body("nope").unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn enum_fields_only_accept_listed_values() {
        let body = parse_body(r#"{"role":"ADMIN"}"#).unwrap();
        assert_eq!(opt_enum(&body, "role", ROLES).unwrap_err(), StatusCode::BAD_REQUEST);
        let body = parse_body(r#"{"role":"MODERATOR"}"#).unwrap();
        assert_eq!(opt_enum(&body, "role", ROLES).unwrap().as_deref(), Some("MODERATOR"));
    }

    #[test]
    fn mistyped_fields_are_rejected() {
        let body = parse_body(r#"{"record":"yes","data":3}"#).unwrap();
        assert_eq!(opt_bool(&body, "record").unwrap_err(), StatusCode::BAD_REQUEST);
        assert_eq!(opt_str(&body, "data").unwrap_err(), StatusCode::BAD_REQUEST);
        assert_eq!(opt_bool(&body, "missing").unwrap(), None);
    }

    #[test]
    fn resolution_bounds() {
        assert!(check_resolution("1280x720").is_ok());
        assert_eq!(check_resolution("99x720").unwrap_err(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(check_resolution("1280x2000").unwrap_err(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(check_resolution("wide").unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn session_renders_nested_connections() {
        let mut session = Session {
            id: "ses_1".to_string(),
            created_at: 1,
            media_mode: "ROUTED".to_string(),
            recording_mode: "MANUAL".to_string(),
            custom_session_id: String::new(),
            recording: false,
            connections: BTreeMap::new(),
        };
        assert!(!session.has_active_connections());
        session.connections.insert(
            "con_1".to_string(),
            Connection {
                id: "con_1".to_string(),
                kind: "IPCAM".to_string(),
                status: "active".to_string(),
                session_id: "ses_1".to_string(),
                created_at: 2,
                role: "PUBLISHER".to_string(),
                record: true,
                data: String::new(),
                rtsp_uri: Some("rtsp://cam".to_string()),
                token: None,
            },
        );
        assert!(session.has_active_connections());
        let json = session.to_json();
        assert_eq!(json["connections"]["numberOfElements"], 1);
        assert_eq!(json["connections"]["content"][0]["id"], "con_1");
    }
}
