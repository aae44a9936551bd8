//! Full session, connection and recording lifecycle against the mock server.
//!
//! Starts the emulated OpenVidu API on a random port and drives every
//! operation over real HTTP, once with the blocking client and once with the
//! async one.

mod common;

use std::time::Duration;

use common::{config, SECRET};
use mock_server::Options;
use openvidu_client::blocking::OpenViduClient;
use openvidu_client::nonblocking::AsyncOpenViduClient;
use openvidu_client::{
    ClientConfig, ConnectionProperties, ConnectionType, ConnectionUpdate, ErrorKind, Role,
    SessionProperties, StartRecording,
};
use serde_json::{json, Value};

fn start_server(options: Options) -> std::net::SocketAddr {
    mock_server::spawn(mock_server::app(options)).unwrap()
}

fn ipcam() -> ConnectionProperties {
    ConnectionProperties {
        kind: Some(ConnectionType::Ipcam),
        rtsp_uri: Some("rtsp://camera.local/stream".to_string()),
        ..Default::default()
    }
}

#[test]
fn blocking_lifecycle() {
    let addr = start_server(Options::default());
    let client = OpenViduClient::new(config(addr)).unwrap();

    // Step 1: no sessions yet.
    let sessions = client.list_sessions().unwrap();
    assert_eq!(sessions["numberOfElements"], 0);

    // Step 2: create a session with a custom id, then collide with it.
    let props = SessionProperties {
        custom_session_id: Some("ses_lifecycle".to_string()),
        ..Default::default()
    };
    let session = client.create_session(&props).unwrap();
    assert_eq!(session["id"], "ses_lifecycle");
    let err = client.create_session(&props).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SessionExists));

    // Step 3: fetch it twice; unchanged backend, identical payloads.
    let first = client.get_session("ses_lifecycle").unwrap();
    let second = client.get_session("ses_lifecycle").unwrap();
    assert_eq!(first, second);

    // Step 4: recording needs an active participant.
    let err = client
        .start_recording(&StartRecording::new("ses_lifecycle"))
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingNoConnectedParticipants));

    // Step 5: connections.
    let webrtc = client
        .create_connection(
            "ses_lifecycle",
            &ConnectionProperties {
                role: Some(Role::Subscriber),
                ..Default::default()
            },
        )
        .unwrap();
    let webrtc_id = webrtc["id"].as_str().unwrap().to_string();
    assert_eq!(webrtc["role"], "SUBSCRIBER");
    client.create_connection("ses_lifecycle", &ipcam()).unwrap();

    let connections = client.list_connections("ses_lifecycle").unwrap();
    assert_eq!(connections["numberOfElements"], 2);

    let update = ConnectionUpdate {
        role: Some(Role::Moderator),
        record: Some(false),
    };
    let updated = client
        .update_connection("ses_lifecycle", &webrtc_id, &update)
        .unwrap();
    assert_eq!(updated["role"], "MODERATOR");
    assert_eq!(updated["record"], false);
    let fetched = client.get_connection("ses_lifecycle", &webrtc_id).unwrap();
    assert_eq!(fetched, updated);

    // Step 6: record.
    let recording = client
        .start_recording(&StartRecording::new("ses_lifecycle"))
        .unwrap();
    let recording_id = recording["id"].as_str().unwrap().to_string();
    assert_eq!(recording["status"], "started");

    let err = client.delete_recording(&recording_id).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingNotCompleted));

    let stopped = client.stop_recording(&recording_id).unwrap();
    assert_eq!(stopped["status"], "stopped");
    let recordings = client.list_recordings().unwrap();
    assert_eq!(recordings["count"], 1);
    assert_eq!(client.get_recording(&recording_id).unwrap()["status"], "stopped");
    assert_eq!(client.delete_recording(&recording_id).unwrap(), Value::Null);
    let err = client.get_recording(&recording_id).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingNotFound));

    // Step 7: tear down.
    assert_eq!(client.delete_connection("ses_lifecycle", &webrtc_id).unwrap(), Value::Null);
    let err = client.get_connection("ses_lifecycle", &webrtc_id).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ConnectionNotFound));

    assert_eq!(client.delete_session("ses_lifecycle").unwrap(), Value::Null);
    let err = client.get_session("ses_lifecycle").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SessionNotFound));
    let err = client.get_connection("ses_lifecycle", &webrtc_id).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SessionDoesNotExist));
    let err = client
        .update_connection("ses_lifecycle", &webrtc_id, &update)
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SessionOrConnectionDoesNotExist));

    let sessions = client.list_sessions().unwrap();
    assert_eq!(sessions["numberOfElements"], 0);
}

#[tokio::test]
async fn async_lifecycle() {
    let addr = start_server(Options::default());
    let client = AsyncOpenViduClient::new(config(addr)).unwrap();

    // Open maps work as request bodies too.
    let session = client
        .create_session(&json!({"customSessionId": "ses_async"}))
        .await
        .unwrap();
    assert_eq!(session["id"], "ses_async");

    let err = client
        .create_connection("ses_async", &json!({"type": "IPCAM", "rtspUri": "rtsp://unreachable/cam"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ConnectionIpcam));
    let err = client
        .create_connection("ses_async", &json!({"role": "EMPEROR"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ConnectionBodyParameter));
    client.create_connection("ses_async", &ipcam()).await.unwrap();

    let recording = client
        .start_recording(&StartRecording::new("ses_async"))
        .await
        .unwrap();
    let recording_id = recording["id"].as_str().unwrap().to_string();
    let err = client
        .start_recording(&StartRecording::new("ses_async"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingNotConfiguredForMediaNode));

    client.stop_recording(&recording_id).await.unwrap();
    let err = client.stop_recording("missing").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingNotFound));

    client.delete_recording(&recording_id).await.unwrap();
    assert_eq!(client.delete_session("ses_async").await.unwrap(), Value::Null);
    let err = client.delete_session("ses_async").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SessionNotFound));
    let err = client.list_connections("ses_async").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SessionNotFound));
}

#[test]
fn recording_module_disabled() {
    let addr = start_server(Options {
        recording_enabled: false,
        ..Options::default()
    });
    let client = OpenViduClient::new(config(addr)).unwrap();

    let err = client.list_recordings().unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingDisabledOnServer));
    assert_eq!(err.status(), Some(501));
    let err = client.start_recording(&StartRecording::new("any")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RecordingDisabledOnServer));
}

#[test]
fn wrong_secret_is_an_unexpected_status() {
    let addr = start_server(Options::default());
    let config = ClientConfig::new(&format!("http://{addr}"), format!("{SECRET}-wrong")).unwrap();
    let client = OpenViduClient::new(config).unwrap();

    let err = client.list_sessions().unwrap_err();
    assert_eq!(err.kind(), None);
    assert_eq!(err.status(), Some(401));
}

#[test]
fn timeout_applies_to_both_transports() {
    // Accepts connections (via the backlog) but never answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let config = config(addr).with_timeout(Duration::from_millis(200));

    let client = OpenViduClient::new(config.clone()).unwrap();
    let err = client.list_sessions().unwrap_err();
    assert!(err.is_transport(), "{err:?}");

    let client = AsyncOpenViduClient::new(config).unwrap();
    let err = common::runtime().block_on(client.list_sessions()).unwrap_err();
    assert!(err.is_transport(), "{err:?}");

    drop(listener);
}
