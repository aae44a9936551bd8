//! Helpers shared by the end-to-end tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use openvidu_client::blocking::OpenViduClient;
use openvidu_client::nonblocking::AsyncOpenViduClient;
use openvidu_client::{ClientConfig, Error, Operation};
use serde_json::{json, Value};

pub const SECRET: &str = "MY_SECRET";

pub fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(&format!("http://{addr}"), SECRET).unwrap()
}

/// Body sent by every body-carrying operation in parity tests.
pub fn sample_body() -> Value {
    json!({"customSessionId": "ses_abc", "record": true})
}

/// Invoke `op` with fixed ids through the blocking client.
pub fn invoke_blocking(client: &OpenViduClient, op: Operation) -> Result<Value, Error> {
    let body = sample_body();
    match op {
        Operation::CreateSession => client.create_session(&body),
        Operation::GetSession => client.get_session("ses_abc"),
        Operation::ListSessions => client.list_sessions(),
        Operation::DeleteSession => client.delete_session("ses_abc"),
        Operation::CreateConnection => client.create_connection("ses_abc", &body),
        Operation::GetConnection => client.get_connection("ses_abc", "con_1"),
        Operation::ListConnections => client.list_connections("ses_abc"),
        Operation::UpdateConnection => client.update_connection("ses_abc", "con_1", &body),
        Operation::DeleteConnection => client.delete_connection("ses_abc", "con_1"),
        Operation::StartRecording => client.start_recording(&body),
        Operation::StopRecording => client.stop_recording("ses_abc"),
        Operation::GetRecording => client.get_recording("ses_abc"),
        Operation::ListRecordings => client.list_recordings(),
        Operation::DeleteRecording => client.delete_recording("ses_abc"),
    }
}

/// Invoke `op` with fixed ids through the async client.
pub async fn invoke_async(client: &AsyncOpenViduClient, op: Operation) -> Result<Value, Error> {
    let body = sample_body();
    match op {
        Operation::CreateSession => client.create_session(&body).await,
        Operation::GetSession => client.get_session("ses_abc").await,
        Operation::ListSessions => client.list_sessions().await,
        Operation::DeleteSession => client.delete_session("ses_abc").await,
        Operation::CreateConnection => client.create_connection("ses_abc", &body).await,
        Operation::GetConnection => client.get_connection("ses_abc", "con_1").await,
        Operation::ListConnections => client.list_connections("ses_abc").await,
        Operation::UpdateConnection => client.update_connection("ses_abc", "con_1", &body).await,
        Operation::DeleteConnection => client.delete_connection("ses_abc", "con_1").await,
        Operation::StartRecording => client.start_recording(&body).await,
        Operation::StopRecording => client.stop_recording("ses_abc").await,
        Operation::GetRecording => client.get_recording("ses_abc").await,
        Operation::ListRecordings => client.list_recordings().await,
        Operation::DeleteRecording => client.delete_recording("ses_abc").await,
    }
}

/// A current-thread runtime for driving the async client from a plain test.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}
