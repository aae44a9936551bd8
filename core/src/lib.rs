//! Sans-IO core of the OpenVidu REST client.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets `HttpResponse` values without
//! touching the network (host-does-IO pattern). The `openvidu-client` crate
//! runs the round-trip, once with a blocking transport and once with an
//! async one, on top of this crate.
//!
//! # Design
//! - `ClientConfig` is immutable; `OpenViduApi` derives the endpoints and
//!   the Basic-auth headers from it once.
//! - URLs are resolved with base-relative joins under `<host>/openvidu/api/`.
//! - Status codes are interpreted per operation (`status`), never through a
//!   global switch. Unlisted non-2xx codes are errors, not success.
//! - Success payloads are returned as `serde_json::Value`, unchanged.

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod operation;
pub mod status;
pub mod types;

pub use auth::USER_AGENT;
pub use client::{ApiCall, OpenViduApi};
pub use config::ClientConfig;
pub use endpoints::{Endpoints, Resource};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operation::Operation;
pub use status::StatusRule;
pub use types::{
    ConnectionProperties, ConnectionType, ConnectionUpdate, MediaMode, OutputMode,
    RecordingMode, RecordingProperties, Role, SessionProperties, StartRecording,
};
