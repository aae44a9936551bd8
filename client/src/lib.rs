//! OpenVidu REST client.
//!
//! # Overview
//! Two facades with the same fourteen operations and the same results:
//! [`blocking::OpenViduClient`] on `ureq` and
//! [`nonblocking::AsyncOpenViduClient`] on `reqwest`.
//! Both build their requests and classify responses through
//! `openvidu_core::OpenViduApi`; only the round-trip differs.
//!
//! ```no_run
//! # fn main() -> Result<(), openvidu_client::Error> {
//! use openvidu_client::{blocking::OpenViduClient, ClientConfig, SessionProperties};
//!
//! let config = ClientConfig::new("https://media.example.com", "MY_SECRET")?;
//! let client = OpenViduClient::new(config)?;
//! let session = client.create_session(&SessionProperties::default())?;
//! println!("created {}", session["id"]);
//! # Ok(())
//! # }
//! ```

mod error;

pub mod blocking;
pub mod nonblocking;

pub use error::Error;
pub use openvidu_core::{
    ApiCall, ApiError, ClientConfig, ConnectionProperties, ConnectionType, ConnectionUpdate,
    Endpoints, ErrorKind, HttpMethod, HttpRequest, HttpResponse, MediaMode, OpenViduApi, Operation,
    OutputMode, RecordingMode, RecordingProperties, Role, SessionProperties, StartRecording,
    Resource, StatusRule, USER_AGENT,
};
