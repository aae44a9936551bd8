//! Stateless request builder and response interpreter for the OpenVidu API.
//!
//! # Design
//! `OpenViduApi` holds only what is derived once from a `ClientConfig`: the
//! resource endpoints and the default headers. Each operation is split into a
//! `build_*` method producing an `ApiCall` and the shared `parse` step that
//! consumes the `HttpResponse`. The caller executes the actual HTTP
//! round-trip, so blocking and async transports send identical requests and
//! classify responses identically.

use serde::Serialize;
use serde_json::Value;

use crate::auth;
use crate::config::ClientConfig;
use crate::endpoints::{Endpoints, Resource};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::Operation;
use crate::status;

/// A request ready to be executed, tagged with the operation that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub operation: Operation,
    pub request: HttpRequest,
}

/// Builds `ApiCall`s and interprets responses without touching the network.
#[derive(Debug, Clone)]
pub struct OpenViduApi {
    endpoints: Endpoints,
    headers: Vec<(String, String)>,
}

impl OpenViduApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            endpoints: Endpoints::new(config.host())?,
            headers: auth::default_headers(config.secret()),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    // Sessions

    pub fn build_create_session<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.collection(Resource::Sessions);
        self.call(Operation::CreateSession, url, Some(encode(body)?))
    }

    pub fn build_get_session(&self, session_id: &str) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.resolve(Resource::Sessions, &[session_id])?;
        self.call(Operation::GetSession, url, None)
    }

    pub fn build_list_sessions(&self) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.collection(Resource::Sessions);
        self.call(Operation::ListSessions, url, None)
    }

    pub fn build_delete_session(&self, session_id: &str) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.resolve(Resource::Sessions, &[session_id])?;
        self.call(Operation::DeleteSession, url, None)
    }

    // Connections

    pub fn build_create_connection<B: Serialize + ?Sized>(
        &self,
        session_id: &str,
        body: &B,
    ) -> Result<ApiCall, ApiError> {
        let url = self
            .endpoints
            .resolve(Resource::Sessions, &[session_id, "connection"])?;
        self.call(Operation::CreateConnection, url, Some(encode(body)?))
    }

    pub fn build_get_connection(
        &self,
        session_id: &str,
        connection_id: &str,
    ) -> Result<ApiCall, ApiError> {
        let url = self.connection_url(session_id, connection_id)?;
        self.call(Operation::GetConnection, url, None)
    }

    pub fn build_list_connections(&self, session_id: &str) -> Result<ApiCall, ApiError> {
        let url = self
            .endpoints
            .resolve(Resource::Sessions, &[session_id, "connection"])?;
        self.call(Operation::ListConnections, url, None)
    }

    pub fn build_update_connection<B: Serialize + ?Sized>(
        &self,
        session_id: &str,
        connection_id: &str,
        body: &B,
    ) -> Result<ApiCall, ApiError> {
        let url = self.connection_url(session_id, connection_id)?;
        self.call(Operation::UpdateConnection, url, Some(encode(body)?))
    }

    pub fn build_delete_connection(
        &self,
        session_id: &str,
        connection_id: &str,
    ) -> Result<ApiCall, ApiError> {
        let url = self.connection_url(session_id, connection_id)?;
        self.call(Operation::DeleteConnection, url, None)
    }

    // Recordings

    pub fn build_start_recording<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.resolve(Resource::Recordings, &["start"])?;
        self.call(Operation::StartRecording, url, Some(encode(body)?))
    }

    pub fn build_stop_recording(&self, recording_id: &str) -> Result<ApiCall, ApiError> {
        let url = self
            .endpoints
            .resolve(Resource::Recordings, &["stop", recording_id])?;
        self.call(Operation::StopRecording, url, None)
    }

    pub fn build_get_recording(&self, recording_id: &str) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.resolve(Resource::Recordings, &[recording_id])?;
        self.call(Operation::GetRecording, url, None)
    }

    pub fn build_list_recordings(&self) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.collection(Resource::Recordings);
        self.call(Operation::ListRecordings, url, None)
    }

    pub fn build_delete_recording(&self, recording_id: &str) -> Result<ApiCall, ApiError> {
        let url = self.endpoints.resolve(Resource::Recordings, &[recording_id])?;
        self.call(Operation::DeleteRecording, url, None)
    }

    /// Interpret the response to a call built by this mapper.
    pub fn parse(&self, operation: Operation, response: HttpResponse) -> Result<Value, ApiError> {
        status::interpret(operation, response)
    }

    fn connection_url(&self, session_id: &str, connection_id: &str) -> Result<url::Url, ApiError> {
        self.endpoints
            .resolve(Resource::Sessions, &[session_id, "connection", connection_id])
    }

    fn call(
        &self,
        operation: Operation,
        url: url::Url,
        body: Option<String>,
    ) -> Result<ApiCall, ApiError> {
        Ok(ApiCall {
            operation,
            request: HttpRequest {
                method: operation.method(),
                url: url.into(),
                headers: self.headers.clone(),
                body,
            },
        })
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}
