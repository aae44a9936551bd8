//! Blocking client: every call returns once the response is fully read.

use openvidu_core::{ApiCall, ClientConfig, HttpMethod, HttpRequest, HttpResponse, OpenViduApi};
use serde::Serialize;
use ureq::config::AutoHeaderValue;
use serde_json::Value;

use crate::Error;

/// Blocking OpenVidu client backed by a `ureq` agent.
///
/// The agent is built once from the `ClientConfig`: TLS verification and the
/// timeout apply to every call. Cloning is cheap and clones share the agent.
#[derive(Debug, Clone)]
pub struct OpenViduClient {
    api: OpenViduApi,
    agent: ureq::Agent,
    config: ClientConfig,
}

impl OpenViduClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let api = OpenViduApi::new(&config)?;
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(!config.verify_tls())
            .build();
        // Non-2xx responses are data here; the status tables classify them.
        // Accept and user agent come from the core headers; compression is
        // never negotiated so the async transport sends the same request.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .accept_encoding(AutoHeaderValue::None)
            .tls_config(tls)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Ok(Self { api, agent, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &OpenViduApi {
        &self.api
    }

    pub fn create_session<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value, Error> {
        self.execute(self.api.build_create_session(body)?)
    }

    pub fn get_session(&self, session_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_get_session(session_id)?)
    }

    pub fn list_sessions(&self) -> Result<Value, Error> {
        self.execute(self.api.build_list_sessions()?)
    }

    pub fn delete_session(&self, session_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_delete_session(session_id)?)
    }

    pub fn create_connection<B: Serialize + ?Sized>(
        &self,
        session_id: &str,
        body: &B,
    ) -> Result<Value, Error> {
        self.execute(self.api.build_create_connection(session_id, body)?)
    }

    pub fn get_connection(&self, session_id: &str, connection_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_get_connection(session_id, connection_id)?)
    }

    pub fn list_connections(&self, session_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_list_connections(session_id)?)
    }

    pub fn update_connection<B: Serialize + ?Sized>(
        &self,
        session_id: &str,
        connection_id: &str,
        body: &B,
    ) -> Result<Value, Error> {
        self.execute(self.api.build_update_connection(session_id, connection_id, body)?)
    }

    pub fn delete_connection(&self, session_id: &str, connection_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_delete_connection(session_id, connection_id)?)
    }

    pub fn start_recording<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value, Error> {
        self.execute(self.api.build_start_recording(body)?)
    }

    pub fn stop_recording(&self, recording_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_stop_recording(recording_id)?)
    }

    pub fn get_recording(&self, recording_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_get_recording(recording_id)?)
    }

    pub fn list_recordings(&self) -> Result<Value, Error> {
        self.execute(self.api.build_list_recordings()?)
    }

    pub fn delete_recording(&self, recording_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_delete_recording(recording_id)?)
    }

    /// Run a prepared call and interpret its response.
    pub fn execute(&self, call: ApiCall) -> Result<Value, Error> {
        let ApiCall { operation, request } = call;
        tracing::debug!(%operation, method = %request.method, url = %request.url, "dispatching request");
        let response = self.send(request)?;
        tracing::debug!(%operation, status = response.status, "response received");
        Ok(self.api.parse(operation, response)?)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ureq::Error> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let url = url.as_str();

        let mut response = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), &headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), &headers).send_empty(),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
