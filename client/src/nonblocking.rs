//! Async client: calls suspend the task at network I/O only.
//!
//! Dropping a call's future cancels the in-flight request; the client itself
//! is untouched.

use openvidu_core::{ApiCall, ClientConfig, HttpMethod, HttpRequest, HttpResponse, OpenViduApi};
use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// Async OpenVidu client backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct AsyncOpenViduClient {
    api: OpenViduApi,
    http: reqwest::Client,
    config: ClientConfig,
}

impl AsyncOpenViduClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let api = OpenViduApi::new(&config)?;
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(!config.verify_tls());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            api,
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &OpenViduApi {
        &self.api
    }

    pub async fn create_session<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value, Error> {
        self.execute(self.api.build_create_session(body)?).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_get_session(session_id)?).await
    }

    pub async fn list_sessions(&self) -> Result<Value, Error> {
        self.execute(self.api.build_list_sessions()?).await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_delete_session(session_id)?).await
    }

    pub async fn create_connection<B: Serialize + ?Sized>(
        &self,
        session_id: &str,
        body: &B,
    ) -> Result<Value, Error> {
        self.execute(self.api.build_create_connection(session_id, body)?)
            .await
    }

    pub async fn get_connection(
        &self,
        session_id: &str,
        connection_id: &str,
    ) -> Result<Value, Error> {
        self.execute(self.api.build_get_connection(session_id, connection_id)?)
            .await
    }

    pub async fn list_connections(&self, session_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_list_connections(session_id)?).await
    }

    pub async fn update_connection<B: Serialize + ?Sized>(
        &self,
        session_id: &str,
        connection_id: &str,
        body: &B,
    ) -> Result<Value, Error> {
        self.execute(
            self.api
                .build_update_connection(session_id, connection_id, body)?,
        )
        .await
    }

    pub async fn delete_connection(
        &self,
        session_id: &str,
        connection_id: &str,
    ) -> Result<Value, Error> {
        self.execute(self.api.build_delete_connection(session_id, connection_id)?)
            .await
    }

    pub async fn start_recording<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value, Error> {
        self.execute(self.api.build_start_recording(body)?).await
    }

    pub async fn stop_recording(&self, recording_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_stop_recording(recording_id)?).await
    }

    pub async fn get_recording(&self, recording_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_get_recording(recording_id)?).await
    }

    pub async fn list_recordings(&self) -> Result<Value, Error> {
        self.execute(self.api.build_list_recordings()?).await
    }

    pub async fn delete_recording(&self, recording_id: &str) -> Result<Value, Error> {
        self.execute(self.api.build_delete_recording(recording_id)?).await
    }

    /// Run a prepared call and interpret its response.
    pub async fn execute(&self, call: ApiCall) -> Result<Value, Error> {
        let ApiCall { operation, request } = call;
        tracing::debug!(%operation, method = %request.method, url = %request.url, "dispatching request");
        let response = self.send(request).await?;
        tracing::debug!(%operation, status = response.status, "response received");
        Ok(self.api.parse(operation, response)?)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let verb = match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(verb, url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match body {
            Some(body) => builder = builder.body(body),
            // hyper omits the length of an empty body; ureq always sends it.
            None if matches!(method, HttpMethod::Post | HttpMethod::Patch) => {
                builder = builder.header(reqwest::header::CONTENT_LENGTH, "0");
            }
            None => {}
        }

        let response = builder.send().await?;
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
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
