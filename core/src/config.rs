//! Client configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Immutable settings shared by every call of a client.
///
/// TLS verification is off unless enabled; there is no timeout unless one is
/// set. `Debug` never prints the secret.
#[derive(Clone)]
pub struct ClientConfig {
    host: Url,
    secret: String,
    verify_tls: bool,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// * `host` – base URL of the media server (e.g. `https://media.example.com`).
    /// * `secret` – the server's shared secret.
    pub fn new(host: &str, secret: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            host: Url::parse(host)?,
            secret: secret.into(),
            verify_tls: false,
            timeout: None,
        })
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host.as_str())
            .field("secret", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}
