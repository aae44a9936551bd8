//! Errors returned by the facades.

use openvidu_core::{ApiError, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request building or response classification failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Transport-level failure of the blocking client (DNS, TLS, timeout, ...).
    #[error("http error: {0}")]
    Ureq(#[from] ureq::Error),

    /// Transport-level failure of the async client.
    #[error("http error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// The documented error kind, when the server answered with one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api(e) => e.kind(),
            Error::Ureq(_) | Error::Reqwest(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(e) => e.status(),
            Error::Ureq(_) | Error::Reqwest(_) => None,
        }
    }

    /// Whether the call never got a response from the server.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Error::Api(_))
    }
}
