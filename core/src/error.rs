//! Error taxonomy of the OpenVidu REST API.
//!
//! # Design
//! `ErrorKind` is the closed set of failures the server documents, each
//! pinned to one HTTP status. Which kind a status maps to depends on the
//! operation that produced it (see `status`), so the kind never stands alone:
//! `ApiError::Api` pairs it with the status actually received, the
//! operation-specific message and the raw body.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// A documented failure, grouped by the resource it concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    // Session
    SessionBodyParameter,
    SessionExists,
    SessionNotFound,
    SessionDoesNotExist,

    // Connection
    ConnectionBodyParameter,
    ConnectionIpcam,
    ConnectionNotFound,

    // Session or connection
    SessionOrConnectionDoesNotExist,

    // Recording
    RecordingBodyParameter,
    RecordingResolutionOrBrowserSettings,
    RecordingNoConnectedParticipants,
    RecordingNotConfiguredForMediaNode,
    RecordingDisabledOnServer,
    RecordingNotFound,
    RecordingStartingInProgress,
    RecordingNotCompleted,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 16] = [
        ErrorKind::SessionBodyParameter,
        ErrorKind::SessionExists,
        ErrorKind::SessionNotFound,
        ErrorKind::SessionDoesNotExist,
        ErrorKind::ConnectionBodyParameter,
        ErrorKind::ConnectionIpcam,
        ErrorKind::ConnectionNotFound,
        ErrorKind::SessionOrConnectionDoesNotExist,
        ErrorKind::RecordingBodyParameter,
        ErrorKind::RecordingResolutionOrBrowserSettings,
        ErrorKind::RecordingNoConnectedParticipants,
        ErrorKind::RecordingNotConfiguredForMediaNode,
        ErrorKind::RecordingDisabledOnServer,
        ErrorKind::RecordingNotFound,
        ErrorKind::RecordingStartingInProgress,
        ErrorKind::RecordingNotCompleted,
    ];

    /// The HTTP status this kind is reported with.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::SessionBodyParameter => 400,
            ErrorKind::SessionExists => 409,
            ErrorKind::SessionNotFound => 404,
            ErrorKind::SessionDoesNotExist => 400,
            ErrorKind::ConnectionBodyParameter => 400,
            ErrorKind::ConnectionIpcam => 500,
            ErrorKind::ConnectionNotFound => 404,
            ErrorKind::SessionOrConnectionDoesNotExist => 404,
            ErrorKind::RecordingBodyParameter => 400,
            ErrorKind::RecordingResolutionOrBrowserSettings => 422,
            ErrorKind::RecordingNoConnectedParticipants => 406,
            ErrorKind::RecordingNotConfiguredForMediaNode => 409,
            ErrorKind::RecordingDisabledOnServer => 501,
            ErrorKind::RecordingNotFound => 404,
            ErrorKind::RecordingStartingInProgress => 406,
            ErrorKind::RecordingNotCompleted => 409,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::SessionBodyParameter => "create session: bad body parameter",
            ErrorKind::SessionExists => "custom session id already exists",
            ErrorKind::SessionNotFound => "session not found",
            ErrorKind::SessionDoesNotExist => "session does not exist",
            ErrorKind::ConnectionBodyParameter => "connection: bad body parameter",
            ErrorKind::ConnectionIpcam => "unexpected error creating an IPCAM connection",
            ErrorKind::ConnectionNotFound => "connection not found",
            ErrorKind::SessionOrConnectionDoesNotExist => "session or connection does not exist",
            ErrorKind::RecordingBodyParameter => "recording: bad body parameter",
            ErrorKind::RecordingResolutionOrBrowserSettings => {
                "resolution not supported, or audio and video both disabled"
            }
            ErrorKind::RecordingNoConnectedParticipants => "no participants to record",
            ErrorKind::RecordingNotConfiguredForMediaNode => {
                "session cannot be recorded on its media node"
            }
            ErrorKind::RecordingDisabledOnServer => "recording disabled on server",
            ErrorKind::RecordingNotFound => "recording not found",
            ErrorKind::RecordingStartingInProgress => "recording has not started yet",
            ErrorKind::RecordingNotCompleted => "recording must be stopped first",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors produced while building requests or interpreting responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status documented for this operation.
    #[error("{kind:?} (HTTP {status}): {message}")]
    Api {
        kind: ErrorKind,
        status: u16,
        message: &'static str,
        body: String,
    },

    /// A non-2xx status the operation's table does not list.
    #[error("unexpected HTTP {status} from {operation}: {body}")]
    UnexpectedStatus {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// A 2xx body that is not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The host URL cannot carry a path (e.g. `mailto:`).
    #[error("host cannot be used as a base url: {0}")]
    InvalidHost(String),

    /// A `.` or `..` id, which would leave the API root once joined.
    #[error("invalid path segment: {0:?}")]
    InvalidPathSegment(String),
}

impl ApiError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_client_or_server_error_status() {
        for kind in ErrorKind::ALL {
            let status = kind.status();
            assert!((400..600).contains(&status), "{kind:?} -> {status}");
            assert!(!kind.description().is_empty());
        }
    }

    #[test]
    fn api_error_exposes_kind_and_status() {
        let err = ApiError::Api {
            kind: ErrorKind::SessionExists,
            status: 409,
            message: "exists",
            body: String::new(),
        };
        assert_eq!(err.kind(), Some(ErrorKind::SessionExists));
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "SessionExists (HTTP 409): exists");
    }

    #[test]
    fn unexpected_status_has_no_kind() {
        let err = ApiError::UnexpectedStatus {
            operation: Operation::ListSessions,
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.kind(), None);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "unexpected HTTP 503 from list_sessions: down");
    }

    #[test]
    fn kinds_deserialize_by_name() {
        let kind: ErrorKind = serde_json::from_str(r#""RecordingNotCompleted""#).unwrap();
        assert_eq!(kind, ErrorKind::RecordingNotCompleted);
    }
}
