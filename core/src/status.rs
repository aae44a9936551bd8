//! Per-operation status interpretation.
//!
//! # Design
//! The same status means different things depending on the endpoint: a 404
//! from `delete_session` is `SessionNotFound`, from `get_connection` it is
//! `ConnectionNotFound`. Each operation therefore owns a small table of
//! `StatusRule`s; the status of a rule is the status of its kind, so a table
//! cannot disagree with the taxonomy.
//!
//! Statuses missing from an operation's table are never treated as success:
//! they surface as `ApiError::UnexpectedStatus` with the raw body.

use serde_json::Value;

use crate::error::{ApiError, ErrorKind};
use crate::http::HttpResponse;
use crate::operation::Operation;

/// One documented failure of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub kind: ErrorKind,
    pub message: &'static str,
}

impl StatusRule {
    const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    pub fn status(&self) -> u16 {
        self.kind.status()
    }
}

const BODY_PARAMETER: &str = "Problem with some body parameter";
const NO_SESSION: &str = "No Session exists for the passed SESSION_ID";
const RECORDING_DISABLED: &str = "OpenVidu Server recording module is disabled: \
     OPENVIDU_RECORDING configuration property is set to false";
const NO_RECORDING: &str = "No recording exists for the passed RECORDING_ID";

const CREATE_SESSION: &[StatusRule] = &[
    StatusRule::new(ErrorKind::SessionBodyParameter, BODY_PARAMETER),
    StatusRule::new(
        ErrorKind::SessionExists,
        "Parameter customSessionId corresponds to an existing Session",
    ),
];

const SESSION_BY_ID: &[StatusRule] = &[StatusRule::new(ErrorKind::SessionNotFound, NO_SESSION)];

const CREATE_CONNECTION: &[StatusRule] = &[
    StatusRule::new(ErrorKind::ConnectionBodyParameter, BODY_PARAMETER),
    StatusRule::new(ErrorKind::SessionNotFound, NO_SESSION),
    StatusRule::new(
        ErrorKind::ConnectionIpcam,
        "Unexpected error when creating the Connection object",
    ),
];

const CONNECTION_BY_ID: &[StatusRule] = &[
    StatusRule::new(ErrorKind::SessionDoesNotExist, NO_SESSION),
    StatusRule::new(
        ErrorKind::ConnectionNotFound,
        "No Connection exists for the passed CONNECTION_ID",
    ),
];

const UPDATE_CONNECTION: &[StatusRule] = &[
    StatusRule::new(ErrorKind::ConnectionBodyParameter, BODY_PARAMETER),
    StatusRule::new(
        ErrorKind::SessionOrConnectionDoesNotExist,
        "No Session exists for the passed SESSION_ID, \
         or no Connection exists for the passed CONNECTION_ID",
    ),
];

const START_RECORDING: &[StatusRule] = &[
    StatusRule::new(ErrorKind::RecordingBodyParameter, BODY_PARAMETER),
    StatusRule::new(
        ErrorKind::SessionNotFound,
        "No session exists for the passed session body parameter",
    ),
    StatusRule::new(
        ErrorKind::RecordingNoConnectedParticipants,
        "The session has no connected participants",
    ),
    StatusRule::new(
        ErrorKind::RecordingNotConfiguredForMediaNode,
        "The session is not configured for using MediaMode ROUTED or it is already being recorded",
    ),
    StatusRule::new(
        ErrorKind::RecordingResolutionOrBrowserSettings,
        "resolution parameter exceeds acceptable values \
         (for both width and height, min 100px and max 1999px) \
         or trying to start a recording with both hasAudio and hasVideo to false",
    ),
    StatusRule::new(ErrorKind::RecordingDisabledOnServer, RECORDING_DISABLED),
];

const STOP_RECORDING: &[StatusRule] = &[
    StatusRule::new(ErrorKind::RecordingNotFound, NO_RECORDING),
    StatusRule::new(
        ErrorKind::RecordingStartingInProgress,
        "Recording has starting status. Wait until started status before stopping the recording",
    ),
    StatusRule::new(ErrorKind::RecordingDisabledOnServer, RECORDING_DISABLED),
];

const GET_RECORDING: &[StatusRule] = &[
    StatusRule::new(ErrorKind::RecordingNotFound, NO_RECORDING),
    StatusRule::new(ErrorKind::RecordingDisabledOnServer, RECORDING_DISABLED),
];

const LIST_RECORDINGS: &[StatusRule] =
    &[StatusRule::new(ErrorKind::RecordingDisabledOnServer, RECORDING_DISABLED)];

const DELETE_RECORDING: &[StatusRule] = &[
    StatusRule::new(ErrorKind::RecordingNotFound, NO_RECORDING),
    StatusRule::new(
        ErrorKind::RecordingNotCompleted,
        "The recording has started status. Stop it before deletion",
    ),
    StatusRule::new(ErrorKind::RecordingDisabledOnServer, RECORDING_DISABLED),
];

/// The documented failures of `operation`.
pub fn rules(operation: Operation) -> &'static [StatusRule] {
    match operation {
        Operation::CreateSession => CREATE_SESSION,
        Operation::GetSession | Operation::DeleteSession => SESSION_BY_ID,
        Operation::ListSessions => &[],
        Operation::CreateConnection => CREATE_CONNECTION,
        Operation::GetConnection | Operation::DeleteConnection => CONNECTION_BY_ID,
        Operation::ListConnections => SESSION_BY_ID,
        Operation::UpdateConnection => UPDATE_CONNECTION,
        Operation::StartRecording => START_RECORDING,
        Operation::StopRecording => STOP_RECORDING,
        Operation::GetRecording => GET_RECORDING,
        Operation::ListRecordings => LIST_RECORDINGS,
        Operation::DeleteRecording => DELETE_RECORDING,
    }
}

/// Classify `status` for `operation` without looking at the body.
pub fn classify(operation: Operation, status: u16) -> Option<&'static StatusRule> {
    rules(operation).iter().find(|rule| rule.status() == status)
}

/// Turn a response into the decoded payload or the operation's error.
///
/// A 2xx body is returned exactly as decoded; an empty 2xx body (the server
/// answers deletes with `204 No Content`) decodes to `Value::Null`. Error
/// bodies are kept as raw text and never decoded.
pub fn interpret(operation: Operation, response: HttpResponse) -> Result<Value, ApiError> {
    if response.is_success() {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()));
    }

    match classify(operation, response.status) {
        Some(rule) => Err(ApiError::Api {
            kind: rule.kind,
            status: response.status,
            message: rule.message,
            body: response.body,
        }),
        None => Err(ApiError::UnexpectedStatus {
            operation,
            status: response.status,
            body: response.body,
        }),
    }
}
