//! The fourteen remote actions the client can perform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateSession,
    GetSession,
    ListSessions,
    DeleteSession,
    CreateConnection,
    GetConnection,
    ListConnections,
    UpdateConnection,
    DeleteConnection,
    StartRecording,
    StopRecording,
    GetRecording,
    ListRecordings,
    DeleteRecording,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::CreateSession,
        Operation::GetSession,
        Operation::ListSessions,
        Operation::DeleteSession,
        Operation::CreateConnection,
        Operation::GetConnection,
        Operation::ListConnections,
        Operation::UpdateConnection,
        Operation::DeleteConnection,
        Operation::StartRecording,
        Operation::StopRecording,
        Operation::GetRecording,
        Operation::ListRecordings,
        Operation::DeleteRecording,
    ];

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::GetSession
            | Operation::ListSessions
            | Operation::GetConnection
            | Operation::ListConnections
            | Operation::GetRecording
            | Operation::ListRecordings => HttpMethod::Get,
            Operation::CreateSession
            | Operation::CreateConnection
            | Operation::StartRecording
            | Operation::StopRecording => HttpMethod::Post,
            Operation::UpdateConnection => HttpMethod::Patch,
            Operation::DeleteSession | Operation::DeleteConnection | Operation::DeleteRecording => {
                HttpMethod::Delete
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateSession => "create_session",
            Operation::GetSession => "get_session",
            Operation::ListSessions => "list_sessions",
            Operation::DeleteSession => "delete_session",
            Operation::CreateConnection => "create_connection",
            Operation::GetConnection => "get_connection",
            Operation::ListConnections => "list_connections",
            Operation::UpdateConnection => "update_connection",
            Operation::DeleteConnection => "delete_connection",
            Operation::StartRecording => "start_recording",
            Operation::StopRecording => "stop_recording",
            Operation::GetRecording => "get_recording",
            Operation::ListRecordings => "list_recordings",
            Operation::DeleteRecording => "delete_recording",
        }
    }

    /// Whether the operation sends a JSON body.
    pub fn has_body(self) -> bool {
        matches!(
            self,
            Operation::CreateSession
                | Operation::CreateConnection
                | Operation::UpdateConnection
                | Operation::StartRecording
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matches_serde_representation() {
        for op in Operation::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, op.name());
        }
    }

    #[test]
    fn only_update_connection_patches() {
        let patches: Vec<_> = Operation::ALL
            .into_iter()
            .filter(|op| op.method() == HttpMethod::Patch)
            .collect();
        assert_eq!(patches, vec![Operation::UpdateConnection]);
    }

    #[test]
    fn body_carrying_operations_are_writes() {
        for op in Operation::ALL.into_iter().filter(|op| op.has_body()) {
            assert!(matches!(op.method(), HttpMethod::Post | HttpMethod::Patch), "{op}");
        }
    }
}
