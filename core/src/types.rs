//! Typed request bodies.
//!
//! # Design
//! Every field is optional except where the server requires one, and unset
//! fields are left out of the JSON so the server applies its own defaults.
//! Nothing here is validated locally: the server reports bad values as
//! `*BodyParameter` errors. Any other `Serialize` value (a
//! `serde_json::Map`, a `json!` literal) can be sent in place of these.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaMode {
    Routed,
    Relayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordingMode {
    Manual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputMode {
    Composed,
    ComposedQuick,
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    Webrtc,
    Ipcam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Subscriber,
    Publisher,
    Moderator,
}

/// Body of `create_session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_mode: Option<MediaMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_mode: Option<RecordingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_transcoding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_recording_properties: Option<RecordingProperties>,
}

/// Body of `create_connection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProperties {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConnectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Free-form Kurento tuning, forwarded as is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kurento_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtsp_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptative_bitrate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_play_with_subscribers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_cache: Option<u32>,
}

/// Body of `update_connection`. Only the present fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
}

/// Recording settings, used by `start_recording` and as session defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_video: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_mode: Option<OutputMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_layout: Option<String>,
    /// `WIDTHxHEIGHT`, e.g. `1280x720`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shm_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_failed_streams: Option<bool>,
}

/// Body of `start_recording`: the session to record plus its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartRecording {
    pub session: String,
    #[serde(flatten)]
    pub properties: RecordingProperties,
}

impl StartRecording {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            properties: RecordingProperties::default(),
        }
    }

    pub fn with_properties(mut self, properties: RecordingProperties) -> Self {
        self.properties = properties;
        self
    }
}
