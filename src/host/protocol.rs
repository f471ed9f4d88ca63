//! Typed boundary for the host's named-event stream.
//!
//! The host emits fire-and-forget notifications as `(name, JSON payload)`
//! pairs. Everything crossing that boundary is parsed here, once, into
//! [`HostEvent`] so downstream handlers match on an exhaustive enum instead
//! of switching on string literals. Payload shapes follow the host's wire
//! format: bare strings, `{"Error": "..."}` objects, numeric sample arrays,
//! and structured error notices.

use serde_json::Value;

use crate::errors::ErrorNotice;

// ============================================================================
// Event names (host → shell)
// ============================================================================

pub const RECORDING_STARTED: &str = "recording_started";
pub const RECORDING_STOPPED: &str = "recording_stopped";
pub const AUDIO_CHUNK: &str = "audio_chunk";
pub const TRANSCRIPTION_RESPONSE: &str = "transcription_response";
pub const TEXT_PASTED: &str = "text_pasted";
pub const WEBSOCKET_STATUS: &str = "websocket_status";
pub const RECORDING_ERROR: &str = "recording_error";
pub const AUDIO_ERROR: &str = "audio_error";
pub const SHORTCUTS_UPDATED: &str = "shortcuts_updated";
pub const SHORTCUTS_ERROR: &str = "shortcuts_error";
pub const APP_ERROR: &str = "app_error";
pub const CRITICAL_ERROR: &str = "critical_error";
pub const UPDATE_DOWNLOAD_PROGRESS: &str = "update-download-progress";
pub const UPDATE_DOWNLOAD_FINISHED: &str = "update-download-finished";

/// The fixed set of events the shell subscribes to on startup.
pub const EVENT_NAMES: &[&str] = &[
    RECORDING_STARTED,
    RECORDING_STOPPED,
    AUDIO_CHUNK,
    TRANSCRIPTION_RESPONSE,
    TEXT_PASTED,
    WEBSOCKET_STATUS,
    RECORDING_ERROR,
    AUDIO_ERROR,
    SHORTCUTS_UPDATED,
    SHORTCUTS_ERROR,
    APP_ERROR,
    CRITICAL_ERROR,
    UPDATE_DOWNLOAD_PROGRESS,
    UPDATE_DOWNLOAD_FINISHED,
];

/// An event exactly as it crossed the bridge, before typing.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub name: String,
    pub payload: Value,
}

impl RawEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

// ============================================================================
// Websocket status reports
// ============================================================================

/// One host report about the backend websocket.
///
/// The wire shape is polymorphic: `"Connected"` / `"Connecting"` /
/// `"Disconnected"` as bare strings, or `{"Error": "reason"}`. Parsed into a
/// tagged variant here so no call site inspects JSON shapes ad hoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    Connected,
    Connecting,
    Error(String),
    /// Any other report the host may emit (e.g. `"Disconnected"`).
    Other(String),
}

impl StatusReport {
    pub fn from_value(value: &Value) -> Self {
        if let Some(text) = value.as_str() {
            return match text {
                "Connected" => StatusReport::Connected,
                "Connecting" => StatusReport::Connecting,
                other => StatusReport::Other(other.to_string()),
            };
        }
        if let Some(message) = value.get("Error").and_then(Value::as_str) {
            return StatusReport::Error(message.to_string());
        }
        StatusReport::Other(value.to_string())
    }

    /// Raw label for the settings screen, which shows the report verbatim.
    pub fn label(&self) -> String {
        match self {
            StatusReport::Connected => "Connected".to_string(),
            StatusReport::Connecting => "Connecting".to_string(),
            StatusReport::Error(message) => format!("Error: {message}"),
            StatusReport::Other(text) => text.clone(),
        }
    }
}

// ============================================================================
// Typed events
// ============================================================================

/// Every notification the shell consumes, parsed from the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    RecordingStarted,
    RecordingStopped,
    /// Audio samples for level display only; never drives processing state.
    AudioChunk { samples: Vec<f32> },
    TranscriptionResponse { is_final: bool },
    TextPasted,
    WebsocketStatus(StatusReport),
    /// Message is absent when the host sent an empty payload.
    RecordingError { message: Option<String> },
    AudioError { message: Option<String> },
    ShortcutsUpdated,
    ShortcutsError { message: String },
    AppError(ErrorNotice),
    CriticalError(ErrorNotice),
    UpdateDownloadProgress { percent: f64 },
    UpdateDownloadFinished,
}

impl HostEvent {
    /// Parse one raw event. Unknown names and malformed structured payloads
    /// yield `None`; marker events tolerate any payload.
    pub fn from_raw(raw: &RawEvent) -> Option<Self> {
        let event = match raw.name.as_str() {
            RECORDING_STARTED => HostEvent::RecordingStarted,
            RECORDING_STOPPED => HostEvent::RecordingStopped,
            AUDIO_CHUNK => HostEvent::AudioChunk {
                samples: parse_samples(&raw.payload),
            },
            TRANSCRIPTION_RESPONSE => HostEvent::TranscriptionResponse {
                is_final: raw
                    .payload
                    .get("is_final")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            TEXT_PASTED => HostEvent::TextPasted,
            WEBSOCKET_STATUS => HostEvent::WebsocketStatus(StatusReport::from_value(&raw.payload)),
            RECORDING_ERROR => HostEvent::RecordingError {
                message: parse_message(&raw.payload),
            },
            AUDIO_ERROR => HostEvent::AudioError {
                message: parse_message(&raw.payload),
            },
            SHORTCUTS_UPDATED => HostEvent::ShortcutsUpdated,
            SHORTCUTS_ERROR => HostEvent::ShortcutsError {
                message: parse_message(&raw.payload).unwrap_or_default(),
            },
            APP_ERROR => HostEvent::AppError(parse_notice(raw)?),
            CRITICAL_ERROR => HostEvent::CriticalError(parse_notice(raw)?),
            UPDATE_DOWNLOAD_PROGRESS => HostEvent::UpdateDownloadProgress {
                percent: raw.payload.as_f64().unwrap_or(0.0),
            },
            UPDATE_DOWNLOAD_FINISHED => HostEvent::UpdateDownloadFinished,
            other => {
                tracing::debug!(event = other, "ignoring unknown host event");
                return None;
            }
        };
        Some(event)
    }
}

fn parse_message(payload: &Value) -> Option<String> {
    payload
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn parse_samples(payload: &Value) -> Vec<f32> {
    payload
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_f64)
                .map(|sample| sample as f32)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_notice(raw: &RawEvent) -> Option<ErrorNotice> {
    match serde_json::from_value::<ErrorNotice>(raw.payload.clone()) {
        Ok(notice) => Some(notice),
        Err(err) => {
            tracing::warn!(event = %raw.name, %err, "malformed error notice payload");
            None
        }
    }
}

/// Coarse display level derived from chunk size, clamped to [0, 1].
pub fn audio_level(samples: &[f32]) -> f32 {
    (samples.len() as f32 / 1000.0).min(1.0)
}
