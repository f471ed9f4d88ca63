//! Persisted settings document and its sub-configs.
//!
//! The host owns and serializes the document; the shell only ever holds a
//! cached copy and writes it back whole (see the session's read-merge-write
//! path). Field names here are the wire contract.

use serde::{Deserialize, Serialize};

/// Default global shortcut for toggling transcription.
pub const DEFAULT_TRANSCRIPTION_SHORTCUT: &str = "CommandOrControl+Ctrl+Space";
/// Default global shortcut for the edit action.
pub const DEFAULT_EDIT_SHORTCUT: &str = "CommandOrControl+Ctrl+E";
/// Default backend websocket endpoint.
pub const DEFAULT_WEBSOCKET_URL: &str = "ws://localhost:8000/ws/transcribe";
/// Default reconnect interval in seconds.
pub const DEFAULT_RECONNECT_INTERVAL_SECS: u64 = 5;

/// Global shortcut bindings in canonical `+`-joined form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutConfig {
    pub transcription: String,
    pub edit: String,
    pub transcription_enabled: bool,
    pub edit_enabled: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            transcription: DEFAULT_TRANSCRIPTION_SHORTCUT.to_string(),
            edit: DEFAULT_EDIT_SHORTCUT.to_string(),
            transcription_enabled: true,
            edit_enabled: true,
        }
    }
}

/// Backend websocket connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSocketConfig {
    pub url: String,
    pub auto_reconnect: bool,
    /// Seconds between reconnect attempts.
    pub reconnect_interval: u64,
    /// Bearer token injected before connect when auth is enabled; never
    /// persisted back by the shell unless the host included it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEBSOCKET_URL.to_string(),
            auto_reconnect: true,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL_SECS,
            auth_token: None,
        }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for WebSocketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketConfig")
            .field("url", &self.url)
            .field("auto_reconnect", &self.auto_reconnect)
            .field("reconnect_interval", &self.reconnect_interval)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// One capture device as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub name: String,
    pub is_default: bool,
}

/// The whole persisted settings document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub shortcuts: ShortcutConfig,
    pub websocket: WebSocketConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_microphone: Option<String>,
}

/// Result of a silent update check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateCheck {
    pub available: bool,
    #[serde(default)]
    pub update_info: Option<UpdateInfo>,
}

/// Release metadata attached to an available update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateInfo {
    pub version: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub download_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_wire_contract() {
        let doc = SettingsDocument::default();
        assert_eq!(doc.shortcuts.transcription, DEFAULT_TRANSCRIPTION_SHORTCUT);
        assert_eq!(doc.shortcuts.edit, DEFAULT_EDIT_SHORTCUT);
        assert!(doc.shortcuts.transcription_enabled);
        assert_eq!(doc.websocket.url, DEFAULT_WEBSOCKET_URL);
        assert_eq!(doc.websocket.reconnect_interval, 5);
        assert!(doc.websocket.auto_reconnect);
        assert!(doc.selected_microphone.is_none());
    }

    #[test]
    fn document_round_trips_unknown_free_fields() {
        let mut doc = SettingsDocument::default();
        doc.selected_microphone = Some("USB Mic".to_string());
        doc.websocket.url = "wss://example.test/ws".to_string();

        let json = serde_json::to_value(&doc).expect("serialize");
        let back: SettingsDocument = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, doc);
    }

    #[test]
    fn websocket_debug_redacts_the_token() {
        let config = WebSocketConfig {
            auth_token: Some("secret-token".to_string()),
            ..WebSocketConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn update_check_parses_without_info() {
        let parsed: UpdateCheck =
            serde_json::from_value(serde_json::json!({"available": false})).expect("parses");
        assert!(!parsed.available);
        assert!(parsed.update_info.is_none());
    }
}
