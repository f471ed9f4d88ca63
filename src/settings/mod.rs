mod document;
mod session;

pub use document::{
    AudioDevice, SettingsDocument, ShortcutConfig, UpdateCheck, UpdateInfo, WebSocketConfig,
    DEFAULT_EDIT_SHORTCUT, DEFAULT_RECONNECT_INTERVAL_SECS, DEFAULT_TRANSCRIPTION_SHORTCUT,
    DEFAULT_WEBSOCKET_URL,
};
pub use session::{SettingsSession, ShortcutKind, WEBSOCKET_DEBOUNCE_MS};
