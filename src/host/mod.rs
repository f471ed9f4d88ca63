//! Command/event bridge to the native host process.
//!
//! The host owns everything hard: audio capture, global shortcuts, the
//! websocket session, clipboard paste, persistence. The shell reaches it
//! through [`HostClient`] (request/response commands) and the named-event
//! stream typed in [`protocol`]. Both directions are treated as fallible
//! collaborators: command failures are surfaced as [`HostError`] and logged
//! at the call site, never panicked on.

pub mod protocol;
pub mod subscription;

use crate::settings::{
    AudioDevice, SettingsDocument, ShortcutConfig, UpdateCheck, WebSocketConfig,
};
use protocol::StatusReport;

/// Failure of a single host command.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host rejected the command input (e.g. a malformed shortcut).
    #[error("rejected: {0}")]
    Rejected(String),
    /// The command reached the host but failed there.
    #[error("command failed: {0}")]
    Command(String),
    /// The bridge itself is gone; no command will succeed until it returns.
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// The host's command surface.
///
/// Calls complete off-thread on the host side; from the shell's
/// single-threaded pump they look synchronous and cheap. Every caller treats
/// an `Err` as loggable, not fatal.
pub trait HostClient {
    // Settings persistence. `save_app_settings` replaces the whole document,
    // which is why all writers go through the session's read-merge-write.
    fn get_app_settings(&self) -> HostResult<SettingsDocument>;
    fn save_app_settings(&self, settings: &SettingsDocument) -> HostResult<()>;

    // Audio devices and the recording toggle.
    fn get_audio_devices(&self) -> HostResult<Vec<AudioDevice>>;
    fn select_audio_device(&self, device_name: &str) -> HostResult<()>;
    fn is_recording(&self) -> HostResult<bool>;
    fn start_recording(&self) -> HostResult<()>;
    fn stop_recording(&self) -> HostResult<()>;

    // Global shortcuts.
    fn validate_shortcut(&self, shortcut: &str) -> HostResult<()>;
    fn update_shortcut_config(&self, config: &ShortcutConfig) -> HostResult<()>;

    // Backend websocket.
    fn get_websocket_config(&self) -> HostResult<WebSocketConfig>;
    fn update_websocket_config(&self, config: &WebSocketConfig) -> HostResult<()>;
    fn get_websocket_status(&self) -> HostResult<StatusReport>;
    fn connect_websocket(&self) -> HostResult<()>;
    fn disconnect_websocket(&self) -> HostResult<()>;

    // Overlay window.
    fn hide_processing_overlay(&self) -> HostResult<()>;

    // Updater.
    fn check_for_updates(&self) -> HostResult<UpdateCheck>;
    fn check_and_prompt_for_update(&self) -> HostResult<bool>;
    fn download_and_install_update(&self) -> HostResult<()>;
}
