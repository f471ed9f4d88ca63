//! Settings session: one owned in-memory copy of the host's settings
//! document plus a dirty-field set, flushed through read-merge-write.
//!
//! The persistence command replaces the whole document, so a write must
//! never be partial: every flush re-reads the current document, patches only
//! the fields this session dirtied, and writes the merged result back.
//! Fields edited elsewhere in the meantime survive untouched.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::connection::ConnectionStatus;
use crate::host::protocol::{HostEvent, StatusReport};
use crate::host::HostClient;
use crate::timer::Deadline;

use super::document::{AudioDevice, SettingsDocument};

/// Quiet window after the last websocket edit before the buffered document
/// is persisted.
pub const WEBSOCKET_DEBOUNCE_MS: u64 = 1000;

/// Which shortcut binding an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKind {
    Transcription,
    Edit,
}

#[derive(Debug, Default, Clone, Copy)]
struct DirtyFields {
    websocket: bool,
}

/// Cached, possibly-stale view of the host settings plus screen state.
///
/// At most one session is active at a time; it owns the only shell-side copy
/// of the document.
pub struct SettingsSession {
    document: SettingsDocument,
    devices: Vec<AudioDevice>,
    selected_device: Option<String>,
    recording: bool,
    status_label: String,
    connection: ConnectionStatus,
    dirty: DirtyFields,
    debounce: Deadline,
    debounce_delay: Duration,
    /// Last host rejection of a typed shortcut, kept for display. The typed
    /// value itself stays echoed in the document (no rollback).
    last_shortcut_warning: Option<String>,
}

impl Default for SettingsSession {
    fn default() -> Self {
        Self::with_debounce(Duration::from_millis(WEBSOCKET_DEBOUNCE_MS))
    }
}

impl SettingsSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(debounce_delay: Duration) -> Self {
        Self {
            document: SettingsDocument::default(),
            devices: Vec::new(),
            selected_device: None,
            recording: false,
            status_label: "Disconnected".to_string(),
            connection: ConnectionStatus::Disconnected,
            dirty: DirtyFields::default(),
            debounce: Deadline::new(),
            debounce_delay,
            last_shortcut_warning: None,
        }
    }

    /// Best-effort activation load. Each read failure is logged and leaves
    /// the field at its prior default; the screen renders regardless.
    pub fn load(&mut self, host: &dyn HostClient) {
        match host.get_app_settings() {
            Ok(document) => self.document = document,
            Err(err) => tracing::warn!(%err, "failed to load settings; keeping defaults"),
        }

        match host.get_audio_devices() {
            Ok(devices) => self.devices = devices,
            Err(err) => tracing::warn!(%err, "failed to enumerate audio devices"),
        }

        self.selected_device = self.document.selected_microphone.clone().or_else(|| {
            self.devices
                .iter()
                .find(|device| device.is_default)
                .map(|device| device.name.clone())
        });

        match host.is_recording() {
            Ok(recording) => self.recording = recording,
            Err(err) => tracing::warn!(%err, "failed to query recording state"),
        }

        match host.get_websocket_status() {
            Ok(report) => self.track_status(&report),
            Err(err) => tracing::warn!(%err, "failed to query websocket status"),
        }
    }

    /// Feed the session the events it mirrors (recording state, websocket
    /// status, shortcut feedback). Everything else is ignored.
    pub fn handle_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::RecordingStarted => self.recording = true,
            HostEvent::RecordingStopped => self.recording = false,
            HostEvent::WebsocketStatus(report) => self.track_status(report),
            HostEvent::ShortcutsUpdated => {
                tracing::debug!("shortcuts updated by host");
                self.last_shortcut_warning = None;
            }
            HostEvent::ShortcutsError { message } => {
                tracing::warn!(%message, "host rejected shortcut registration");
                self.last_shortcut_warning = Some(message.clone());
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Shortcuts
    // ------------------------------------------------------------------

    /// Keystroke-driven shortcut edit: echo first, then validate, then
    /// persist only when the host accepts the format. A rejected value stays
    /// echoed (documented lenient-typing behavior) but is never written.
    pub fn set_shortcut(&mut self, host: &dyn HostClient, kind: ShortcutKind, value: &str) {
        match kind {
            ShortcutKind::Transcription => self.document.shortcuts.transcription = value.to_string(),
            ShortcutKind::Edit => self.document.shortcuts.edit = value.to_string(),
        }

        if value.trim().is_empty() {
            return;
        }

        match host.validate_shortcut(value) {
            Ok(()) => {
                self.last_shortcut_warning = None;
                if let Err(err) = self.persist_shortcuts(host) {
                    tracing::warn!(%err, "failed to persist shortcut change");
                }
            }
            Err(err) => {
                tracing::warn!(shortcut = value, %err, "invalid shortcut format");
                self.last_shortcut_warning = Some(err.to_string());
            }
        }
    }

    /// Explicit "save shortcuts" action: registers the current bindings with
    /// the host and persists them, validation already done per keystroke.
    pub fn save_shortcuts(&mut self, host: &dyn HostClient) -> Result<()> {
        self.persist_shortcuts(host)
    }

    fn persist_shortcuts(&self, host: &dyn HostClient) -> Result<()> {
        host.update_shortcut_config(&self.document.shortcuts)
            .context("register shortcuts with host")?;
        let shortcuts = self.document.shortcuts.clone();
        read_merge_write(host, move |current| current.shortcuts = shortcuts)
    }

    pub fn last_shortcut_warning(&self) -> Option<&str> {
        self.last_shortcut_warning.as_deref()
    }

    // ------------------------------------------------------------------
    // Websocket config (debounced)
    // ------------------------------------------------------------------

    /// Buffer a URL edit; the debounce deadline restarts on every keystroke
    /// and one flush covers everything buffered since the last save.
    pub fn set_websocket_url(&mut self, url: &str, now: Instant) {
        self.document.websocket.url = url.to_string();
        self.mark_websocket_dirty(now);
    }

    pub fn set_auto_reconnect(&mut self, auto_reconnect: bool, now: Instant) {
        self.document.websocket.auto_reconnect = auto_reconnect;
        self.mark_websocket_dirty(now);
    }

    pub fn set_reconnect_interval(&mut self, seconds: u64, now: Instant) {
        self.document.websocket.reconnect_interval = seconds;
        self.mark_websocket_dirty(now);
    }

    fn mark_websocket_dirty(&mut self, now: Instant) {
        self.dirty.websocket = true;
        self.debounce.arm(now, self.debounce_delay);
    }

    /// Explicit "save config" action.
    pub fn save_websocket(&mut self, host: &dyn HostClient) -> Result<()> {
        host.update_websocket_config(&self.document.websocket)
            .context("apply websocket config")?;
        let websocket = self.document.websocket.clone();
        read_merge_write(host, move |current| current.websocket = websocket)?;
        self.dirty.websocket = false;
        self.debounce.cancel();
        Ok(())
    }

    /// Fire the debounce deadline if due. Failures are logged; the document
    /// stays dirty so a later explicit save or flush can retry.
    pub fn tick(&mut self, host: &dyn HostClient, now: Instant) {
        if self.debounce.fire(now) && self.dirty.websocket {
            if let Err(err) = self.save_websocket(host) {
                tracing::warn!(%err, "debounced websocket save failed");
            }
        }
    }

    /// Teardown flush: buffered edits are written exactly once, and no timer
    /// survives the session.
    pub fn flush(&mut self, host: &dyn HostClient) {
        self.debounce.cancel();
        if self.dirty.websocket {
            if let Err(err) = self.save_websocket(host) {
                tracing::warn!(%err, "failed to flush websocket config on teardown");
            }
        }
    }

    // ------------------------------------------------------------------
    // Audio devices & recording toggle
    // ------------------------------------------------------------------

    /// Select a capture device and persist the choice. The local selection
    /// only moves once the host accepted the device.
    pub fn select_device(&mut self, host: &dyn HostClient, device_name: &str) {
        if let Err(err) = host.select_audio_device(device_name) {
            tracing::warn!(device = device_name, %err, "failed to select audio device");
            return;
        }
        self.selected_device = Some(device_name.to_string());
        self.document.selected_microphone = Some(device_name.to_string());
        let selected = Some(device_name.to_string());
        if let Err(err) = read_merge_write(host, move |current| {
            current.selected_microphone = selected;
        }) {
            tracing::warn!(%err, "failed to persist audio device selection");
        }
    }

    /// Start or stop recording based on the mirrored flag. The flag itself
    /// only moves on the host's recording events.
    pub fn toggle_recording(&self, host: &dyn HostClient) {
        let result = if self.recording {
            host.stop_recording()
        } else {
            host.start_recording()
        };
        if let Err(err) = result {
            tracing::warn!(%err, "failed to toggle recording");
        }
    }

    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Connect/disconnect action gated on the tracked status.
    pub fn toggle_connection(&self, host: &dyn HostClient) {
        if let Err(err) = crate::connection::toggle_connection(host, self.connection) {
            tracing::warn!(%err, "failed to toggle websocket connection");
        }
    }

    /// Merge an auth token into the host's websocket config and connect.
    /// Token acquisition itself is the host's business.
    pub fn connect_with_token(
        &self,
        host: &dyn HostClient,
        auth_token: Option<String>,
    ) -> Result<()> {
        let mut config = host
            .get_websocket_config()
            .context("read websocket config before connect")?;
        config.auth_token = auth_token;
        host.update_websocket_config(&config)
            .context("apply websocket config with token")?;
        host.connect_websocket().context("connect websocket")?;
        Ok(())
    }

    fn track_status(&mut self, report: &StatusReport) {
        self.status_label = report.label();
        self.connection = ConnectionStatus::reduce(report);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &SettingsDocument {
        &self.document
    }

    pub fn devices(&self) -> &[AudioDevice] {
        &self.devices
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.selected_device.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Verbatim status label for the settings screen (`Error: ...` included).
    pub fn status_label(&self) -> &str {
        &self.status_label
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn has_unsaved_edits(&self) -> bool {
        self.dirty.websocket
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        self.debounce.next_wakeup()
    }
}

/// Fetch the full settings document, patch it, write it back whole. Partial
/// documents are never sent, so unrelated fields cannot be clobbered.
fn read_merge_write(
    host: &dyn HostClient,
    patch: impl FnOnce(&mut SettingsDocument),
) -> Result<()> {
    let mut current = host
        .get_app_settings()
        .context("read settings before merge")?;
    patch(&mut current);
    host.save_app_settings(&current)
        .context("write merged settings")?;
    Ok(())
}
