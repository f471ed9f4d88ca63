//! Processing overlay state machine.
//!
//! Drives the transient floating overlay from host events. Handlers are
//! unconditional last-writer-wins assignments: a `recording_started` in any
//! state starts a fresh session and clears prior error text. The single
//! auto-hide deadline is owned here; scheduling always cancels the previous
//! deadline first, and unmounting drops it with the state.

use std::time::{Duration, Instant};

use crate::connection::ConnectionStatus;
use crate::host::protocol::{audio_level, HostEvent};
use crate::timer::Deadline;

/// Overlay lingers this long after a completed paste.
pub const COMPLETE_HIDE_MS: u64 = 1500;
/// Errors stay up longer so the message can be read.
pub const ERROR_HIDE_MS: u64 = 4000;

/// Fallback texts when an error event arrives without a message.
pub const DEFAULT_RECORDING_ERROR: &str = "Recording error";
pub const DEFAULT_AUDIO_ERROR: &str = "Audio error";

/// Where the current dictation session is in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingState {
    /// No session active
    #[default]
    Idle,
    /// Capturing audio
    Recording,
    /// Audio submitted, waiting for the transcript
    Transcribing,
    /// Transcript final, AI enhancement running
    Enhancing,
    /// Result being injected at the cursor
    Pasting,
    /// Session finished successfully
    Complete,
    /// Session failed; message carried alongside
    Error,
}

/// Auto-hide delays, overridable from shell config.
#[derive(Debug, Clone, Copy)]
pub struct OverlayTimings {
    pub complete_hide: Duration,
    pub error_hide: Duration,
}

impl Default for OverlayTimings {
    fn default() -> Self {
        Self {
            complete_hide: Duration::from_millis(COMPLETE_HIDE_MS),
            error_hide: Duration::from_millis(ERROR_HIDE_MS),
        }
    }
}

/// Observable overlay state, mutated only by [`apply`](Self::apply) and
/// [`tick`](Self::tick) on the pump thread.
#[derive(Debug, Default)]
pub struct OverlayState {
    state: ProcessingState,
    error_message: Option<String>,
    audio_level: f32,
    visible: bool,
    connection: ConnectionStatus,
    auto_hide: Deadline,
    timings: OverlayTimings,
}

impl OverlayState {
    pub fn new(timings: OverlayTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    /// Apply one host event. Events outside the overlay's subset are ignored.
    pub fn apply(&mut self, event: &HostEvent, now: Instant) {
        match event {
            HostEvent::RecordingStarted => {
                self.state = ProcessingState::Recording;
                self.error_message = None;
                self.visible = true;
                self.auto_hide.cancel();
            }
            HostEvent::RecordingStopped => {
                self.state = ProcessingState::Transcribing;
            }
            HostEvent::AudioChunk { samples } => {
                self.audio_level = audio_level(samples);
            }
            HostEvent::TranscriptionResponse { is_final } => {
                if *is_final {
                    self.state = ProcessingState::Enhancing;
                }
            }
            HostEvent::TextPasted => {
                self.state = ProcessingState::Complete;
                self.auto_hide.arm(now, self.timings.complete_hide);
            }
            HostEvent::WebsocketStatus(report) => {
                self.connection = ConnectionStatus::reduce(report);
            }
            HostEvent::RecordingError { message } => {
                self.enter_error(message.as_deref(), DEFAULT_RECORDING_ERROR, now);
            }
            HostEvent::AudioError { message } => {
                self.enter_error(message.as_deref(), DEFAULT_AUDIO_ERROR, now);
            }
            _ => {}
        }
    }

    fn enter_error(&mut self, message: Option<&str>, fallback: &str, now: Instant) {
        self.state = ProcessingState::Error;
        self.error_message = Some(message.unwrap_or(fallback).to_string());
        // Cancel-then-schedule: arming replaces any pending hide.
        self.auto_hide.arm(now, self.timings.error_hide);
    }

    /// Fire the auto-hide deadline if due. Returns true when the overlay was
    /// reset to hidden idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.auto_hide.fire(now) {
            self.visible = false;
            self.state = ProcessingState::Idle;
            return true;
        }
        false
    }

    /// Presence rule: the overlay renders unless it is hidden *and* idle.
    pub fn is_presented(&self) -> bool {
        self.visible || self.state != ProcessingState::Idle
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Display level in [0, 1], only meaningful while recording.
    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn has_pending_hide(&self) -> bool {
        self.auto_hide.is_armed()
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        self.auto_hide.next_wakeup()
    }
}
