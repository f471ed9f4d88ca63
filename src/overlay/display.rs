//! Icon/text vocabulary for the overlay.
//!
//! Pure presentation helpers: the renderer (host-side window or a debug
//! surface) asks for the current state's icon and text instead of matching on
//! [`ProcessingState`] itself.

use crate::connection::ConnectionStatus;
use crate::overlay::ProcessingState;

/// Icons used by the overlay, with an ASCII fallback set.
#[derive(Debug, Clone, Copy)]
pub struct IconSet {
    /// Microphone/idle indicator
    pub idle: &'static str,
    /// Pulsing recording indicator
    pub recording: &'static str,
    /// Success indicator
    pub success: &'static str,
    /// Error indicator
    pub error: &'static str,
    /// Connection dot when connected
    pub network_ok: &'static str,
    /// Connection dot when connecting
    pub network_busy: &'static str,
    /// Connection dot when disconnected
    pub network_down: &'static str,
}

pub static UNICODE_ICONS: IconSet = IconSet {
    idle: "○",
    recording: "●",
    success: "✓",
    error: "⚠",
    network_ok: "◆",
    network_busy: "◈",
    network_down: "◇",
};

pub static ASCII_ICONS: IconSet = IconSet {
    idle: "-",
    recording: "*",
    success: "ok",
    error: "!",
    network_ok: "+",
    network_busy: "~",
    network_down: "x",
};

/// Spinner frames shown while transcribing/enhancing/pasting.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn get_icons(unicode: bool) -> &'static IconSet {
    if unicode {
        &UNICODE_ICONS
    } else {
        &ASCII_ICONS
    }
}

pub fn spinner_frame(index: usize) -> &'static str {
    SPINNER_FRAMES[index % SPINNER_FRAMES.len()]
}

/// Visual tone of the current state, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Idle,
    Recording,
    Processing,
    Success,
    Error,
}

/// Resolved icon and text for one overlay state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDisplay {
    pub icon: &'static str,
    pub text: String,
    pub tone: Tone,
}

/// Map a state (and, for errors, its message) to display content.
pub fn state_display(
    state: ProcessingState,
    error_message: Option<&str>,
    spinner_index: usize,
    icons: &'static IconSet,
) -> StateDisplay {
    match state {
        ProcessingState::Recording => StateDisplay {
            icon: icons.recording,
            text: "Listening...".to_string(),
            tone: Tone::Recording,
        },
        ProcessingState::Transcribing => StateDisplay {
            icon: spinner_frame(spinner_index),
            text: "Transcribing...".to_string(),
            tone: Tone::Processing,
        },
        ProcessingState::Enhancing => StateDisplay {
            icon: spinner_frame(spinner_index),
            text: "Enhancing...".to_string(),
            tone: Tone::Processing,
        },
        ProcessingState::Pasting => StateDisplay {
            icon: spinner_frame(spinner_index),
            text: "Pasting...".to_string(),
            tone: Tone::Processing,
        },
        ProcessingState::Complete => StateDisplay {
            icon: icons.success,
            text: "Complete!".to_string(),
            tone: Tone::Success,
        },
        ProcessingState::Error => StateDisplay {
            icon: icons.error,
            text: error_message.unwrap_or("Error occurred").to_string(),
            tone: Tone::Error,
        },
        ProcessingState::Idle => StateDisplay {
            icon: icons.idle,
            text: "Ready".to_string(),
            tone: Tone::Idle,
        },
    }
}

/// Connection dot for the overlay corner.
pub fn connection_icon(status: ConnectionStatus, icons: &'static IconSet) -> &'static str {
    match status {
        ConnectionStatus::Connected => icons.network_ok,
        ConnectionStatus::Connecting => icons.network_busy,
        ConnectionStatus::Disconnected => icons.network_down,
    }
}
