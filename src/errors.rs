//! Application error feed fed by `app_error` / `critical_error` events.
//!
//! Independent of the processing overlay: notices accumulate into a
//! dismissible list. Recoverable notices expire on their own; critical ones
//! stay until the user dismisses them.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// How long a recoverable notice stays in the feed.
pub const RECOVERABLE_DISMISS_SECS: u64 = 5;

/// Category tag the host attaches to every pushed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Audio,
    WebSocket,
    Settings,
    Clipboard,
    Shortcuts,
    System,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::WebSocket => "WebSocket",
            Self::Settings => "Settings",
            Self::Clipboard => "Clipboard",
            Self::Shortcuts => "Shortcuts",
            Self::System => "System",
        }
    }
}

/// One host-pushed error notice.
///
/// `timestamp` is the host's epoch-seconds stamp and doubles as the dismissal
/// key, matching the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub error_type: ErrorKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: u64,
    pub recoverable: bool,
}

struct FeedEntry {
    notice: ErrorNotice,
    expires_at: Option<Instant>,
}

/// Accumulating list of dismissible error notices.
pub struct ErrorFeed {
    entries: Vec<FeedEntry>,
    expiry: Duration,
}

impl ErrorFeed {
    pub fn new() -> Self {
        Self::with_expiry(Duration::from_secs(RECOVERABLE_DISMISS_SECS))
    }

    /// Override the recoverable-notice lifetime (shell config hook).
    pub fn with_expiry(expiry: Duration) -> Self {
        Self {
            entries: Vec::new(),
            expiry,
        }
    }

    /// Push a notice. Recoverable notices get an expiry; critical notices
    /// persist until dismissed.
    pub fn push(&mut self, notice: ErrorNotice, now: Instant) {
        let expires_at = notice.recoverable.then(|| now + self.expiry);
        self.entries.push(FeedEntry { notice, expires_at });
    }

    /// Drop expired recoverable notices. Returns how many were removed.
    pub fn tick(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.expires_at.map_or(true, |at| now < at));
        before - self.entries.len()
    }

    /// Dismiss one notice by its timestamp key.
    pub fn dismiss(&mut self, timestamp: u64) {
        self.entries
            .retain(|entry| entry.notice.timestamp != timestamp);
    }

    pub fn dismiss_all(&mut self) {
        self.entries.clear();
    }

    /// The feed renders only while it holds notices.
    pub fn is_visible(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn notices(&self) -> impl Iterator<Item = &ErrorNotice> {
        self.entries.iter().map(|entry| &entry.notice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(timestamp: u64, recoverable: bool) -> ErrorNotice {
        ErrorNotice {
            error_type: ErrorKind::Audio,
            title: "Microphone".to_string(),
            message: "device lost".to_string(),
            details: None,
            timestamp,
            recoverable,
        }
    }

    #[test]
    fn recoverable_notices_expire_after_five_seconds() {
        let now = Instant::now();
        let mut feed = ErrorFeed::new();
        feed.push(notice(1, true), now);

        assert_eq!(feed.tick(now + Duration::from_secs(4)), 0);
        assert!(feed.is_visible());
        assert_eq!(feed.tick(now + Duration::from_secs(5)), 1);
        assert!(!feed.is_visible());
    }

    #[test]
    fn critical_notices_persist_until_dismissed() {
        let now = Instant::now();
        let mut feed = ErrorFeed::new();
        feed.push(notice(7, false), now);

        assert_eq!(feed.tick(now + Duration::from_secs(3600)), 0);
        assert!(feed.is_visible());

        feed.dismiss(7);
        assert!(feed.is_empty());
    }

    #[test]
    fn dismiss_targets_a_single_timestamp() {
        let now = Instant::now();
        let mut feed = ErrorFeed::new();
        feed.push(notice(1, false), now);
        feed.push(notice(2, false), now);

        feed.dismiss(1);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.notices().next().unwrap().timestamp, 2);

        feed.dismiss_all();
        assert!(feed.is_empty());
    }

    #[test]
    fn notice_deserializes_from_host_payload() {
        let payload = serde_json::json!({
            "error_type": "WebSocket",
            "title": "Connection lost",
            "message": "backend unreachable",
            "timestamp": 1700000000u64,
            "recoverable": true,
        });
        let parsed: ErrorNotice = serde_json::from_value(payload).expect("notice parses");
        assert_eq!(parsed.error_type, ErrorKind::WebSocket);
        assert!(parsed.details.is_none());
        assert!(parsed.recoverable);
    }
}
