//! Update notifier: silent periodic checks plus download progress state.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::host::protocol::HostEvent;
use crate::host::HostClient;
use crate::settings::UpdateInfo;
use crate::timer::Deadline;

/// Cadence of silent background update checks.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(4 * 60 * 60);

/// Notifier state mirrored into the UI (banner + download progress).
#[derive(Default)]
pub struct UpdateState {
    available: bool,
    info: Option<UpdateInfo>,
    /// Subtle in-UI banner instead of a modal for silent checks.
    show_notification: bool,
    last_check: Option<Instant>,
    download_percent: Option<f64>,
    download_finished: bool,
    next_check: Deadline,
}

impl UpdateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Silent check used at startup and on the periodic deadline. Failures
    /// are logged and the next check is scheduled regardless.
    pub fn check_silently(&mut self, host: &dyn HostClient, now: Instant) {
        self.last_check = Some(now);
        match host.check_for_updates() {
            Ok(check) => {
                if check.available {
                    if let Some(info) = check.update_info {
                        tracing::info!(version = %info.version, "update available");
                        self.available = true;
                        self.info = Some(info);
                        self.show_notification = true;
                    }
                }
            }
            Err(err) => tracing::warn!(%err, "update check failed"),
        }
        self.next_check.arm(now, CHECK_INTERVAL);
    }

    /// Manual check: the host shows its native prompt and reports whether an
    /// update was offered.
    pub fn check_interactive(&mut self, host: &dyn HostClient, now: Instant) -> Result<bool> {
        self.last_check = Some(now);
        host.check_and_prompt_for_update()
            .context("interactive update check")
    }

    /// Fire the periodic deadline if due.
    pub fn tick(&mut self, host: &dyn HostClient, now: Instant) {
        if self.next_check.fire(now) {
            self.check_silently(host, now);
        }
    }

    /// Download progress / completion events.
    pub fn handle_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::UpdateDownloadProgress { percent } => {
                self.download_percent = Some(percent.clamp(0.0, 100.0));
                self.download_finished = false;
            }
            HostEvent::UpdateDownloadFinished => {
                self.download_percent = None;
                self.download_finished = true;
            }
            _ => {}
        }
    }

    /// Kick off download + install; the host relaunches on success.
    pub fn install(&self, host: &dyn HostClient) -> Result<()> {
        host.download_and_install_update()
            .context("download and install update")
    }

    /// "Later" button: keep the availability info, hide the banner.
    pub fn dismiss_notification(&mut self) {
        self.show_notification = false;
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn info(&self) -> Option<&UpdateInfo> {
        self.info.as_ref()
    }

    pub fn shows_notification(&self) -> bool {
        self.show_notification
    }

    pub fn download_percent(&self) -> Option<f64> {
        self.download_percent
    }

    pub fn download_finished(&self) -> bool {
        self.download_finished
    }

    pub fn last_check(&self) -> Option<Instant> {
        self.last_check
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        self.next_check.next_wakeup()
    }
}
