//! Shell-process options and validation.
//!
//! The persisted settings document belongs to the host; these are the local
//! knobs of the shell process itself (logging, icon fallback, bounded timing
//! overrides). Validated right after parsing so bad values fail fast.

use anyhow::{bail, Result};
use clap::Parser;
use std::time::Duration;

use crate::overlay::display::{get_icons, IconSet};
use crate::overlay::{OverlayTimings, COMPLETE_HIDE_MS, ERROR_HIDE_MS};
use crate::settings::WEBSOCKET_DEBOUNCE_MS;

const MIN_HIDE_MS: u64 = 100;
const MAX_HIDE_MS: u64 = 60_000;
const MIN_DEBOUNCE_MS: u64 = 100;
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// CLI options for the shell process.
#[derive(Debug, Parser, Clone)]
#[command(about = "Voxshell session controller", author, version)]
pub struct ShellConfig {
    /// Enable trace logging to a temp file
    #[arg(long = "logs", env = "VOXSHELL_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOXSHELL_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Use ASCII overlay icons instead of Unicode
    #[arg(long = "ascii", default_value_t = false)]
    pub ascii: bool,

    /// Overlay linger after a completed paste (milliseconds)
    #[arg(long = "complete-hide-ms", default_value_t = COMPLETE_HIDE_MS)]
    pub complete_hide_ms: u64,

    /// Overlay linger after an error (milliseconds)
    #[arg(long = "error-hide-ms", default_value_t = ERROR_HIDE_MS)]
    pub error_hide_ms: u64,

    /// Quiet window before buffered websocket edits auto-save (milliseconds)
    #[arg(long = "ws-debounce-ms", default_value_t = WEBSOCKET_DEBOUNCE_MS)]
    pub ws_debounce_ms: u64,
}

impl ShellConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HIDE_MS..=MAX_HIDE_MS).contains(&self.complete_hide_ms) {
            bail!(
                "--complete-hide-ms must be between {MIN_HIDE_MS} and {MAX_HIDE_MS}, got {}",
                self.complete_hide_ms
            );
        }
        if !(MIN_HIDE_MS..=MAX_HIDE_MS).contains(&self.error_hide_ms) {
            bail!(
                "--error-hide-ms must be between {MIN_HIDE_MS} and {MAX_HIDE_MS}, got {}",
                self.error_hide_ms
            );
        }
        if !(MIN_DEBOUNCE_MS..=MAX_DEBOUNCE_MS).contains(&self.ws_debounce_ms) {
            bail!(
                "--ws-debounce-ms must be between {MIN_DEBOUNCE_MS} and {MAX_DEBOUNCE_MS}, got {}",
                self.ws_debounce_ms
            );
        }
        Ok(())
    }

    pub fn overlay_timings(&self) -> OverlayTimings {
        OverlayTimings {
            complete_hide: Duration::from_millis(self.complete_hide_ms),
            error_hide: Duration::from_millis(self.error_hide_ms),
        }
    }

    pub fn websocket_debounce(&self) -> Duration {
        Duration::from_millis(self.ws_debounce_ms)
    }

    pub fn icons(&self) -> &'static IconSet {
        get_icons(!self.ascii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_and_match_the_documented_timings() {
        let config = ShellConfig::parse_from(["voxshell"]);
        config.validate().expect("defaults are valid");
        assert_eq!(config.complete_hide_ms, 1500);
        assert_eq!(config.error_hide_ms, 4000);
        assert_eq!(config.ws_debounce_ms, 1000);
        let timings = config.overlay_timings();
        assert_eq!(timings.complete_hide, Duration::from_millis(1500));
        assert_eq!(timings.error_hide, Duration::from_millis(4000));
    }

    #[test]
    fn out_of_range_overrides_are_rejected() {
        let mut config = ShellConfig::parse_from(["voxshell"]);
        config.complete_hide_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ShellConfig::parse_from(["voxshell"]);
        config.ws_debounce_ms = 60_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn ascii_flag_switches_the_icon_set() {
        let config = ShellConfig::parse_from(["voxshell", "--ascii"]);
        assert_eq!(config.icons().recording, "*");

        let config = ShellConfig::parse_from(["voxshell"]);
        assert_eq!(config.icons().recording, "●");
    }
}
