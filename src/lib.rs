pub mod config;
pub mod connection;
pub mod errors;
pub mod host;
pub mod overlay;
pub mod settings;
pub mod shell;
pub mod shortcut;
mod telemetry;
pub mod timer;
pub mod updater;

pub use config::ShellConfig;
pub use connection::ConnectionStatus;
pub use host::protocol::{HostEvent, RawEvent, StatusReport};
pub use host::subscription::{EventBridge, SubscriptionSet, Unlisten};
pub use host::{HostClient, HostError, HostResult};
pub use overlay::{OverlayState, ProcessingState};
pub use settings::{SettingsDocument, SettingsSession, ShortcutKind};
pub use shell::ShellController;
pub use telemetry::init_tracing;
