//! Shell controller: one pump over the host event stream.
//!
//! Owns the subscription set and the state it feeds: processing overlay,
//! connection indicator, error feed, update notifier. Everything runs on a
//! single thread; host events interleave with deadline ticks, and each
//! handler runs to completion before the next queued callback.

use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::connection::ConnectionStatus;
use crate::errors::ErrorFeed;
use crate::host::protocol::{HostEvent, RawEvent};
use crate::host::subscription::{EventBridge, SubscriptionSet};
use crate::host::HostClient;
use crate::overlay::{OverlayState, OverlayTimings};
use crate::settings::SettingsSession;
use crate::updater::UpdateState;

pub struct ShellController {
    events: Receiver<RawEvent>,
    sink: Sender<RawEvent>,
    subscriptions: SubscriptionSet,
    overlay: OverlayState,
    feed: ErrorFeed,
    updater: UpdateState,
    /// Present while the settings screen is mounted; at most one at a time.
    settings: Option<SettingsSession>,
    connection: ConnectionStatus,
    shut_down: bool,
}

impl ShellController {
    pub fn new(bridge: &dyn EventBridge) -> Self {
        Self::with_timings(bridge, OverlayTimings::default())
    }

    pub fn with_timings(bridge: &dyn EventBridge, timings: OverlayTimings) -> Self {
        let (sink, events) = unbounded();
        let subscriptions = SubscriptionSet::subscribe_all(bridge, &sink);
        Self {
            events,
            sink,
            subscriptions,
            overlay: OverlayState::new(timings),
            feed: ErrorFeed::new(),
            updater: UpdateState::new(),
            settings: None,
            connection: ConnectionStatus::Disconnected,
            shut_down: false,
        }
    }

    /// Drain queued host events in arrival order, then fire due deadlines.
    /// Returns how many events were handled. A controller that has been shut
    /// down mutates nothing.
    pub fn pump(&mut self, now: Instant) -> usize {
        if self.shut_down {
            return 0;
        }
        self.subscriptions.poll();
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(raw) => {
                    if let Some(event) = HostEvent::from_raw(&raw) {
                        self.dispatch(&event, now);
                        handled += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.overlay.tick(now);
        self.feed.tick(now);
        handled
    }

    fn dispatch(&mut self, event: &HostEvent, now: Instant) {
        if let HostEvent::WebsocketStatus(report) = event {
            self.connection = ConnectionStatus::reduce(report);
        }
        match event {
            HostEvent::AppError(notice) | HostEvent::CriticalError(notice) => {
                self.feed.push(notice.clone(), now);
            }
            _ => {}
        }
        self.overlay.apply(event, now);
        self.updater.handle_event(event);
        if let Some(session) = self.settings.as_mut() {
            session.handle_event(event);
        }
    }

    /// Startup + periodic host-facing maintenance: the silent update check
    /// and the settings debounce. Kept separate from `pump` so event
    /// handling never needs the host.
    pub fn maintain(&mut self, host: &dyn HostClient, now: Instant) {
        if self.shut_down {
            return;
        }
        if self.updater.last_check().is_none() {
            self.updater.check_silently(host, now);
        } else {
            self.updater.tick(host, now);
        }
        if let Some(session) = self.settings.as_mut() {
            session.tick(host, now);
        }
    }

    /// Mount the settings screen: load a fresh session over the host.
    pub fn open_settings(&mut self, host: &dyn HostClient) {
        let mut session = SettingsSession::new();
        session.load(host);
        self.settings = Some(session);
    }

    /// Unmount the settings screen, flushing buffered edits exactly once.
    pub fn close_settings(&mut self, host: &dyn HostClient) {
        if let Some(mut session) = self.settings.take() {
            session.flush(host);
        }
    }

    pub fn settings(&self) -> Option<&SettingsSession> {
        self.settings.as_ref()
    }

    pub fn settings_mut(&mut self) -> Option<&mut SettingsSession> {
        self.settings.as_mut()
    }

    /// Ask the host to hide the overlay window. Failure is logged only.
    pub fn hide_overlay(&self, host: &dyn HostClient) {
        if let Err(err) = host.hide_processing_overlay() {
            tracing::warn!(%err, "failed to hide processing overlay");
        }
    }

    /// Tear down subscriptions exactly once. Late events are ignored from
    /// here on.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.subscriptions.teardown();
        self.shut_down = true;
    }

    /// Swap the subscription generation (e.g. after a bridge reconnect). The
    /// previous handles are invoked before any new registration exists.
    pub fn resubscribe(&mut self, bridge: &dyn EventBridge) {
        self.subscriptions.resubscribe(bridge, &self.sink);
        self.shut_down = false;
    }

    /// Earliest pending deadline, for event-loop wakeup scheduling.
    pub fn next_wakeup(&self) -> Option<Instant> {
        [
            self.overlay.next_wakeup(),
            self.updater.next_wakeup(),
            self.settings.as_ref().and_then(SettingsSession::next_wakeup),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn feed(&self) -> &ErrorFeed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut ErrorFeed {
        &mut self.feed
    }

    pub fn updater(&self) -> &UpdateState {
        &self.updater
    }

    pub fn updater_mut(&mut self) -> &mut UpdateState {
        &mut self.updater
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Drop for ShellController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
