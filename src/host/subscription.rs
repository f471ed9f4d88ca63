//! Subscription lifecycle for the host's named-event stream.
//!
//! Subscribing is asynchronous on the host side: `listen` registers interest
//! immediately, but the matching unlisten handle arrives later on a channel.
//! Teardown must still be deterministic. Every acquired handle is invoked
//! exactly once; handles still in flight get a bounded wait and are then
//! parked in a stale list that later polls drain, so a slow handle is never
//! leaked and never double-invoked, and a resubscribe swap can never leave a
//! duplicate listener behind.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use super::protocol::{RawEvent, EVENT_NAMES};

/// Callback that cancels one event registration. Consumed on invocation.
pub type Unlisten = Box<dyn FnOnce() + Send>;

/// How long teardown waits for an in-flight unlisten handle before parking it.
const HANDLE_WAIT: Duration = Duration::from_millis(250);

/// Registration side of the bridge (host → shell event delivery).
pub trait EventBridge {
    /// Start delivering the named event into `sink`. The unlisten handle for
    /// this registration arrives asynchronously on the returned receiver; a
    /// receiver that never resolves simply means that event class is never
    /// observed (and never needs unsubscribing).
    fn listen(&self, name: &str, sink: Sender<RawEvent>) -> Receiver<Unlisten>;
}

enum HandleSlot {
    /// Handle not yet delivered by the host.
    Pending(Receiver<Unlisten>),
    /// Handle acquired, not yet invoked.
    Ready(Unlisten),
    /// Handle invoked, or registration known dead.
    Done,
}

/// One generation of subscriptions over the fixed event set.
pub struct SubscriptionSet {
    slots: Vec<(&'static str, HandleSlot)>,
    /// Receivers whose teardown ran before the handle arrived. Their handles
    /// are invoked on sight by later polls.
    stale: Vec<Receiver<Unlisten>>,
    torn_down: bool,
}

impl SubscriptionSet {
    /// Subscribe to every event in [`EVENT_NAMES`], delivering into `sink`.
    pub fn subscribe_all(bridge: &dyn EventBridge, sink: &Sender<RawEvent>) -> Self {
        let slots = EVENT_NAMES
            .iter()
            .map(|name| (*name, HandleSlot::Pending(bridge.listen(name, sink.clone()))))
            .collect();
        Self {
            slots,
            stale: Vec::new(),
            torn_down: false,
        }
    }

    /// Collect unlisten handles that have arrived since the last poll and
    /// drain any stale handles from a previous teardown.
    pub fn poll(&mut self) {
        for (_, slot) in &mut self.slots {
            if let HandleSlot::Pending(rx) = slot {
                match rx.try_recv() {
                    Ok(unlisten) => *slot = HandleSlot::Ready(unlisten),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => *slot = HandleSlot::Done,
                }
            }
        }
        self.drain_stale();
    }

    /// Tear down this generation: invoke every acquired handle exactly once,
    /// wait briefly for in-flight ones, park the rest as stale. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        for (name, slot) in &mut self.slots {
            match std::mem::replace(slot, HandleSlot::Done) {
                HandleSlot::Ready(unlisten) => unlisten(),
                HandleSlot::Pending(rx) => match rx.recv_timeout(HANDLE_WAIT) {
                    Ok(unlisten) => unlisten(),
                    Err(RecvTimeoutError::Timeout) => {
                        tracing::debug!(event = *name, "unlisten handle still in flight; parking");
                        self.stale.push(rx);
                    }
                    Err(RecvTimeoutError::Disconnected) => {}
                },
                HandleSlot::Done => {}
            }
        }
    }

    /// Swap generations: the previous handles are all invoked (or parked)
    /// before any new registration is made, so no event class ever has two
    /// live listeners.
    pub fn resubscribe(&mut self, bridge: &dyn EventBridge, sink: &Sender<RawEvent>) {
        self.teardown();
        self.slots = EVENT_NAMES
            .iter()
            .map(|name| (*name, HandleSlot::Pending(bridge.listen(name, sink.clone()))))
            .collect();
        self.torn_down = false;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn drain_stale(&mut self) {
        self.stale.retain(|rx| match rx.try_recv() {
            Ok(unlisten) => {
                unlisten();
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => false,
        });
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        // Best-effort: invoke whatever has arrived, without blocking.
        for (_, slot) in &mut self.slots {
            match std::mem::replace(slot, HandleSlot::Done) {
                HandleSlot::Ready(unlisten) => unlisten(),
                HandleSlot::Pending(rx) => {
                    if let Ok(unlisten) = rx.try_recv() {
                        unlisten();
                    }
                }
                HandleSlot::Done => {}
            }
        }
        self.drain_stale();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Bridge stub that hands out counting unlisten handles, either
    /// immediately or on demand.
    struct StubBridge {
        deliver_immediately: bool,
        listens: AtomicUsize,
        unlistens: Arc<AtomicUsize>,
        pending: Mutex<Vec<Sender<Unlisten>>>,
    }

    impl StubBridge {
        fn new(deliver_immediately: bool) -> Self {
            Self {
                deliver_immediately,
                listens: AtomicUsize::new(0),
                unlistens: Arc::new(AtomicUsize::new(0)),
                pending: Mutex::new(Vec::new()),
            }
        }

        fn counting_handle(&self) -> Unlisten {
            let count = self.unlistens.clone();
            Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        }

        /// Deliver handles for registrations made while delivery was held.
        fn release_handles(&self) {
            let senders = std::mem::take(&mut *self.pending.lock().unwrap());
            for tx in senders {
                let count = self.unlistens.clone();
                let _ = tx.send(Box::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }
    }

    impl EventBridge for StubBridge {
        fn listen(&self, _name: &str, _sink: Sender<RawEvent>) -> Receiver<Unlisten> {
            self.listens.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = bounded(1);
            if self.deliver_immediately {
                let _ = tx.send(self.counting_handle());
            } else {
                self.pending.lock().unwrap().push(tx);
            }
            rx
        }
    }

    #[test]
    fn teardown_invokes_every_handle_exactly_once() {
        let bridge = StubBridge::new(true);
        let (sink, _events) = unbounded();
        let mut set = SubscriptionSet::subscribe_all(&bridge, &sink);
        set.poll();

        set.teardown();
        assert_eq!(bridge.unlistens.load(Ordering::SeqCst), EVENT_NAMES.len());

        // Idempotent: a second teardown invokes nothing further.
        set.teardown();
        assert_eq!(bridge.unlistens.load(Ordering::SeqCst), EVENT_NAMES.len());
    }

    #[test]
    fn late_handles_are_parked_then_invoked_once_on_poll() {
        let bridge = StubBridge::new(false);
        let (sink, _events) = unbounded();
        let mut set = SubscriptionSet::subscribe_all(&bridge, &sink);

        set.teardown();
        assert_eq!(bridge.unlistens.load(Ordering::SeqCst), 0);

        bridge.release_handles();
        set.poll();
        assert_eq!(bridge.unlistens.load(Ordering::SeqCst), EVENT_NAMES.len());

        // Nothing left to invoke on a further poll or drop.
        set.poll();
        drop(set);
        assert_eq!(bridge.unlistens.load(Ordering::SeqCst), EVENT_NAMES.len());
    }

    #[test]
    fn resubscribe_unlistens_the_previous_generation_first() {
        let bridge = StubBridge::new(true);
        let (sink, _events) = unbounded();
        let mut set = SubscriptionSet::subscribe_all(&bridge, &sink);
        set.poll();

        set.resubscribe(&bridge, &sink);
        assert_eq!(bridge.unlistens.load(Ordering::SeqCst), EVENT_NAMES.len());
        assert_eq!(bridge.listens.load(Ordering::SeqCst), EVENT_NAMES.len() * 2);
        assert!(!set.is_torn_down());

        // The second generation tears down cleanly too.
        set.poll();
        set.teardown();
        assert_eq!(
            bridge.unlistens.load(Ordering::SeqCst),
            EVENT_NAMES.len() * 2
        );
    }

    #[test]
    fn dead_registration_is_not_fatal() {
        struct DeadBridge;
        impl EventBridge for DeadBridge {
            fn listen(&self, _name: &str, _sink: Sender<RawEvent>) -> Receiver<Unlisten> {
                let (_tx, rx) = bounded(1);
                rx
            }
        }

        let (sink, _events) = unbounded();
        let mut set = SubscriptionSet::subscribe_all(&DeadBridge, &sink);
        set.poll();
        set.teardown();
        assert!(set.is_torn_down());
    }
}
