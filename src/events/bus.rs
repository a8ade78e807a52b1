//! Publish/subscribe channel for theme code.
//!
//! Subscriptions are resolved once, at subscribe time, into a
//! [`SubscriptionTarget`]:
//!
//! - `Reserved`: the name is one of the region manager's lifecycle events. The
//!   bus forwards the callback to the region manager and keeps nothing.
//! - `General`: any other name. The callback is stored on the local channel
//!   and runs on [`EventBus::trigger`].
//!
//! A name is never served by both channels.
//!
//! The bus also relays application core events: [`EventBus::relay`] classifies
//! the raw event and re-publishes `error`/`info` envelopes twice, under the raw
//! name and under the coarse type. Plain core events are dropped.

use super::classifier::classify;
use super::reserved::ReservedEvent;
use crate::domain::EventEnvelope;
use crate::host::{RegionManager, RegionNotice};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Callback stored on the general channel.
pub type Listener = Rc<dyn Fn(&EventEnvelope)>;

/// Where a subscription is served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionTarget {
    Reserved(ReservedEvent),
    General(String),
}

impl SubscriptionTarget {
    /// Routes by exact membership in the reserved set.
    #[must_use]
    pub fn resolve(event_name: &str) -> Self {
        ReservedEvent::lookup(event_name)
            .map_or_else(|| Self::General(event_name.to_string()), Self::Reserved)
    }

    /// Event name the subscription was made with.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Reserved(event) => event.as_str(),
            Self::General(name) => name,
        }
    }
}

/// Handle returned by [`EventBus::on`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    target: SubscriptionTarget,
    id: u64,
}

impl Subscription {
    /// Channel the subscription lives on.
    #[must_use]
    pub const fn target(&self) -> &SubscriptionTarget {
        &self.target
    }

    /// `true` when the region manager owns the subscription.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self.target, SubscriptionTarget::Reserved(_))
    }
}

/// Event bus with a reserved channel (delegated) and a general channel (local).
pub struct EventBus {
    regions: Rc<dyn RegionManager>,
    general: RefCell<HashMap<String, Vec<(u64, Listener)>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Creates an empty bus.
    ///
    /// # Parameters
    ///
    /// * `regions` - Region manager that receives every reserved-event subscription
    #[must_use]
    pub fn new(regions: Rc<dyn RegionManager>) -> Self {
        Self {
            regions,
            general: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribes `callback` to `event_name`.
    ///
    /// Reserved events reach the callback as a plain envelope whose `data` is
    /// `{"screen": <descriptor or null>, "data": <notice data>}`. Use
    /// [`EventBus::on_region`] to receive the [`RegionNotice`] itself.
    pub fn on<F>(&self, event_name: &str, callback: F) -> Subscription
    where
        F: Fn(&EventEnvelope) + 'static,
    {
        let id = self.next_id();
        let target = SubscriptionTarget::resolve(event_name);

        match &target {
            SubscriptionTarget::Reserved(event) => {
                tracing::debug!(event = %event, "delegating subscription to region manager");
                self.regions.on(
                    *event,
                    Box::new(move |notice: &RegionNotice| callback(&notice_envelope(notice))),
                );
            }
            SubscriptionTarget::General(name) => {
                tracing::debug!(event = %name, id, "subscribing on general channel");
                self.general
                    .borrow_mut()
                    .entry(name.clone())
                    .or_default()
                    .push((id, Rc::new(callback)));
            }
        }

        Subscription { target, id }
    }

    /// Subscribes directly to a region manager event.
    pub fn on_region<F>(&self, event: ReservedEvent, callback: F) -> Subscription
    where
        F: Fn(&RegionNotice) + 'static,
    {
        tracing::debug!(event = %event, "delegating region subscription");
        self.regions.on(event, Box::new(callback));
        Subscription {
            target: SubscriptionTarget::Reserved(event),
            id: self.next_id(),
        }
    }

    /// Removes a general-channel subscription.
    ///
    /// Returns `false` for reserved subscriptions, which belong to the region
    /// manager, and for handles that were already removed.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let SubscriptionTarget::General(name) = &subscription.target else {
            tracing::debug!(
                event = %subscription.target.name(),
                "reserved subscription left with the region manager"
            );
            return false;
        };

        let mut general = self.general.borrow_mut();
        let Some(listeners) = general.get_mut(name) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription.id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            general.remove(name);
        }
        removed
    }

    /// Synchronously delivers `envelope` to every general-channel listener of
    /// `event_name`, in subscription order.
    ///
    /// Listeners may subscribe or trigger from inside a callback; those changes
    /// apply to the next trigger.
    pub fn trigger(&self, event_name: &str, envelope: &EventEnvelope) {
        let listeners: Vec<Listener> = self
            .general
            .borrow()
            .get(event_name)
            .map(|listeners| listeners.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();

        tracing::trace!(event = %event_name, listeners = listeners.len(), "triggering");

        for listener in listeners {
            listener(envelope);
        }
    }

    /// Triggers `event_name` with a plain envelope and no data.
    pub fn emit(&self, event_name: &str) {
        self.trigger(event_name, &EventEnvelope::plain(event_name, Value::Null));
    }

    /// Relays one raw application core event.
    ///
    /// Returns the classified envelope when it was re-published, `None` when
    /// the event was plain and therefore dropped.
    pub fn relay(&self, event_name: &str, payload: Value) -> Option<EventEnvelope> {
        let envelope = classify(event_name, payload);
        let channel = envelope.event_type.channel()?;

        tracing::debug!(
            event = %event_name,
            channel = channel,
            message = %envelope.message,
            "relaying core event"
        );

        self.trigger(event_name, &envelope);
        self.trigger(channel, &envelope);
        Some(envelope)
    }

    /// Number of general-channel listeners on `event_name`.
    ///
    /// Reserved subscriptions are not counted; they live in the region manager.
    #[must_use]
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.general.borrow().get(event_name).map_or(0, Vec::len)
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let general = self.general.borrow();
        f.debug_struct("EventBus")
            .field("general_events", &general.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn notice_envelope(notice: &RegionNotice) -> EventEnvelope {
    EventEnvelope::plain(
        notice.event.as_str(),
        json!({ "screen": notice.screen, "data": notice.data }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Completion, RegionCallback};
    use crate::EventType;

    #[derive(Default)]
    struct Regions {
        callbacks: RefCell<Vec<(ReservedEvent, RegionCallback)>>,
    }

    impl Regions {
        fn notify(&self, notice: &RegionNotice) {
            for (event, callback) in self.callbacks.borrow().iter() {
                if *event == notice.event {
                    callback(notice);
                }
            }
        }
    }

    impl RegionManager for Regions {
        fn on(&self, event: ReservedEvent, callback: RegionCallback) {
            self.callbacks.borrow_mut().push((event, callback));
        }

        fn build_menu(&self, completion: Completion, _silent: bool) {
            completion();
        }

        fn append_to_current_view(&self, _items: &[Value]) {}
    }

    fn recorder() -> (Rc<RefCell<Vec<EventEnvelope>>>, impl Fn(&EventEnvelope) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |envelope: &EventEnvelope| sink.borrow_mut().push(envelope.clone()))
    }

    #[test]
    fn reserved_names_are_delegated_and_not_stored() {
        let regions = Rc::new(Regions::default());
        let bus = EventBus::new(Rc::clone(&regions) as Rc<dyn RegionManager>);
        let (seen, callback) = recorder();

        let subscription = bus.on("screen:showed", callback);

        assert!(subscription.is_reserved());
        assert_eq!(
            subscription.target(),
            &SubscriptionTarget::Reserved(ReservedEvent::ScreenShowed)
        );
        assert_eq!(subscription.target().name(), "screen:showed");
        assert_eq!(bus.listener_count("screen:showed"), 0);
        assert_eq!(regions.callbacks.borrow().len(), 1);

        bus.emit("screen:showed");
        assert!(seen.borrow().is_empty());

        regions.notify(&RegionNotice::new(ReservedEvent::ScreenShowed));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].event, "screen:showed");
    }

    #[test]
    fn trigger_delivers_in_subscription_order() {
        let bus = EventBus::new(Rc::new(Regions::default()));
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.on("refresh:end", move |_| order.borrow_mut().push(tag));
        }

        bus.emit("refresh:end");
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn relay_publishes_meta_events_on_name_and_type_channels() {
        let bus = EventBus::new(Rc::new(Regions::default()));
        let (by_name, on_name) = recorder();
        let (by_type, on_type) = recorder();
        bus.on("info:no-content", on_name);
        bus.on("info", on_type);

        let relayed = bus.relay("info:no-content", Value::Null);

        assert!(relayed.is_some());
        assert_eq!(by_name.borrow().len(), 1);
        assert_eq!(by_type.borrow().len(), 1);
        assert_eq!(by_name.borrow()[0], by_type.borrow()[0]);
        assert_eq!(by_type.borrow()[0].event_type, EventType::Info);
    }

    #[test]
    fn relay_drops_plain_events() {
        let bus = EventBus::new(Rc::new(Regions::default()));
        let (seen, callback) = recorder();
        bus.on("components:fetched", callback);

        assert!(bus.relay("components:fetched", Value::Null).is_none());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let bus = EventBus::new(Rc::new(Regions::default()));
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();
        let first_handle = bus.on("error", first);
        bus.on("error", second);

        assert!(bus.unsubscribe(&first_handle));
        assert!(!bus.unsubscribe(&first_handle));
        bus.relay("error:sync", Value::Null);

        assert!(first_seen.borrow().is_empty());
        assert_eq!(second_seen.borrow().len(), 1);
    }

    #[test]
    fn listeners_may_subscribe_while_being_triggered() {
        let bus = Rc::new(EventBus::new(Rc::new(Regions::default())));
        let inner_bus = Rc::clone(&bus);
        bus.on("refresh:start", move |_| {
            inner_bus.on("refresh:start", |_| {});
        });

        bus.emit("refresh:start");
        assert_eq!(bus.listener_count("refresh:start"), 2);
    }
}
