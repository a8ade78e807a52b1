//! Content refresh workflow.
//!
//! # Flow
//!
//! ```text
//! refresh()
//!   ├─ in_flight += 1, emit "refresh:start"
//!   └─ core.sync ──ok──▶ regions.build_menu ──▶ reset default route
//!                │                              ▶ default route
//!                │                              ▶ restart history
//!                │                              ▶ in_flight -= 1, emit "refresh:end"
//!                │                              ▶ on_success
//!                └─err─▶ in_flight -= 1 ▶ on_error(envelope) ▶ emit "refresh:end"
//! ```
//!
//! Every path that increments the in-flight counter reaches exactly one
//! decrement and one `refresh:end`.
//!
//! # Overlapping Calls
//!
//! With [`RefreshMode::SingleFlight`] a call made while a refresh is running
//! does not start a second sync: its callbacks are queued and resolved with the
//! running refresh's result, and no extra `refresh:start`/`refresh:end` pair is
//! emitted. [`RefreshMode::Concurrent`] starts an independent refresh per call
//! and lets their completions interleave.

use crate::domain::EventEnvelope;
use crate::events::{error_envelope, EventBus, REFRESH_END, REFRESH_START};
use crate::host::{AppCore, RegionManager, Router};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Called after a successful refresh.
pub type OnSuccess = Box<dyn FnOnce()>;

/// Called with the classified error when the sync fails.
pub type OnError = Box<dyn FnOnce(EventEnvelope)>;

/// How overlapping refresh requests are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Calls made during a refresh join it and share its result.
    #[default]
    SingleFlight,
    /// Every call starts its own sync; refreshes may overlap.
    Concurrent,
}

impl RefreshMode {
    /// Parses `single-flight` or `concurrent`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "single-flight" | "single_flight" => Some(Self::SingleFlight),
            "concurrent" => Some(Self::Concurrent),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Waiter {
    on_success: Option<OnSuccess>,
    on_error: Option<OnError>,
}

impl Waiter {
    fn succeed(self) {
        if let Some(on_success) = self.on_success {
            on_success();
        }
    }

    fn fail(self, envelope: &EventEnvelope) {
        if let Some(on_error) = self.on_error {
            on_error(envelope.clone());
        }
    }
}

/// In-flight refresh state owned by one orchestrator.
#[derive(Default)]
pub struct RefreshContext {
    in_flight: Cell<u32>,
    coalesced: RefCell<Vec<Waiter>>,
}

impl RefreshContext {
    /// Number of refreshes started and not yet settled.
    #[must_use]
    pub fn in_flight(&self) -> u32 {
        self.in_flight.get()
    }

    /// `true` while [`RefreshContext::in_flight`] is above zero.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.get() > 0
    }

    fn begin(&self) {
        self.in_flight.set(self.in_flight.get() + 1);
    }

    fn finish(&self) {
        let current = self.in_flight.get();
        debug_assert!(current > 0, "refresh finished more often than it started");
        self.in_flight.set(current.saturating_sub(1));
    }

    fn take_coalesced(&self) -> Vec<Waiter> {
        std::mem::take(&mut *self.coalesced.borrow_mut())
    }
}

impl fmt::Debug for RefreshContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshContext")
            .field("in_flight", &self.in_flight.get())
            .field("coalesced", &self.coalesced.borrow().len())
            .finish()
    }
}

/// Runs the "resync content, rebuild navigation" workflow.
pub struct RefreshOrchestrator {
    context: Rc<RefreshContext>,
    core: Rc<dyn AppCore>,
    router: Rc<dyn Router>,
    regions: Rc<dyn RegionManager>,
    bus: Rc<EventBus>,
    mode: RefreshMode,
}

impl RefreshOrchestrator {
    /// Creates an orchestrator with its own [`RefreshContext`].
    ///
    /// # Parameters
    ///
    /// * `core` - Runs the content sync and resets the default route
    /// * `router` - Dispatches the default route and restarts history
    /// * `regions` - Rebuilds the menu
    /// * `bus` - Receives `refresh:start` and `refresh:end`
    /// * `mode` - Behaviour of calls made while a refresh is running
    #[must_use]
    pub fn new(
        core: Rc<dyn AppCore>,
        router: Rc<dyn Router>,
        regions: Rc<dyn RegionManager>,
        bus: Rc<EventBus>,
        mode: RefreshMode,
    ) -> Self {
        Self {
            context: Rc::new(RefreshContext::default()),
            core,
            router,
            regions,
            bus,
            mode,
        }
    }

    /// Mode the orchestrator was built with.
    #[must_use]
    pub const fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// Counting state of this orchestrator.
    #[must_use]
    pub fn context(&self) -> &RefreshContext {
        &self.context
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.context.is_refreshing()
    }

    /// Starts a refresh, or joins the running one in single-flight mode.
    pub fn refresh(&self, on_success: Option<OnSuccess>, on_error: Option<OnError>) {
        let waiter = Waiter {
            on_success,
            on_error,
        };

        if self.mode == RefreshMode::SingleFlight && self.context.is_refreshing() {
            tracing::debug!("refresh already running, joining it");
            self.context.coalesced.borrow_mut().push(waiter);
            return;
        }

        self.context.begin();
        tracing::debug!(in_flight = self.context.in_flight(), mode = ?self.mode, "refresh started");
        self.bus.emit(REFRESH_START);

        let run = RefreshRun {
            context: Rc::clone(&self.context),
            core: Rc::clone(&self.core),
            router: Rc::clone(&self.router),
            regions: Rc::clone(&self.regions),
            bus: Rc::clone(&self.bus),
            mode: self.mode,
            waiter,
        };
        self.core.sync(Box::new(move |result| run.synced(result)));
    }
}

impl fmt::Debug for RefreshOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshOrchestrator")
            .field("context", &self.context)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// One started refresh, carried through the host completions.
struct RefreshRun {
    context: Rc<RefreshContext>,
    core: Rc<dyn AppCore>,
    router: Rc<dyn Router>,
    regions: Rc<dyn RegionManager>,
    bus: Rc<EventBus>,
    mode: RefreshMode,
    waiter: Waiter,
}

impl RefreshRun {
    fn synced(self, result: std::result::Result<(), Value>) {
        match result {
            Ok(()) => {
                tracing::debug!("content synced, rebuilding menu");
                let regions = Rc::clone(&self.regions);
                regions.build_menu(Box::new(move || self.menu_built()), true);
            }
            Err(payload) => self.failed(payload),
        }
    }

    fn menu_built(mut self) {
        self.core.reset_default_route();
        self.router.default_route();
        self.router.restart_history();

        let waiters = self.settle();
        self.bus.emit(REFRESH_END);
        tracing::debug!(in_flight = self.context.in_flight(), "refresh ended");

        for waiter in waiters {
            waiter.succeed();
        }
    }

    fn failed(mut self, payload: Value) {
        let envelope = error_envelope("error", payload);
        tracing::debug!(message = %envelope.message, "refresh sync failed");

        let waiters = self.settle();
        for waiter in waiters {
            waiter.fail(&envelope);
        }

        self.bus.emit(REFRESH_END);
        tracing::debug!(in_flight = self.context.in_flight(), "refresh ended");
    }

    /// Decrements the counter and collects every waiter to resolve, this
    /// run's own first. Joined waiters are taken before the decrement so a
    /// refresh started from a `refresh:end` listener keeps its own.
    fn settle(&mut self) -> Vec<Waiter> {
        let mut waiters = vec![std::mem::take(&mut self.waiter)];
        if self.mode == RefreshMode::SingleFlight {
            waiters.extend(self.context.take_coalesced());
        }
        self.context.finish();
        waiters
    }
}
