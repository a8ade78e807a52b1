//! The theme-facing API.
//!
//! [`ThemeApp`] is the only object theme code talks to. It owns the event bus,
//! the hook registry and the refresh orchestrator, and forwards everything
//! else to the host collaborators it was built with.

use crate::domain::{EventEnvelope, Result, ScreenDescriptor, ScreenType};
use crate::events::{EventBus, ReservedEvent, Subscription};
use crate::hooks::{HookOutcome, HookRegistry, SCREEN_TRANSITION};
use crate::host::{AppCore, BackButtonElement, ClassListElement, RegionManager, RegionNotice, Router};
use crate::navigation::{
    apply_context_classes, resolve_direction, BackButton, BackButtonDisplay, BeforeToggle,
    MoreLinkDisplay, Navigator, ScreenTransition, ScreenTransitions, TransitionDirection,
};
use crate::refresh::{OnError, OnSuccess, RefreshOrchestrator};
use crate::Config;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Core parameter telling the region manager that the theme animates screen
/// changes through the `screen-transition` action.
pub const CUSTOM_SCREEN_RENDERING: &str = "custom-screen-rendering";

/// Template used by [`ThemeApp::show_custom_page`] when none is given.
pub const DEFAULT_CUSTOM_TEMPLATE: &str = "custom";

/// Host collaborators a [`ThemeApp`] is wired to.
#[derive(Clone)]
pub struct Host {
    /// Content, screens and configuration.
    pub core: Rc<dyn AppCore>,
    /// Route dispatch and history.
    pub router: Rc<dyn Router>,
    /// Renderer and owner of the reserved events.
    pub regions: Rc<dyn RegionManager>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

/// Theme-facing facade over events, hooks, refresh and navigation.
///
/// # Example
///
/// ```rust,ignore
/// let theme = ThemeApp::new(host, &Config::default());
///
/// theme.on("error", |error| show_toast(&error.message));
/// theme.filter("post-title", |title: &String, _: &()| Ok(title.trim().to_string()));
/// theme.refresh(None, Some(Box::new(|error| show_toast(&error.message))));
/// ```
pub struct ThemeApp {
    host: Host,
    bus: Rc<EventBus>,
    hooks: Rc<HookRegistry>,
    refresher: RefreshOrchestrator,
    navigator: Navigator,
    back_button: BackButton,
}

impl ThemeApp {
    /// Creates a theme app wired to `host`.
    ///
    /// Builds the event bus, the hook registry (with `config.failure_policy`) and
    /// the refresh orchestrator (with `config.refresh_mode`). Nothing is
    /// subscribed and no host method is called until theme code asks for it.
    ///
    /// # Parameters
    ///
    /// * `host` - Application core, router and region manager
    /// * `config` - Hook failure policy and refresh mode
    #[must_use]
    pub fn new(host: Host, config: &Config) -> Self {
        tracing::debug!(
            failure_policy = ?config.failure_policy,
            refresh_mode = ?config.refresh_mode,
            "creating theme app"
        );

        let bus = Rc::new(EventBus::new(Rc::clone(&host.regions)));
        let hooks = Rc::new(HookRegistry::with_policy(config.failure_policy));
        let refresher = RefreshOrchestrator::new(
            Rc::clone(&host.core),
            Rc::clone(&host.router),
            Rc::clone(&host.regions),
            Rc::clone(&bus),
            config.refresh_mode,
        );
        let navigator = Navigator::new(Rc::clone(&host.core), Rc::clone(&host.router));
        let back_button = BackButton::new(Rc::clone(&host.core), navigator.clone());

        Self {
            host,
            bus,
            hooks,
            refresher,
            navigator,
            back_button,
        }
    }

    /// The event bus behind [`ThemeApp::on`] and [`ThemeApp::relay`].
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The registry behind [`ThemeApp::filter`] and [`ThemeApp::action`].
    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    // Events

    /// Subscribes to a lifecycle, error or info event.
    pub fn on<F>(&self, event_name: &str, callback: F) -> Subscription
    where
        F: Fn(&EventEnvelope) + 'static,
    {
        self.bus.on(event_name, callback)
    }

    /// Subscribes to a region manager event with access to the notice.
    pub fn on_region<F>(&self, event: ReservedEvent, callback: F) -> Subscription
    where
        F: Fn(&RegionNotice) + 'static,
    {
        self.bus.on_region(event, callback)
    }

    /// Removes a subscription made with [`ThemeApp::on`].
    ///
    /// # Returns
    ///
    /// `true` when a general-channel listener was removed. Reserved subscriptions
    /// belong to the region manager and always return `false`.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.bus.unsubscribe(subscription)
    }

    /// Entry point for every event emitted by the application core.
    pub fn relay(&self, event_name: &str, payload: Value) -> Option<EventEnvelope> {
        self.bus.relay(event_name, payload)
    }

    // Hooks

    /// Registers a filter under the extension point `name`.
    ///
    /// Filters run in registration order; each receives the value returned by the
    /// previous one plus the invocation arguments, and returns the next value.
    ///
    /// # Parameters
    ///
    /// * `name` - Extension point, such as `"post-title"`
    /// * `callback` - Transformer; an `Err` is reported and the value is left as it was
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// theme.filter("post-title", |title: &String, _: &()| Ok(format!("» {title}")));
    /// ```
    pub fn filter<V, A, F>(&self, name: &str, callback: F)
    where
        V: 'static,
        A: 'static,
        F: Fn(&V, &A) -> Result<V> + 'static,
    {
        self.hooks.add_filter(name, callback);
    }

    /// Registers an action under the extension point `name`.
    ///
    /// Every action of a point receives the same arguments, in registration order.
    pub fn action<A, F>(&self, name: &str, callback: F)
    where
        A: 'static,
        F: Fn(&A) -> Result<()> + 'static,
    {
        self.hooks.add_action(name, callback);
    }

    /// Runs the filters of an extension point. Called by the host.
    ///
    /// # Errors
    ///
    /// The first filter failure when the registry fails fast.
    pub fn apply_filters<V: 'static, A: 'static>(
        &self,
        name: &str,
        value: V,
        args: &A,
    ) -> Result<HookOutcome<V>> {
        self.hooks.apply_filters(name, value, args)
    }

    /// Runs the actions of an extension point. Called by the host.
    ///
    /// # Errors
    ///
    /// The first action failure when the registry fails fast.
    pub fn do_action<A: 'static>(&self, name: &str, args: &A) -> Result<HookOutcome<()>> {
        self.hooks.do_action(name, args)
    }

    /// Stores a configuration parameter on the application core.
    pub fn set_param(&self, name: &str, value: Value) {
        tracing::debug!(param = %name, "setting core parameter");
        self.host.core.set_param(name, value);
    }

    // Refresh

    /// Resyncs content, rebuilds the menu and resets navigation to the default route.
    ///
    /// Emits `refresh:start` when a refresh begins and `refresh:end` when it
    /// ends, whatever the outcome. A call made while a refresh is running joins
    /// it in single-flight mode.
    ///
    /// # Parameters
    ///
    /// * `on_success` - Runs after `refresh:end` when the sync succeeded
    /// * `on_error` - Receives the error envelope before `refresh:end` when the sync failed
    pub fn refresh(&self, on_success: Option<OnSuccess>, on_error: Option<OnError>) {
        self.refresher.refresh(on_success, on_error);
    }

    /// Whether at least one refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresher.is_refreshing()
    }

    // Navigation

    /// Navigates to `fragment`, always running the route handlers.
    pub fn navigate(&self, fragment: &str) {
        self.navigator.navigate(fragment);
    }

    /// Shows or hides `element` on every `screen:showed`, according to the
    /// app history. `before` is told the new visibility before the toggle.
    pub fn set_auto_back_button(
        &self,
        element: Rc<dyn BackButtonElement>,
        before: Option<BeforeToggle>,
    ) -> Subscription {
        let back_button = self.back_button.clone();
        self.bus.on_region(ReservedEvent::ScreenShowed, move |_| {
            back_button.refresh(element.as_ref(), before.as_ref());
        })
    }

    /// Back button state for the current history.
    #[must_use]
    pub fn back_button_display(&self) -> BackButtonDisplay {
        self.back_button.display()
    }

    /// Binds or unbinds the back button click for manual setups.
    pub fn update_back_button_events(&self, element: &dyn BackButtonElement) {
        self.back_button.update_events(element);
    }

    /// Keeps `app-<screen_type>` and `app-<fragment>` classes on `element`.
    ///
    /// Passing `false` does nothing; there is no deactivation.
    pub fn set_auto_context_class(
        &self,
        activate: bool,
        element: Rc<dyn ClassListElement>,
    ) -> Option<Subscription> {
        if !activate {
            return None;
        }

        let target = Rc::clone(&element);
        let subscription = self.bus.on_region(ReservedEvent::ScreenShowed, move |notice| {
            if let Some(screen) = &notice.screen {
                apply_context_classes(target.as_ref(), screen);
            }
        });

        if let Some(screen) = self.host.core.current_screen() {
            apply_context_classes(element.as_ref(), &screen);
        }
        Some(subscription)
    }

    /// Whether the current list has more items to fetch, and how many.
    ///
    /// Screens other than lists always report no link.
    #[must_use]
    pub fn more_link_display(&self) -> MoreLinkDisplay {
        let core = &self.host.core;
        MoreLinkDisplay::for_screen(core.current_screen().as_ref(), |id| core.component_data(id))
    }

    /// Fetches the next page of the current list and appends it to the view.
    ///
    /// `do_after` receives `(is_last, new_items, nb_left)`. Nothing happens on
    /// screens that are not lists.
    pub fn more_component_items<F>(&self, do_after: F)
    where
        F: FnOnce(bool, Vec<Value>, u64) + 'static,
    {
        let Some(screen) = self.host.core.current_screen() else {
            return;
        };
        if screen.screen_type != ScreenType::List {
            return;
        }
        let Some(component_id) = screen.component_id else {
            tracing::debug!(fragment = %screen.fragment, "list screen without component");
            return;
        };

        let regions = Rc::clone(&self.host.regions);
        self.host.core.fetch_more_of_component(
            &component_id,
            Box::new(move |more| {
                tracing::debug!(count = more.items.len(), is_last = more.is_last, "more items fetched");
                regions.append_to_current_view(&more.items);
                do_after(more.is_last, more.items, more.nb_left);
            }),
        );
    }

    // Transitions

    /// Direction of the transition from `previous` to `current`.
    #[must_use]
    pub fn transition_direction(
        &self,
        current: &ScreenDescriptor,
        previous: &ScreenDescriptor,
    ) -> TransitionDirection {
        resolve_direction(&current.screen_type, &previous.screen_type)
    }

    /// Turns on custom screen rendering and animates every screen change with
    /// the callback matching its direction.
    pub fn set_auto_screen_transitions<V: 'static>(&self, transitions: ScreenTransitions<V>) {
        self.set_param(CUSTOM_SCREEN_RENDERING, Value::Bool(true));
        self.hooks.add_action(
            SCREEN_TRANSITION,
            move |transition: &ScreenTransition<V>| transitions.dispatch(transition),
        );
    }

    /// Displays a page that is not bound to any content.
    ///
    /// `template` defaults to [`DEFAULT_CUSTOM_TEMPLATE`].
    pub fn show_custom_page(&self, template: Option<&str>, data: Value) {
        let template = template.unwrap_or(DEFAULT_CUSTOM_TEMPLATE);
        tracing::debug!(template = %template, "showing custom page");
        self.host.core.show_custom_page(template, data);
    }
}

impl fmt::Debug for ThemeApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeApp")
            .field("bus", &self.bus)
            .field("hooks", &self.hooks)
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}
