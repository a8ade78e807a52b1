//! Interfaces to the host application.
//!
//! The theme layer never talks to the application core, the router, the
//! region renderer or the DOM directly. Hosts implement these traits and hand
//! them to [`crate::ThemeApp`].
//!
//! # Execution Model
//!
//! Everything runs on one thread. Asynchronous host operations take a boxed
//! completion that the host must invoke exactly once, possibly long after the
//! call returned:
//!
//! ```text
//! theme ── sync(completion) ──▶ core
//!                                 ⋮  (network, storage, ...)
//! theme ◀── completion(result) ── core
//! ```

use crate::domain::ScreenDescriptor;
use crate::events::ReservedEvent;
use serde_json::Value;

/// Completion of the content sync: `Err` carries the core's error payload.
pub type SyncCompletion = Box<dyn FnOnce(std::result::Result<(), Value>)>;

/// Completion without a result.
pub type Completion = Box<dyn FnOnce()>;

/// Completion of a "get more items" request.
pub type MoreItemsCompletion = Box<dyn FnOnce(MoreItems)>;

/// Callback registered on the region manager's notification channel.
pub type RegionCallback = Box<dyn Fn(&RegionNotice)>;

/// Click handler attached to an element.
pub type ClickHandler = Box<dyn Fn()>;

/// Notification delivered by the region manager for a reserved event.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionNotice {
    /// Reserved event being notified.
    pub event: ReservedEvent,
    /// Screen the notification is about, when there is one.
    pub screen: Option<ScreenDescriptor>,
    /// Event-specific data, `null` when there is none.
    pub data: Value,
}

impl RegionNotice {
    /// Notice without a screen and with `null` data.
    #[must_use]
    pub fn new(event: ReservedEvent) -> Self {
        Self {
            event,
            screen: None,
            data: Value::Null,
        }
    }

    /// Attaches the screen the notice is about.
    #[must_use]
    pub fn with_screen(mut self, screen: ScreenDescriptor) -> Self {
        self.screen = Some(screen);
        self
    }
}

/// Additional list items fetched for a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoreItems {
    /// New items, in display order.
    pub items: Vec<Value>,
    /// `true` when nothing is left to fetch.
    pub is_last: bool,
    /// Items still available after these.
    pub nb_left: u64,
}

/// The application core: content, screens and configuration.
pub trait AppCore {
    /// Resyncs content with the remote site.
    fn sync(&self, completion: SyncCompletion);

    /// Forgets the default route so it is recomputed from the new menu.
    fn reset_default_route(&self);

    /// Stores an opaque configuration parameter.
    fn set_param(&self, name: &str, value: Value);

    /// Screen currently displayed, if any.
    fn current_screen(&self) -> Option<ScreenDescriptor>;

    /// Screen displayed before the current one in app history, if any.
    fn previous_screen(&self) -> Option<ScreenDescriptor>;

    /// Route fragment that leads back to the previous screen.
    fn previous_screen_link(&self) -> String;

    /// Data of a content component, such as `{"ids": [...], "total": n}` for lists.
    fn component_data(&self, component_id: &str) -> Option<Value>;

    /// Fetches the next page of a list component.
    ///
    /// The completion receives the new items, whether they were the last ones and
    /// how many are left.
    fn fetch_more_of_component(&self, component_id: &str, completion: MoreItemsCompletion);

    /// Renders `template` with `data` as a page outside the content tree.
    fn show_custom_page(&self, template: &str, data: Value);
}

/// The application router and its history mechanism.
pub trait Router {
    /// Navigates to `fragment`; `trigger` asks the router to run route handlers.
    fn navigate(&self, fragment: &str, trigger: bool);

    /// Dispatches the default route.
    fn default_route(&self);

    /// Stops then starts history tracking, tearing down in-flight handlers.
    fn restart_history(&self);
}

/// The region manager that renders screens and owns the reserved events.
pub trait RegionManager {
    /// Registers `callback` for a reserved event. There is no removal.
    fn on(&self, event: ReservedEvent, callback: RegionCallback);

    /// Rebuilds the navigation menu; `silent` suppresses the menu render event.
    fn build_menu(&self, completion: Completion, silent: bool);

    /// Appends items to the view currently displayed and re-renders it.
    fn append_to_current_view(&self, items: &[Value]);
}

/// A back button element.
pub trait BackButtonElement {
    /// `false` when the element handle matched nothing.
    fn is_present(&self) -> bool;

    /// Makes the element visible.
    fn show(&self);

    /// Hides the element.
    fn hide(&self);

    /// Adds a click handler. Handlers accumulate until unbound.
    fn bind_click(&self, handler: ClickHandler);

    /// Removes every click handler bound to the element.
    fn unbind_click(&self);
}

/// An element whose class list can be edited.
pub trait ClassListElement {
    /// Classes currently on the element.
    fn class_names(&self) -> Vec<String>;

    /// Removes `name`; absent classes are ignored.
    fn remove_class(&self, name: &str);

    /// Adds `name`.
    fn add_class(&self, name: &str);
}
