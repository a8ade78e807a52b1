//! In-memory host used by the integration tests.
//!
//! Sync and "more items" completions are parked until the test releases them,
//! so overlapping refreshes can be driven step by step.

#![allow(dead_code)]

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use themeapp::events::ReservedEvent;
use themeapp::host::{
    AppCore, BackButtonElement, ClassListElement, ClickHandler, Completion, MoreItems,
    MoreItemsCompletion, RegionCallback, RegionManager, RegionNotice, Router, SyncCompletion,
};
use themeapp::{Config, Host, ScreenDescriptor, ThemeApp};

#[derive(Default)]
pub struct FakeHost {
    pub current: RefCell<Option<ScreenDescriptor>>,
    pub previous: RefCell<Option<ScreenDescriptor>>,
    pub previous_link: RefCell<String>,
    pub components: RefCell<Vec<(String, Value)>>,
    pub params: RefCell<Vec<(String, Value)>>,
    pub custom_pages: RefCell<Vec<(String, Value)>>,
    pub navigations: RefCell<Vec<(String, bool)>>,
    pub calls: RefCell<Vec<&'static str>>,
    pub appended: RefCell<Vec<Value>>,
    pending_syncs: RefCell<Vec<SyncCompletion>>,
    pending_more: RefCell<Vec<MoreItemsCompletion>>,
    region_callbacks: RefCell<Vec<(ReservedEvent, Rc<RegionCallback>)>>,
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn theme(self: &Rc<Self>) -> ThemeApp {
        self.theme_with(&Config::default())
    }

    pub fn theme_with(self: &Rc<Self>, config: &Config) -> ThemeApp {
        ThemeApp::new(
            Host {
                core: Rc::clone(self) as Rc<dyn AppCore>,
                router: Rc::clone(self) as Rc<dyn Router>,
                regions: Rc::clone(self) as Rc<dyn RegionManager>,
            },
            config,
        )
    }

    pub fn set_screens(&self, current: Option<ScreenDescriptor>, previous: Option<ScreenDescriptor>) {
        *self.current.borrow_mut() = current;
        *self.previous.borrow_mut() = previous;
    }

    pub fn pending_syncs(&self) -> usize {
        self.pending_syncs.borrow().len()
    }

    /// Completes the oldest parked sync.
    pub fn finish_sync(&self, result: Result<(), Value>) {
        let completion = self.pending_syncs.borrow_mut().remove(0);
        completion(result);
    }

    /// Completes the most recent parked sync.
    pub fn finish_latest_sync(&self, result: Result<(), Value>) {
        let completion = self
            .pending_syncs
            .borrow_mut()
            .pop()
            .expect("no pending sync");
        completion(result);
    }

    pub fn finish_more(&self, more: MoreItems) {
        let completion = self.pending_more.borrow_mut().remove(0);
        completion(more);
    }

    /// Fires a region manager notification, as the renderer would.
    pub fn notify(&self, notice: &RegionNotice) {
        let callbacks: Vec<Rc<RegionCallback>> = self
            .region_callbacks
            .borrow()
            .iter()
            .filter(|(event, _)| *event == notice.event)
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(notice);
        }
    }

    /// Shows `current` after `previous`, updating history first.
    pub fn show_screen(&self, current: ScreenDescriptor, previous: Option<ScreenDescriptor>) {
        self.set_screens(Some(current.clone()), previous);
        self.notify(&RegionNotice::new(ReservedEvent::ScreenShowed).with_screen(current));
    }

    pub fn region_subscriptions(&self, event: ReservedEvent) -> usize {
        self.region_callbacks
            .borrow()
            .iter()
            .filter(|(e, _)| *e == event)
            .count()
    }
}

impl AppCore for FakeHost {
    fn sync(&self, completion: SyncCompletion) {
        self.calls.borrow_mut().push("sync");
        self.pending_syncs.borrow_mut().push(completion);
    }

    fn reset_default_route(&self) {
        self.calls.borrow_mut().push("reset-default-route");
    }

    fn set_param(&self, name: &str, value: Value) {
        self.params.borrow_mut().push((name.to_string(), value));
    }

    fn current_screen(&self) -> Option<ScreenDescriptor> {
        self.current.borrow().clone()
    }

    fn previous_screen(&self) -> Option<ScreenDescriptor> {
        self.previous.borrow().clone()
    }

    fn previous_screen_link(&self) -> String {
        self.previous_link.borrow().clone()
    }

    fn component_data(&self, component_id: &str) -> Option<Value> {
        self.components
            .borrow()
            .iter()
            .find(|(id, _)| id == component_id)
            .map(|(_, data)| data.clone())
    }

    fn fetch_more_of_component(&self, _component_id: &str, completion: MoreItemsCompletion) {
        self.pending_more.borrow_mut().push(completion);
    }

    fn show_custom_page(&self, template: &str, data: Value) {
        self.custom_pages.borrow_mut().push((template.to_string(), data));
    }
}

impl Router for FakeHost {
    fn navigate(&self, fragment: &str, trigger: bool) {
        self.navigations.borrow_mut().push((fragment.to_string(), trigger));
    }

    fn default_route(&self) {
        self.calls.borrow_mut().push("default-route");
    }

    fn restart_history(&self) {
        self.calls.borrow_mut().push("restart-history");
    }
}

impl RegionManager for FakeHost {
    fn on(&self, event: ReservedEvent, callback: RegionCallback) {
        self.region_callbacks.borrow_mut().push((event, Rc::new(callback)));
    }

    fn build_menu(&self, completion: Completion, _silent: bool) {
        self.calls.borrow_mut().push("build-menu");
        completion();
    }

    fn append_to_current_view(&self, items: &[Value]) {
        self.appended.borrow_mut().extend_from_slice(items);
    }
}

/// Back button that behaves like a DOM element with jQuery-style handlers:
/// every bound handler runs on click until unbound.
#[derive(Default)]
pub struct FakeButton {
    pub absent: bool,
    pub visible: Cell<Option<bool>>,
    handlers: RefCell<Vec<Rc<ClickHandler>>>,
}

impl FakeButton {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn missing() -> Rc<Self> {
        Rc::new(Self {
            absent: true,
            ..Self::default()
        })
    }

    pub fn click(&self) {
        let handlers: Vec<Rc<ClickHandler>> = self.handlers.borrow().clone();
        for handler in handlers {
            handler();
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl BackButtonElement for FakeButton {
    fn is_present(&self) -> bool {
        !self.absent
    }

    fn show(&self) {
        self.visible.set(Some(true));
    }

    fn hide(&self) {
        self.visible.set(Some(false));
    }

    fn bind_click(&self, handler: ClickHandler) {
        self.handlers.borrow_mut().push(Rc::new(handler));
    }

    fn unbind_click(&self) {
        self.handlers.borrow_mut().clear();
    }
}

#[derive(Default)]
pub struct FakeBody {
    pub classes: RefCell<Vec<String>>,
}

impl ClassListElement for FakeBody {
    fn class_names(&self) -> Vec<String> {
        self.classes.borrow().clone()
    }

    fn remove_class(&self, name: &str) {
        self.classes.borrow_mut().retain(|c| c != name);
    }

    fn add_class(&self, name: &str) {
        self.classes.borrow_mut().push(name.to_string());
    }
}
