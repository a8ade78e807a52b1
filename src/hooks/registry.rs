//! Filter and action registry.
//!
//! Filters transform a value: every filter registered under a name runs in
//! registration order and receives the value returned by the previous one.
//! Actions run side effects with identical arguments and return nothing.
//!
//! Extension points are typed. A filter registered as
//! `Fn(&String, &Screen) -> Result<String>` is only invoked by
//! `apply_filters::<String, Screen>`; an entry whose types do not match the
//! invocation is reported as [`ThemeError::HookTypeMismatch`].
//!
//! Every callback is invoked through a guard that turns an `Err` result or a
//! panic into a [`HookFailure`]. With [`FailurePolicy::Isolate`] the chain keeps
//! going and the failures are returned alongside the value; with
//! [`FailurePolicy::FailFast`] the first failure aborts the invocation.

use crate::domain::{Result, ThemeError};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

type FilterBox<V, A> = Box<dyn Fn(&V, &A) -> Result<V>>;
type ActionBox<A> = Box<dyn Fn(&A) -> Result<()>>;

/// What to do when a hook callback fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and run the remaining callbacks.
    #[default]
    Isolate,
    /// Stop at the first failure and return it.
    FailFast,
}

impl FailurePolicy {
    /// Parses `isolate` or `fail-fast`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "isolate" => Some(Self::Isolate),
            "fail-fast" | "fail_fast" => Some(Self::FailFast),
            _ => None,
        }
    }
}

/// A callback that failed during an invocation.
#[derive(Debug)]
pub struct HookFailure {
    /// Extension point name.
    pub point: String,
    /// Registration index of the failing callback under `point`.
    pub index: usize,
    /// What the callback returned, or the caught panic.
    pub error: ThemeError,
}

/// Result of running a filter chain or an action list.
#[derive(Debug)]
pub struct HookOutcome<T> {
    /// Final value: the filtered value, or `()` for actions.
    pub value: T,
    /// Failures reported under [`FailurePolicy::Isolate`], in call order.
    pub failures: Vec<HookFailure>,
}

impl<T> HookOutcome<T> {
    /// Drops the failure report and keeps the value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// `true` when no callback failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Named collections of filters and actions.
pub struct HookRegistry {
    filters: RefCell<HashMap<String, Vec<Rc<dyn Any>>>>,
    actions: RefCell<HashMap<String, Vec<Rc<dyn Any>>>>,
    policy: FailurePolicy,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Creates a registry with the default [`FailurePolicy::Isolate`] policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(FailurePolicy::default())
    }

    /// Creates a registry with an explicit failure policy.
    ///
    /// # Parameters
    ///
    /// * `policy` - What [`HookRegistry::apply_filters`] and [`HookRegistry::do_action`]
    ///   do when a callback fails
    #[must_use]
    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self {
            filters: RefCell::new(HashMap::new()),
            actions: RefCell::new(HashMap::new()),
            policy,
        }
    }

    /// Failure policy the registry was built with.
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Appends a filter under `name`.
    pub fn add_filter<V, A, F>(&self, name: &str, callback: F)
    where
        V: 'static,
        A: 'static,
        F: Fn(&V, &A) -> Result<V> + 'static,
    {
        let entry: FilterBox<V, A> = Box::new(callback);
        tracing::debug!(filter = %name, "registering filter");
        self.filters
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(Rc::new(entry));
    }

    /// Appends an action under `name`.
    pub fn add_action<A, F>(&self, name: &str, callback: F)
    where
        A: 'static,
        F: Fn(&A) -> Result<()> + 'static,
    {
        let entry: ActionBox<A> = Box::new(callback);
        tracing::debug!(action = %name, "registering action");
        self.actions
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(Rc::new(entry));
    }

    /// Threads `value` through every filter registered under `name`.
    ///
    /// With no filters registered the value comes back unchanged. A failing
    /// filter leaves the value as the previous filter returned it.
    ///
    /// # Errors
    ///
    /// Only with [`FailurePolicy::FailFast`]: the first callback failure.
    ///
    /// # Example
    ///
    /// ```
    /// use themeapp::hooks::HookRegistry;
    ///
    /// let hooks = HookRegistry::new();
    /// hooks.add_filter("title", |title: &String, _: &()| Ok(format!("{title}!")));
    /// hooks.add_filter("title", |title: &String, _: &()| Ok(title.to_uppercase()));
    ///
    /// let title = hooks.apply_filters("title", "news".to_string(), &())?.into_value();
    /// assert_eq!(title, "NEWS!");
    /// # Ok::<(), themeapp::ThemeError>(())
    /// ```
    pub fn apply_filters<V, A>(&self, name: &str, value: V, args: &A) -> Result<HookOutcome<V>>
    where
        V: 'static,
        A: 'static,
    {
        let entries = Self::snapshot(&self.filters, name);
        let _span = tracing::debug_span!("apply_filters", filter = %name, count = entries.len()).entered();

        let mut value = value;
        let mut failures = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let result = match entry.downcast_ref::<FilterBox<V, A>>() {
                Some(filter) => guarded(name, || filter(&value, args)),
                None => Err(ThemeError::HookTypeMismatch {
                    point: name.to_string(),
                }),
            };

            match result {
                Ok(next) => value = next,
                Err(error) => self.report(name, index, error, &mut failures)?,
            }
        }

        Ok(HookOutcome { value, failures })
    }

    /// Runs every action registered under `name` with the same `args`.
    ///
    /// # Errors
    ///
    /// Only with [`FailurePolicy::FailFast`]: the first callback failure.
    pub fn do_action<A>(&self, name: &str, args: &A) -> Result<HookOutcome<()>>
    where
        A: 'static,
    {
        let entries = Self::snapshot(&self.actions, name);
        let _span = tracing::debug_span!("do_action", action = %name, count = entries.len()).entered();

        let mut failures = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let result = match entry.downcast_ref::<ActionBox<A>>() {
                Some(action) => guarded(name, || action(args)),
                None => Err(ThemeError::HookTypeMismatch {
                    point: name.to_string(),
                }),
            };

            if let Err(error) = result {
                self.report(name, index, error, &mut failures)?;
            }
        }

        Ok(HookOutcome { value: (), failures })
    }

    /// Number of filters registered under `name`.
    #[must_use]
    pub fn filter_count(&self, name: &str) -> usize {
        self.filters.borrow().get(name).map_or(0, Vec::len)
    }

    /// Number of actions registered under `name`.
    #[must_use]
    pub fn action_count(&self, name: &str) -> usize {
        self.actions.borrow().get(name).map_or(0, Vec::len)
    }

    /// Copies the entry list so callbacks can register hooks while running.
    fn snapshot(
        collection: &RefCell<HashMap<String, Vec<Rc<dyn Any>>>>,
        name: &str,
    ) -> Vec<Rc<dyn Any>> {
        collection.borrow().get(name).cloned().unwrap_or_default()
    }

    fn report(
        &self,
        point: &str,
        index: usize,
        error: ThemeError,
        failures: &mut Vec<HookFailure>,
    ) -> Result<()> {
        match self.policy {
            FailurePolicy::FailFast => {
                tracing::debug!(hook = %point, index, error = %error, "hook failed, aborting chain");
                Err(error)
            }
            FailurePolicy::Isolate => {
                tracing::warn!(hook = %point, index, error = %error, "hook failed, continuing chain");
                failures.push(HookFailure {
                    point: point.to_string(),
                    index,
                    error,
                });
                Ok(())
            }
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("filters", &self.filters.borrow().keys().collect::<Vec<_>>())
            .field("actions", &self.actions.borrow().keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

fn guarded<T>(point: &str, call: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        Err(ThemeError::HookPanicked {
            point: point.to_string(),
            message,
        })
    })
}
