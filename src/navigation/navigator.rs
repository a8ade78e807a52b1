//! Route navigation through the host router.

use crate::host::{AppCore, Router};
use std::fmt;
use std::rc::Rc;

/// Cheap, cloneable handle used wherever a callback has to navigate later,
/// such as a back button click.
#[derive(Clone)]
pub struct Navigator {
    core: Rc<dyn AppCore>,
    router: Rc<dyn Router>,
}

impl Navigator {
    /// Creates a navigator over `router`, reading back links from `core`.
    #[must_use]
    pub fn new(core: Rc<dyn AppCore>, router: Rc<dyn Router>) -> Self {
        Self { core, router }
    }

    /// Navigates to `fragment`, always running the route handlers.
    pub fn navigate(&self, fragment: &str) {
        tracing::debug!(fragment = %fragment, "navigating");
        self.router.navigate(fragment, true);
    }

    /// Navigates to the link of the previous screen.
    pub fn back(&self) {
        let link = self.core.previous_screen_link();
        self.navigate(&link);
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator").finish_non_exhaustive()
    }
}
