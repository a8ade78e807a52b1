//! Back button visibility and click binding.
//!
//! The button has two states: it is shown when the application core reports a
//! non-empty previous screen and hidden otherwise. Each update unbinds the old
//! click handler before binding a new one, so a button updated any number of
//! times navigates exactly once per click.

use super::navigator::Navigator;
use crate::domain::ScreenDescriptor;
use crate::host::{AppCore, BackButtonElement};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Back button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackButtonDisplay {
    Show,
    Hide,
}

impl BackButtonDisplay {
    /// Shown when there is a non-empty previous screen.
    #[must_use]
    pub fn from_previous(previous: Option<&ScreenDescriptor>) -> Self {
        match previous {
            Some(screen) if !screen.is_empty() => Self::Show,
            _ => Self::Hide,
        }
    }

    /// `"show"` or `"hide"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
        }
    }

    /// `true` for [`BackButtonDisplay::Show`].
    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Show)
    }
}

impl fmt::Display for BackButtonDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback told about the new state before the button is toggled.
pub type BeforeToggle = Rc<dyn Fn(bool)>;

/// Computes and applies back button state.
#[derive(Clone)]
pub struct BackButton {
    core: Rc<dyn AppCore>,
    navigator: Navigator,
}

impl BackButton {
    /// Creates a back button controller.
    ///
    /// # Parameters
    ///
    /// * `core` - Source of the previous screen
    /// * `navigator` - Used by the click handler to go back
    #[must_use]
    pub fn new(core: Rc<dyn AppCore>, navigator: Navigator) -> Self {
        Self { core, navigator }
    }

    /// State for the current app history.
    #[must_use]
    pub fn display(&self) -> BackButtonDisplay {
        BackButtonDisplay::from_previous(self.core.previous_screen().as_ref())
    }

    /// Rebinds or unbinds the click handler according to the current state.
    ///
    /// Does nothing when the element is not present.
    pub fn update_events(&self, element: &dyn BackButtonElement) {
        if !element.is_present() {
            return;
        }

        element.unbind_click();
        if self.display().is_shown() {
            let navigator = self.navigator.clone();
            element.bind_click(Box::new(move || navigator.back()));
        }
    }

    /// Recomputes the state and toggles the element.
    ///
    /// The handler is rebound before the button appears and unbound before
    /// it disappears.
    pub fn refresh(&self, element: &dyn BackButtonElement, before: Option<&BeforeToggle>) {
        let state = self.display();
        tracing::debug!(state = %state, "updating back button");

        if let Some(before) = before {
            before(state.is_shown());
        }

        match state {
            BackButtonDisplay::Show => {
                element.show();
                self.update_events(element);
            }
            BackButtonDisplay::Hide => {
                self.update_events(element);
                element.hide();
            }
        }
    }
}

impl fmt::Debug for BackButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackButton").finish_non_exhaustive()
    }
}
