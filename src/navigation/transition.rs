//! Screen transition direction and the transition extension point.
//!
//! # Direction Table
//!
//! | current                 | previous                | direction |
//! |-------------------------|-------------------------|-----------|
//! | list / custom-component | single                  | right     |
//! | list / custom-component | anything else           | replace   |
//! | single                  | list / custom-component | left      |
//! | single                  | comments                | right     |
//! | single                  | anything else           | replace   |
//! | comments                | any                     | left      |
//! | anything else           | any                     | replace   |

use crate::domain::{Result, ScreenDescriptor, ScreenType};
use crate::host::Completion;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Direction of the animation between two screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionDirection {
    /// Going deeper: archive to post, post to comments.
    Left,
    /// Going back up.
    Right,
    /// No spatial relation between the screens.
    Replace,
}

impl TransitionDirection {
    /// `"left"`, `"right"` or `"replace"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for TransitionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionDirection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "replace" => Ok(Self::Replace),
            other => Err(format!("unknown transition direction '{other}'")),
        }
    }
}

/// Resolves the transition direction from the current and previous screen types.
///
/// # Example
///
/// ```
/// use themeapp::navigation::{resolve_direction, TransitionDirection};
/// use themeapp::ScreenType;
///
/// let direction = resolve_direction(&ScreenType::Single, &ScreenType::List);
/// assert_eq!(direction, TransitionDirection::Left);
/// ```
#[must_use]
pub fn resolve_direction(current: &ScreenType, previous: &ScreenType) -> TransitionDirection {
    use ScreenType::{Comments, Single};

    match current {
        c if c.is_archive() => {
            if *previous == Single {
                TransitionDirection::Right
            } else {
                TransitionDirection::Replace
            }
        }
        Single if previous.is_archive() => TransitionDirection::Left,
        Single if *previous == Comments => TransitionDirection::Right,
        Comments => TransitionDirection::Left,
        _ => TransitionDirection::Replace,
    }
}

#[derive(Default)]
struct DeferredState {
    resolved: bool,
    waiters: Vec<Completion>,
}

/// One-shot completion signal handed to transition callbacks.
///
/// The transition callback resolves it when its animation is over; the host
/// waits on it with [`Deferred::then`]. Clones share the same state.
#[derive(Clone, Default)]
pub struct Deferred {
    state: Rc<RefCell<DeferredState>>,
}

impl Deferred {
    /// Creates an unresolved signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the signal resolved and runs the waiters. Later calls do nothing.
    pub fn resolve(&self) {
        let waiters = {
            let mut state = self.state.borrow_mut();
            if state.resolved {
                return;
            }
            state.resolved = true;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            waiter();
        }
    }

    /// Whether [`Deferred::resolve`] was called on this signal or a clone.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    /// Runs `waiter` once the signal resolves, immediately if it already has.
    pub fn then(&self, waiter: impl FnOnce() + 'static) {
        if self.is_resolved() {
            waiter();
        } else {
            self.state.borrow_mut().waiters.push(Box::new(waiter));
        }
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Arguments of the `screen-transition` extension point.
///
/// `V` is the host's view handle type; the theme layer never looks inside it.
#[derive(Debug, Clone)]
pub struct ScreenTransition<V> {
    /// Screen being displayed.
    pub current_screen: ScreenDescriptor,
    /// Screen being left.
    pub previous_screen: ScreenDescriptor,
    /// Container both views live in during the animation.
    pub wrapper: V,
    /// View being left.
    pub current: V,
    /// View being displayed.
    pub next: V,
    /// Resolved by the callback once the animation is over.
    pub deferred: Deferred,
}

impl<V> ScreenTransition<V> {
    /// Direction resolved from the two screen types.
    ///
    /// See [`resolve_direction`].
    #[must_use]
    pub fn direction(&self) -> TransitionDirection {
        resolve_direction(
            &self.current_screen.screen_type,
            &self.previous_screen.screen_type,
        )
    }
}

/// Theme callback that animates one kind of transition.
pub type TransitionCallback<V> = Box<dyn Fn(&ScreenTransition<V>) -> Result<()>>;

/// The three theme-supplied transition callbacks.
pub struct ScreenTransitions<V> {
    /// Runs for [`TransitionDirection::Replace`].
    pub replace: TransitionCallback<V>,
    /// Runs for [`TransitionDirection::Left`].
    pub left: TransitionCallback<V>,
    /// Runs for [`TransitionDirection::Right`].
    pub right: TransitionCallback<V>,
}

impl<V> ScreenTransitions<V> {
    /// Runs the callback matching the transition's direction.
    ///
    /// # Errors
    ///
    /// Whatever the selected callback returns.
    pub fn dispatch(&self, transition: &ScreenTransition<V>) -> Result<()> {
        let direction = transition.direction();
        tracing::debug!(
            direction = %direction,
            current = %transition.current_screen.screen_type,
            previous = %transition.previous_screen.screen_type,
            "dispatching screen transition"
        );

        let callback = match direction {
            TransitionDirection::Left => &self.left,
            TransitionDirection::Right => &self.right,
            TransitionDirection::Replace => &self.replace,
        };
        callback(transition)
    }
}

impl<V> fmt::Debug for ScreenTransitions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenTransitions").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn direction(current: &str, previous: &str) -> TransitionDirection {
        resolve_direction(&ScreenType::from(current), &ScreenType::from(previous))
    }

    #[test]
    fn direction_table() {
        use TransitionDirection::{Left, Replace, Right};

        let cases = [
            ("list", "single", Right),
            ("custom-component", "single", Right),
            ("list", "list", Replace),
            ("custom-component", "comments", Replace),
            ("single", "list", Left),
            ("single", "custom-component", Left),
            ("single", "comments", Right),
            ("single", "page", Replace),
            ("single", "", Replace),
            ("comments", "anything", Left),
            ("comments", "single", Left),
            ("page", "page", Replace),
            ("page", "single", Replace),
            ("", "", Replace),
        ];

        for (current, previous, expected) in cases {
            assert_eq!(direction(current, previous), expected, "{current} <- {previous}");
        }
    }

    #[test]
    fn direction_parses_and_displays() {
        assert_eq!("left".parse::<TransitionDirection>(), Ok(TransitionDirection::Left));
        assert!("up".parse::<TransitionDirection>().is_err());
        assert_eq!(TransitionDirection::Replace.to_string(), "replace");
    }

    #[test]
    fn deferred_runs_waiters_once() {
        let deferred = Deferred::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        deferred.then(move || c.set(c.get() + 1));
        assert_eq!(count.get(), 0);

        deferred.clone().resolve();
        deferred.resolve();
        assert_eq!(count.get(), 1);

        let c = Rc::clone(&count);
        deferred.then(move || c.set(c.get() + 10));
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn dispatch_picks_callback_by_direction() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let callback = |tag: &'static str| -> TransitionCallback<()> {
            let picked = Rc::clone(&picked);
            Box::new(move |t: &ScreenTransition<()>| {
                picked.borrow_mut().push(tag);
                t.deferred.resolve();
                Ok(())
            })
        };
        let transitions = ScreenTransitions {
            replace: callback("replace"),
            left: callback("left"),
            right: callback("right"),
        };

        let transition = ScreenTransition {
            current_screen: ScreenDescriptor::new("comments", "comments-12"),
            previous_screen: ScreenDescriptor::new("single", "single/posts/12"),
            wrapper: (),
            current: (),
            next: (),
            deferred: Deferred::new(),
        };
        transitions.dispatch(&transition).unwrap();

        assert_eq!(*picked.borrow(), vec!["left"]);
        assert!(transition.deferred.is_resolved());
    }
}
