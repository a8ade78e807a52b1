//! Navigation helpers for themes.
//!
//! - [`transition`]: Direction table, deferred completion and the
//!   `screen-transition` callbacks
//! - [`back_button`]: Show/hide state machine and idempotent click binding
//! - [`context`]: `app-*` element classes and "get more" link state
//! - [`navigator`]: Router-backed navigation handle

pub mod back_button;
pub mod context;
pub mod navigator;
pub mod transition;

pub use back_button::{BackButton, BackButtonDisplay, BeforeToggle};
pub use context::{apply_context_classes, context_classes, MoreLinkDisplay};
pub use navigator::Navigator;
pub use transition::{
    resolve_direction, Deferred, ScreenTransition, ScreenTransitions, TransitionCallback,
    TransitionDirection,
};
