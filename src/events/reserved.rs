//! Lifecycle events owned by the region manager.

use std::fmt;
use std::str::FromStr;

/// Events that are routed to the region manager's notification channel
/// instead of the local general channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedEvent {
    ScreenLeave,
    ScreenShowed,
    ScreenBeforeTransition,
    MenuRefresh,
    HeaderRender,
    WaitingStart,
    WaitingStop,
}

impl ReservedEvent {
    /// Every reserved event, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::ScreenLeave,
        Self::ScreenShowed,
        Self::ScreenBeforeTransition,
        Self::MenuRefresh,
        Self::HeaderRender,
        Self::WaitingStart,
        Self::WaitingStop,
    ];

    /// Wire name, such as `"screen:showed"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScreenLeave => "screen:leave",
            Self::ScreenShowed => "screen:showed",
            Self::ScreenBeforeTransition => "screen:before-transition",
            Self::MenuRefresh => "menu:refresh",
            Self::HeaderRender => "header:render",
            Self::WaitingStart => "waiting:start",
            Self::WaitingStop => "waiting:stop",
        }
    }

    /// Exact-name lookup in the reserved set.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

impl FromStr for ReservedEvent {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::lookup(name).ok_or(())
    }
}

impl fmt::Display for ReservedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reserved_name_round_trips() {
        for event in ReservedEvent::ALL {
            assert_eq!(ReservedEvent::lookup(event.as_str()), Some(event));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(ReservedEvent::lookup("screen:showed"), Some(ReservedEvent::ScreenShowed));
        assert_eq!(ReservedEvent::lookup("screen:showed "), None);
        assert_eq!(ReservedEvent::lookup("Screen:Showed"), None);
        assert_eq!(ReservedEvent::lookup("refresh:start"), None);
    }
}
