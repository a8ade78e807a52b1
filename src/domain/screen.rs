//! Screen descriptors owned by the application core.
//!
//! The theme layer only reads these: the screen type drives transition
//! directions and context classes, the fragment names the route, and the
//! component id points at list data for "get more" links.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of screen the application core is displaying.
///
/// Unknown kinds are kept verbatim in [`ScreenType::Other`] so they round-trip
/// and still resolve to a `replace` transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScreenType {
    /// Archive of posts.
    List,
    /// Theme-defined archive component.
    CustomComponent,
    /// One post.
    Single,
    /// Comments of a post.
    Comments,
    /// Static page.
    Page,
    /// Any type the theme layer does not know about.
    Other(String),
}

impl ScreenType {
    /// Name used by the application core, such as `"list"` or `"single"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::List => "list",
            Self::CustomComponent => "custom-component",
            Self::Single => "single",
            Self::Comments => "comments",
            Self::Page => "page",
            Self::Other(name) => name,
        }
    }

    /// Lists and custom components both behave as archive screens.
    #[must_use]
    pub const fn is_archive(&self) -> bool {
        matches!(self, Self::List | Self::CustomComponent)
    }
}

impl From<&str> for ScreenType {
    fn from(name: &str) -> Self {
        match name {
            "list" => Self::List,
            "custom-component" => Self::CustomComponent,
            "single" => Self::Single,
            "comments" => Self::Comments,
            "page" => Self::Page,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ScreenType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<ScreenType> for String {
    fn from(screen_type: ScreenType) -> Self {
        screen_type.as_str().to_string()
    }
}

impl Default for ScreenType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record describing a displayed screen.
///
/// Fields the theme layer does not interpret are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenDescriptor {
    /// Kind of screen.
    #[serde(default)]
    pub screen_type: ScreenType,
    /// Route fragment that displays the screen.
    #[serde(default)]
    pub fragment: String,
    /// Content component shown, for archive screens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Fields passed through without interpretation.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScreenDescriptor {
    /// Creates a descriptor with no component and no extra fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use themeapp::{ScreenDescriptor, ScreenType};
    ///
    /// let screen = ScreenDescriptor::new("single", "/single/posts/12");
    /// assert_eq!(screen.screen_type, ScreenType::Single);
    /// assert!(!screen.is_empty());
    /// ```
    #[must_use]
    pub fn new(screen_type: impl Into<ScreenType>, fragment: impl Into<String>) -> Self {
        Self {
            screen_type: screen_type.into(),
            fragment: fragment.into(),
            component_id: None,
            extra: Map::new(),
        }
    }

    /// Sets the content component displayed by the screen.
    #[must_use]
    pub fn with_component(mut self, component_id: impl Into<String>) -> Self {
        self.component_id = Some(component_id.into());
        self
    }

    /// A descriptor with no type, no fragment and nothing else is treated
    /// the same as no descriptor at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.screen_type.as_str().is_empty()
            && self.fragment.is_empty()
            && self.component_id.is_none()
            && self.extra.is_empty()
    }
}
