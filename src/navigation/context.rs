//! Screen-dependent element classes and "get more" link state.

use crate::domain::{ScreenDescriptor, ScreenType};
use crate::host::ClassListElement;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of every class managed by the context class feature.
pub const CONTEXT_CLASS_PREFIX: &str = "app-";

/// Classes describing `screen`: `app-<screen_type>` and `app-<fragment>`.
#[must_use]
pub fn context_classes(screen: &ScreenDescriptor) -> [String; 2] {
    [
        format!("{CONTEXT_CLASS_PREFIX}{}", screen.screen_type),
        format!("{CONTEXT_CLASS_PREFIX}{}", screen.fragment),
    ]
}

/// Replaces the element's `app-*` classes with the ones for `screen`.
///
/// Empty descriptors leave the element untouched.
pub fn apply_context_classes(element: &dyn ClassListElement, screen: &ScreenDescriptor) {
    if screen.is_empty() {
        return;
    }

    for class in element.class_names() {
        if class.starts_with(CONTEXT_CLASS_PREFIX) {
            element.remove_class(&class);
        }
    }
    for class in context_classes(screen) {
        element.add_class(&class);
    }
}

/// Whether a "get more" link should be shown under a list, and how many
/// items are still left to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoreLinkDisplay {
    /// Whether to show the link.
    pub display: bool,
    /// Items not fetched yet.
    pub nb_left: u64,
}

impl MoreLinkDisplay {
    /// Reads list component data shaped like `{"ids": [...], "total": n}`.
    ///
    /// Data without `ids` means the component is not paginated.
    #[must_use]
    pub fn from_component_data(data: &Value) -> Self {
        let Some(ids) = data.get("ids").and_then(Value::as_array) else {
            return Self::default();
        };
        let total = data.get("total").and_then(Value::as_u64).unwrap_or(0);
        let nb_left = total.saturating_sub(ids.len() as u64);

        Self {
            display: nb_left > 0,
            nb_left,
        }
    }

    /// Only list screens with a component get a link.
    #[must_use]
    pub fn for_screen(
        screen: Option<&ScreenDescriptor>,
        component_data: impl FnOnce(&str) -> Option<Value>,
    ) -> Self {
        let Some(screen) = screen else {
            return Self::default();
        };
        if screen.screen_type != ScreenType::List {
            return Self::default();
        }

        screen
            .component_id
            .as_deref()
            .and_then(component_data)
            .map_or_else(Self::default, |data| Self::from_component_data(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Body {
        classes: RefCell<Vec<String>>,
    }

    impl ClassListElement for Body {
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

    #[test]
    fn context_classes_replace_previous_screen_classes() {
        let body = Body::default();
        body.add_class("no-js");
        body.add_class("app-list");
        body.add_class("app-posts");

        apply_context_classes(&body, &ScreenDescriptor::new("single", "single-12"));

        assert_eq!(
            *body.classes.borrow(),
            vec!["no-js", "app-single", "app-single-12"]
        );
    }

    #[test]
    fn empty_screen_leaves_classes_alone() {
        let body = Body::default();
        body.add_class("app-list");
        apply_context_classes(&body, &ScreenDescriptor::default());
        assert_eq!(*body.classes.borrow(), vec!["app-list"]);
    }

    #[test]
    fn more_link_counts_items_left() {
        let shown = MoreLinkDisplay::from_component_data(&json!({"ids": [1, 2, 3], "total": 10}));
        assert_eq!(shown, MoreLinkDisplay { display: true, nb_left: 7 });

        let done = MoreLinkDisplay::from_component_data(&json!({"ids": [1, 2], "total": 2}));
        assert_eq!(done, MoreLinkDisplay { display: false, nb_left: 0 });

        let unpaged = MoreLinkDisplay::from_component_data(&json!({"items": []}));
        assert_eq!(unpaged, MoreLinkDisplay::default());
    }

    #[test]
    fn more_link_only_for_list_screens() {
        let data = |_: &str| Some(json!({"ids": [1], "total": 5}));

        let list = ScreenDescriptor::new("list", "posts").with_component("posts");
        assert!(MoreLinkDisplay::for_screen(Some(&list), data).display);

        let single = ScreenDescriptor::new("single", "single-1").with_component("posts");
        assert!(!MoreLinkDisplay::for_screen(Some(&single), data).display);

        let orphan = ScreenDescriptor::new("list", "posts");
        assert!(!MoreLinkDisplay::for_screen(Some(&orphan), data).display);

        assert!(!MoreLinkDisplay::for_screen(None, data).display);
    }
}
