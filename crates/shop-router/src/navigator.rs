//! The page navigation surface.

use crate::location::Location;
use std::sync::Mutex;

/// Access to the current page location and full-page navigation.
///
/// In a browser this is `window.location`; elsewhere it is whatever shell
/// hosts the storefront.
pub trait Navigator: Send + Sync {
    /// The current location.
    fn location(&self) -> Location;

    /// Navigate to `href`. Assigning while a navigation is pending is fine.
    fn assign(&self, href: &str);
}

/// In-memory navigator that records every assignment.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavigatorState>,
}

#[derive(Debug)]
struct NavigatorState {
    current: Location,
    history: Vec<String>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl MemoryNavigator {
    /// Create a navigator positioned at `full_path`.
    pub fn at(full_path: &str) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                current: Location::parse(full_path),
                history: Vec::new(),
            }),
        }
    }

    /// Every href assigned so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.history.clone(),
            Err(poisoned) => poisoned.into_inner().history.clone(),
        }
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> Location {
        match self.state.lock() {
            Ok(state) => state.current.clone(),
            Err(poisoned) => poisoned.into_inner().current.clone(),
        }
    }

    fn assign(&self, href: &str) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracing::debug!(from = %state.current, to = href, "navigating");
        state.current = Location::parse(href);
        state.history.push(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_navigator_records_history() {
        let nav = MemoryNavigator::at("/cart?x=1");
        assert_eq!(nav.location().full_path(), "/cart?x=1");

        nav.assign("/login?redirect=%2Fcart%3Fx%3D1");
        nav.assign("/login?redirect=%2Fcart%3Fx%3D1");

        assert_eq!(nav.location().pathname, "/login");
        assert_eq!(nav.history().len(), 2);
    }

    #[test]
    fn test_default_is_home() {
        assert_eq!(MemoryNavigator::default().location().pathname, "/");
    }
}
