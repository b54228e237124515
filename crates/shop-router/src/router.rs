//! Router that runs the guard on every push and follows its redirects.

use crate::guard::{GuardDecision, NavigationGuard};
use crate::navigator::Navigator;
use crate::route::{NavigationTarget, RouteRegistry};
use crate::RouterError;
use serde::Serialize;
use shop_auth::UserCache;
use std::sync::Arc;

/// Maximum guard redirects followed for a single push.
pub const MAX_REDIRECTS: usize = 10;

/// A completed navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Where the user ended up.
    pub target: NavigationTarget,
    /// Redirect hrefs taken on the way, in order.
    pub redirects: Vec<String>,
}

impl Navigation {
    /// Check if the guard diverted the navigation.
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// Storefront router.
pub struct Router {
    registry: RouteRegistry,
    guard: NavigationGuard,
    navigator: Arc<dyn Navigator>,
}

impl Router {
    /// Create a router over the storefront routes.
    pub fn new(cache: UserCache, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_registry(RouteRegistry::storefront(), cache, navigator)
    }

    /// Create a router over a custom route table.
    pub fn with_registry(
        registry: RouteRegistry,
        cache: UserCache,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            registry,
            guard: NavigationGuard::new(cache),
            navigator,
        }
    }

    /// The route table.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// The route at the navigator's current location.
    pub fn current(&self) -> NavigationTarget {
        self.registry.resolve(&self.navigator.location().full_path())
    }

    /// Navigate to `full_path`.
    ///
    /// Every redirect target is guarded again before it is taken. The
    /// settled location is assigned on the navigator.
    pub fn push(&self, full_path: &str) -> Result<Navigation, RouterError> {
        let mut redirects = Vec::new();
        let mut target = self.registry.resolve(full_path);

        loop {
            let decision = self.guard.check(&target);
            let href = match decision {
                GuardDecision::Proceed => break,
                other => match other.redirect_href() {
                    Some(href) => href,
                    None => break,
                },
            };

            if redirects.len() >= MAX_REDIRECTS {
                return Err(RouterError::RedirectLoop {
                    path: full_path.to_string(),
                    hops: redirects.len(),
                });
            }

            tracing::info!(from = %target.location, to = %href, "navigation redirected");
            target = self.registry.resolve(&href);
            redirects.push(href);
        }

        self.navigator.assign(&target.full_path());
        Ok(Navigation { target, redirects })
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
