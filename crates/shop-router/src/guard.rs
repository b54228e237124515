//! Navigation guard: login and role gating for route transitions.

use crate::location::{build_href, HOME_PATH, LOGIN_PATH, REDIRECT_PARAM};
use crate::route::NavigationTarget;
use shop_auth::{CachedUser, Role, UserCache};

/// Outcome of guarding a single route transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the transition through.
    Proceed,
    /// Send the user to the home page.
    RedirectHome,
    /// Send the user to login, resuming at `redirect` afterwards.
    RedirectLogin {
        /// Full path originally requested.
        redirect: String,
    },
}

impl GuardDecision {
    /// Check if the transition may proceed.
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardDecision::Proceed)
    }

    /// The href to redirect to, if this is a redirect.
    pub fn redirect_href(&self) -> Option<String> {
        match self {
            GuardDecision::Proceed => None,
            GuardDecision::RedirectHome => Some(HOME_PATH.to_string()),
            GuardDecision::RedirectLogin { redirect } => {
                Some(build_href(LOGIN_PATH, &[(REDIRECT_PARAM, redirect.as_str())]))
            }
        }
    }
}

/// Decide a transition from the cached user and the target's flags.
///
/// Signed-in users are kept off the login and register pages. Routes
/// requiring auth send anonymous users to login with the requested path
/// attached, and non-merchants home when the route also requires a
/// merchant.
pub fn decide(to: &NavigationTarget, user: Option<&CachedUser>) -> GuardDecision {
    let is_logged_in = user.is_some();
    let role = user.map(CachedUser::role).unwrap_or_default();

    if is_logged_in && to.name().is_some_and(|name| name.is_credentials_page()) {
        return GuardDecision::RedirectHome;
    }

    let meta = to.meta();
    if meta.requires_auth {
        if !is_logged_in {
            return GuardDecision::RedirectLogin {
                redirect: to.full_path(),
            };
        }
        if meta.requires_merchant && role != Role::Merchant {
            return GuardDecision::RedirectHome;
        }
    }

    GuardDecision::Proceed
}

/// Guard run before every route transition.
///
/// Reads the user cache exactly once per transition and never suspends.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    cache: UserCache,
}

impl NavigationGuard {
    /// Create a guard over the shared user cache.
    pub fn new(cache: UserCache) -> Self {
        Self { cache }
    }

    /// Guard a transition to `to`.
    pub fn check(&self, to: &NavigationTarget) -> GuardDecision {
        let user = self.cache.signed_in_user();
        let decision = decide(to, user.as_ref());

        tracing::debug!(
            path = %to.location.pathname,
            route = to.name().map(|n| n.as_str()).unwrap_or("-"),
            logged_in = user.is_some(),
            role = %user.as_ref().map(CachedUser::role).unwrap_or_default(),
            ?decision,
            "route guard"
        );

        decision
    }
}
