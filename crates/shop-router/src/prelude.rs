//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use shop_router::prelude::*;
//! ```

pub use crate::{
    GuardDecision, Location, MemoryNavigator, NavigationGuard, NavigationTarget, Navigator,
    RouteEntry, RouteMeta, RouteName, RouteRegistry, Router, RouterError,
};
