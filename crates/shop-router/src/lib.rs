//! Storefront routing with login and role gating.
//!
//! This crate provides the static route table of the storefront and the
//! guard that runs before every transition:
//!
//! ```text
//! /                      Home
//! /login, /register      public, but signed-in users are sent home
//! /cart, /profile        signed-in users only
//! /order/:id             signed-in users only
//! /merchant/...          signed-in merchants only
//! /merchant/:id          public shop page
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use shop_router::prelude::*;
//!
//! let router = Router::new(cache, navigator);
//! let navigation = router.push("/cart?x=1")?;
//!
//! // Anonymous users land on login with the requested path attached
//! assert_eq!(navigation.redirects, ["/login?redirect=%2Fcart%3Fx%3D1"]);
//! ```

mod error;
mod guard;
mod location;
mod navigator;
pub mod prelude;
mod route;
mod router;

pub use error::RouterError;
pub use guard::{decide, GuardDecision, NavigationGuard};
pub use location::{
    build_href, decode_uri_component, encode_uri_component, login_redirect_href, Location,
    HOME_PATH, LOGIN_PATH, REASON_PARAM, REDIRECT_PARAM,
};
pub use navigator::{MemoryNavigator, Navigator};
pub use route::{NavigationTarget, RouteEntry, RouteMeta, RouteName, RouteRegistry, STOREFRONT_ROUTES};
pub use router::{Navigation, Router, MAX_REDIRECTS};
