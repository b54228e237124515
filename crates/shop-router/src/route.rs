//! Static route table and path matching.

use crate::location::{decode_uri_component, Location};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Access-control flags declared by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    /// Only signed-in users may enter.
    pub requires_auth: bool,
    /// Only merchants may enter. Checked after `requires_auth`.
    pub requires_merchant: bool,
}

impl RouteMeta {
    /// Open to everyone.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_merchant: false,
    };

    /// Signed-in users only.
    pub const AUTH: Self = Self {
        requires_auth: true,
        requires_merchant: false,
    };

    /// Signed-in merchants only.
    pub const MERCHANT: Self = Self {
        requires_auth: true,
        requires_merchant: true,
    };
}

/// Names of the storefront routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteName {
    Home,
    Login,
    Register,
    Products,
    ProductDetail,
    Cart,
    OrderView,
    Merchant,
    MerchantDetail,
    Profile,
    MerchantOperator,
    GoodsManager,
    OrderManager,
    SalesReport,
}

impl RouteName {
    /// Get the route name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "Home",
            RouteName::Login => "Login",
            RouteName::Register => "Register",
            RouteName::Products => "Products",
            RouteName::ProductDetail => "ProductDetail",
            RouteName::Cart => "Cart",
            RouteName::OrderView => "OrderView",
            RouteName::Merchant => "Merchant",
            RouteName::MerchantDetail => "MerchantDetail",
            RouteName::Profile => "Profile",
            RouteName::MerchantOperator => "MerchantOperator",
            RouteName::GoodsManager => "GoodsManager",
            RouteName::OrderManager => "OrderManager",
            RouteName::SalesReport => "SalesReport",
        }
    }

    /// Check if this is one of the credential entry pages.
    pub fn is_credentials_page(&self) -> bool {
        matches!(self, RouteName::Login | RouteName::Register)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single route in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Route pattern (e.g., "/product/:id").
    pub path: &'static str,
    /// Route name.
    pub name: RouteName,
    /// Page component identifier, resolved lazily by the view layer.
    pub component: &'static str,
    /// Access-control flags.
    pub meta: RouteMeta,
}

impl RouteEntry {
    /// Create a new route entry.
    pub const fn new(
        path: &'static str,
        name: RouteName,
        component: &'static str,
        meta: RouteMeta,
    ) -> Self {
        Self {
            path,
            name,
            component,
            meta,
        }
    }

    /// Match a path against this pattern.
    ///
    /// Returns the static-segment score and captured params on success.
    fn matches(&self, pathname: &str) -> Option<(usize, BTreeMap<String, String>)> {
        let pattern: Vec<&str> = segments(self.path).collect();
        let actual: Vec<&str> = segments(pathname).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut score = 0;
        let mut params = BTreeMap::new();
        for (expected, segment) in pattern.iter().zip(&actual) {
            if let Some(param) = expected.strip_prefix(':') {
                params.insert(param.to_string(), decode_uri_component(segment));
            } else if expected.eq_ignore_ascii_case(segment) {
                score += 1;
            } else {
                return None;
            }
        }
        Some((score, params))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// The storefront routes.
///
/// `/merchant/:id` is public (a merchant's shop page) while every
/// `/merchant/...` management page requires a merchant.
pub const STOREFRONT_ROUTES: &[RouteEntry] = &[
    RouteEntry::new("/", RouteName::Home, "HomeView", RouteMeta::PUBLIC),
    RouteEntry::new("/login", RouteName::Login, "LoginView", RouteMeta::PUBLIC),
    RouteEntry::new("/register", RouteName::Register, "RegisterView", RouteMeta::PUBLIC),
    RouteEntry::new("/products", RouteName::Products, "ProductsView", RouteMeta::PUBLIC),
    RouteEntry::new("/product/:id", RouteName::ProductDetail, "ProductDetail", RouteMeta::PUBLIC),
    RouteEntry::new("/cart", RouteName::Cart, "CartView", RouteMeta::AUTH),
    RouteEntry::new("/order/:id", RouteName::OrderView, "OrderView", RouteMeta::AUTH),
    RouteEntry::new("/merchant", RouteName::Merchant, "MerchantView", RouteMeta::MERCHANT),
    RouteEntry::new("/merchant/:id", RouteName::MerchantDetail, "MerchantView", RouteMeta::PUBLIC),
    RouteEntry::new("/profile", RouteName::Profile, "ProfileView", RouteMeta::AUTH),
    RouteEntry::new(
        "/merchant-operator",
        RouteName::MerchantOperator,
        "MerchantOperatorView",
        RouteMeta::MERCHANT,
    ),
    RouteEntry::new("/merchant/goods", RouteName::GoodsManager, "GoodsManagerView", RouteMeta::MERCHANT),
    RouteEntry::new("/merchant/orders", RouteName::OrderManager, "OrderManagerView", RouteMeta::MERCHANT),
    RouteEntry::new(
        "/merchant/sales-report",
        RouteName::SalesReport,
        "SalesReportView",
        RouteMeta::MERCHANT,
    ),
];

/// Where a navigation is headed: the requested location and the route it
/// resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    /// Requested location.
    pub location: Location,
    /// Matched route.
    pub route: Option<RouteEntry>,
    /// Decoded path params of the matched route.
    pub params: BTreeMap<String, String>,
}

impl NavigationTarget {
    /// Name of the matched route.
    pub fn name(&self) -> Option<RouteName> {
        self.route.map(|r| r.name)
    }

    /// Access-control flags; unmatched paths carry none.
    pub fn meta(&self) -> RouteMeta {
        self.route.map(|r| r.meta).unwrap_or_default()
    }

    /// Full requested path including query and fragment.
    pub fn full_path(&self) -> String {
        self.location.full_path()
    }

    /// A captured path param.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Registry of routes, matched by specificity.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    entries: Vec<RouteEntry>,
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::storefront()
    }
}

impl RouteRegistry {
    /// Create a registry from explicit entries.
    pub fn new(entries: impl Into<Vec<RouteEntry>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// The storefront route table.
    pub fn storefront() -> Self {
        Self::new(STOREFRONT_ROUTES)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Look up an entry by name.
    pub fn by_name(&self, name: RouteName) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Resolve a full path to its navigation target.
    ///
    /// Static segments outrank params, so `/merchant/goods` resolves to the
    /// goods manager rather than a merchant named "goods". Equal scores go
    /// to the entry declared first.
    pub fn resolve(&self, full_path: &str) -> NavigationTarget {
        let location = Location::parse(full_path);
        let mut best: Option<(usize, &RouteEntry, BTreeMap<String, String>)> = None;

        for entry in &self.entries {
            if let Some((score, params)) = entry.matches(&location.pathname) {
                let better = best.as_ref().map_or(true, |(s, _, _)| score > *s);
                if better {
                    best = Some((score, entry, params));
                }
            }
        }

        match best {
            Some((_, entry, params)) => NavigationTarget {
                location,
                route: Some(*entry),
                params,
            },
            None => NavigationTarget {
                location,
                route: None,
                params: BTreeMap::new(),
            },
        }
    }
}
