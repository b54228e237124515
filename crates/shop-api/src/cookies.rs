//! Session cookies kept in a key-value store.
//!
//! The backend identifies the session by cookie, so a client that outlives
//! one process needs its jar persisted next to the user cache.

use cookie::time::{Duration, OffsetDateTime};
use cookie::Cookie;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use shop_storage::SharedStore;
use std::collections::BTreeMap;

/// Storage key holding the cookie jar.
pub const COOKIES_KEY: &str = "cookies";

/// A cookie as kept in the jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    /// Host the cookie was set by, or the `Domain` attribute.
    domain: String,
    /// True when `Domain` was given, so subdomains match too.
    #[serde(default)]
    include_subdomains: bool,
    path: String,
    #[serde(default)]
    secure: bool,
    /// Unix seconds; `None` lives as long as the jar.
    #[serde(default)]
    expires_at: Option<i64>,
}

impl StoredCookie {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let domain_ok = host == self.domain
            || (self.include_subdomains && host.ends_with(&format!(".{}", self.domain)));
        let secure_ok = !self.secure || url.scheme() == "https";
        domain_ok && secure_ok && path_matches(url.path(), &self.path)
    }
}

/// A cookie jar persisted as a `name -> cookie` JSON object.
///
/// The jar serves a single backend, so cookies are keyed by name alone.
pub struct StoredCookies {
    store: SharedStore,
}

impl StoredCookies {
    /// Create a jar over a store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn load(&self) -> BTreeMap<String, StoredCookie> {
        match self.store.get_json::<BTreeMap<String, StoredCookie>>(COOKIES_KEY) {
            Ok(jar) => jar.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cookie jar");
                BTreeMap::new()
            }
        }
    }

    fn save(&self, jar: &BTreeMap<String, StoredCookie>) {
        let result = if jar.is_empty() {
            self.store.remove(COOKIES_KEY)
        } else {
            self.store.set_json(COOKIES_KEY, jar)
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist cookies");
        }
    }

    /// Drop every cookie.
    pub fn clear(&self) {
        self.save(&BTreeMap::new());
    }

    /// Names of the cookies currently held and not yet expired.
    pub fn names(&self) -> Vec<String> {
        let now = now();
        self.load()
            .into_iter()
            .filter(|(_, cookie)| !cookie.is_expired(now))
            .map(|(name, _)| name)
            .collect()
    }
}

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Default cookie path for a request path: everything up to the last `/`.
fn default_path(request_path: &str) -> String {
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => request_path[..i].to_string(),
    }
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    request_path == cookie_path
        || (request_path.starts_with(cookie_path)
            && (cookie_path.ends_with('/')
                || request_path[cookie_path.len()..].starts_with('/')))
}

/// Turn a `Set-Cookie` header into a named jar entry, resolved against
/// the URL that set it. An entry with `expires_at` in the past deletes.
fn parse_set_cookie(header: &str, url: &Url, now: i64) -> Option<(String, StoredCookie)> {
    let parsed = Cookie::parse(header).ok()?;
    if parsed.name().is_empty() {
        return None;
    }

    let host = url.host_str()?.to_ascii_lowercase();
    let (domain, include_subdomains) = match parsed.domain() {
        Some(domain) if !domain.is_empty() => (domain.to_ascii_lowercase(), true),
        _ => (host, false),
    };

    // Max-Age wins over Expires.
    let expires_at = match parsed.max_age() {
        Some(max_age) if max_age <= Duration::ZERO => Some(i64::MIN),
        Some(max_age) => Some(now.saturating_add(max_age.whole_seconds())),
        None => parsed.expires_datetime().map(|at| at.unix_timestamp()),
    };

    let path = parsed
        .path()
        .filter(|p| p.starts_with('/'))
        .map(str::to_string)
        .unwrap_or_else(|| default_path(url.path()));

    Some((
        parsed.name().to_string(),
        StoredCookie {
            value: parsed.value().to_string(),
            domain,
            include_subdomains,
            path,
            secure: parsed.secure().unwrap_or(false),
            expires_at,
        },
    ))
}

impl CookieStore for StoredCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let now = now();
        let mut jar = self.load();
        let before = jar.len();
        jar.retain(|_, cookie| !cookie.is_expired(now));
        let mut changed = jar.len() != before;

        for header in cookie_headers {
            let Some((name, cookie)) = header
                .to_str()
                .ok()
                .and_then(|h| parse_set_cookie(h, url, now))
            else {
                continue;
            };
            if cookie.is_expired(now) {
                changed |= jar.remove(&name).is_some();
            } else {
                jar.insert(name, cookie);
                changed = true;
            }
        }
        if changed {
            self.save(&jar);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let now = now();
        let header = self
            .load()
            .iter()
            .filter(|(_, cookie)| !cookie.is_expired(now) && cookie.matches(url))
            .map(|(name, cookie)| format!("{}={}", name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ");
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_str(&header).ok()
    }
}
