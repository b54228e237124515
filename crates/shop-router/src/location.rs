//! Browser locations and URI component encoding.

use serde::Serialize;
use std::fmt;

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Path of the home page.
pub const HOME_PATH: &str = "/";

/// Query parameter carrying the path to resume after login.
pub const REDIRECT_PARAM: &str = "redirect";

/// Query parameter carrying why the user was sent to login.
pub const REASON_PARAM: &str = "reason";

/// A location within the storefront, split the way a browser splits it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// Path component, always starting with `/`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    /// Create a location from a path and a query string.
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        let mut pathname = pathname.into();
        if !pathname.starts_with('/') {
            pathname.insert(0, '/');
        }
        let mut search = search.into();
        if !search.is_empty() && !search.starts_with('?') {
            search.insert(0, '?');
        }
        Self {
            pathname,
            search,
            hash: String::new(),
        }
    }

    /// Parse a full path such as `/cart?x=1#top`.
    pub fn parse(full_path: &str) -> Self {
        let (rest, hash) = match full_path.find('#') {
            Some(i) => (&full_path[..i], &full_path[i..]),
            None => (full_path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let pathname = if pathname.is_empty() { HOME_PATH } else { pathname };
        let search = if search == "?" { "" } else { search };

        let mut location = Self::new(pathname, search);
        location.hash = hash.to_string();
        location
    }

    /// Path, query and fragment.
    pub fn full_path(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }

    /// Path and query, without the fragment.
    pub fn path_and_query(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }

    /// Decoded query pairs in order of appearance.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.search
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let mut parts = pair.splitn(2, '=');
                let key = parts.next().unwrap_or("");
                let value = parts.next().unwrap_or("");
                (decode_uri_component(key), decode_uri_component(value))
            })
            .collect()
    }

    /// First decoded value of a query parameter.
    pub fn query(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Check if this is, or sits under, the login page.
    pub fn is_login_page(&self) -> bool {
        self.pathname == LOGIN_PATH || self.pathname.contains(LOGIN_PATH)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

impl From<&str> for Location {
    fn from(full_path: &str) -> Self {
        Self::parse(full_path)
    }
}

/// Build an href from a path and query pairs, encoding every value.
pub fn build_href(path: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", encode_uri_component(k), encode_uri_component(v)))
        .collect();
    format!("{}?{}", path, query.join("&"))
}

/// Login href that returns the user to `location` afterwards.
///
/// Returns `None` when `location` already is the login page, so that an
/// expired session never stacks redirects onto the login screen.
pub fn login_redirect_href(location: &Location, reason: Option<&str>) -> Option<String> {
    if location.is_login_page() {
        return None;
    }
    let redirect = location.path_and_query();
    let mut query = vec![(REDIRECT_PARAM, redirect.as_str())];
    if let Some(reason) = reason {
        query.push((REASON_PARAM, reason));
    }
    Some(build_href(LOGIN_PATH, &query))
}

/// Percent-encode a URI component.
///
/// Leaves ASCII alphanumerics and `-_.!~*'()` as is and encodes every
/// other byte of the UTF-8 representation as `%XX` with upper-case hex.
pub fn encode_uri_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => result.push(byte as char),
            _ => {
                result.push('%');
                result.push(HEX[(byte >> 4) as usize] as char);
                result.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    result
}

/// Decode a percent-encoded URI component.
///
/// `+` is read as a space. Malformed escapes are kept verbatim and
/// invalid UTF-8 is replaced.
pub fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Location ===

    #[test]
    fn test_parse_full_path() {
        let loc = Location::parse("/cart?x=1#items");
        assert_eq!(loc.pathname, "/cart");
        assert_eq!(loc.search, "?x=1");
        assert_eq!(loc.hash, "#items");
        assert_eq!(loc.full_path(), "/cart?x=1#items");
        assert_eq!(loc.path_and_query(), "/cart?x=1");
    }

    #[test]
    fn test_parse_bare_and_empty() {
        assert_eq!(Location::parse("").pathname, "/");
        assert_eq!(Location::parse("?a=b").pathname, "/");
        assert_eq!(Location::parse("/products?").search, "");
        assert_eq!(Location::new("cart", "x=1").full_path(), "/cart?x=1");
    }

    #[test]
    fn test_query_pairs() {
        let loc = Location::parse("/login?redirect=%2Fcart%3Fx%3D1&reason=session_expired");
        assert_eq!(loc.query("redirect").as_deref(), Some("/cart?x=1"));
        assert_eq!(loc.query("reason").as_deref(), Some("session_expired"));
        assert_eq!(loc.query("missing"), None);
    }

    #[test]
    fn test_is_login_page() {
        assert!(Location::parse("/login").is_login_page());
        assert!(Location::parse("/login?redirect=%2F").is_login_page());
        assert!(Location::parse("/auth/login/email").is_login_page());
        assert!(!Location::parse("/cart").is_login_page());
    }

    // === Encoding ===

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("/cart?x=1"), "%2Fcart%3Fx%3D1");
        assert_eq!(encode_uri_component("a b&c"), "a%20b%26c");
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_uri_component("购物车"), "%E8%B4%AD%E7%89%A9%E8%BD%A6");
    }

    #[test]
    fn test_decode_uri_component() {
        assert_eq!(decode_uri_component("%2Fcart%3Fx%3D1"), "/cart?x=1");
        assert_eq!(decode_uri_component("a+b"), "a b");
        assert_eq!(decode_uri_component("%E8%B4%AD"), "购");
        assert_eq!(decode_uri_component("100%"), "100%");
        assert_eq!(decode_uri_component("%zz"), "%zz");
        assert_eq!(decode_uri_component("%+1"), "% 1");
        assert_eq!(decode_uri_component("%-1x"), "%-1x");
        assert_eq!(decode_uri_component("%2f%2F"), "//");
    }

    // === Login redirect ===

    #[test]
    fn test_login_redirect_href() {
        let loc = Location::parse("/cart?x=1");
        assert_eq!(
            login_redirect_href(&loc, None).as_deref(),
            Some("/login?redirect=%2Fcart%3Fx%3D1")
        );
        assert_eq!(
            login_redirect_href(&loc, Some("session_expired")).as_deref(),
            Some("/login?redirect=%2Fcart%3Fx%3D1&reason=session_expired")
        );
    }

    #[test]
    fn test_login_redirect_skipped_on_login_page() {
        assert_eq!(login_redirect_href(&Location::parse("/login?redirect=%2F"), None), None);
    }

    #[test]
    fn test_login_redirect_drops_fragment() {
        let loc = Location::parse("/profile#orders");
        assert_eq!(
            login_redirect_href(&loc, None).as_deref(),
            Some("/login?redirect=%2Fprofile")
        );
    }

    #[test]
    fn test_build_href() {
        assert_eq!(build_href("/", &[]), "/");
        assert_eq!(build_href("/goods", &[("name", "red shoe")]), "/goods?name=red%20shoe");
    }
}
