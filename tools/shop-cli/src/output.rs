//! Output formatting for the CLI.

use console::style;
use shop_auth::Role;
use shop_router::RouteMeta;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            let body = serde_json::json!({ "error": msg });
            eprintln!("{}", body);
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Access badge for a route.
pub fn access_badge(meta: RouteMeta) -> String {
    if meta.requires_merchant {
        style("merchant").magenta().to_string()
    } else if meta.requires_auth {
        style("auth").yellow().to_string()
    } else {
        style("public").green().to_string()
    }
}

/// Role badge.
pub fn role_badge(role: Role) -> String {
    match role {
        Role::Merchant => style(role.as_str()).magenta().to_string(),
        Role::Customer => style(role.as_str()).cyan().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_badge_text() {
        console::set_colors_enabled(false);
        assert_eq!(access_badge(RouteMeta::PUBLIC), "public");
        assert_eq!(access_badge(RouteMeta::AUTH), "auth");
        assert_eq!(access_badge(RouteMeta::MERCHANT), "merchant");
        assert_eq!(role_badge(Role::Merchant), "MERCHANT");
    }
}
