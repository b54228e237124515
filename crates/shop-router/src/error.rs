//! Router errors.

use thiserror::Error;

/// Errors that can occur while navigating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// Guard redirects did not settle.
    #[error("Redirect loop navigating to {path} after {hops} redirects")]
    RedirectLoop { path: String, hops: usize },
}
