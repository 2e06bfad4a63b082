//! Re-entry routes from the hosted payment page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnRoute {
    /// Payment completed; the cart must be cleared.
    Success,
    /// Shopper backed out; the cart is left as it was.
    Cancel,
}

impl ReturnRoute {
    /// Match a request path (`/success`, `/cancel`), ignoring query string and
    /// trailing slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/success" => Some(Self::Success),
            "/cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Success => "/success",
            Self::Cancel => "/cancel",
        }
    }

    /// Whether observing this route clears the cart.
    pub fn clears_cart(&self) -> bool {
        matches!(self, Self::Success)
    }
}
