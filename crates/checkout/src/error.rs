//! Checkout error model.
//!
//! Every failure on the checkout path is reported to the shopper through the
//! same generic [`CheckoutNotice`]; the typed variants exist for logs and
//! tests.

use thiserror::Error;

use storefront_core::ProductId;

/// Text shown to the shopper for any checkout failure.
pub const GENERIC_CHECKOUT_MESSAGE: &str =
    "Something went wrong with the checkout process. Please try again.";

/// Failure talking to (or setting up) the payment provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider client could not be constructed.
    #[error("payment provider failed to initialize: {0}")]
    Initialization(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("no items to checkout")]
    EmptyCart,
    #[error("line for product {product_id} is missing required properties: {reason}")]
    MalformedLine {
        product_id: ProductId,
        reason: &'static str,
    },
    #[error("a checkout attempt is already in progress")]
    InFlight,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl CheckoutError {
    /// User-facing message for this failure.
    pub fn notice(&self) -> CheckoutNotice {
        CheckoutNotice::generic()
    }
}

/// Non-technical message surfaced to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutNotice {
    message: &'static str,
}

impl CheckoutNotice {
    pub fn generic() -> Self {
        Self {
            message: GENERIC_CHECKOUT_MESSAGE,
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl core::fmt::Display for CheckoutNotice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message)
    }
}
