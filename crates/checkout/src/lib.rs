//! Checkout bridge: cart snapshot → hosted payment page.
//!
//! Builds a provider request from a non-empty [`CartSnapshot`], hands it to a
//! [`PaymentProvider`], and returns the hosted-page redirect. The bridge owns
//! no cart state; the caller decides what to do with the cart afterwards
//! (see [`ReturnRoute`]).
//!
//! [`CartSnapshot`]: storefront_cart::CartSnapshot

pub mod bridge;
pub mod config;
pub mod error;
pub mod http;
pub mod pricing;
pub mod provider;
pub mod request;
pub mod route;

pub use bridge::{CheckoutBridge, Redirect};
pub use config::{CheckoutConfig, ConfigError};
pub use error::{CheckoutError, CheckoutNotice, ProviderError};
pub use http::HttpPaymentProvider;
pub use pricing::PriceLookup;
pub use provider::{HostedSession, PaymentProvider};
pub use request::{CheckoutMode, CheckoutRequest, LineItem, CURRENCY};
pub use route::ReturnRoute;
