//! Trusted price sources.
//!
//! Cart lines carry the price the shopper saw. A [`PriceLookup`] lets the
//! bridge re-derive each unit price from the product id instead, so the
//! payment request does not depend on prices held client-side.

use storefront_catalog::Catalog;
use storefront_core::{Price, ProductId};

pub trait PriceLookup: Send + Sync {
    /// Authoritative unit price, or `None` for an unknown product.
    fn unit_price(&self, product_id: ProductId) -> Option<Price>;
}

impl PriceLookup for Catalog {
    fn unit_price(&self, product_id: ProductId) -> Option<Price> {
        self.get(product_id).map(|p| p.price())
    }
}
