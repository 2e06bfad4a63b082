use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{Price, ProductId};

/// One product-keyed entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    pub(crate) fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id_typed()
    }

    pub fn name(&self) -> &str {
        self.product.name()
    }

    pub fn unit_price(&self) -> Price {
        self.product.price()
    }

    pub fn image(&self) -> &str {
        self.product.image()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> f64 {
        self.unit_price().extended(self.quantity)
    }
}
