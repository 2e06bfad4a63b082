//! Render-ready view models.
//!
//! Everything here is an owned copy; holding a view never gives access to the
//! cart engine.

use serde::Serialize;

use storefront_cart::{CartLine, CartSnapshot};
use storefront_catalog::Product;
use storefront_checkout::ReturnRoute;
use storefront_core::ProductId;

/// Quantities the cart's quantity picker offers.
pub const QUANTITY_CHOICES: std::ops::RangeInclusive<u32> = 1..=5;

/// Route of the catalog page, the target of every "back to shop" link.
pub const CATALOG_ROUTE: &str = "/";

/// Format a dollar amount the way prices are shown to shoppers.
pub fn format_amount(amount: f64) -> String {
    // Normalise -0.0 so an emptied cart never shows "$-0.00".
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("${amount:.2}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub price_label: String,
    pub description: String,
    pub image: String,
    pub category: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id_typed(),
            name: product.name().to_string(),
            price_label: product.price().to_string(),
            description: product.description().to_string(),
            image: product.image().to_string(),
            category: product.category().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub query: String,
    pub products: Vec<ProductCardView>,
    /// Distinct cart lines; `None` hides the badge.
    pub cart_badge: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub price_label: String,
    pub quantity: u32,
    pub line_total_label: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id(),
            name: line.name().to_string(),
            image: line.image().to_string(),
            price_label: line.unit_price().to_string(),
            quantity: line.quantity(),
            line_total_label: format_amount(line.line_total()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_label: String,
    pub checkout_enabled: bool,
}

impl CartView {
    pub fn new(snapshot: &CartSnapshot, checkout_enabled: bool) -> Self {
        Self {
            lines: snapshot.lines().iter().map(CartLineView::from).collect(),
            total_label: format_amount(snapshot.total()),
            checkout_enabled,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Static confirmation content shown after returning from the payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationPage {
    pub route: ReturnRoute,
    pub title: &'static str,
    pub message: &'static str,
    pub link_label: &'static str,
    pub link_href: &'static str,
}

impl ConfirmationPage {
    pub fn for_route(route: ReturnRoute) -> Self {
        let (title, message) = match route {
            ReturnRoute::Success => (
                "Payment Successful!",
                "Thank you for your purchase. We'll send you an email confirmation shortly.",
            ),
            ReturnRoute::Cancel => (
                "Payment Cancelled",
                "Your payment was cancelled. No charges were made to your account.",
            ),
        };

        Self {
            route,
            title,
            message,
            link_label: "Return to Shop",
            link_href: CATALOG_ROUTE,
        }
    }
}
