//! Provider request construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_cart::{CartLine, CartSnapshot};
use storefront_core::Price;

use crate::config::CheckoutConfig;
use crate::error::CheckoutError;
use crate::pricing::PriceLookup;

/// The only currency the storefront sells in.
pub const CURRENCY: &str = "usd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutMode {
    Payment,
}

/// One priced entry of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub currency: String,
    /// `round(unit_price * 100)`.
    pub unit_amount_minor_units: i64,
    pub product_name: String,
    pub product_images: Vec<String>,
    pub quantity: u32,
}

/// Request body sent to the hosted-checkout provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub request_id: Uuid,
    pub mode: CheckoutMode,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Build a request priced from the cart lines themselves.
    pub fn from_snapshot(
        snapshot: &CartSnapshot,
        config: &CheckoutConfig,
    ) -> Result<Self, CheckoutError> {
        Self::build(snapshot, config, None)
    }

    /// Build a request whose unit prices come from `prices`, keyed by product id.
    pub fn from_snapshot_repriced(
        snapshot: &CartSnapshot,
        config: &CheckoutConfig,
        prices: &dyn PriceLookup,
    ) -> Result<Self, CheckoutError> {
        Self::build(snapshot, config, Some(prices))
    }

    fn build(
        snapshot: &CartSnapshot,
        config: &CheckoutConfig,
        prices: Option<&dyn PriceLookup>,
    ) -> Result<Self, CheckoutError> {
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // All-or-nothing: the first bad line aborts the whole request.
        let mut line_items = Vec::with_capacity(snapshot.len());
        let mut amount: i64 = 0;
        for line in snapshot.lines() {
            let price = match prices {
                Some(lookup) => lookup.unit_price(line.product_id()).ok_or(
                    CheckoutError::MalformedLine {
                        product_id: line.product_id(),
                        reason: "product has no authoritative price",
                    },
                )?,
                None => line.unit_price(),
            };
            let item = line_item(line, price)?;
            amount = item
                .amount_minor_units()
                .and_then(|line_amount| amount.checked_add(line_amount))
                .ok_or(CheckoutError::MalformedLine {
                    product_id: line.product_id(),
                    reason: "price out of range",
                })?;
            line_items.push(item);
        }

        Ok(Self {
            request_id: Uuid::now_v7(),
            mode: CheckoutMode::Payment,
            line_items,
            success_url: config.success_url(),
            cancel_url: config.cancel_url(),
        })
    }

    /// Sum of `unit_amount * quantity` in minor units, `None` on overflow.
    ///
    /// Always `Some` for requests produced by [`CheckoutRequest::from_snapshot`].
    pub fn amount_minor_units(&self) -> Option<i64> {
        self.line_items.iter().try_fold(0i64, |total, item| {
            total.checked_add(item.amount_minor_units()?)
        })
    }
}

impl LineItem {
    /// `unit_amount * quantity`, `None` on overflow.
    pub fn amount_minor_units(&self) -> Option<i64> {
        self.unit_amount_minor_units
            .checked_mul(i64::from(self.quantity))
    }
}

fn line_item(line: &CartLine, price: Price) -> Result<LineItem, CheckoutError> {
    let malformed = |reason| CheckoutError::MalformedLine {
        product_id: line.product_id(),
        reason,
    };

    if line.name().trim().is_empty() {
        return Err(malformed("name is blank"));
    }
    if line.image().trim().is_empty() {
        return Err(malformed("image is blank"));
    }
    if line.quantity() == 0 {
        return Err(malformed("quantity must be at least 1"));
    }
    let unit_amount = price
        .minor_units()
        .ok_or_else(|| malformed("price out of range"))?;
    if unit_amount == 0 {
        return Err(malformed("price must be positive"));
    }

    Ok(LineItem {
        currency: CURRENCY.to_string(),
        unit_amount_minor_units: unit_amount,
        product_name: line.name().to_string(),
        product_images: vec![line.image().to_string()],
        quantity: line.quantity(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_cart::CartEngine;
    use storefront_catalog::{Catalog, Product};
    use storefront_core::ProductId;

    fn config() -> CheckoutConfig {
        CheckoutConfig::new("pk_test", "https://pay.example.test/sessions", "https://shop.test")
            .unwrap()
    }

    fn product(id: u64, name: &str, cents: u32, image: &str) -> Product {
        Product::new(
            ProductId::new(id),
            name,
            Price::from_minor_units(cents),
            "",
            image,
            "Test",
        )
    }

    #[test]
    fn one_line_item_per_cart_line() {
        let catalog = Catalog::fixture();
        let mut cart = CartEngine::new();
        cart.add(catalog.get(ProductId::new(1)).unwrap());
        cart.add(catalog.get(ProductId::new(1)).unwrap());
        cart.add(catalog.get(ProductId::new(5)).unwrap());

        let request = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap();

        assert_eq!(request.mode, CheckoutMode::Payment);
        assert_eq!(request.line_items.len(), 2);
        assert_eq!(request.success_url, "https://shop.test/success");
        assert_eq!(request.cancel_url, "https://shop.test/cancel");

        let watch = &request.line_items[0];
        assert_eq!(watch.currency, "usd");
        assert_eq!(watch.unit_amount_minor_units, 19999);
        assert_eq!(watch.product_name, "Modern Minimalist Watch");
        assert_eq!(
            watch.product_images,
            vec!["https://images.unsplash.com/photo-1523275335684-37898b6baf30".to_string()]
        );
        assert_eq!(watch.quantity, 2);

        assert_eq!(request.line_items[1].unit_amount_minor_units, 8999);
        assert_eq!(request.amount_minor_units(), Some(2 * 19999 + 8999));
    }

    #[test]
    fn empty_snapshot_is_refused() {
        let err = CheckoutRequest::from_snapshot(&CartEngine::new().snapshot(), &config())
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn malformed_line_aborts_whole_request() {
        let mut cart = CartEngine::new();
        cart.add(&product(1, "Good", 1000, "https://img.test/1.jpg"));
        cart.add(&product(2, "No image", 1000, ""));
        cart.add(&product(3, "Also good", 1000, "https://img.test/3.jpg"));

        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MalformedLine {
                product_id: ProductId::new(2),
                reason: "image is blank",
            }
        );
    }

    #[test]
    fn zero_quantity_and_zero_price_lines_are_malformed() {
        let mut cart = CartEngine::new();
        cart.add(&product(1, "Watch", 1000, "https://img.test/1.jpg"));
        cart.set_quantity(ProductId::new(1), 0);
        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedLine { reason: "quantity must be at least 1", .. }));

        let mut cart = CartEngine::new();
        cart.add(&product(1, "Freebie", 0, "https://img.test/1.jpg"));
        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedLine { reason: "price must be positive", .. }));
    }

    #[test]
    fn price_beyond_minor_unit_range_is_malformed() {
        let huge = Product::new(
            ProductId::new(9),
            "Yacht",
            Price::new(1e17).unwrap(),
            "",
            "https://img.test/9.jpg",
            "Test",
        );
        let mut cart = CartEngine::new();
        cart.add(&huge);
        cart.add(&huge);

        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MalformedLine {
                product_id: ProductId::new(9),
                reason: "price out of range",
            }
        );
    }

    #[test]
    fn line_total_overflow_is_malformed() {
        // 5e18 cents fits in i64 on its own, twice does not.
        let pricey = Product::new(
            ProductId::new(3),
            "Island",
            Price::new(5e16).unwrap(),
            "",
            "https://img.test/3.jpg",
            "Test",
        );
        let mut cart = CartEngine::new();
        cart.add(&pricey);
        assert!(CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).is_ok());

        cart.add(&pricey);
        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedLine { reason: "price out of range", .. }));
    }

    #[test]
    fn request_total_overflow_is_malformed() {
        let mut cart = CartEngine::new();
        for id in 1..=2 {
            cart.add(&Product::new(
                ProductId::new(id),
                "Island",
                Price::new(5e16).unwrap(),
                "",
                "https://img.test/i.jpg",
                "Test",
            ));
        }

        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MalformedLine {
                product_id: ProductId::new(2),
                reason: "price out of range",
            }
        );
    }

    #[test]
    fn amount_is_none_when_hand_built_items_overflow() {
        let item = LineItem {
            currency: CURRENCY.to_string(),
            unit_amount_minor_units: i64::MAX,
            product_name: "Yacht".to_string(),
            product_images: vec![],
            quantity: 2,
        };
        assert_eq!(item.amount_minor_units(), None);

        let mut cart = CartEngine::new();
        cart.add(&product(1, "Watch", 1000, "https://img.test/1.jpg"));
        let mut request = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap();
        assert_eq!(request.amount_minor_units(), Some(1000));

        request.line_items.push(item);
        assert_eq!(request.amount_minor_units(), None);
    }

    #[test]
    fn blank_name_is_malformed() {
        let mut cart = CartEngine::new();
        cart.add(&product(4, "  ", 1000, "https://img.test/4.jpg"));
        let err = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedLine { reason: "name is blank", .. }));
    }

    #[test]
    fn repricing_uses_authoritative_price() {
        let catalog = Catalog::fixture();
        // Same id as the fixture watch, but a tampered client-side price.
        let tampered = product(1, "Modern Minimalist Watch", 1, "https://img.test/w.jpg");
        let mut cart = CartEngine::new();
        cart.add(&tampered);

        let request =
            CheckoutRequest::from_snapshot_repriced(&cart.snapshot(), &config(), &catalog)
                .unwrap();
        assert_eq!(request.line_items[0].unit_amount_minor_units, 19999);
    }

    #[test]
    fn repricing_rejects_unknown_products() {
        let catalog = Catalog::fixture();
        let mut cart = CartEngine::new();
        cart.add(&product(77, "Ghost", 500, "https://img.test/g.jpg"));

        let err = CheckoutRequest::from_snapshot_repriced(&cart.snapshot(), &config(), &catalog)
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedLine { product_id, .. } if product_id == ProductId::new(77)));
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let mut cart = CartEngine::new();
        cart.add(&product(1, "Watch", 19999, "https://img.test/1.jpg"));
        let request = CheckoutRequest::from_snapshot(&cart.snapshot(), &config()).unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mode"], "payment");
        assert_eq!(json["lineItems"][0]["unitAmountMinorUnits"], 19999);
        assert_eq!(json["lineItems"][0]["productName"], "Watch");
        assert_eq!(json["lineItems"][0]["productImages"][0], "https://img.test/1.jpg");
        assert_eq!(json["lineItems"][0]["currency"], "usd");
        assert_eq!(json["successUrl"], "https://shop.test/success");
    }
}
