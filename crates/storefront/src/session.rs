use std::sync::Arc;

use storefront_cart::{CartEngine, CartEvent, CartSnapshot};
use storefront_catalog::Catalog;
use storefront_checkout::{
    CheckoutBridge, CheckoutError, CheckoutNotice, PaymentProvider, ProviderError, Redirect,
    ReturnRoute,
};
use storefront_core::{DomainResult, ProductId};
use storefront_events::{Event, EventBus, InMemoryEventBus, Subscription};

use crate::views::{CartView, CatalogView, ConfirmationPage, ProductCardView};

/// One shopping session.
///
/// Owns the cart engine exclusively; callers mutate it only through the
/// methods below and read it through snapshots and views.
pub struct Storefront<P> {
    catalog: Arc<Catalog>,
    cart: CartEngine,
    checkout: Result<CheckoutBridge<P>, ProviderError>,
    bus: Arc<InMemoryEventBus<CartEvent>>,
    query: String,
}

impl<P> Storefront<P>
where
    P: PaymentProvider,
{
    /// Start a session with an empty cart.
    ///
    /// A failed bridge initialization only disables checkout; browsing and the
    /// cart keep working.
    pub fn new(catalog: Arc<Catalog>, checkout: Result<CheckoutBridge<P>, ProviderError>) -> Self {
        if let Err(e) = &checkout {
            tracing::warn!(error = %e, "checkout unavailable for this session");
        }

        Self {
            catalog,
            cart: CartEngine::new(),
            checkout,
            bus: Arc::new(InMemoryEventBus::new()),
            query: String::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only access to the cart.
    pub fn cart(&self) -> &CartEngine {
        &self.cart
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    /// Receive every cart event from now on.
    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.bus.subscribe()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn catalog_view(&self) -> CatalogView {
        CatalogView {
            query: self.query.clone(),
            products: self
                .catalog
                .search(&self.query)
                .into_iter()
                .map(ProductCardView::from)
                .collect(),
            cart_badge: (!self.cart.is_empty()).then(|| self.cart.len()),
        }
    }

    pub fn cart_view(&self) -> CartView {
        CartView::new(&self.cart.snapshot(), self.can_checkout())
    }

    /// Add one unit of a catalog product.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> DomainResult<CartSnapshot> {
        let product = self.catalog.require(product_id)?;
        let events = self.cart.add(product);
        self.publish(events);
        Ok(self.cart.snapshot())
    }

    pub fn remove_from_cart(&mut self, product_id: ProductId) -> CartSnapshot {
        let events = self.cart.remove(product_id);
        self.publish(events);
        self.cart.snapshot()
    }

    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> CartSnapshot {
        let events = self.cart.set_quantity(product_id, quantity);
        self.publish(events);
        self.cart.snapshot()
    }

    pub fn clear_cart(&mut self) -> CartSnapshot {
        let events = self.cart.clear();
        self.publish(events);
        self.cart.snapshot()
    }

    /// Whether the checkout control is enabled.
    pub fn can_checkout(&self) -> bool {
        match &self.checkout {
            Ok(bridge) => bridge.can_checkout(&self.cart.snapshot()),
            // Still offered; pressing it reports the generic notice.
            Err(_) => !self.cart.is_empty(),
        }
    }

    /// Hand the current cart to the payment provider.
    ///
    /// Any failure is logged and collapsed into the generic notice. The cart
    /// is not modified either way; it is cleared only when the success route
    /// is observed.
    pub async fn checkout(&self) -> Result<Redirect, CheckoutNotice> {
        let result = match &self.checkout {
            Ok(bridge) => bridge.checkout(&self.cart.snapshot()).await,
            Err(e) => Err(CheckoutError::from(e.clone())),
        };

        result.map_err(|e| {
            tracing::error!(error = %e, "checkout failed");
            e.notice()
        })
    }

    /// React to the shopper coming back from the hosted payment page.
    pub fn handle_return(&mut self, route: ReturnRoute) -> ConfirmationPage {
        if route.clears_cart() {
            let events = self.cart.clear();
            self.publish(events);
        }

        tracing::info!(route = route.path(), "returned from payment page");
        ConfirmationPage::for_route(route)
    }

    fn publish(&self, events: Vec<CartEvent>) {
        for event in events {
            tracing::debug!(
                event_type = event.event_type(),
                version = event.version(),
                occurred_at = %event.occurred_at(),
                "publishing cart event"
            );
            if let Err(e) = self.bus.publish(event) {
                tracing::warn!(error = %e, "failed to publish cart event");
            }
        }
    }
}
