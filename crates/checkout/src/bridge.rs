use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use uuid::Uuid;

use storefront_cart::CartSnapshot;

use crate::config::CheckoutConfig;
use crate::error::CheckoutError;
use crate::pricing::PriceLookup;
use crate::provider::{HostedSession, PaymentProvider};
use crate::request::CheckoutRequest;

/// Where to send the shopper after a successful hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub request_id: Uuid,
    pub session: HostedSession,
}

impl Redirect {
    pub fn url(&self) -> &str {
        &self.session.url
    }
}

/// Converts cart snapshots into hosted payment sessions.
///
/// At most one attempt runs at a time; a second call while one is pending is
/// refused with [`CheckoutError::InFlight`] without touching the provider.
pub struct CheckoutBridge<P> {
    config: CheckoutConfig,
    provider: P,
    prices: Option<Arc<dyn PriceLookup>>,
    in_flight: AtomicBool,
}

impl<P> CheckoutBridge<P>
where
    P: PaymentProvider,
{
    pub fn new(config: CheckoutConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            prices: None,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Price line items from `prices` instead of the cart lines.
    pub fn with_price_authority(mut self, prices: Arc<dyn PriceLookup>) -> Self {
        self.prices = Some(prices);
        self
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether the checkout control should be enabled.
    pub fn can_checkout(&self, snapshot: &CartSnapshot) -> bool {
        !snapshot.is_empty() && !self.is_in_flight()
    }

    /// Build (but do not send) the provider request.
    pub fn prepare(&self, snapshot: &CartSnapshot) -> Result<CheckoutRequest, CheckoutError> {
        match &self.prices {
            Some(prices) => {
                CheckoutRequest::from_snapshot_repriced(snapshot, &self.config, &**prices)
            }
            None => CheckoutRequest::from_snapshot(snapshot, &self.config),
        }
    }

    /// Validate, build and submit a request for `snapshot`.
    ///
    /// The snapshot is only read; on failure the caller's cart is untouched
    /// and checkout may simply be retried.
    pub async fn checkout(&self, snapshot: &CartSnapshot) -> Result<Redirect, CheckoutError> {
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let _guard = FlightGuard::acquire(&self.in_flight).ok_or(CheckoutError::InFlight)?;

        let request = self.prepare(snapshot).inspect_err(|e| {
            tracing::warn!(error = %e, "checkout request rejected before submission");
        })?;

        tracing::info!(
            request_id = %request.request_id,
            line_items = request.line_items.len(),
            amount_minor_units = request.amount_minor_units(),
            "submitting checkout request"
        );

        let session = self
            .provider
            .create_session(&request)
            .await
            .inspect_err(|e| {
                tracing::warn!(request_id = %request.request_id, error = %e, "checkout failed");
            })?;

        tracing::info!(
            request_id = %request.request_id,
            session_id = %session.id,
            "redirecting to hosted payment page"
        );

        Ok(Redirect {
            request_id: request.request_id,
            session,
        })
    }
}

/// Holds the in-flight flag; releases it on drop, whatever the exit path.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
