use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::request::CheckoutRequest;

/// A hosted payment session created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedSession {
    pub id: String,
    /// Hosted payment page the shopper is sent to.
    pub url: String,
}

/// Outbound boundary to the payment provider.
///
/// One call per checkout attempt. No retries and no cancellation: a call
/// either yields a hosted session or a failure.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<HostedSession, ProviderError>;
}

#[async_trait]
impl<P> PaymentProvider for Arc<P>
where
    P: PaymentProvider + ?Sized,
{
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<HostedSession, ProviderError> {
        (**self).create_session(request).await
    }
}
