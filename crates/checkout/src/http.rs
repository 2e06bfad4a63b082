//! HTTP client for a hosted-checkout session endpoint.

use async_trait::async_trait;

use crate::config::CheckoutConfig;
use crate::error::ProviderError;
use crate::provider::{HostedSession, PaymentProvider};
use crate::request::CheckoutRequest;

/// Creates hosted sessions by POSTing the request as JSON.
///
/// The configured credential is sent as a bearer token; the endpoint must
/// answer with `{"id": ..., "url": ...}`.
#[derive(Debug, Clone)]
pub struct HttpPaymentProvider {
    client: reqwest::Client,
    endpoint: String,
    payment_key: String,
}

impl HttpPaymentProvider {
    /// The credential is already validated non-blank by [`CheckoutConfig`].
    pub fn new(config: &CheckoutConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Initialization(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            payment_key: config.payment_key().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<HostedSession, ProviderError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.payment_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let session: HostedSession =
            serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;
        if session.url.trim().is_empty() {
            return Err(ProviderError::Parse("hosted session has no url".to_string()));
        }

        tracing::debug!(session_id = %session.id, "hosted session created");
        Ok(session)
    }
}
