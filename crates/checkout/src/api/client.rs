//! HTTP client for the commerce REST backend.

use async_trait::async_trait;
use kikuubo_core::PaymentId;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::CheckoutConfig;

use super::types::{
    CheckPhoneRequest, CheckPhoneResponse, CreateOrderRequest, CreatePaymentRequest, Order,
    Payment, PaymentMethodInfo, PaymentStatusUpdate,
};
use super::{ApiError, PaymentGateway};

/// REST client for the commerce backend.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the configured
    /// token is not a valid header value.
    pub fn new(config: &CheckoutConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let auth_value = format!("Bearer {}", token.expose_secret());
            let mut value = HeaderValue::from_str(&auth_value)
                .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert("Authorization", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The initiation endpoint for a payment method wire name.
    fn initiate_path(payment_method: &str) -> &'static str {
        match payment_method {
            "mtn_momo" => "/payments/mtn/initiate/",
            "airtel_money" => "/payments/airtel/initiate/",
            "cash_on_delivery" => "/payments/cod/create/",
            _ => "/payments/create/",
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a response, mapping non-2xx statuses to [`ApiError::Api`].
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(&message),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend usually answers `{"error": "..."}` or `{"detail": "..."}`;
/// anything else is passed through as-is.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
                return message.to_owned();
            }
        }
    }
    body.to_owned()
}

#[async_trait]
impl PaymentGateway for ApiClient {
    #[instrument(skip(self))]
    async fn payment_methods(&self) -> Result<Vec<PaymentMethodInfo>, ApiError> {
        let response = self
            .client
            .get(self.url("/payments/methods/"))
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, request), fields(payment_method = %request.payment_method))]
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let response = self
            .client
            .post(self.url("/orders/"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(
        skip(self, request),
        fields(order_id = %request.order_id, payment_method = %request.payment_method)
    )]
    async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<Payment, ApiError> {
        let path = Self::initiate_path(&request.payment_method);
        let response = self.client.post(self.url(path)).json(request).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn verify_payment(&self, id: PaymentId) -> Result<PaymentStatusUpdate, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/payments/{id}/verify/")))
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn cancel_payment(&self, id: PaymentId) -> Result<PaymentStatusUpdate, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/payments/{id}/cancel/")))
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, request), fields(payment_method = %request.payment_method))]
    async fn check_phone(
        &self,
        request: &CheckPhoneRequest,
    ) -> Result<CheckPhoneResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/payments/check-phone/"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }
}
