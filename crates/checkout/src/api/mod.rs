//! REST backend access: the `PaymentGateway` trait and its HTTP client.
//!
//! The checkout state machine and the poller only ever talk to
//! [`PaymentGateway`], so flows are testable against in-memory stubs;
//! [`ApiClient`] is the production implementation.

pub mod client;
pub mod types;

pub use client::ApiClient;

use async_trait::async_trait;
use kikuubo_core::PaymentId;
use thiserror::Error;

use types::{
    CheckPhoneRequest, CheckPhoneResponse, CreateOrderRequest, CreatePaymentRequest, Order,
    Payment, PaymentMethodInfo, PaymentStatusUpdate,
};

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (transport-level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The message to put in front of the user.
    ///
    /// Business rejections are surfaced verbatim; transport and parse
    /// failures collapse into a generic retry prompt, since the UI
    /// contract does not distinguish them.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => "Something went wrong, please try again".to_owned(),
        }
    }
}

/// Operations the checkout flow needs from the commerce backend.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `GET /payments/methods/` - available payment methods with their
    /// amount windows and fees.
    async fn payment_methods(&self) -> Result<Vec<PaymentMethodInfo>, ApiError>;

    /// `POST /orders/` - create the order.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError>;

    /// Initiate a payment against the method-specific endpoint.
    async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<Payment, ApiError>;

    /// `POST /payments/{id}/verify/` - refresh payment status. The
    /// poller's sole dependency.
    async fn verify_payment(&self, id: PaymentId) -> Result<PaymentStatusUpdate, ApiError>;

    /// `POST /payments/{id}/cancel/` - cancel a pending or processing
    /// payment. Not available for cash on delivery.
    async fn cancel_payment(&self, id: PaymentId) -> Result<PaymentStatusUpdate, ApiError>;

    /// `POST /payments/check-phone/` - best-effort carrier phone check.
    async fn check_phone(&self, request: &CheckPhoneRequest)
    -> Result<CheckPhoneResponse, ApiError>;
}
