//! Kikuubo Checkout - the cart-to-order conversion flow.
//!
//! This crate owns everything between a filled cart and a confirmed
//! order: field validation, the step state machine, order and payment
//! submission against the REST backend, and asynchronous payment-status
//! polling for mobile money.
//!
//! # Architecture
//!
//! - [`validate`] - Pure field validators and the aggregate submission
//!   check (collects all issues, never fail-fast)
//! - [`session`] - `CheckoutSession`, the step state machine that owns
//!   all form data and sequences order-then-payment submission
//! - [`poller`] - `PaymentPoller`, a cancellable background task that
//!   watches a mobile money payment until it reaches a terminal status
//! - [`api`] - The REST client and the `PaymentGateway` trait that
//!   fronts it for testability
//! - [`cart`] - The shared cart handle; checkout reads it and clears it
//!   exactly once, after both submission calls succeed
//! - [`confirmation`] - Inputs for the confirmation view
//!
//! Data flows one direction: form input → validators → order/payment
//! payloads → gateway → (order, payment) → poller → status updates.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod models;
pub mod poller;
pub mod session;
pub mod validate;

pub use api::{ApiClient, ApiError, PaymentGateway};
pub use cart::{Cart, CartLine, SharedCart};
pub use config::{CheckoutConfig, ConfigError};
pub use confirmation::ConfirmationSummary;
pub use error::CheckoutError;
pub use models::{AddressInfo, CustomerInfo, PaymentSelection};
pub use poller::{PaymentPoller, PollerConfig};
pub use session::{CheckoutSession, CheckoutStep};
pub use validate::{PhoneProbe, ValidationIssue};
