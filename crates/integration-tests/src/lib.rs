//! Integration tests for the Kikuubo checkout flow.
//!
//! The suites under `tests/` drive the real [`kikuubo_checkout::ApiClient`]
//! against an `httpmock` server, so the full wire shapes (paths, payloads,
//! error bodies) are exercised without a running backend.
//!
//! # Test Categories
//!
//! - `checkout_flow` - End-to-end cart-to-confirmation runs, including
//!   the all-or-nothing failure paths
//! - `payment_status` - Verify, cancel, and polling against mocked
//!   status endpoints
//! - `api_surface` - Method listing, endpoint routing, phone probe, and
//!   error-body extraction
//!
//! Shared fixtures live here so every suite checks out the same cart.

use kikuubo_checkout::cart::{Cart, CartLine, SharedCart, shared};
use kikuubo_checkout::{AddressInfo, ApiClient, CheckoutConfig, CustomerInfo, PaymentSelection};
use kikuubo_core::{MobileMoneyProvider, Money, ProductId};

/// Install a test subscriber so `RUST_LOG=kikuubo_checkout=debug` shows
/// the flow's tracing output. Safe to call from every test; only the
/// first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A two-line cart worth UGX 11,000.
#[must_use]
pub fn sample_cart() -> SharedCart {
    let mut cart = Cart::new();
    cart.add_line(CartLine {
        product_id: ProductId::new(1),
        title: "Bar soap".to_owned(),
        quantity: 2,
        unit_price: Money::from_shillings(3_500),
    });
    cart.add_line(CartLine {
        product_id: ProductId::new(2),
        title: "Sugar 1kg".to_owned(),
        quantity: 1,
        unit_price: Money::from_shillings(4_000),
    });
    shared(cart)
}

/// A customer whose fields pass every validator.
#[must_use]
pub fn sample_customer() -> CustomerInfo {
    CustomerInfo {
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: "jane@gmail.com".to_owned(),
        phone: "0700123456".to_owned(),
    }
}

/// A deliverable Kampala address.
#[must_use]
pub fn sample_address() -> AddressInfo {
    AddressInfo {
        address_line_1: "Plot 14 Kikuubo Lane".to_owned(),
        city: "Kampala".to_owned(),
        district: "Kampala".to_owned(),
        ..AddressInfo::default()
    }
}

/// An MTN mobile money selection with a valid 077 number.
#[must_use]
pub fn mtn_selection() -> PaymentSelection {
    PaymentSelection::MobileMoney {
        provider: MobileMoneyProvider::Mtn,
        phone_number: "0771234567".to_owned(),
        customer_name: "Jane Doe".to_owned(),
    }
}

/// An API client pointed at a mock server base URL.
///
/// # Panics
///
/// Panics if the underlying HTTP client fails to build; fine in tests.
#[must_use]
pub fn client_for(base_url: &str) -> ApiClient {
    let config = CheckoutConfig::for_base_url(base_url.to_owned());
    ApiClient::new(&config).expect("client builds without a token")
}
