//! Inputs for the order confirmation view.
//!
//! The confirmation page renders from a snapshot of the session taken
//! after a successful submission, plus whatever the status poller (or a
//! manual refresh) reports afterwards. The snapshot is plain data; the
//! page folds each payment update into it with [`ConfirmationSummary::apply_payment`].

use kikuubo_core::{Money, PaymentStatus};
use serde::{Deserialize, Serialize};

use crate::api::types::{OrderItem, Payment};
use crate::session::{CheckoutSession, CheckoutStep};

/// Everything the confirmation page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationSummary {
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub flash_sale_savings: Money,
    pub tax_amount: Money,
    pub delivery_fee: Money,
    pub total_amount: Money,
    /// Human-readable payment method name, e.g. "MTN Mobile Money".
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub reference_number: Option<String>,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
}

impl ConfirmationSummary {
    /// Snapshot the confirmation view from a session.
    ///
    /// Returns `None` unless the session has reached the confirmation
    /// step with both an order and a payment.
    #[must_use]
    pub fn from_session(session: &CheckoutSession) -> Option<Self> {
        if session.step() != CheckoutStep::Confirmation {
            return None;
        }
        let order = session.order()?;
        let payment = session.payment()?;
        let selection = session.payment_selection()?;
        Some(Self {
            order_number: order.order_number.clone(),
            items: order.items.clone(),
            subtotal: order.subtotal,
            discount_amount: order.discount_amount,
            flash_sale_savings: order.flash_sale_savings,
            tax_amount: order.tax_amount,
            delivery_fee: order.delivery_fee,
            total_amount: order.total_amount,
            payment_method: selection.display_name().to_owned(),
            payment_status: payment.status,
            reference_number: payment.reference_number.clone(),
            transaction_id: payment.transaction_id.clone(),
            failure_reason: payment.failure_reason.clone(),
        })
    }

    /// Fold a payment record published by the poller (or fetched by a
    /// manual refresh) into the view.
    pub fn apply_payment(&mut self, payment: &Payment) {
        self.payment_status = payment.status;
        if payment.transaction_id.is_some() {
            self.transaction_id.clone_from(&payment.transaction_id);
        }
        if payment.failure_reason.is_some() {
            self.failure_reason.clone_from(&payment.failure_reason);
        }
    }

    /// The headline shown above the order details.
    #[must_use]
    pub const fn status_headline(&self) -> &'static str {
        match self.payment_status {
            PaymentStatus::Pending => "Waiting for payment approval",
            PaymentStatus::Processing => "Payment is being processed",
            PaymentStatus::Completed => "Payment received",
            PaymentStatus::Failed => "Payment failed",
            PaymentStatus::Cancelled => "Payment cancelled",
        }
    }

    /// Whether the payment has reached a state the page no longer needs
    /// to watch.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.payment_status.is_terminal()
    }

    /// Sum of everything deducted from the subtotal.
    #[must_use]
    pub fn total_savings(&self) -> Money {
        self.discount_amount + self.flash_sale_savings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use kikuubo_core::{MobileMoneyProvider, OrderId, OrderStatus, PaymentId, ProductId};

    use super::*;
    use crate::api::types::{
        CheckPhoneRequest, CheckPhoneResponse, CreateOrderRequest, CreatePaymentRequest, Order,
        PaymentMethodInfo, PaymentStatusUpdate,
    };
    use crate::api::{ApiError, PaymentGateway};
    use crate::cart::{Cart, CartLine, shared};
    use crate::models::{AddressInfo, CustomerInfo, PaymentSelection};

    struct HappyGateway {
        order_calls: AtomicUsize,
    }

    #[async_trait]
    impl PaymentGateway for HappyGateway {
        async fn payment_methods(&self) -> Result<Vec<PaymentMethodInfo>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_order(&self, _request: &CreateOrderRequest) -> Result<Order, ApiError> {
            self.order_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Order {
                id: OrderId::new(11),
                order_number: "KKB-0011".to_owned(),
                items: vec![OrderItem {
                    product_id: ProductId::new(1),
                    product_name: "Bar soap".to_owned(),
                    quantity: 2,
                    unit_price: Money::from_shillings(3_500),
                    line_total: Money::from_shillings(7_000),
                }],
                subtotal: Money::from_shillings(7_000),
                discount_amount: Money::from_shillings(500),
                flash_sale_savings: Money::from_shillings(700),
                tax_amount: Money::ZERO,
                delivery_fee: Money::from_shillings(2_000),
                total_amount: Money::from_shillings(7_800),
                status: OrderStatus::Pending,
                created_at: None,
            })
        }

        async fn create_payment(
            &self,
            request: &CreatePaymentRequest,
        ) -> Result<Payment, ApiError> {
            Ok(Payment {
                id: PaymentId::new(21),
                order_id: request.order_id,
                payment_method: request.payment_method.clone(),
                status: PaymentStatus::Pending,
                reference_number: Some("REF-21".to_owned()),
                transaction_id: None,
                amount: Money::from_shillings(7_800),
                failure_reason: None,
                created_at: None,
            })
        }

        async fn verify_payment(&self, _id: PaymentId) -> Result<PaymentStatusUpdate, ApiError> {
            Ok(PaymentStatusUpdate {
                status: PaymentStatus::Completed,
                transaction_id: Some("TXN-9".to_owned()),
                failure_reason: None,
            })
        }

        async fn cancel_payment(&self, _id: PaymentId) -> Result<PaymentStatusUpdate, ApiError> {
            Ok(PaymentStatusUpdate {
                status: PaymentStatus::Cancelled,
                transaction_id: None,
                failure_reason: None,
            })
        }

        async fn check_phone(
            &self,
            _request: &CheckPhoneRequest,
        ) -> Result<CheckPhoneResponse, ApiError> {
            Ok(CheckPhoneResponse {
                valid: true,
                message: None,
            })
        }
    }

    async fn confirmed_session() -> CheckoutSession {
        let mut cart = Cart::new();
        cart.add_line(CartLine {
            product_id: ProductId::new(1),
            title: "Bar soap".to_owned(),
            quantity: 2,
            unit_price: Money::from_shillings(3_500),
        });
        let gateway = HappyGateway {
            order_calls: AtomicUsize::new(0),
        };
        let mut session = CheckoutSession::begin(shared(cart)).unwrap();
        session
            .submit_customer_info(
                CustomerInfo {
                    first_name: "Jane".to_owned(),
                    last_name: "Doe".to_owned(),
                    email: "jane@gmail.com".to_owned(),
                    phone: "0700000000".to_owned(),
                },
                AddressInfo {
                    address_line_1: "123 Main St".to_owned(),
                    city: "Kampala".to_owned(),
                    district: "Kampala".to_owned(),
                    ..AddressInfo::default()
                },
            )
            .unwrap();
        session
            .submit_payment(
                &gateway,
                PaymentSelection::MobileMoney {
                    provider: MobileMoneyProvider::Mtn,
                    phone_number: "0771234567".to_owned(),
                    customer_name: "Jane Doe".to_owned(),
                },
            )
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_snapshot_requires_confirmation_step() {
        let mut cart = Cart::new();
        cart.add_line(CartLine {
            product_id: ProductId::new(1),
            title: "Bar soap".to_owned(),
            quantity: 1,
            unit_price: Money::from_shillings(3_500),
        });
        let session = CheckoutSession::begin(shared(cart)).unwrap();
        assert!(ConfirmationSummary::from_session(&session).is_none());
    }

    #[tokio::test]
    async fn test_snapshot_carries_order_and_payment_details() {
        let session = confirmed_session().await;
        let summary = ConfirmationSummary::from_session(&session).unwrap();

        assert_eq!(summary.order_number, "KKB-0011");
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.total_amount, Money::from_shillings(7_800));
        assert_eq!(summary.payment_method, "MTN Mobile Money");
        assert_eq!(summary.payment_status, PaymentStatus::Pending);
        assert_eq!(summary.reference_number.as_deref(), Some("REF-21"));
        assert_eq!(summary.total_savings(), Money::from_shillings(1_200));
        assert_eq!(summary.status_headline(), "Waiting for payment approval");
        assert!(!summary.is_settled());
    }

    #[tokio::test]
    async fn test_apply_payment_updates_status_fields() {
        let session = confirmed_session().await;
        let mut summary = ConfirmationSummary::from_session(&session).unwrap();

        let mut updated = session.payment().unwrap().clone();
        updated.status = PaymentStatus::Completed;
        updated.transaction_id = Some("TXN-9".to_owned());
        summary.apply_payment(&updated);

        assert_eq!(summary.payment_status, PaymentStatus::Completed);
        assert_eq!(summary.transaction_id.as_deref(), Some("TXN-9"));
        assert_eq!(summary.status_headline(), "Payment received");
        assert!(summary.is_settled());
    }
}
