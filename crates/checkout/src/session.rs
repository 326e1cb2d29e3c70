//! The checkout session state machine.
//!
//! Steps progress strictly `CustomerInfo -> Payment -> Confirmation`.
//! The [`CheckoutStep`] enum is the single source of truth for progress;
//! step eligibility is always computed from it, never re-derived from
//! other flags. Backward navigation to a visited step is always allowed;
//! forward movement only happens through a validated submission.
//!
//! Submission is sequenced: order creation must succeed strictly before
//! payment initiation starts. If payment initiation fails, the order
//! already exists server-side; the session keeps its id and a retry
//! re-invokes payment creation only. The cart is cleared exactly once,
//! after BOTH calls succeed.

use std::sync::Arc;

use kikuubo_core::PaymentStatus;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::types::{
    CreateOrderRequest, CreatePaymentRequest, Order, OrderItemInput, Payment, PaymentMethodInfo,
};
use crate::api::{ApiError, PaymentGateway};
use crate::cart::{self, SharedCart};
use crate::error::CheckoutError;
use crate::models::{AddressInfo, CustomerInfo, PaymentSelection};
use crate::poller::{PaymentPoller, PollerConfig};
use crate::validate::{validate_address, validate_customer, validate_submission, ValidationIssue};

/// The checkout steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    CustomerInfo,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// Position in the linear step sequence.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::CustomerInfo => 0,
            Self::Payment => 1,
            Self::Confirmation => 2,
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CustomerInfo => "customer information",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        };
        write!(f, "{s}")
    }
}

/// One attempt to convert a cart into an order.
///
/// Client-owned and transient: created when checkout begins with a
/// non-empty cart, dropped when the flow ends or the user navigates
/// away. Exactly one session exists per user at a time.
#[derive(Debug)]
pub struct CheckoutSession {
    step: CheckoutStep,
    cart: SharedCart,
    customer: Option<CustomerInfo>,
    address: Option<AddressInfo>,
    selection: Option<PaymentSelection>,
    order: Option<Order>,
    payment: Option<Payment>,
    /// Stable for the whole session; sent with order creation so a
    /// resubmission cannot create a duplicate order.
    idempotency_key: Uuid,
    banner_error: Option<String>,
}

impl CheckoutSession {
    /// Begin checkout over the given cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines;
    /// the caller redirects out of checkout.
    pub fn begin(cart: SharedCart) -> Result<Self, CheckoutError> {
        if cart::with_cart(&cart, |c| c.is_empty()) {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(Self {
            step: CheckoutStep::CustomerInfo,
            cart,
            customer: None,
            address: None,
            selection: None,
            order: None,
            payment: None,
            idempotency_key: Uuid::new_v4(),
            banner_error: None,
        })
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The customer info persisted by step 1, if submitted.
    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    /// The address persisted by step 1, if submitted.
    #[must_use]
    pub const fn address(&self) -> Option<&AddressInfo> {
        self.address.as_ref()
    }

    /// The active payment selection, once payment has been submitted.
    #[must_use]
    pub const fn payment_selection(&self) -> Option<&PaymentSelection> {
        self.selection.as_ref()
    }

    /// The created order, once submission succeeded (or partially
    /// succeeded: the order survives a payment-initiation failure).
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// The created payment record.
    #[must_use]
    pub const fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    /// The session's idempotency key.
    #[must_use]
    pub const fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    /// The page-level error banner, if the last submission failed.
    #[must_use]
    pub fn banner_error(&self) -> Option<&str> {
        self.banner_error.as_deref()
    }

    /// Whether the cart backing this session is empty. An empty cart at
    /// any point means the caller must redirect out of checkout.
    #[must_use]
    pub fn cart_is_empty(&self) -> bool {
        cart::with_cart(&self.cart, |c| c.is_empty())
    }

    /// Payment methods selectable for the current cart total.
    #[must_use]
    pub fn selectable_methods(&self, all: &[PaymentMethodInfo]) -> Vec<PaymentMethodInfo> {
        let total = cart::with_cart(&self.cart, |c| c.subtotal());
        all.iter().filter(|m| m.accepts(total)).cloned().collect()
    }

    /// Check that a method's amount window accepts the cart total.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AmountOutOfRange`] when it does not.
    pub fn ensure_method_accepts_total(
        &self,
        method: &PaymentMethodInfo,
    ) -> Result<(), CheckoutError> {
        let total = cart::with_cart(&self.cart, |c| c.subtotal());
        if method.accepts(total) {
            Ok(())
        } else {
            Err(CheckoutError::AmountOutOfRange {
                method: method.display_name.clone(),
                min: method.min_amount,
                max: method.max_amount,
            })
        }
    }

    /// Submit the customer information step.
    ///
    /// On success the data is persisted, the error banner cleared, and
    /// the session advances to the payment step.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongStep`] if not on the customer info step
    /// - [`CheckoutError::EmptyCart`] if the cart emptied out from under
    ///   the session
    /// - [`CheckoutError::Validation`] with every failing field
    pub fn submit_customer_info(
        &mut self,
        customer: CustomerInfo,
        address: AddressInfo,
    ) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::CustomerInfo {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if self.cart_is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut issues = validate_customer(&customer);
        issues.extend(validate_address(&address));
        if !issues.is_empty() {
            return Err(CheckoutError::Validation(issues));
        }

        self.customer = Some(customer);
        self.address = Some(address);
        self.banner_error = None;
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Jump to a previously visited step.
    ///
    /// Revisiting (any step at or before the current one) is always
    /// allowed; skipping ahead is always rejected, leaving the current
    /// step unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::StepNotReachable`] for forward jumps.
    pub fn go_to_step(&mut self, target: CheckoutStep) -> Result<(), CheckoutError> {
        if target.index() > self.step.index() {
            return Err(CheckoutError::StepNotReachable {
                from: self.step,
                to: target,
            });
        }
        self.step = target;
        Ok(())
    }

    /// Move one step back. A no-op on the first step.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Confirmation => CheckoutStep::Payment,
            CheckoutStep::Payment | CheckoutStep::CustomerInfo => CheckoutStep::CustomerInfo,
        };
    }

    /// Submit the payment step: validate everything, create the order,
    /// then initiate the payment.
    ///
    /// The two network calls are strictly sequential. If the order was
    /// already created by an earlier attempt (payment initiation failed),
    /// it is reused rather than re-created. The cart is cleared only
    /// after both calls succeed, at which point the session moves to the
    /// confirmation step.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongStep`] / [`CheckoutError::EmptyCart`] on
    ///   guard failures
    /// - [`CheckoutError::Validation`] with every failing field
    /// - [`CheckoutError::OrderCreation`] when the backend rejects the
    ///   order; nothing was created, the whole submission is retryable
    /// - [`CheckoutError::PaymentInitiation`] when payment setup fails;
    ///   the order exists and the cart is untouched
    #[instrument(skip(self, gateway, selection), fields(method = selection.wire_name()))]
    pub async fn submit_payment(
        &mut self,
        gateway: &dyn PaymentGateway,
        selection: PaymentSelection,
    ) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if self.cart_is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let (Some(customer), Some(address)) = (self.customer.clone(), self.address.clone()) else {
            return Err(CheckoutError::WrongStep(CheckoutStep::CustomerInfo));
        };

        let selection = apply_cod_phone_default(selection, &customer);

        let issues = validate_submission(&customer, &address, &selection);
        if !issues.is_empty() {
            return Err(CheckoutError::Validation(issues));
        }

        if self.order.is_none() {
            let items = self.cart_items();
            let request =
                CreateOrderRequest::build(&customer, &address, &selection, items, self.idempotency_key)
                    .map_err(|message| {
                        CheckoutError::Validation(vec![ValidationIssue::new("phone", message)])
                    })?;
            match gateway.create_order(&request).await {
                Ok(order) => {
                    info!(order_id = %order.id, order_number = %order.order_number, "order created");
                    self.order = Some(order);
                }
                Err(err) => {
                    warn!(error = %err, "order creation failed");
                    let message = err.user_message();
                    self.banner_error = Some(message.clone());
                    return Err(CheckoutError::OrderCreation(message));
                }
            }
        }

        let Some(order) = self.order.as_ref() else {
            // create_order just populated this
            return Err(CheckoutError::WrongStep(self.step));
        };

        let request = CreatePaymentRequest::from_selection(order.id, &selection).map_err(
            |message| CheckoutError::Validation(vec![ValidationIssue::new("phone_number", message)]),
        )?;

        match gateway.create_payment(&request).await {
            Ok(payment) => {
                info!(
                    payment_id = %payment.id,
                    status = %payment.status,
                    "payment initiated"
                );
                self.payment = Some(payment);
                self.selection = Some(selection);
                self.banner_error = None;
                // The single clearing mutation of the shared cart.
                cart::with_cart(&self.cart, cart::Cart::clear);
                self.step = CheckoutStep::Confirmation;
                Ok(())
            }
            Err(err) => {
                // The order stays in the session; a retry reuses its id
                // instead of creating a duplicate.
                warn!(error = %err, order_id = %order.id, "payment initiation failed");
                let message = err.user_message();
                self.banner_error = Some(message.clone());
                Err(CheckoutError::PaymentInitiation(message))
            }
        }
    }

    /// Start polling the payment status, when it makes sense.
    ///
    /// Returns `None` unless the session is on the confirmation step with
    /// an asynchronous payment method and a non-terminal payment status.
    /// Cash on delivery is never polled.
    #[must_use]
    pub fn start_status_poller(
        &self,
        gateway: Arc<dyn PaymentGateway>,
        config: PollerConfig,
    ) -> Option<PaymentPoller> {
        if self.step != CheckoutStep::Confirmation {
            return None;
        }
        let selection = self.selection.as_ref()?;
        if !selection.is_asynchronous() {
            return None;
        }
        let payment = self.payment.clone()?;
        if payment.status.is_terminal() {
            return None;
        }
        Some(PaymentPoller::start(gateway, payment, config))
    }

    /// Manually re-verify the payment status once.
    ///
    /// The affordance for when polling has timed out and the view is
    /// stale.
    ///
    /// # Errors
    ///
    /// Returns the API error; the stored payment is left unchanged.
    pub async fn refresh_payment(
        &mut self,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentStatus, ApiError> {
        let Some(payment) = self.payment.as_mut() else {
            return Err(ApiError::Parse("no payment to refresh".to_owned()));
        };
        let update = gateway.verify_payment(payment.id).await?;
        payment.apply(&update);
        Ok(payment.status)
    }

    /// Cancel a pending or processing payment.
    ///
    /// Not available for cash on delivery.
    ///
    /// # Errors
    ///
    /// Returns the API error when the backend refuses or the method does
    /// not support cancellation.
    pub async fn cancel_payment(
        &mut self,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentStatus, ApiError> {
        let Some(selection) = self.selection.as_ref() else {
            return Err(ApiError::Parse("no payment to cancel".to_owned()));
        };
        if !selection.is_asynchronous() {
            return Err(ApiError::Api {
                status: 400,
                message: "Cash on delivery payments cannot be cancelled".to_owned(),
            });
        }
        let Some(payment) = self.payment.as_mut() else {
            return Err(ApiError::Parse("no payment to cancel".to_owned()));
        };
        let update = gateway.cancel_payment(payment.id).await?;
        payment.apply(&update);
        Ok(payment.status)
    }

    fn cart_items(&self) -> Vec<OrderItemInput> {
        cart::with_cart(&self.cart, |cart| {
            cart.lines()
                .iter()
                .map(|line| OrderItemInput {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect()
        })
    }
}

/// Cash-on-delivery policy: a blank delivery phone falls back to the
/// customer's contact phone.
fn apply_cod_phone_default(
    selection: PaymentSelection,
    customer: &CustomerInfo,
) -> PaymentSelection {
    match selection {
        PaymentSelection::CashOnDelivery {
            delivery_address,
            delivery_phone,
            delivery_notes,
        } if delivery_phone.trim().is_empty() => PaymentSelection::CashOnDelivery {
            delivery_address,
            delivery_phone: customer.phone.clone(),
            delivery_notes,
        },
        other => other,
    }
}
