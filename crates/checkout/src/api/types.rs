//! Request and response shapes for the commerce REST backend.

use chrono::{DateTime, Utc};
use kikuubo_core::{Money, OrderId, OrderStatus, PaymentId, PaymentStatus, PhoneNumber, ProductId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AddressInfo, CustomerInfo, PaymentSelection};

/// A payment method as advertised by `GET /payments/methods/`.
///
/// Used to gate which payment options are shown: the order total must be
/// within `[min_amount, max_amount]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodInfo {
    pub payment_method: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub min_amount: Money,
    pub max_amount: Money,
    #[serde(default)]
    pub fixed_fee: Money,
}

impl PaymentMethodInfo {
    /// Whether this method accepts the given order total.
    #[must_use]
    pub fn accepts(&self, total: Money) -> bool {
        self.min_amount <= total && total <= self.max_amount
    }
}

/// One cart line in the order creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Normalized to `+256XXXXXXXXX` before submission.
    pub phone: PhoneNumber,
    pub address_line_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    pub city: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
    pub payment_method: String,
    pub items: Vec<OrderItemInput>,
    /// Client-generated key, stable for the lifetime of one checkout
    /// session, so a resubmission cannot create a duplicate order.
    pub idempotency_key: Uuid,
}

impl CreateOrderRequest {
    /// Build the payload from validated step data.
    ///
    /// # Errors
    ///
    /// Returns the phone parse error message if the customer phone does
    /// not normalize; aggregate validation rejects that input first under
    /// normal flow.
    pub fn build(
        customer: &CustomerInfo,
        address: &AddressInfo,
        selection: &PaymentSelection,
        items: Vec<OrderItemInput>,
        idempotency_key: Uuid,
    ) -> Result<Self, String> {
        let phone = PhoneNumber::parse(&customer.phone).map_err(|e| e.to_string())?;
        Ok(Self {
            first_name: customer.first_name.trim().to_owned(),
            last_name: customer.last_name.trim().to_owned(),
            email: customer.email.trim().to_owned(),
            phone,
            address_line_1: address.address_line_1.trim().to_owned(),
            address_line_2: address.address_line_2.clone(),
            city: address.city.trim().to_owned(),
            district: address.district.trim().to_owned(),
            postal_code: address.postal_code.clone(),
            delivery_notes: address.delivery_notes.clone(),
            payment_method: selection.wire_name().to_owned(),
            items,
            idempotency_key,
        })
    }
}

/// A line item on a created order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Money,
    #[serde(default)]
    pub line_total: Money,
}

/// A created order, as returned by `POST /orders/`.
///
/// Server-owned: the client never mutates it, only re-fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default)]
    pub flash_sale_savings: Money,
    #[serde(default)]
    pub tax_amount: Money,
    #[serde(default)]
    pub delivery_fee: Money,
    pub total_amount: Money,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of the payment initiation endpoints.
///
/// Constructed only through [`CreatePaymentRequest::from_selection`],
/// which matches the payment variant exhaustively: a mobile money payload
/// can never carry cash-on-delivery fields, and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: OrderId,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_phone: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
}

impl CreatePaymentRequest {
    /// Build the payload for the active payment variant.
    ///
    /// # Errors
    ///
    /// Returns the phone parse error message if a phone field does not
    /// normalize; aggregate validation rejects that input first under
    /// normal flow.
    pub fn from_selection(
        order_id: OrderId,
        selection: &PaymentSelection,
    ) -> Result<Self, String> {
        match selection {
            PaymentSelection::MobileMoney {
                phone_number,
                customer_name,
                ..
            } => {
                let phone = PhoneNumber::parse(phone_number).map_err(|e| e.to_string())?;
                Ok(Self {
                    order_id,
                    payment_method: selection.wire_name().to_owned(),
                    phone_number: Some(phone),
                    customer_name: Some(customer_name.trim().to_owned()),
                    delivery_address: None,
                    delivery_phone: None,
                    delivery_notes: None,
                })
            }
            PaymentSelection::CashOnDelivery {
                delivery_address,
                delivery_phone,
                delivery_notes,
            } => {
                let phone = PhoneNumber::parse(delivery_phone).map_err(|e| e.to_string())?;
                Ok(Self {
                    order_id,
                    payment_method: selection.wire_name().to_owned(),
                    phone_number: None,
                    customer_name: None,
                    delivery_address: Some(delivery_address.trim().to_owned()),
                    delivery_phone: Some(phone),
                    delivery_notes: delivery_notes.clone(),
                })
            }
        }
    }
}

/// A payment record, as returned by the initiation endpoints.
///
/// Status is the only field that changes server-side over time; the
/// poller refreshes it via [`PaymentStatusUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(alias = "payment_id")]
    pub id: PaymentId,
    pub order_id: OrderId,
    pub payment_method: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub amount: Money,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Fold a verify/cancel response into this record.
    pub fn apply(&mut self, update: &PaymentStatusUpdate) {
        self.status = update.status;
        if update.transaction_id.is_some() {
            self.transaction_id.clone_from(&update.transaction_id);
        }
        if update.failure_reason.is_some() {
            self.failure_reason.clone_from(&update.failure_reason);
        }
    }
}

/// Response of `POST /payments/{id}/verify/` and `/cancel/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Body of `POST /payments/check-phone/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPhoneRequest {
    pub phone_number: String,
    pub payment_method: String,
}

/// Response of `POST /payments/check-phone/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPhoneResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}
