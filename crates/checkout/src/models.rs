//! Checkout form data.
//!
//! These are the client-owned aggregates collected across the checkout
//! steps. Fields are raw strings as entered; the validators in
//! [`crate::validate`] decide what is acceptable and the payload builders
//! in [`crate::api::types`] normalize on the way out.

use kikuubo_core::MobileMoneyProvider;
use serde::{Deserialize, Serialize};

/// Customer contact details, collected in step 1.
///
/// Immutable once the order is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Delivery address, collected in step 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AddressInfo {
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub district: String,
    pub postal_code: Option<String>,
    pub delivery_notes: Option<String>,
}

/// The selected payment method with its method-specific fields.
///
/// Exactly one variant is active; validation rules and the submission
/// payload depend entirely on that variant, and payload construction
/// pattern-matches exhaustively so cash-on-delivery fields can never ride
/// along with a mobile money submission (or vice versa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentSelection {
    /// Carrier-operated payment rail; the customer authorizes the debit
    /// via a PIN prompt on their handset, so status converges
    /// asynchronously.
    MobileMoney {
        provider: MobileMoneyProvider,
        phone_number: String,
        customer_name: String,
    },
    /// Cash collected at delivery time; no asynchronous verification.
    CashOnDelivery {
        delivery_address: String,
        delivery_phone: String,
        delivery_notes: Option<String>,
    },
}

impl PaymentSelection {
    /// Wire name of the selected method, as the backend knows it.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::MobileMoney { provider, .. } => provider.wire_name(),
            Self::CashOnDelivery { .. } => "cash_on_delivery",
        }
    }

    /// Human-readable method name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::MobileMoney { provider, .. } => provider.display_name(),
            Self::CashOnDelivery { .. } => "Cash on Delivery",
        }
    }

    /// Whether payment status converges asynchronously after initiation.
    ///
    /// Only asynchronous methods are ever polled.
    #[must_use]
    pub const fn is_asynchronous(&self) -> bool {
        matches!(self, Self::MobileMoney { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let mtn = PaymentSelection::MobileMoney {
            provider: MobileMoneyProvider::Mtn,
            phone_number: "0771234567".to_owned(),
            customer_name: "Jane Doe".to_owned(),
        };
        assert_eq!(mtn.wire_name(), "mtn_momo");
        assert!(mtn.is_asynchronous());

        let airtel = PaymentSelection::MobileMoney {
            provider: MobileMoneyProvider::Airtel,
            phone_number: "0701234567".to_owned(),
            customer_name: "Jane Doe".to_owned(),
        };
        assert_eq!(airtel.wire_name(), "airtel_money");

        let cod = PaymentSelection::CashOnDelivery {
            delivery_address: "123 Main St".to_owned(),
            delivery_phone: "0700123456".to_owned(),
            delivery_notes: None,
        };
        assert_eq!(cod.wire_name(), "cash_on_delivery");
        assert!(!cod.is_asynchronous());
    }

    #[test]
    fn test_selection_serde_tag() {
        let cod = PaymentSelection::CashOnDelivery {
            delivery_address: "123 Main St".to_owned(),
            delivery_phone: "0700123456".to_owned(),
            delivery_notes: None,
        };
        let json = serde_json::to_value(&cod).unwrap();
        assert_eq!(json["method"], "cash_on_delivery");
    }
}
