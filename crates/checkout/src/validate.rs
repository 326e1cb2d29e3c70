//! Pure field validators and the aggregate submission check.
//!
//! Every validator is a pure function from input to an optional
//! [`ValidationIssue`]; no side effects, no network. The one exception is
//! [`probe_phone`], a best-effort carrier lookup that augments - never
//! replaces - the offline rules, and degrades to a warning on failure.
//!
//! The aggregate [`validate_submission`] runs customer, address, and
//! payment-method validators in order and collects ALL issues rather than
//! failing fast, so the form can mark every offending field at once.

use kikuubo_core::{District, Email, MobileMoneyProvider, PhoneNumber};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::types::CheckPhoneRequest;
use crate::api::PaymentGateway;
use crate::models::{AddressInfo, CustomerInfo, PaymentSelection};

/// Maximum length of free-text delivery notes.
pub const MAX_DELIVERY_NOTES: usize = 500;

/// A single field validation failure, surfaced beside the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Machine name of the offending field.
    pub field: &'static str,
    /// User-facing message.
    pub message: String,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// =============================================================================
// Field validators
// =============================================================================

/// Validate a name field: non-empty and at least 2 characters after trim.
#[must_use]
pub fn validate_name(field: &'static str, label: &str, value: &str) -> Option<ValidationIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ValidationIssue::new(field, format!("{label} is required")));
    }
    if trimmed.chars().count() < 2 {
        return Some(ValidationIssue::new(
            field,
            format!("{label} must be at least 2 characters"),
        ));
    }
    None
}

/// Validate an email address.
#[must_use]
pub fn validate_email(value: &str) -> Option<ValidationIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ValidationIssue::new("email", "Email is required"));
    }
    match Email::parse(trimmed) {
        Ok(_) => None,
        Err(_) => Some(ValidationIssue::new("email", "Enter a valid email address")),
    }
}

/// Validate a generic Ugandan phone number.
#[must_use]
pub fn validate_phone(field: &'static str, label: &str, value: &str) -> Option<ValidationIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ValidationIssue::new(field, format!("{label} is required")));
    }
    match PhoneNumber::parse(trimmed) {
        Ok(_) => None,
        Err(_) => Some(ValidationIssue::new(
            field,
            "Enter a valid Ugandan phone number",
        )),
    }
}

/// Validate a mobile money phone number: the generic Ugandan rule PLUS
/// membership in the provider's operator prefix set.
#[must_use]
pub fn validate_mobile_money_phone(
    provider: MobileMoneyProvider,
    value: &str,
) -> Option<ValidationIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ValidationIssue::new(
            "phone_number",
            format!("{} phone number is required", provider.short_name()),
        ));
    }
    let Ok(phone) = PhoneNumber::parse(trimmed) else {
        return Some(ValidationIssue::new(
            "phone_number",
            "Enter a valid Ugandan phone number",
        ));
    };
    if !provider.owns_prefix(&phone.local_prefix()) {
        return Some(ValidationIssue::new(
            "phone_number",
            format!(
                "Enter a valid {} phone number ({})",
                provider.short_name(),
                provider.prefixes().join(", ")
            ),
        ));
    }
    None
}

/// Validate a district against the fixed Ugandan district list.
#[must_use]
pub fn validate_district(value: &str) -> Option<ValidationIssue> {
    match District::parse(value) {
        Ok(_) => None,
        Err(err) => Some(ValidationIssue::new("district", err.to_string())),
    }
}

/// Validate the first address line: required, at least 5 characters.
#[must_use]
pub fn validate_address_line_1(value: &str) -> Option<ValidationIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ValidationIssue::new("address_line_1", "Address is required"));
    }
    if trimmed.chars().count() < 5 {
        return Some(ValidationIssue::new(
            "address_line_1",
            "Address must be at least 5 characters",
        ));
    }
    None
}

/// Validate an optional postal code: exactly 5 digits when present.
#[must_use]
pub fn validate_postal_code(value: Option<&str>) -> Option<ValidationIssue> {
    let trimmed = value.map(str::trim).filter(|s| !s.is_empty())?;
    if trimmed.len() != 5 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(ValidationIssue::new(
            "postal_code",
            "Postal code must be 5 digits",
        ));
    }
    None
}

/// Validate optional delivery notes: at most 500 characters.
#[must_use]
pub fn validate_delivery_notes(value: Option<&str>) -> Option<ValidationIssue> {
    let notes = value?;
    if notes.chars().count() > MAX_DELIVERY_NOTES {
        return Some(ValidationIssue::new(
            "delivery_notes",
            format!("Delivery notes must be at most {MAX_DELIVERY_NOTES} characters"),
        ));
    }
    None
}

// =============================================================================
// Group validators
// =============================================================================

/// Validate the customer information form.
#[must_use]
pub fn validate_customer(customer: &CustomerInfo) -> Vec<ValidationIssue> {
    [
        validate_name("first_name", "First name", &customer.first_name),
        validate_name("last_name", "Last name", &customer.last_name),
        validate_email(&customer.email),
        validate_phone("phone", "Phone number", &customer.phone),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Validate the delivery address form.
#[must_use]
pub fn validate_address(address: &AddressInfo) -> Vec<ValidationIssue> {
    [
        validate_address_line_1(&address.address_line_1),
        validate_name("city", "City", &address.city),
        validate_district(&address.district),
        validate_postal_code(address.postal_code.as_deref()),
        validate_delivery_notes(address.delivery_notes.as_deref()),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Validate the method-specific payment fields for the active variant.
#[must_use]
pub fn validate_payment(selection: &PaymentSelection) -> Vec<ValidationIssue> {
    match selection {
        PaymentSelection::MobileMoney {
            provider,
            phone_number,
            customer_name,
        } => [
            validate_mobile_money_phone(*provider, phone_number),
            validate_name("customer_name", "Account name", customer_name),
        ]
        .into_iter()
        .flatten()
        .collect(),
        PaymentSelection::CashOnDelivery {
            delivery_address,
            delivery_phone,
            delivery_notes,
        } => {
            let mut issues = Vec::new();
            if delivery_address.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    "delivery_address",
                    "Delivery address is required",
                ));
            }
            if let Some(issue) =
                validate_phone("delivery_phone", "Delivery phone number", delivery_phone)
            {
                issues.push(issue);
            }
            if let Some(issue) = validate_delivery_notes(delivery_notes.as_deref()) {
                issues.push(issue);
            }
            issues
        }
    }
}

/// Aggregate validation for order submission.
///
/// Runs customer, address, and payment validators in that order and
/// collects every issue. Submission is blocked while the result is
/// non-empty.
#[must_use]
pub fn validate_submission(
    customer: &CustomerInfo,
    address: &AddressInfo,
    selection: &PaymentSelection,
) -> Vec<ValidationIssue> {
    let mut issues = validate_customer(customer);
    issues.extend(validate_address(address));
    issues.extend(validate_payment(selection));
    issues
}

// =============================================================================
// Network-backed phone probe (soft)
// =============================================================================

/// Outcome of the best-effort carrier phone check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneProbe {
    /// The backend confirmed the number.
    Valid,
    /// The backend reported the number invalid. Still only a warning;
    /// the offline rules decide whether submission is blocked.
    Invalid { message: String },
    /// The probe itself failed; degrade to a warning.
    Unavailable { message: String },
}

impl PhoneProbe {
    /// Probes never block submission.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        false
    }
}

/// Ask the backend whether a phone number looks live for a payment
/// method (e.g. a carrier lookup).
///
/// This augments the offline regex/prefix validation; any failure of the
/// probe degrades to [`PhoneProbe::Unavailable`].
pub async fn probe_phone(
    gateway: &dyn PaymentGateway,
    phone_number: &str,
    payment_method: &str,
) -> PhoneProbe {
    let request = CheckPhoneRequest {
        phone_number: phone_number.to_owned(),
        payment_method: payment_method.to_owned(),
    };
    match gateway.check_phone(&request).await {
        Ok(response) if response.valid => PhoneProbe::Valid,
        Ok(response) => PhoneProbe::Invalid {
            message: response
                .message
                .unwrap_or_else(|| "This phone number could not be verified".to_owned()),
        },
        Err(err) => {
            warn!(error = %err, %payment_method, "phone probe failed, continuing without it");
            PhoneProbe::Unavailable {
                message: "Phone verification is temporarily unavailable".to_owned(),
            }
        }
    }
}
