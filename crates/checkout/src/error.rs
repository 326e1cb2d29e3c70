//! Checkout error taxonomy.
//!
//! Every remote failure is caught at its call site and carried here as a
//! user-facing message; nothing below this type is allowed to reach the
//! rendering layer uncaught.

use thiserror::Error;

use crate::session::CheckoutStep;
use crate::validate::ValidationIssue;

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more fields failed validation. Shown beside the offending
    /// fields; submission is blocked while any issue remains.
    #[error("{}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Checkout requires a non-empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Attempted to skip ahead in the step sequence.
    #[error("Cannot move from {from} to {to}")]
    StepNotReachable {
        from: CheckoutStep,
        to: CheckoutStep,
    },

    /// An operation ran on the wrong step.
    #[error("This action is not available on the {0} step")]
    WrongStep(CheckoutStep),

    /// The backend rejected order creation. No order exists; safe to
    /// retry the whole submission.
    #[error("Order could not be created: {0}")]
    OrderCreation(String),

    /// The backend rejected payment initiation. The order already exists
    /// server-side; retrying re-invokes payment creation only.
    #[error("Payment could not be initiated: {0}")]
    PaymentInitiation(String),

    /// The selected payment method does not accept the order total.
    #[error("{method} accepts totals between {min} and {max}")]
    AmountOutOfRange {
        method: String,
        min: kikuubo_core::Money,
        max: kikuubo_core::Money,
    },
}

impl CheckoutError {
    /// The validation issues, when this is a validation error.
    #[must_use]
    pub fn validation_issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
    messages.join("; ")
}
