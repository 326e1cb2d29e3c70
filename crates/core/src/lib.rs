//! Kikuubo Core - Shared domain types.
//!
//! This crate provides common types used across all Kikuubo components:
//! - `checkout` - Checkout flow: validation, submission, payment tracking
//! - `integration-tests` - Cross-crate scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! timers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for phone numbers, emails, districts,
//!   money, type-safe IDs, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
