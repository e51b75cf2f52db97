//! Payment-gateway provider plugins for a host billing framework.
//!
//! This crate adapts two external payment networks to one
//! [`Provider`](provider::Provider) contract: build a form to collect or
//! redirect for payment, then capture, release, or refund a previously
//! authorized charge and record the raw remote response on the payment.
//!
//! # Overview
//!
//! The host framework owns the payment record (status, total, transaction
//! id, attrs audit store) and hands it in through the
//! [`Payment`](payment::Payment) trait. A provider translates that record
//! into remote API calls and translates the responses back into status
//! changes and stored attrs. Every operation is one synchronous
//! request/response exchange: no retries, no background tasks, no shared
//! state across payments.
//!
//! # Providers
//!
//! - [`CardChargeProvider`](charge::CardChargeProvider) — the host site
//!   collects raw card data; capture, release, and refund run against the
//!   charge network's API using the stored transaction id.
//! - [`TokenCollectingProvider`](token::TokenCollectingProvider) — card data
//!   is tokenized client-side through the network's hosted modal; the
//!   provider pays a server-side receipt with the verified token.
//!
//! # Modules
//!
//! - [`payment`] — payment status lifecycle and the host-framework record trait.
//! - [`amount`] — lossless major-unit / minor-unit conversion.
//! - [`config`] — provider configuration with a redacting secret key.
//! - [`error`] — the terminal [`PaymentError`](error::PaymentError) taxonomy.
//! - [`form`] — submission data and the [`FormOutcome`](form::FormOutcome)
//!   tagged result of a form step.
//! - [`provider`] — the provider contract.
//! - [`charge`] — card-charge network provider and client.
//! - [`token`] — tokenization network provider, method whitelist, receipts.

pub mod amount;
pub mod charge;
pub mod config;
pub mod error;
pub mod form;
pub mod payment;
pub mod provider;
pub mod token;

pub use charge::CardChargeProvider;
pub use config::{ProviderConfig, SecretKey};
pub use error::PaymentError;
pub use form::{FormData, FormOutcome};
pub use payment::{Payment, PaymentStatus};
pub use provider::Provider;
pub use token::TokenCollectingProvider;
