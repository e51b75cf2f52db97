//! Error taxonomy for provider operations.
//!
//! A [`PaymentError`] is terminal and user-visible: the host framework is
//! expected to surface it as a failed transaction. Nothing in this crate
//! retries; remote failures are either mapped to a terminal variant here or
//! passed through transparently.

use rust_decimal::Decimal;

use crate::amount::AmountError;
use crate::charge::ChargeError;
use crate::payment::PaymentStatus;
use crate::token::ReceiptError;

/// Terminal failure of a financial operation.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The remote network reports the charge in a state that no longer
    /// admits capture. The message is part of the contract with the host
    /// framework.
    #[error("Payment already refunded")]
    AlreadyRefunded,
    /// Capture, release, and refund need the network-issued identifier from
    /// the form step.
    #[error("Payment has no transaction id")]
    MissingTransactionId,
    /// A form was requested for a payment past the input phase.
    #[error("Payment in status {status} does not accept input")]
    InvalidStatus { status: PaymentStatus },
    /// A partial capture or refund may not exceed the payment total.
    #[error("Requested amount {requested} exceeds payment total {total}")]
    AmountTooLarge { requested: Decimal, total: Decimal },
    /// A client-origin call named a method reserved for server-side use.
    #[error("Method {method} is not callable from the client")]
    MethodNotAllowed { method: String },
    /// The provider does not implement this operation.
    #[error("Operation {operation} is not supported by this provider")]
    NotSupported { operation: &'static str },
    /// Major-to-minor unit conversion failed.
    #[error(transparent)]
    Amount(#[from] AmountError),
    /// Charge-network API failure.
    #[error(transparent)]
    Charge(#[from] ChargeError),
    /// Tokenization-network API failure.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_refunded_message_is_stable() {
        assert_eq!(
            PaymentError::AlreadyRefunded.to_string(),
            "Payment already refunded"
        );
    }
}
