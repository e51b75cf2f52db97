//! Payment record interface and status lifecycle.
//!
//! The payment record itself is owned by the host billing framework; this
//! crate only sees it through the [`Payment`] trait. Providers mutate the
//! record in two narrow ways: they move the status forward along the
//! lifecycle in [`PaymentStatus`], and they append raw remote responses to
//! the write-only attrs audit channel.

use std::fmt;
use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Lifecycle status of a payment record.
///
/// Providers only ever write two of these: [`PaymentStatus::Input`] on the
/// first form render, and [`PaymentStatus::Refunded`] when a capture hits a
/// charge the network reports as already refunded. Every other transition is
/// the host framework's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Created, payer has not started entering payment details.
    Waiting,
    /// Payer has begun entering payment details.
    Input,
    /// Authorized but not yet captured.
    Preauth,
    /// Funds collected.
    Confirmed,
    /// Funds returned, fully or after a failed capture.
    Refunded,
    /// Declined by the network or the payer.
    Rejected,
    /// Irrecoverable processing failure.
    Error,
}

impl PaymentStatus {
    /// Whether a provider may build a payment form for a payment in this
    /// status. Only fresh and in-progress payments accept form input.
    pub fn accepts_input(&self) -> bool {
        matches!(self, PaymentStatus::Waiting | PaymentStatus::Input)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Waiting => "waiting",
            PaymentStatus::Input => "input",
            PaymentStatus::Preauth => "preauth",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Host-framework payment record, as seen by a provider.
///
/// The trait is object-safe so providers can be written against
/// `&mut dyn Payment` and the host framework can hand in whatever ORM-backed
/// type it persists. Implementations are expected to persist mutations; this
/// crate never reads back what it wrote into attrs.
pub trait Payment: Send {
    /// Current lifecycle status.
    fn status(&self) -> PaymentStatus;

    /// Moves the payment to a new status. The host framework may hook
    /// persistence or signals here.
    fn set_status(&mut self, status: PaymentStatus);

    /// Total amount of the payment in major currency units.
    fn total(&self) -> Decimal;

    /// Identifier issued by the remote network once the payer has submitted
    /// payment details. Required for capture, release, and refund.
    fn transaction_id(&self) -> Option<&str>;

    /// Stores the network-issued identifier. Called once, from the form
    /// submission path.
    fn set_transaction_id(&mut self, transaction_id: String);

    /// Appends a serialized remote response to the audit channel under the
    /// given key (`capture`, `release`, `refund`). Write-only: providers
    /// never read attrs back.
    fn set_attr(&mut self, key: &str, value: String);

    /// Host-side identifier for the order this payment belongs to, passed
    /// to networks that want a merchant reference.
    fn reference(&self) -> String;

    /// Where to send the payer after a successful form submission.
    fn success_url(&self) -> Url;
}
