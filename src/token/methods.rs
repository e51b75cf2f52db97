//! Remote method identifiers of the tokenization network.
//!
//! The network exposes a fixed, closed set of JSON-RPC methods. Only the
//! three card-token methods may be invoked by payer-facing client code; the
//! receipt lifecycle is strictly server-to-server and must never be reachable
//! from a client-origin call path.

use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::PaymentError;

/// A remote method of the tokenization network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `cards.create` — create a card token from card data.
    CreateCard,
    /// `cards.get_verify_code` — request an OTP for a card token.
    GetVerifyCode,
    /// `cards.verify` — confirm the OTP and activate the token.
    VerifyCard,
    /// `cards.check` — query token state.
    CheckCard,
    /// `cards.remove` — delete a token.
    RemoveCard,
    /// `receipts.create` — create an invoice for an amount.
    CreateReceipt,
    /// `receipts.pay` — pay an invoice with a verified token.
    PayReceipt,
    /// `receipts.check` — query invoice state.
    CheckReceipt,
    /// `receipts.cancel` — cancel an invoice.
    CancelReceipt,
}

impl Method {
    /// The three methods a payer-facing client may invoke directly.
    pub const CLIENT_METHODS: [Method; 3] =
        [Method::CreateCard, Method::GetVerifyCode, Method::VerifyCard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::CreateCard => "cards.create",
            Method::GetVerifyCode => "cards.get_verify_code",
            Method::VerifyCard => "cards.verify",
            Method::CheckCard => "cards.check",
            Method::RemoveCard => "cards.remove",
            Method::CreateReceipt => "receipts.create",
            Method::PayReceipt => "receipts.pay",
            Method::CheckReceipt => "receipts.check",
            Method::CancelReceipt => "receipts.cancel",
        }
    }

    /// Whether payer-facing client code may invoke this method.
    pub fn is_client_invocable(&self) -> bool {
        Self::CLIENT_METHODS.contains(self)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifier does not name a known method.
#[derive(Debug, thiserror::Error)]
#[error("Unknown method identifier: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cards.create" => Ok(Method::CreateCard),
            "cards.get_verify_code" => Ok(Method::GetVerifyCode),
            "cards.verify" => Ok(Method::VerifyCard),
            "cards.check" => Ok(Method::CheckCard),
            "cards.remove" => Ok(Method::RemoveCard),
            "receipts.create" => Ok(Method::CreateReceipt),
            "receipts.pay" => Ok(Method::PayReceipt),
            "receipts.check" => Ok(Method::CheckReceipt),
            "receipts.cancel" => Ok(Method::CancelReceipt),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Validates an identifier arriving from a client-origin call path.
///
/// Anything outside the three whitelisted card-token methods is refused,
/// including well-formed server-side identifiers like `receipts.pay` and
/// identifiers the network does not know at all.
pub fn client_method(identifier: &str) -> Result<Method, PaymentError> {
    let method = Method::from_str(identifier).map_err(|_| PaymentError::MethodNotAllowed {
        method: identifier.to_string(),
    })?;
    if !method.is_client_invocable() {
        return Err(PaymentError::MethodNotAllowed {
            method: identifier.to_string(),
        });
    }
    Ok(method)
}
