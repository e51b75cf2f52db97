//! Client seam for the tokenization network's receipt lifecycle.
//!
//! Receipts are the network's server-side invoice objects: created for an
//! amount, paid with a verified card token, checked, or cancelled. All four
//! calls are privileged server-to-server operations; the payer-facing client
//! only ever sees the card-token methods whitelisted in
//! [`methods`](crate::token::methods).

use async_trait::async_trait;
use serde_json::Value;

/// Lifecycle state of a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptState {
    /// Created, awaiting payment.
    Created,
    /// Paid with a verified token.
    Paid,
    /// Cancelled, possibly after payment.
    Cancelled,
}

impl TryFrom<i64> for ReceiptState {
    type Error = ReceiptError;

    fn try_from(state: i64) -> Result<Self, Self::Error> {
        match state {
            0 | 1 => Ok(ReceiptState::Created),
            4 => Ok(ReceiptState::Paid),
            21 | 50 => Ok(ReceiptState::Cancelled),
            other => Err(ReceiptError::Malformed(format!(
                "unknown receipt state {other}"
            ))),
        }
    }
}

/// A receipt as reported by the network.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Network-issued receipt identifier.
    pub id: String,
    /// Receipt amount in minor units.
    pub amount: i64,
    /// Current lifecycle state.
    pub state: ReceiptState,
    raw: Value,
}

impl Receipt {
    /// Extracts a receipt from the `receipt` object of an RPC result.
    ///
    /// # Errors
    ///
    /// Fails when the object lacks an id or carries an unknown state.
    pub fn from_value(raw: Value) -> Result<Self, ReceiptError> {
        let id = raw
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| ReceiptError::Malformed("missing receipt id".to_string()))?
            .to_string();
        let amount = raw.get("amount").and_then(Value::as_i64).unwrap_or(0);
        let state = raw
            .get("state")
            .and_then(Value::as_i64)
            .map(ReceiptState::try_from)
            .transpose()?
            .unwrap_or(ReceiptState::Created);
        Ok(Receipt {
            id,
            amount,
            state,
            raw,
        })
    }

    /// The full receipt object, for the attrs audit trail.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Errors surfaced by the tokenization network.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    /// RPC-level error returned by the network.
    #[error("Receipt network error ({code}): {message}")]
    Rpc { code: i64, message: String },
    /// Transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The response body did not look like a receipt.
    #[error("Malformed receipt response: {0}")]
    Malformed(String),
}

/// Server-side receipt lifecycle of the tokenization network.
#[async_trait]
pub trait ReceiptClient: Send + Sync {
    /// Creates a receipt for `amount` minor units, tagged with the
    /// host-side order reference.
    async fn create_receipt(&self, amount: i64, reference: &str) -> Result<Receipt, ReceiptError>;

    /// Pays a receipt with a verified card token.
    async fn pay_receipt(&self, receipt_id: &str, token: &str) -> Result<Receipt, ReceiptError>;

    /// Queries the state of a receipt.
    async fn check_receipt(&self, receipt_id: &str) -> Result<Receipt, ReceiptError>;

    /// Cancels a receipt.
    async fn cancel_receipt(&self, receipt_id: &str) -> Result<Receipt, ReceiptError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_receipt_fields() {
        let receipt = Receipt::from_value(json!({
            "_id": "rcpt_1",
            "amount": 1999,
            "state": 4,
        }))
        .unwrap();
        assert_eq!(receipt.id, "rcpt_1");
        assert_eq!(receipt.amount, 1999);
        assert_eq!(receipt.state, ReceiptState::Paid);
    }

    #[test]
    fn missing_id_is_malformed() {
        let err = Receipt::from_value(json!({"amount": 1999})).unwrap_err();
        assert!(matches!(err, ReceiptError::Malformed(_)));
    }

    #[test]
    fn unknown_state_is_malformed() {
        let err = Receipt::from_value(json!({"_id": "rcpt_1", "state": 99})).unwrap_err();
        assert!(matches!(err, ReceiptError::Malformed(_)));
    }
}
