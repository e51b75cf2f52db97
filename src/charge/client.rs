//! Client seam for the card-charge network.
//!
//! The provider never talks to the network directly; it goes through
//! [`ChargeClient`], injected at construction time. Tests substitute an
//! in-memory double, production wires in
//! [`HttpChargeClient`](crate::charge::http::HttpChargeClient).

use async_trait::async_trait;
use serde_json::Value;

/// A charge object as reported by the remote network.
///
/// Only the fields the lifecycle logic needs are pulled out; the full
/// response body is kept in `raw` and is what lands in the payment's attrs
/// audit channel.
#[derive(Debug, Clone)]
pub struct Charge {
    /// Network-issued charge identifier.
    pub id: String,
    /// Charge amount in minor units.
    pub amount: i64,
    /// Whether funds have been collected.
    pub captured: bool,
    /// Whether funds have been returned.
    pub refunded: bool,
    raw: Value,
}

impl Charge {
    /// Extracts a charge from a raw response body.
    ///
    /// # Errors
    ///
    /// Fails when the body lacks a charge id.
    pub fn from_value(raw: Value) -> Result<Self, ChargeError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ChargeError::Malformed("missing charge id".to_string()))?
            .to_string();
        let amount = raw.get("amount").and_then(Value::as_i64).unwrap_or(0);
        let captured = raw.get("captured").and_then(Value::as_bool).unwrap_or(false);
        let refunded = raw.get("refunded").and_then(Value::as_bool).unwrap_or(false);
        Ok(Charge {
            id,
            amount,
            captured,
            refunded,
            raw,
        })
    }

    /// The full response body, for the attrs audit trail.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Errors surfaced by the card-charge network.
#[derive(Debug, thiserror::Error)]
pub enum ChargeError {
    /// The network refused the request because the charge is in a state that
    /// does not admit it (already refunded, voided). The capture path maps
    /// this to a terminal payment failure.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
    /// Any other API-level rejection.
    #[error("Charge network error ({code}): {message}")]
    Api { code: String, message: String },
    /// Transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The response body did not look like a charge.
    #[error("Malformed charge response: {0}")]
    Malformed(String),
}

/// Raw card data collected by the host site's own form.
///
/// The number and verification code are redacted in `Debug` output; only the
/// last four digits of the number are shown.
#[derive(Clone)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvv: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last4 = if self.number.len() >= 4 {
            &self.number[self.number.len() - 4..]
        } else {
            ""
        };
        f.debug_struct("CardDetails")
            .field("number", &format_args!("****{last4}"))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// Remote charge-network API: retrieve a charge, act on it, or authorize a
/// new one from raw card data.
#[async_trait]
pub trait ChargeClient: Send + Sync {
    /// Looks up a charge by its network identifier.
    async fn retrieve(&self, charge_id: &str) -> Result<Charge, ChargeError>;

    /// Collects `amount` minor units on an authorized charge.
    async fn capture(&self, charge_id: &str, amount: i64) -> Result<Charge, ChargeError>;

    /// Returns funds on a charge; `None` refunds the full amount.
    async fn refund(&self, charge_id: &str, amount: Option<i64>) -> Result<Charge, ChargeError>;

    /// Authorizes a new charge for `amount` minor units without capturing,
    /// tagged with the host-side order reference.
    async fn authorize(
        &self,
        card: &CardDetails,
        amount: i64,
        reference: &str,
    ) -> Result<Charge, ChargeError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_charge_fields_from_body() {
        let charge = Charge::from_value(json!({
            "id": "ch_1",
            "amount": 5000,
            "captured": true,
            "refunded": false,
            "currency": "usd"
        }))
        .unwrap();
        assert_eq!(charge.id, "ch_1");
        assert_eq!(charge.amount, 5000);
        assert!(charge.captured);
        assert!(!charge.refunded);
        assert_eq!(charge.raw()["currency"], "usd");
    }

    #[test]
    fn missing_id_is_malformed() {
        let err = Charge::from_value(json!({"amount": 100})).unwrap_err();
        assert!(matches!(err, ChargeError::Malformed(_)));
    }

    #[test]
    fn card_debug_redacts_number_and_cvv() {
        let card = CardDetails {
            number: "4242424242424242".to_string(),
            exp_month: 12,
            exp_year: 2030,
            cvv: "123".to_string(),
        };
        let debugged = format!("{card:?}");
        assert!(debugged.contains("****4242"));
        assert!(!debugged.contains("4242424242424242"));
        assert!(!debugged.contains("123"));
    }
}
