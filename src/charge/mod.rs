//! Provider for the card-charge network.
//!
//! The host site collects raw card data in its own form; this provider
//! authorizes a charge from it, then drives capture, release, and refund
//! against the network using the stored transaction id. The remote client is
//! injected at construction, so tests run against an in-memory double.

pub mod client;
pub mod form;
pub mod http;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::amount::{from_minor, to_minor};
use crate::error::PaymentError;
use crate::form::{FormData, FormOutcome};
use crate::payment::{Payment, PaymentStatus};
use crate::provider::{Provider, effective_amount};

pub use client::{CardDetails, Charge, ChargeClient, ChargeError};
pub use form::CardForm;
pub use http::HttpChargeClient;

/// Payment provider backed by a card-charge network.
///
/// Credit card data is collected by the host site and exchanged for a charge
/// authorization; funds move later through [`capture`](Provider::capture),
/// [`release`](Provider::release), and [`refund`](Provider::refund).
#[derive(Debug, Clone)]
pub struct CardChargeProvider<C = HttpChargeClient> {
    client: C,
    merchant_id: String,
}

impl CardChargeProvider<HttpChargeClient> {
    /// Builds a provider talking to the configured network over HTTP.
    pub fn new(config: &crate::config::ProviderConfig) -> Self {
        CardChargeProvider {
            client: HttpChargeClient::new(config),
            merchant_id: config.merchant_id.clone(),
        }
    }
}

impl<C: ChargeClient> CardChargeProvider<C> {
    /// Builds a provider around an explicit client, the seam tests use.
    pub fn with_client(client: C, merchant_id: impl Into<String>) -> Self {
        CardChargeProvider {
            client,
            merchant_id: merchant_id.into(),
        }
    }

    /// Runs the retrieve-then-act chain shared by capture and refund.
    async fn retrieve_then<F, Fut>(&self, transaction_id: &str, act: F) -> Result<Charge, ChargeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Charge, ChargeError>>,
    {
        self.client.retrieve(transaction_id).await?;
        act().await
    }
}

fn transaction_id(payment: &dyn Payment) -> Result<String, PaymentError> {
    payment
        .transaction_id()
        .map(str::to_string)
        .ok_or(PaymentError::MissingTransactionId)
}

impl<C: ChargeClient> Provider for CardChargeProvider<C> {
    type Form = CardForm;

    #[instrument(skip_all, err, fields(merchant = %self.merchant_id))]
    async fn get_form(
        &self,
        payment: &mut dyn Payment,
        data: Option<&FormData>,
    ) -> Result<FormOutcome<CardForm>, PaymentError> {
        let status = payment.status();
        if !status.accepts_input() {
            return Err(PaymentError::InvalidStatus { status });
        }
        if status == PaymentStatus::Waiting {
            payment.set_status(PaymentStatus::Input);
            info!("payment moved to input");
        }

        let form = match data {
            None => CardForm::unbound(),
            Some(data) => CardForm::bind(data),
        };
        let Some(card) = form.card().cloned() else {
            return Ok(FormOutcome::Form(form));
        };

        let minor = to_minor(payment.total())?;
        let charge = self
            .client
            .authorize(&card, minor, &payment.reference())
            .await?;
        info!(charge_id = %charge.id, "charge authorized");
        payment.set_transaction_id(charge.id);
        Ok(FormOutcome::RedirectTo(payment.success_url()))
    }

    #[instrument(skip_all, err, fields(merchant = %self.merchant_id))]
    async fn capture(
        &self,
        payment: &mut dyn Payment,
        amount: Option<Decimal>,
    ) -> Result<Decimal, PaymentError> {
        let transaction_id = transaction_id(payment)?;
        let amount = effective_amount(payment.total(), amount)?;
        let minor = to_minor(amount)?;

        let result = self
            .retrieve_then(&transaction_id, || self.client.capture(&transaction_id, minor))
            .await;
        let charge = match result {
            Ok(charge) => charge,
            Err(ChargeError::InvalidRequest { message }) => {
                // The network no longer admits a capture on this charge: the
                // money is gone or was never collected. Terminal either way.
                info!(%message, "capture refused, marking payment refunded");
                payment.set_status(PaymentStatus::Refunded);
                return Err(PaymentError::AlreadyRefunded);
            }
            Err(err) => return Err(err.into()),
        };

        payment.set_attr("capture", charge.raw().to_string());
        Ok(from_minor(minor))
    }

    #[instrument(skip_all, err, fields(merchant = %self.merchant_id))]
    async fn release(&self, payment: &mut dyn Payment) -> Result<(), PaymentError> {
        let transaction_id = transaction_id(payment)?;
        let result = self
            .retrieve_then(&transaction_id, || self.client.refund(&transaction_id, None))
            .await;
        let charge = match result {
            Ok(charge) => charge,
            Err(ChargeError::InvalidRequest { .. }) => return Err(PaymentError::AlreadyRefunded),
            Err(err) => return Err(err.into()),
        };
        payment.set_attr("release", charge.raw().to_string());
        Ok(())
    }

    #[instrument(skip_all, err, fields(merchant = %self.merchant_id))]
    async fn refund(
        &self,
        payment: &mut dyn Payment,
        amount: Option<Decimal>,
    ) -> Result<Decimal, PaymentError> {
        let transaction_id = transaction_id(payment)?;
        let amount = effective_amount(payment.total(), amount)?;
        let minor = to_minor(amount)?;

        let result = self
            .retrieve_then(&transaction_id, || {
                self.client.refund(&transaction_id, Some(minor))
            })
            .await;
        let charge = match result {
            Ok(charge) => charge,
            Err(ChargeError::InvalidRequest { .. }) => return Err(PaymentError::AlreadyRefunded),
            Err(err) => return Err(err.into()),
        };
        payment.set_attr("refund", charge.raw().to_string());
        Ok(from_minor(minor))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::payment::testing::TestPayment;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[derive(Default)]
    struct MockChargeClient {
        reject_capture: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockChargeClient {
        fn rejecting_capture() -> Self {
            MockChargeClient {
                reject_capture: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn charge(id: &str, amount: i64) -> Charge {
            Charge::from_value(json!({
                "id": id,
                "amount": amount,
                "captured": true,
                "refunded": false,
            }))
            .unwrap()
        }
    }

    #[async_trait]
    impl ChargeClient for MockChargeClient {
        async fn retrieve(&self, charge_id: &str) -> Result<Charge, ChargeError> {
            self.record(format!("retrieve {charge_id}"));
            Ok(Self::charge(charge_id, 5000))
        }

        async fn capture(&self, charge_id: &str, amount: i64) -> Result<Charge, ChargeError> {
            self.record(format!("capture {charge_id} {amount}"));
            if self.reject_capture {
                return Err(ChargeError::InvalidRequest {
                    message: "Charge has already been refunded.".to_string(),
                });
            }
            Ok(Self::charge(charge_id, amount))
        }

        async fn refund(&self, charge_id: &str, amount: Option<i64>) -> Result<Charge, ChargeError> {
            self.record(format!("refund {charge_id} {amount:?}"));
            Ok(Self::charge(charge_id, amount.unwrap_or(5000)))
        }

        async fn authorize(
            &self,
            _card: &CardDetails,
            amount: i64,
            reference: &str,
        ) -> Result<Charge, ChargeError> {
            self.record(format!("authorize {amount} {reference}"));
            Ok(Self::charge("ch_new", amount))
        }
    }

    fn provider(client: MockChargeClient) -> CardChargeProvider<MockChargeClient> {
        CardChargeProvider::with_client(client, "merchant-42")
    }

    fn valid_card_data() -> FormData {
        [
            ("number", "4242424242424242"),
            ("exp_month", "12"),
            ("exp_year", "2030"),
            ("cvv", "123"),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn first_render_moves_waiting_to_input() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::new(dec("19.99"));

        let outcome = provider.get_form(&mut payment, None).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Input);
        match outcome {
            FormOutcome::Form(form) => assert!(!form.is_valid()),
            FormOutcome::RedirectTo(_) => panic!("first render must yield a form"),
        }
    }

    #[tokio::test]
    async fn valid_submission_authorizes_and_redirects() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::new(dec("19.99"));

        provider.get_form(&mut payment, None).await.unwrap();
        let outcome = provider
            .get_form(&mut payment, Some(&valid_card_data()))
            .await
            .unwrap();

        assert_eq!(
            outcome.redirect_url().map(|u| u.as_str()),
            Some("https://shop.example/payment/success")
        );
        assert_eq!(payment.transaction_id.as_deref(), Some("ch_new"));
        assert_eq!(provider.client.calls(), vec!["authorize 1999 order-1"]);
    }

    #[tokio::test]
    async fn invalid_submission_returns_form_with_errors() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::new(dec("19.99"));

        let mut data = valid_card_data();
        data.insert("number", "1234");
        let outcome = provider.get_form(&mut payment, Some(&data)).await.unwrap();

        match outcome {
            FormOutcome::Form(form) => {
                assert!(!form.is_valid());
                assert!(!form.errors().is_empty());
            }
            FormOutcome::RedirectTo(_) => panic!("invalid submission must re-render"),
        }
        assert!(payment.transaction_id.is_none());
        assert!(provider.client.calls().is_empty());
    }

    #[tokio::test]
    async fn get_form_rejects_settled_payments() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::new(dec("19.99"));
        payment.status = PaymentStatus::Confirmed;

        let err = provider.get_form(&mut payment, None).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidStatus { .. }));
    }

    #[tokio::test]
    async fn capture_defaults_to_payment_total() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");

        let captured = provider.capture(&mut payment, None).await.unwrap();

        assert_eq!(captured, dec("50.00"));
        assert_eq!(
            provider.client.calls(),
            vec!["retrieve ch_1", "capture ch_1 5000"]
        );
        assert!(payment.attrs.contains_key("capture"));
    }

    #[tokio::test]
    async fn capture_requests_exact_partial_amount() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");

        let captured = provider
            .capture(&mut payment, Some(dec("19.99")))
            .await
            .unwrap();

        assert_eq!(captured, dec("19.99"));
        assert_eq!(
            provider.client.calls(),
            vec!["retrieve ch_1", "capture ch_1 1999"]
        );
    }

    #[tokio::test]
    async fn capture_over_total_is_refused_before_any_remote_call() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");

        let err = provider
            .capture(&mut payment, Some(dec("50.01")))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::AmountTooLarge { .. }));
        assert!(provider.client.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_capture_marks_payment_refunded() {
        let provider = provider(MockChargeClient::rejecting_capture());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");

        let err = provider.capture(&mut payment, None).await.unwrap_err();

        assert!(matches!(err, PaymentError::AlreadyRefunded));
        assert_eq!(err.to_string(), "Payment already refunded");
        assert_eq!(payment.status, PaymentStatus::Refunded);
        assert!(!payment.attrs.contains_key("capture"));
    }

    #[tokio::test]
    async fn rejected_capture_is_deterministic_for_any_amount() {
        for amount in [None, Some(dec("1.00")), Some(dec("50.00"))] {
            let provider = provider(MockChargeClient::rejecting_capture());
            let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");
            let err = provider.capture(&mut payment, amount).await.unwrap_err();
            assert!(matches!(err, PaymentError::AlreadyRefunded));
            assert_eq!(payment.status, PaymentStatus::Refunded);
        }
    }

    #[tokio::test]
    async fn capture_without_transaction_id_fails() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::new(dec("50.00"));

        let err = provider.capture(&mut payment, None).await.unwrap_err();
        assert!(matches!(err, PaymentError::MissingTransactionId));
    }

    #[tokio::test]
    async fn release_records_audit_and_leaves_status_alone() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");
        payment.status = PaymentStatus::Preauth;

        provider.release(&mut payment).await.unwrap();

        assert_eq!(payment.status, PaymentStatus::Preauth);
        assert!(payment.attrs.contains_key("release"));
        assert!(!payment.attrs.contains_key("capture"));
        assert_eq!(
            provider.client.calls(),
            vec!["retrieve ch_1", "refund ch_1 None"]
        );
    }

    #[tokio::test]
    async fn refund_records_audit_and_returns_requested_amount() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");
        payment.status = PaymentStatus::Confirmed;

        let refunded = provider
            .refund(&mut payment, Some(dec("10.00")))
            .await
            .unwrap();

        assert_eq!(refunded, dec("10.00"));
        assert_eq!(payment.status, PaymentStatus::Confirmed);
        assert!(payment.attrs.contains_key("refund"));
        assert!(!payment.attrs.contains_key("capture"));
        assert_eq!(
            provider.client.calls(),
            vec!["retrieve ch_1", "refund ch_1 Some(1000)"]
        );
    }

    #[tokio::test]
    async fn full_refund_defaults_to_total() {
        let provider = provider(MockChargeClient::default());
        let mut payment = TestPayment::with_transaction_id(dec("50.00"), "ch_1");

        let refunded = provider.refund(&mut payment, None).await.unwrap();
        assert_eq!(refunded, dec("50.00"));
    }
}
