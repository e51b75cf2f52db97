//! Provider for the card-tokenization network.
//!
//! The payer goes through the network's hosted modal: card data is
//! tokenized client-side (create token, request OTP, verify — the only
//! three methods a client may call), and the host site receives a verified
//! token. Server-side, the provider drives the receipt lifecycle: it creates
//! a receipt for the payment amount, pays it with the token, and stores the
//! receipt id as the payment's transaction id.
//!
//! This provider does not support fraud detection; any such requirement must
//! be met outside it.

pub mod client;
pub mod form;
pub mod http;
pub mod methods;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::amount::to_minor;
use crate::config::ProviderConfig;
use crate::error::PaymentError;
use crate::form::{FormData, FormOutcome};
use crate::payment::{Payment, PaymentStatus};
use crate::provider::Provider;

pub use client::{Receipt, ReceiptClient, ReceiptError, ReceiptState};
pub use form::ModalForm;
pub use http::HttpReceiptClient;
pub use methods::{Method, client_method};

/// Payment provider backed by a card-tokenization network.
///
/// Capture, release, and refund are not part of this network's flow: money
/// moves when a receipt is paid, and is returned by cancelling the receipt.
/// The corresponding [`Provider`] operations report
/// [`PaymentError::NotSupported`].
#[derive(Debug)]
pub struct TokenCollectingProvider<R = HttpReceiptClient> {
    config: ProviderConfig,
    client: R,
}

impl TokenCollectingProvider<HttpReceiptClient> {
    /// Builds a provider talking to the configured network over JSON-RPC.
    pub fn new(config: ProviderConfig) -> Self {
        let client = HttpReceiptClient::new(&config);
        TokenCollectingProvider { config, client }
    }
}

impl<R: ReceiptClient> TokenCollectingProvider<R> {
    /// Builds a provider around an explicit client, the seam tests use.
    pub fn with_client(config: ProviderConfig, client: R) -> Self {
        TokenCollectingProvider { config, client }
    }

    fn receipt_id(payment: &dyn Payment) -> Result<String, PaymentError> {
        payment
            .transaction_id()
            .map(str::to_string)
            .ok_or(PaymentError::MissingTransactionId)
    }

    /// Queries the network for the current state of the payment's receipt.
    #[instrument(skip_all, err, fields(merchant = %self.config.merchant_id))]
    pub async fn check(&self, payment: &dyn Payment) -> Result<ReceiptState, PaymentError> {
        let receipt_id = Self::receipt_id(payment)?;
        let receipt = self.client.check_receipt(&receipt_id).await?;
        Ok(receipt.state)
    }

    /// Cancels the payment's receipt and records the raw response.
    #[instrument(skip_all, err, fields(merchant = %self.config.merchant_id))]
    pub async fn cancel(&self, payment: &mut dyn Payment) -> Result<(), PaymentError> {
        let receipt_id = Self::receipt_id(payment)?;
        let receipt = self.client.cancel_receipt(&receipt_id).await?;
        payment.set_attr("cancel", receipt.raw().to_string());
        Ok(())
    }
}

impl<R: ReceiptClient> Provider for TokenCollectingProvider<R> {
    type Form = ModalForm;

    #[instrument(skip_all, err, fields(merchant = %self.config.merchant_id))]
    async fn get_form(
        &self,
        payment: &mut dyn Payment,
        data: Option<&FormData>,
    ) -> Result<FormOutcome<ModalForm>, PaymentError> {
        let status = payment.status();
        if !status.accepts_input() {
            return Err(PaymentError::InvalidStatus { status });
        }
        if status == PaymentStatus::Waiting {
            payment.set_status(PaymentStatus::Input);
            info!("payment moved to input");
        }

        let form = match data {
            None => ModalForm::unbound(&self.config),
            Some(data) => ModalForm::bind(&self.config, data),
        };
        let Some(token) = form.token().map(str::to_string) else {
            return Ok(FormOutcome::Form(form));
        };

        let minor = to_minor(payment.total())?;
        let receipt = self
            .client
            .create_receipt(minor, &payment.reference())
            .await?;
        let paid = self.client.pay_receipt(&receipt.id, &token).await?;
        info!(receipt_id = %paid.id, "receipt paid");
        payment.set_transaction_id(paid.id);
        Ok(FormOutcome::RedirectTo(payment.success_url()))
    }

    async fn capture(
        &self,
        _payment: &mut dyn Payment,
        _amount: Option<Decimal>,
    ) -> Result<Decimal, PaymentError> {
        Err(PaymentError::NotSupported { operation: "capture" })
    }

    async fn release(&self, _payment: &mut dyn Payment) -> Result<(), PaymentError> {
        Err(PaymentError::NotSupported { operation: "release" })
    }

    async fn refund(
        &self,
        _payment: &mut dyn Payment,
        _amount: Option<Decimal>,
    ) -> Result<Decimal, PaymentError> {
        Err(PaymentError::NotSupported { operation: "refund" })
    }
}
