//! Core trait defining the contract between the host billing framework and a
//! payment provider.
//!
//! A provider adapts one remote payment network: it builds the form that
//! collects (or redirects for) payment, then drives the capture, release,
//! and refund lifecycle of a previously authorized charge. Each operation is
//! invoked once per host-framework request and issues at most one outbound
//! remote call chain; there are no retries and no internal concurrency.
//! Guarding a single payment against concurrent capture or refund is the
//! host framework's job, not this contract's.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::PaymentError;
use crate::form::{FormData, FormOutcome};
use crate::payment::Payment;

/// Asynchronous interface implemented by every payment provider.
///
/// Implementors translate a local [`Payment`] record into remote network
/// calls and translate the remote responses back into status changes and
/// audit attrs. The remote client is injected at construction time, so a
/// test double can stand in without network access.
pub trait Provider {
    /// Form type returned for (re-)rendering.
    type Form;

    /// Builds the payment form for `payment`, bound to `data` when the payer
    /// has submitted.
    ///
    /// On the first call for a waiting payment the status moves to
    /// [`Input`](crate::payment::PaymentStatus::Input) before the form is
    /// constructed. A valid submission persists the network-issued reference
    /// as the payment's transaction id and completes with
    /// [`FormOutcome::RedirectTo`]; first renders and invalid submissions
    /// yield [`FormOutcome::Form`].
    ///
    /// # Errors
    ///
    /// Fails if the payment is past the input phase, or if the remote call
    /// made on a valid submission fails.
    fn get_form(
        &self,
        payment: &mut dyn Payment,
        data: Option<&FormData>,
    ) -> impl Future<Output = Result<FormOutcome<Self::Form>, PaymentError>> + Send;

    /// Collects funds on the previously authorized charge.
    ///
    /// `amount` is in major units and defaults to the payment total.
    ///
    /// # Returns
    ///
    /// The captured amount in major units — the provider's declaration of
    /// how much was actually collected.
    ///
    /// # Errors
    ///
    /// [`PaymentError::AlreadyRefunded`] when the network reports the charge
    /// in a state that no longer admits capture; in that case the payment
    /// status has been moved to `Refunded` first.
    fn capture(
        &self,
        payment: &mut dyn Payment,
        amount: Option<Decimal>,
    ) -> impl Future<Output = Result<Decimal, PaymentError>> + Send;

    /// Voids the authorization without collecting funds.
    ///
    /// The payment status is left untouched; deciding the resulting status
    /// is the host framework's responsibility.
    fn release(
        &self,
        payment: &mut dyn Payment,
    ) -> impl Future<Output = Result<(), PaymentError>> + Send;

    /// Returns previously captured funds, fully or partially.
    ///
    /// `amount` is in major units and defaults to the payment total. As with
    /// [`release`](Provider::release), no status transition is made here.
    ///
    /// # Returns
    ///
    /// The refunded amount in major units, reconstructed from the requested
    /// minor-unit amount rather than read back from the remote response.
    fn refund(
        &self,
        payment: &mut dyn Payment,
        amount: Option<Decimal>,
    ) -> impl Future<Output = Result<Decimal, PaymentError>> + Send;
}

impl<T: Provider + Sync> Provider for Arc<T> {
    type Form = T::Form;

    fn get_form(
        &self,
        payment: &mut dyn Payment,
        data: Option<&FormData>,
    ) -> impl Future<Output = Result<FormOutcome<Self::Form>, PaymentError>> + Send {
        self.as_ref().get_form(payment, data)
    }

    fn capture(
        &self,
        payment: &mut dyn Payment,
        amount: Option<Decimal>,
    ) -> impl Future<Output = Result<Decimal, PaymentError>> + Send {
        self.as_ref().capture(payment, amount)
    }

    fn release(
        &self,
        payment: &mut dyn Payment,
    ) -> impl Future<Output = Result<(), PaymentError>> + Send {
        self.as_ref().release(payment)
    }

    fn refund(
        &self,
        payment: &mut dyn Payment,
        amount: Option<Decimal>,
    ) -> impl Future<Output = Result<Decimal, PaymentError>> + Send {
        self.as_ref().refund(payment, amount)
    }
}

/// Resolves an optional requested amount against the payment total.
///
/// `None` means the full total. A requested amount above the total is
/// refused before any remote call is made.
pub(crate) fn effective_amount(
    total: Decimal,
    requested: Option<Decimal>,
) -> Result<Decimal, PaymentError> {
    match requested {
        None => Ok(total),
        Some(requested) if requested > total => {
            Err(PaymentError::AmountTooLarge { requested, total })
        }
        Some(requested) => Ok(requested),
    }
}
