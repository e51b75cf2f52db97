//! Conversion between major currency units and integer minor units.
//!
//! Remote payment networks take amounts as integers in the smallest currency
//! subdivision (cents); the host framework stores decimal major units. The
//! conversion here is exact: an amount with more than two fractional digits
//! is refused rather than rounded, so `from_minor(to_minor(a)) == a` holds
//! for every representable amount.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Errors that can occur converting a major-unit amount to minor units.
#[derive(Debug, thiserror::Error)]
pub enum AmountError {
    /// Negative amounts never reach a remote network.
    #[error("Negative amount: {0}")]
    Negative(Decimal),
    /// The amount has sub-cent precision that integer minor units cannot
    /// represent.
    #[error("Amount {0} has more than two decimal places")]
    PrecisionLoss(Decimal),
    /// The amount does not fit a 64-bit minor-unit integer.
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Converts a major-unit decimal amount to integer minor units (×100).
///
/// # Errors
///
/// Fails if the amount is negative, carries more than two fractional digits,
/// or overflows `i64`.
pub fn to_minor(amount: Decimal) -> Result<i64, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }
    if amount.normalize().scale() > 2 {
        return Err(AmountError::PrecisionLoss(amount));
    }
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(AmountError::OutOfRange(amount))?;
    minor
        .normalize()
        .to_i64()
        .ok_or(AmountError::OutOfRange(amount))
}

/// Converts integer minor units back to a major-unit decimal amount (÷100).
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn converts_two_decimal_amounts_exactly() {
        assert_eq!(to_minor(dec("19.99")).unwrap(), 1999);
        assert_eq!(to_minor(dec("0.01")).unwrap(), 1);
        assert_eq!(to_minor(dec("50.00")).unwrap(), 5000);
        assert_eq!(to_minor(dec("100")).unwrap(), 10000);
    }

    #[test]
    fn round_trips_every_representable_amount() {
        for s in ["0", "0.01", "0.10", "1", "19.99", "50.00", "12345.67"] {
            let amount = dec(s);
            let minor = to_minor(amount).unwrap();
            assert_eq!(from_minor(minor), amount);
        }
    }

    #[test]
    fn rejects_sub_cent_precision() {
        assert!(matches!(
            to_minor(dec("1.999")),
            Err(AmountError::PrecisionLoss(_))
        ));
    }

    #[test]
    fn accepts_trailing_zero_scale() {
        // 1.990 is representable: trailing zeros carry no precision.
        assert_eq!(to_minor(dec("1.990")).unwrap(), 199);
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            to_minor(dec("-1.00")),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn from_minor_produces_major_units() {
        assert_eq!(from_minor(1999), dec("19.99"));
        assert_eq!(from_minor(5000), dec("50.00"));
    }
}
