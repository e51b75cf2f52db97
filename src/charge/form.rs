//! Card-data form for the charge provider.
//!
//! The host site collects raw card data itself; this form validates the
//! submission field by field and hands a [`CardDetails`] to the provider on
//! success. Rendering (widgets, labels, markup) stays in the host framework,
//! which only needs the field names and the attached errors.

use crate::charge::client::CardDetails;
use crate::form::{FieldErrors, FormData};

/// Field names, shared with the host framework's renderer.
pub mod fields {
    pub const NUMBER: &str = "number";
    pub const EXP_MONTH: &str = "exp_month";
    pub const EXP_YEAR: &str = "exp_year";
    pub const CVV: &str = "cvv";
}

/// A card-data form, either unbound (first render) or bound to a submission.
#[derive(Debug)]
pub struct CardForm {
    bound: bool,
    errors: FieldErrors,
    card: Option<CardDetails>,
}

impl CardForm {
    /// An empty form for the first render.
    pub fn unbound() -> Self {
        CardForm {
            bound: false,
            errors: FieldErrors::new(),
            card: None,
        }
    }

    /// Binds and validates submitted data.
    pub fn bind(data: &FormData) -> Self {
        let mut errors = FieldErrors::new();

        let number = match data.get_trimmed(fields::NUMBER) {
            Some(number) => {
                let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
                if !digits.chars().all(|c| c.is_ascii_digit()) {
                    errors.insert(fields::NUMBER, "Card number must be digits".to_string());
                    None
                } else if digits.len() < 12 || digits.len() > 19 {
                    errors.insert(fields::NUMBER, "Card number has a wrong length".to_string());
                    None
                } else if !luhn_valid(&digits) {
                    errors.insert(fields::NUMBER, "Card number is invalid".to_string());
                    None
                } else {
                    Some(digits)
                }
            }
            None => {
                errors.insert(fields::NUMBER, "This field is required".to_string());
                None
            }
        };

        let exp_month = match data
            .get_trimmed(fields::EXP_MONTH)
            .and_then(|v| v.parse::<u8>().ok())
        {
            Some(month) if (1..=12).contains(&month) => Some(month),
            _ => {
                errors.insert(fields::EXP_MONTH, "Enter a month between 1 and 12".to_string());
                None
            }
        };

        let exp_year = match data
            .get_trimmed(fields::EXP_YEAR)
            .and_then(|v| v.parse::<u16>().ok())
        {
            Some(year) if (2000..2100).contains(&year) => Some(year),
            _ => {
                errors.insert(fields::EXP_YEAR, "Enter a four-digit year".to_string());
                None
            }
        };

        let cvv = match data.get_trimmed(fields::CVV) {
            Some(cvv) if cvv.len() >= 3 && cvv.len() <= 4 && cvv.chars().all(|c| c.is_ascii_digit()) => {
                Some(cvv.to_string())
            }
            _ => {
                errors.insert(fields::CVV, "Enter a 3 or 4 digit code".to_string());
                None
            }
        };

        let card = match (number, exp_month, exp_year, cvv) {
            (Some(number), Some(exp_month), Some(exp_year), Some(cvv)) if errors.is_empty() => {
                Some(CardDetails {
                    number,
                    exp_month,
                    exp_year,
                    cvv,
                })
            }
            _ => None,
        };

        CardForm {
            bound: true,
            errors,
            card,
        }
    }

    /// Whether the form is bound to a valid submission.
    pub fn is_valid(&self) -> bool {
        self.bound && self.errors.is_empty() && self.card.is_some()
    }

    /// Validation errors keyed by field name, for re-rendering.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub(crate) fn card(&self) -> Option<&CardDetails> {
        self.card.as_ref()
    }
}

/// Luhn checksum over a digit string.
fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}
