use serde::{Deserialize, Serialize};

use crate::{Currency, InvalidInputError};

pub const MIN_AMOUNT: f64 = 0.01;

/// `amount` of `base` expressed in `target` at `rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub amount: f64,
    pub base: Currency,
    pub target: Currency,
    pub rate: f64,
    pub converted: f64,
}

impl Conversion {
    pub fn new(
        amount: f64,
        base: Currency,
        target: Currency,
        rate: f64,
    ) -> Result<Self, InvalidInputError> {
        Conversion::check_amount(amount)?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(InvalidInputError::InvalidRate(rate));
        }

        let converted = round_cents(amount * rate);
        Ok(Conversion {
            amount,
            base,
            target,
            rate,
            converted,
        })
    }

    /// Rejects amounts below [`MIN_AMOUNT`] before any rate is looked up.
    pub fn check_amount(amount: f64) -> Result<(), InvalidInputError> {
        if !amount.is_finite() || amount < MIN_AMOUNT {
            return Err(InvalidInputError::InvalidAmount(amount));
        }
        Ok(())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
