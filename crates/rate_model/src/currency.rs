use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::InvalidInputError;

/// Codes offered to the user.
pub const SUPPORTED_CURRENCIES: [&str; 20] = [
    "USD", "KES", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "ZAR", "INR", "CNY", "NZD", "SGD",
    "NGN", "GHS", "TZS", "UGX", "RUB", "BRL", "MXN",
];

/// Three-letter ISO 4217 code, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn parse(code: &str) -> Result<Self, InvalidInputError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(InvalidInputError::UnknownCurrency(code.to_string()));
        }
        Ok(Currency(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_CURRENCIES.contains(&self.0.as_str())
    }
}

impl FromStr for Currency {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = InvalidInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
