use rate_model::{Currency, InvalidInputError};

pub fn sanitize_currency(code: String) -> String {
    return code
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(4)
        .collect::<String>()
        .to_uppercase();
}

/// Sanitized, parsed and checked against the supported list.
pub fn parse_currency(code: String) -> Result<Currency, InvalidInputError> {
    let currency = Currency::parse(&sanitize_currency(code))?;
    if !currency.is_supported() {
        return Err(InvalidInputError::UnknownCurrency(currency.to_string()));
    }
    Ok(currency)
}
