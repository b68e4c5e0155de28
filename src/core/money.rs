use rust_decimal::Decimal;

/// Display precision for rupee amounts. Internal arithmetic is never rounded;
/// only values leaving the service get clamped to two decimal places.
pub const DISPLAY_SCALE: u32 = 2;

/// Rounds an amount for presentation (API responses, report rows)
pub fn display_round(amount: Decimal) -> Decimal {
    amount.round_dp(DISPLAY_SCALE)
}

/// Formats an amount as an INR display string
pub fn format_inr(amount: Decimal) -> String {
    format!("₹{:.2}", display_round(amount))
}

/// Validates that an amount is strictly positive
pub fn require_positive(amount: Decimal, what: &str) -> crate::core::Result<()> {
    if amount <= Decimal::ZERO {
        return Err(crate::core::AppError::invalid_amount(format!(
            "{} must be greater than zero, got {}",
            what, amount
        )));
    }
    Ok(())
}

/// Validates that an amount is not negative
pub fn require_non_negative(amount: Decimal, what: &str) -> crate::core::Result<()> {
    if amount < Decimal::ZERO {
        return Err(crate::core::AppError::validation(format!(
            "{} cannot be negative, got {}",
            what, amount
        )));
    }
    Ok(())
}
