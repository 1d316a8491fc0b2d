//! Error types for the pricing engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest monetary amount accepted on any input field.
///
/// Bounds the numerators the solver divides; divisors are guarded there.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A request field failed validation before any computation ran
    #[error("Invalid input for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Percentage fees consume the whole gross, so no finite price exists
    #[error(
        "Fee percentages total {percentage_total}% of gross revenue; no item price can reach a profit target"
    )]
    DegenerateFeeModel { percentage_total: Decimal },
}

impl PricingError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type PricingOutcome<T> = Result<T, PricingError>;

/// Reject negative or out-of-range amounts for a named field.
pub fn ensure_amount(field: &str, value: Decimal) -> PricingOutcome<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::invalid(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(PricingError::invalid(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ensure_amount_accepts_zero_and_positive() {
        assert!(ensure_amount("itemPrice", Decimal::ZERO).is_ok());
        assert!(ensure_amount("itemPrice", dec!(24.95)).is_ok());
        assert!(ensure_amount("itemPrice", MAX_AMOUNT).is_ok());
    }

    #[test]
    fn test_ensure_amount_names_the_failing_field() {
        let err = ensure_amount("podBase", dec!(-0.01)).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidInput {
                field: "podBase".to_string(),
                reason: "must not be negative".to_string(),
            }
        );
    }

    #[test]
    fn test_ensure_amount_rejects_huge_values() {
        let err = ensure_amount("podShip", MAX_AMOUNT + Decimal::ONE).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { ref field, .. } if field == "podShip"));
    }
}
