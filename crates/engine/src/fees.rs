//! Marketplace fee schedule
//!
//! Fees are charged against gross revenue (item price + buyer shipping):
//! fees = listingFee + (transactionPct + paymentPct + offsiteAdsPct) × gross + paymentFixed
//!
//! Callers and configuration speak in whole-number percentages (`6.5` = 6.5%).
//! [`FeeModel`] stores fractions; the only conversion happens in [`FeeModel::resolve`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, PricingError, PricingOutcome};

/// Default Etsy AU listing fee
pub const DEFAULT_LISTING_FEE: Decimal = dec!(0.30);
/// Default transaction fee, whole-number percent
pub const DEFAULT_TRANSACTION_PCT: Decimal = dec!(6.5);
/// Default payment processing fee, whole-number percent
pub const DEFAULT_PAYMENT_PCT: Decimal = dec!(3.0);
/// Default flat payment processing fee per order
pub const DEFAULT_PAYMENT_FIXED: Decimal = dec!(0.30);
/// Offsite ads only apply to attributed orders
pub const DEFAULT_OFFSITE_ADS_PCT: Decimal = Decimal::ZERO;

const HUNDRED: Decimal = dec!(100);

/// A whole-number percentage as entered by a seller (e.g. `6.5` for 6.5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub Decimal);

impl Percent {
    pub fn as_fraction(self) -> Decimal {
        self.0 / HUNDRED
    }

    pub fn from_fraction(fraction: Decimal) -> Self {
        Self(fraction * HUNDRED)
    }

    fn normalized(self) -> Self {
        Self(self.0.normalize())
    }
}

/// Partial fee schedule in seller-facing units.
///
/// Used both for per-request overrides and for configured defaults; any field
/// left `None` falls through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_fee: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_fee_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_processing_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_processing_fixed: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsite_ads_pct: Option<Percent>,
}

impl FeeSettings {
    /// Fill every unset field of `self` from `base`.
    pub fn layered_over(&self, base: &FeeSettings) -> FeeSettings {
        FeeSettings {
            listing_fee: self.listing_fee.or(base.listing_fee),
            transaction_fee_pct: self.transaction_fee_pct.or(base.transaction_fee_pct),
            payment_processing_pct: self.payment_processing_pct.or(base.payment_processing_pct),
            payment_processing_fixed: self
                .payment_processing_fixed
                .or(base.payment_processing_fixed),
            offsite_ads_pct: self.offsite_ads_pct.or(base.offsite_ads_pct),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FeeSettings::default()
    }

    /// Reject negative or out-of-range values. `prefix` qualifies field names
    /// in the error (e.g. `feeOverrides`).
    pub fn validate(&self, prefix: &str) -> PricingOutcome<()> {
        let amounts = [
            ("listingFee", self.listing_fee),
            ("paymentProcessingFixed", self.payment_processing_fixed),
        ];
        let percents = [
            ("transactionFeePct", self.transaction_fee_pct),
            ("paymentProcessingPct", self.payment_processing_pct),
            ("offsiteAdsPct", self.offsite_ads_pct),
        ];

        for (name, value) in amounts {
            if let Some(v) = value {
                ensure_amount(&format!("{prefix}.{name}"), v)?;
            }
        }
        for (name, value) in percents {
            if let Some(Percent(v)) = value {
                if v.is_sign_negative() && !v.is_zero() {
                    return Err(PricingError::invalid(
                        format!("{prefix}.{name}"),
                        "percentage must not be negative",
                    ));
                }
                if v > HUNDRED {
                    return Err(PricingError::invalid(
                        format!("{prefix}.{name}"),
                        "percentage must not exceed 100",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Resolved marketplace fee schedule. Percentages are fractions (0.065 = 6.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeModel {
    pub listing_fee: Decimal,
    pub transaction_pct: Decimal,
    pub payment_pct: Decimal,
    pub payment_fixed: Decimal,
    pub offsite_ads_pct: Decimal,
}

impl Default for FeeModel {
    fn default() -> Self {
        Self::resolve(&FeeSettings::default(), &FeeSettings::default())
    }
}

impl FeeModel {
    /// Build a fee model: request override, else configured default, else the
    /// built-in AU schedule. Never fails; solvability is checked by the solver.
    pub fn resolve(overrides: &FeeSettings, defaults: &FeeSettings) -> Self {
        let merged = overrides.layered_over(defaults);
        let pct = |value: Option<Percent>, fallback: Decimal| {
            value.unwrap_or(Percent(fallback)).as_fraction()
        };

        Self {
            listing_fee: merged.listing_fee.unwrap_or(DEFAULT_LISTING_FEE),
            transaction_pct: pct(merged.transaction_fee_pct, DEFAULT_TRANSACTION_PCT),
            payment_pct: pct(merged.payment_processing_pct, DEFAULT_PAYMENT_PCT),
            payment_fixed: merged
                .payment_processing_fixed
                .unwrap_or(DEFAULT_PAYMENT_FIXED),
            offsite_ads_pct: pct(merged.offsite_ads_pct, DEFAULT_OFFSITE_ADS_PCT),
        }
    }

    /// Sum of all percentage-of-gross fees, as a fraction
    pub fn percentage_total(&self) -> Decimal {
        self.transaction_pct + self.payment_pct + self.offsite_ads_pct
    }

    /// Fraction of gross left after percentage fees (`r`)
    pub fn retained_fraction(&self) -> Decimal {
        Decimal::ONE - self.percentage_total()
    }

    pub fn is_solvable(&self) -> bool {
        self.retained_fraction() > Decimal::ZERO
    }

    /// Flat fees charged once per order regardless of price
    pub fn fixed_fees(&self) -> Decimal {
        self.listing_fee + self.payment_fixed
    }

    /// The fully-populated schedule in seller-facing units, for echoing back.
    pub fn to_settings(&self) -> FeeSettings {
        FeeSettings {
            listing_fee: Some(self.listing_fee),
            transaction_fee_pct: Some(Percent::from_fraction(self.transaction_pct).normalized()),
            payment_processing_pct: Some(Percent::from_fraction(self.payment_pct).normalized()),
            payment_processing_fixed: Some(self.payment_fixed),
            offsite_ads_pct: Some(Percent::from_fraction(self.offsite_ads_pct).normalized()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_au_schedule() {
        let fees = FeeModel::default();
        assert_eq!(fees.listing_fee, dec!(0.30));
        assert_eq!(fees.transaction_pct, dec!(0.065));
        assert_eq!(fees.payment_pct, dec!(0.03));
        assert_eq!(fees.payment_fixed, dec!(0.30));
        assert_eq!(fees.offsite_ads_pct, Decimal::ZERO);
        assert_eq!(fees.percentage_total(), dec!(0.095));
        assert_eq!(fees.retained_fraction(), dec!(0.905));
    }

    #[test]
    fn test_override_beats_default_beats_literal() {
        let defaults = FeeSettings {
            transaction_fee_pct: Some(Percent(dec!(5))),
            listing_fee: Some(dec!(0.25)),
            ..Default::default()
        };
        let overrides = FeeSettings {
            transaction_fee_pct: Some(Percent(dec!(8))),
            ..Default::default()
        };

        let fees = FeeModel::resolve(&overrides, &defaults);
        assert_eq!(fees.transaction_pct, dec!(0.08));
        assert_eq!(fees.listing_fee, dec!(0.25));
        assert_eq!(fees.payment_pct, dec!(0.03));
    }

    #[test]
    fn test_percent_normalized_exactly_once() {
        // 6.5 must become 0.065, not 0.00065 or 6.5
        let overrides = FeeSettings {
            transaction_fee_pct: Some(Percent(dec!(6.5))),
            offsite_ads_pct: Some(Percent(dec!(15))),
            ..Default::default()
        };
        let fees = FeeModel::resolve(&overrides, &FeeSettings::default());
        assert_eq!(fees.transaction_pct, dec!(0.065));
        assert_eq!(fees.offsite_ads_pct, dec!(0.15));

        let echoed = fees.to_settings();
        assert_eq!(echoed.transaction_fee_pct, Some(Percent(dec!(6.5))));
        assert_eq!(echoed.offsite_ads_pct, Some(Percent(dec!(15))));
    }

    #[test]
    fn test_degenerate_model_still_constructs() {
        let overrides = FeeSettings {
            transaction_fee_pct: Some(Percent(dec!(60))),
            payment_processing_pct: Some(Percent(dec!(40))),
            ..Default::default()
        };
        let fees = FeeModel::resolve(&overrides, &FeeSettings::default());
        assert_eq!(fees.retained_fraction(), Decimal::ZERO);
        assert!(!fees.is_solvable());
    }

    #[test]
    fn test_validate_rejects_negative_percent() {
        let settings = FeeSettings {
            payment_processing_pct: Some(Percent(dec!(-1))),
            ..Default::default()
        };
        let err = settings.validate("feeOverrides").unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidInput { ref field, .. } if field == "feeOverrides.paymentProcessingPct"
        ));
    }

    #[test]
    fn test_validate_rejects_negative_listing_fee() {
        let settings = FeeSettings {
            listing_fee: Some(dec!(-0.30)),
            ..Default::default()
        };
        assert!(settings.validate("feeOverrides").is_err());
        assert!(FeeSettings::default().validate("feeOverrides").is_ok());
    }

    #[test]
    fn test_settings_deserialize_whole_number_percentages() {
        let settings: FeeSettings =
            serde_json::from_str(r#"{"transactionFeePct": 6.5, "listingFee": 0.2}"#).unwrap();
        assert_eq!(settings.transaction_fee_pct, Some(Percent(dec!(6.5))));
        assert_eq!(settings.listing_fee, Some(dec!(0.2)));
        assert!(settings.offsite_ads_pct.is_none());
    }
}
