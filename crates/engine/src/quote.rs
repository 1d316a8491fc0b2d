//! Request/response boundary for the two pricing operations
//!
//! - [`calculate_profit`]: price → profit for explicit costs
//! - [`optimize_pricing`]: product type + profit goals → tiered pricing menu
//!
//! Both validate every numeric field before computing and take the
//! configured fee defaults from the caller; nothing here reads the environment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculator::calculate;
use crate::error::{ensure_amount, PricingError, PricingOutcome};
use crate::fees::{FeeModel, FeeSettings};
use crate::optimizer::{
    build_tiers, competitive_range, evaluate_candidate, recommendation_text, CandidateEvaluation,
    CompetitiveRange, PricingTiers, ProfitBounds,
};
use crate::profiles::{lookup, ProfitTargets};
use crate::types::{CostBasis, PricingResult};

// ============================================================================
// Forward
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitRequest {
    pub item_price: Decimal,
    pub buyer_shipping: Decimal,
    pub pod_base: Decimal,
    pub pod_ship: Decimal,
    #[serde(default)]
    pub fee_overrides: FeeSettings,
}

/// Echo of what was priced, with the fee schedule actually applied
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitInputs {
    pub item_price: Decimal,
    pub buyer_shipping: Decimal,
    pub pod_base: Decimal,
    pub pod_ship: Decimal,
    pub fees: FeeSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitResponse {
    pub inputs: ProfitInputs,
    pub outputs: PricingResult,
}

pub fn calculate_profit(
    request: &ProfitRequest,
    fee_defaults: &FeeSettings,
) -> PricingOutcome<ProfitResponse> {
    ensure_amount("itemPrice", request.item_price)?;
    let costs = CostBasis::new(request.pod_base, request.pod_ship, request.buyer_shipping);
    costs.validate()?;
    request.fee_overrides.validate("feeOverrides")?;

    let fees = FeeModel::resolve(&request.fee_overrides, fee_defaults);
    let outputs = calculate(request.item_price, &costs, &fees);

    info!(
        price = %outputs.item_price,
        profit = %outputs.profit,
        "Calculated profit"
    );

    Ok(ProfitResponse {
        inputs: ProfitInputs {
            item_price: request.item_price,
            buyer_shipping: request.buyer_shipping,
            pod_base: request.pod_base,
            pod_ship: request.pod_ship,
            fees: fees.to_settings(),
        },
        outputs,
    })
}

// ============================================================================
// Optimizer
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub product_type: String,
    pub target_profit: Option<Decimal>,
    pub min_profit: Option<Decimal>,
    pub max_profit: Option<Decimal>,
    pub pod_base: Option<Decimal>,
    pub pod_ship: Option<Decimal>,
    pub buyer_shipping: Option<Decimal>,
    /// Candidate price to check against the profit range
    pub item_price: Option<Decimal>,
    #[serde(default)]
    pub fee_overrides: FeeSettings,
}

/// Resolved inputs the menu was computed from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeInputs {
    pub product_type: String,
    pub costs: CostBasis,
    pub profit_bounds: ProfitBounds,
    pub profile_targets: ProfitTargets,
    pub fees: FeeSettings,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    /// Product type as sent by the caller
    pub requested_product_type: String,
    /// Profile actually used
    pub resolved_product_type: String,
    pub product_label: String,
    /// `false` when the default profile was substituted for an unknown type
    pub product_type_recognized: bool,
    /// Advisory only
    pub competitive_range: CompetitiveRange,
    pub break_even_price: Option<Decimal>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_pricing: Option<CandidateEvaluation>,
    pub pricing_tiers: PricingTiers,
    pub market_insights: MarketInsights,
    pub inputs: OptimizeInputs,
}

fn validate_optimize(request: &OptimizeRequest) -> PricingOutcome<()> {
    let optional_amounts = [
        ("targetProfit", request.target_profit),
        ("minProfit", request.min_profit),
        ("maxProfit", request.max_profit),
        ("podBase", request.pod_base),
        ("podShip", request.pod_ship),
        ("buyerShipping", request.buyer_shipping),
        ("itemPrice", request.item_price),
    ];
    for (field, value) in optional_amounts {
        if let Some(v) = value {
            ensure_amount(field, v)?;
        }
    }
    request.fee_overrides.validate("feeOverrides")
}

pub fn optimize_pricing(
    request: &OptimizeRequest,
    fee_defaults: &FeeSettings,
) -> PricingOutcome<OptimizeResponse> {
    validate_optimize(request)?;

    let matched = lookup(&request.product_type);
    let profile = matched.profile;

    let costs = CostBasis::new(
        request.pod_base.unwrap_or(profile.costs.pod_base_cost),
        request.pod_ship.unwrap_or(profile.costs.pod_shipping_cost),
        request.buyer_shipping.unwrap_or(profile.costs.buyer_shipping),
    );
    let bounds = ProfitBounds::with_fallback(
        request.min_profit,
        request.target_profit,
        request.max_profit,
        &profile.targets,
    );
    if bounds.min > bounds.max {
        return Err(PricingError::invalid(
            "minProfit",
            format!(
                "minimum profit {} exceeds maximum profit {}",
                bounds.min, bounds.max
            ),
        ));
    }

    let fees = FeeModel::resolve(&request.fee_overrides, fee_defaults);
    let tiers = build_tiers(&costs, &fees, &profile.targets, &bounds)?;
    let current_pricing = request
        .item_price
        .map(|price| evaluate_candidate(price, &costs, &fees, &bounds));

    let recommendation =
        recommendation_text(profile.label, &tiers, current_pricing.as_ref(), &bounds);

    info!(
        requested = %request.product_type,
        profile = profile.key,
        recognized = matched.recognized,
        optimal = %tiers.recommended.optimal.item_price,
        "Optimized pricing"
    );

    Ok(OptimizeResponse {
        market_insights: MarketInsights {
            requested_product_type: request.product_type.clone(),
            resolved_product_type: profile.key.to_string(),
            product_label: profile.label.to_string(),
            product_type_recognized: matched.recognized,
            competitive_range: competitive_range(&tiers),
            break_even_price: tiers.recommended.optimal.break_even_price,
            recommendation,
        },
        inputs: OptimizeInputs {
            product_type: profile.key.to_string(),
            costs,
            profit_bounds: bounds,
            profile_targets: profile.targets,
            fees: fees.to_settings(),
        },
        current_pricing,
        pricing_tiers: tiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::Percent;
    use rust_decimal_macros::dec;

    fn reference_request() -> ProfitRequest {
        ProfitRequest {
            item_price: dec!(24.95),
            buyer_shipping: dec!(6.95),
            pod_base: dec!(12.20),
            pod_ship: dec!(7.50),
            fee_overrides: FeeSettings::default(),
        }
    }

    #[test]
    fn test_calculate_profit_reference() {
        let response = calculate_profit(&reference_request(), &FeeSettings::default()).unwrap();
        assert_eq!(response.outputs.profit, dec!(8.57));
        assert_eq!(response.outputs.total_fees, dec!(3.63));
        assert_eq!(response.inputs.fees.transaction_fee_pct, Some(Percent(dec!(6.5))));
    }

    #[test]
    fn test_calculate_profit_uses_configured_defaults() {
        let defaults = FeeSettings {
            offsite_ads_pct: Some(Percent(dec!(15))),
            ..Default::default()
        };
        let response = calculate_profit(&reference_request(), &defaults).unwrap();
        // 8.5695 − 0.15 × 31.90
        assert_eq!(response.outputs.profit, dec!(3.78));
    }

    #[test]
    fn test_calculate_profit_rejects_negative_price() {
        let request = ProfitRequest {
            item_price: dec!(-1),
            ..reference_request()
        };
        let err = calculate_profit(&request, &FeeSettings::default()).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { ref field, .. } if field == "itemPrice"));
    }

    #[test]
    fn test_calculate_profit_parses_camel_case_json() {
        let request: ProfitRequest = serde_json::from_str(
            r#"{"itemPrice": 24.95, "buyerShipping": 6.95, "podBase": 12.2, "podShip": 7.5,
                "feeOverrides": {"transactionFeePct": 6.5}}"#,
        )
        .unwrap();
        let response = calculate_profit(&request, &FeeSettings::default()).unwrap();
        assert_eq!(response.outputs.profit, dec!(8.57));
    }

    #[test]
    fn test_optimize_known_product() {
        let request = OptimizeRequest {
            product_type: "T-Shirt".to_string(),
            ..Default::default()
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();

        assert!(response.market_insights.product_type_recognized);
        assert_eq!(response.market_insights.resolved_product_type, "t-shirt");
        assert!(response.current_pricing.is_none());
        assert_eq!(response.pricing_tiers.recommended.optimal.item_price, dec!(24.32));
        assert_eq!(response.market_insights.break_even_price, Some(dec!(15.48)));
    }

    #[test]
    fn test_optimize_unknown_product_falls_back_visibly() {
        let request = OptimizeRequest {
            product_type: "beach towel".to_string(),
            ..Default::default()
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();
        assert!(!response.market_insights.product_type_recognized);
        assert_eq!(response.market_insights.requested_product_type, "beach towel");
        assert_eq!(response.market_insights.resolved_product_type, "generic");
    }

    #[test]
    fn test_optimize_candidate_classification() {
        let request = OptimizeRequest {
            product_type: "t-shirt".to_string(),
            min_profit: Some(dec!(5)),
            max_profit: Some(dec!(13)),
            item_price: Some(dec!(24.32)),
            ..Default::default()
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();
        let current = response.current_pricing.unwrap();
        assert_eq!(current.pricing.profit, dec!(8.00));
        assert!(current.in_range);

        let request = OptimizeRequest {
            item_price: Some(dec!(32.05)),
            ..request
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();
        let current = response.current_pricing.unwrap();
        assert!(current.pricing.profit > dec!(13));
        assert!(!current.meets_maximum);
        assert!(!current.in_range);
    }

    #[test]
    fn test_optimize_cost_overrides_replace_profile_costs() {
        let request = OptimizeRequest {
            product_type: "mug".to_string(),
            pod_base: Some(dec!(5)),
            ..Default::default()
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();
        assert_eq!(response.inputs.costs.pod_base_cost, dec!(5));
        assert_eq!(response.inputs.costs.pod_shipping_cost, dec!(8.95));
    }

    #[test]
    fn test_optimize_rejects_inverted_bounds() {
        let request = OptimizeRequest {
            product_type: "sticker".to_string(),
            min_profit: Some(dec!(10)),
            ..Default::default()
        };
        let err = optimize_pricing(&request, &FeeSettings::default()).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { ref field, .. } if field == "minProfit"));
    }

    #[test]
    fn test_optimize_degenerate_fees() {
        let request = OptimizeRequest {
            product_type: "mug".to_string(),
            fee_overrides: FeeSettings {
                transaction_fee_pct: Some(Percent(dec!(80))),
                payment_processing_pct: Some(Percent(dec!(20))),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = optimize_pricing(&request, &FeeSettings::default()).unwrap_err();
        assert!(matches!(err, PricingError::DegenerateFeeModel { .. }));
    }

    #[test]
    fn test_optimize_response_shape() {
        let request = OptimizeRequest {
            product_type: "hoodie".to_string(),
            item_price: Some(dec!(55)),
            ..Default::default()
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["currentPricing"]["inRange"].is_boolean());
        assert!(json["currentPricing"]["itemPrice"].is_number());
        assert!(json["pricingTiers"]["recommended"]["premium"]["profit"].is_number());
        assert!(json["marketInsights"]["competitiveRange"]["low"].is_number());
        assert!(json["marketInsights"]["recommendation"].is_string());
    }

    #[test]
    fn test_optimize_near_total_fees_from_json() {
        let request: OptimizeRequest = serde_json::from_str(
            r#"{"productType": "t-shirt", "podBase": 1000000,
                "feeOverrides": {"transactionFeePct": 99.99999999999,
                                 "paymentProcessingPct": 0.0000000000099999999999,
                                 "offsiteAdsPct": 0.0000000000000000000000009}}"#,
        )
        .unwrap();
        let err = optimize_pricing(&request, &FeeSettings::default()).unwrap_err();
        assert!(matches!(err, PricingError::DegenerateFeeModel { .. }));
    }

    #[test]
    fn test_optimize_free_blanks_give_negative_minimum_tier() {
        // Buyer shipping alone covers the $2 sticker minimum
        let request = OptimizeRequest {
            product_type: "sticker".to_string(),
            pod_base: Some(Decimal::ZERO),
            pod_ship: Some(Decimal::ZERO),
            ..Default::default()
        };
        let response = optimize_pricing(&request, &FeeSettings::default()).unwrap();
        let minimum = &response.pricing_tiers.minimum;
        assert_eq!(minimum.item_price, dec!(-0.08));
        assert_eq!(minimum.profit, dec!(2.00));
        assert_eq!(minimum.break_even_price, Some(dec!(-2.29)));
        assert_eq!(response.market_insights.competitive_range.low, dec!(-0.07));
    }
}
