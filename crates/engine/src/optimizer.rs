//! Tiered price recommendations
//!
//! Runs the inverse solver at several profit targets to build a pricing menu,
//! classifies a candidate price against the seller's profit range, and writes
//! a templated recommendation from the optimal tier.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;

use crate::calculator::calculate;
use crate::error::PricingOutcome;
use crate::fees::FeeModel;
use crate::profiles::ProfitTargets;
use crate::solver::price_for_profit;
use crate::types::{round_money, CostBasis, PricingResult};

/// The seller's acceptable profit window for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitBounds {
    pub min: Decimal,
    pub target: Decimal,
    pub max: Decimal,
}

impl ProfitBounds {
    /// Caller-supplied bounds, each falling back to the profile's targets
    pub fn with_fallback(
        min: Option<Decimal>,
        target: Option<Decimal>,
        max: Option<Decimal>,
        targets: &ProfitTargets,
    ) -> Self {
        Self {
            min: min.unwrap_or(targets.min),
            target: target.unwrap_or(targets.optimal),
            max: max.unwrap_or(targets.premium),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTiers {
    pub conservative: PricingResult,
    pub optimal: PricingResult,
    pub premium: PricingResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTiers {
    pub minimum: PricingResult,
    pub target: PricingResult,
    pub maximum: PricingResult,
    pub recommended: RecommendedTiers,
}

/// A specific price point checked against the profit window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEvaluation {
    #[serde(flatten)]
    pub pricing: PricingResult,
    pub meets_minimum: bool,
    pub meets_maximum: bool,
    pub in_range: bool,
}

/// Advisory price band for comparing against similar listings. Not a guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveRange {
    pub low: Decimal,
    pub high: Decimal,
    pub average: Decimal,
}

/// Solve every tier. Bounds feed minimum/target/maximum; the profile's
/// targets feed the recommended conservative/optimal/premium set.
pub fn build_tiers(
    costs: &CostBasis,
    fees: &FeeModel,
    targets: &ProfitTargets,
    bounds: &ProfitBounds,
) -> PricingOutcome<PricingTiers> {
    let tiers = PricingTiers {
        minimum: price_for_profit(bounds.min, costs, fees)?,
        target: price_for_profit(bounds.target, costs, fees)?,
        maximum: price_for_profit(bounds.max, costs, fees)?,
        recommended: RecommendedTiers {
            conservative: price_for_profit(targets.min, costs, fees)?,
            optimal: price_for_profit(targets.optimal, costs, fees)?,
            premium: price_for_profit(targets.premium, costs, fees)?,
        },
    };

    info!(
        minimum = %tiers.minimum.item_price,
        target = %tiers.target.item_price,
        maximum = %tiers.maximum.item_price,
        optimal = %tiers.recommended.optimal.item_price,
        "Built pricing tiers"
    );

    Ok(tiers)
}

/// Price a candidate and classify its profit against the bounds.
pub fn evaluate_candidate(
    item_price: Decimal,
    costs: &CostBasis,
    fees: &FeeModel,
    bounds: &ProfitBounds,
) -> CandidateEvaluation {
    let pricing = calculate(item_price, costs, fees);
    let meets_minimum = pricing.profit >= bounds.min;
    let meets_maximum = pricing.profit <= bounds.max;

    CandidateEvaluation {
        pricing,
        meets_minimum,
        meets_maximum,
        in_range: meets_minimum && meets_maximum,
    }
}

/// 10% under the minimum tier up to 10% over the premium tier, centred on optimal.
pub fn competitive_range(tiers: &PricingTiers) -> CompetitiveRange {
    CompetitiveRange {
        low: round_money(tiers.minimum.item_price.saturating_mul(dec!(0.9))),
        high: round_money(tiers.recommended.premium.item_price.saturating_mul(dec!(1.1))),
        average: tiers.recommended.optimal.item_price,
    }
}

fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}

/// Deterministic summary built from the optimal tier and, if given, the candidate.
pub fn recommendation_text(
    product_label: &str,
    tiers: &PricingTiers,
    candidate: Option<&CandidateEvaluation>,
    bounds: &ProfitBounds,
) -> String {
    let optimal = &tiers.recommended.optimal;
    let margin = optimal
        .margin_pct
        .map(|m| format!(" ({:.1}% margin)", m))
        .unwrap_or_default();

    let mut text = format!(
        "List your {} at {} to earn {} profit per sale{}.",
        product_label.to_lowercase(),
        money(optimal.item_price),
        money(optimal.profit),
        margin,
    );

    if let Some(be) = optimal.break_even_price {
        text.push_str(&format!(" Anything below {} loses money.", money(be)));
    }

    if let Some(c) = candidate {
        let price = money(c.pricing.item_price);
        let profit = money(c.pricing.profit);
        if !c.meets_minimum {
            text.push_str(&format!(
                " Your price of {} earns {}, below your {} minimum; raise it to at least {}.",
                price,
                profit,
                money(bounds.min),
                money(tiers.minimum.item_price),
            ));
        } else if !c.meets_maximum {
            text.push_str(&format!(
                " Your price of {} earns {}, above your {} ceiling; expect slower sales above {}.",
                price,
                profit,
                money(bounds.max),
                money(tiers.maximum.item_price),
            ));
        } else {
            text.push_str(&format!(
                " Your price of {} earns {}, inside your target range.",
                price, profit,
            ));
        }
    }

    text
}
