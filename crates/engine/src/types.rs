//! Value types shared by the calculator, solver, and optimizer

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, PricingOutcome};

/// Round a monetary or percentage value to 2 decimal places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// What a single order costs the seller to fulfil, plus what the buyer pays for shipping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBasis {
    /// Per-unit price charged by the print provider
    pub pod_base_cost: Decimal,
    /// Provider's shipping charge to fulfil the order
    pub pod_shipping_cost: Decimal,
    /// Shipping charged to the buyer; part of gross, subject to percentage fees
    pub buyer_shipping: Decimal,
}

impl CostBasis {
    pub fn new(pod_base_cost: Decimal, pod_shipping_cost: Decimal, buyer_shipping: Decimal) -> Self {
        Self {
            pod_base_cost,
            pod_shipping_cost,
            buyer_shipping,
        }
    }

    pub fn cost_of_goods(&self) -> Decimal {
        self.pod_base_cost + self.pod_shipping_cost
    }

    pub fn validate(&self) -> PricingOutcome<()> {
        ensure_amount("podBase", self.pod_base_cost)?;
        ensure_amount("podShip", self.pod_shipping_cost)?;
        ensure_amount("buyerShipping", self.buyer_shipping)?;
        Ok(())
    }
}

/// Full-precision forward evaluation. Never rounded; convert with
/// [`PricingResult::from_breakdown`] at the output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardBreakdown {
    pub item_price: Decimal,
    pub buyer_shipping: Decimal,
    pub gross_revenue: Decimal,
    pub transaction_fee: Decimal,
    pub processing_fee: Decimal,
    pub offsite_ads_fee: Decimal,
    pub listing_fee: Decimal,
    pub total_fees: Decimal,
    pub cost_of_goods: Decimal,
    pub profit: Decimal,
}

impl ForwardBreakdown {
    /// Profit as a percentage of gross; `None` when there is no gross to divide by
    /// or the ratio is too large to represent
    pub fn margin_pct(&self) -> Option<Decimal> {
        if self.gross_revenue <= Decimal::ZERO {
            return None;
        }
        self.profit
            .checked_div(self.gross_revenue)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// A priced order as reported to callers. All values rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub item_price: Decimal,
    pub buyer_shipping: Decimal,
    pub gross_revenue: Decimal,
    pub transaction_fee: Decimal,
    pub processing_fee: Decimal,
    pub offsite_ads_fee: Decimal,
    pub listing_fee: Decimal,
    pub total_fees: Decimal,
    pub cost_of_goods: Decimal,
    pub profit: Decimal,
    /// `null` when gross revenue is zero
    pub margin_pct: Option<Decimal>,
    /// `null` when the fee model leaves nothing to solve with
    pub break_even_price: Option<Decimal>,
}

impl PricingResult {
    pub fn from_breakdown(breakdown: &ForwardBreakdown, break_even_price: Option<Decimal>) -> Self {
        Self {
            item_price: round_money(breakdown.item_price),
            buyer_shipping: round_money(breakdown.buyer_shipping),
            gross_revenue: round_money(breakdown.gross_revenue),
            transaction_fee: round_money(breakdown.transaction_fee),
            processing_fee: round_money(breakdown.processing_fee),
            offsite_ads_fee: round_money(breakdown.offsite_ads_fee),
            listing_fee: round_money(breakdown.listing_fee),
            total_fees: round_money(breakdown.total_fees),
            cost_of_goods: round_money(breakdown.cost_of_goods),
            profit: round_money(breakdown.profit),
            margin_pct: breakdown.margin_pct().map(round_money),
            break_even_price: break_even_price.map(round_money),
        }
    }
}
