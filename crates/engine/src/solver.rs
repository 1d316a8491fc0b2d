//! Inverse solver: target profit → item price
//!
//! Percentage fees apply to buyer shipping as well as the item price, and
//! buyer shipping counts toward gross. With p = transactionPct + paymentPct +
//! offsiteAdsPct and r = 1 − p, profit = r·(itemPrice + buyerShipping) −
//! costOfGoods − listingFee − paymentFixed, so:
//!
//! itemPrice = (costOfGoods + listingFee + paymentFixed + targetProfit + p·buyerShipping) / r − buyerShipping / r
//!           = (costOfGoods + listingFee + paymentFixed + targetProfit) / r − buyerShipping
//!
//! A negative result means buyer shipping alone already covers the target.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculator::evaluate;
use crate::error::{PricingError, PricingOutcome};
use crate::fees::FeeModel;
use crate::types::{round_money, CostBasis, PricingResult};

/// Largest gross revenue the solver will report. Fee models that keep only a
/// sliver of each sale push the solved price past this and are treated as degenerate.
pub const MAX_SOLVED_GROSS: Decimal = dec!(1000000000000);

fn degenerate(fees: &FeeModel) -> PricingError {
    let percentage_total = round_money(fees.percentage_total() * Decimal::ONE_HUNDRED);
    warn!(%percentage_total, retained = %fees.retained_fraction(), "Fee model leaves no usable revenue");
    PricingError::DegenerateFeeModel { percentage_total }
}

/// Solve for the item price that yields exactly `target_profit`.
///
/// Fails with [`PricingError::DegenerateFeeModel`] when percentage fees
/// total 100% or more, or so close to it that the required gross exceeds
/// [`MAX_SOLVED_GROSS`].
pub fn solve_item_price(
    target_profit: Decimal,
    costs: &CostBasis,
    fees: &FeeModel,
) -> PricingOutcome<Decimal> {
    let retained = fees.retained_fraction();
    if retained <= Decimal::ZERO {
        return Err(degenerate(fees));
    }

    let required_gross = (costs.cost_of_goods() + fees.fixed_fees() + target_profit)
        .checked_div(retained)
        .filter(|gross| gross.abs() <= MAX_SOLVED_GROSS)
        .ok_or_else(|| degenerate(fees))?;
    let item_price = required_gross - costs.buyer_shipping;

    debug!(
        target = %target_profit,
        price = %item_price,
        retained = %retained,
        "Solved item price"
    );

    Ok(item_price)
}

/// Item price at which profit is exactly zero
pub fn break_even_price(costs: &CostBasis, fees: &FeeModel) -> PricingOutcome<Decimal> {
    solve_item_price(Decimal::ZERO, costs, fees)
}

/// Solve for `target_profit` and evaluate the solved price for output.
pub fn price_for_profit(
    target_profit: Decimal,
    costs: &CostBasis,
    fees: &FeeModel,
) -> PricingOutcome<PricingResult> {
    let item_price = solve_item_price(target_profit, costs, fees)?;
    let break_even = break_even_price(costs, fees)?;
    let breakdown = evaluate(item_price, costs, fees);
    Ok(PricingResult::from_breakdown(&breakdown, Some(break_even)))
}
