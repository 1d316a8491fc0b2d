//! Forward calculator: item price → fees and profit
//!
//! gross  = itemPrice + buyerShipping
//! fees   = listingFee + transactionPct·gross + (paymentPct·gross + paymentFixed) + offsiteAdsPct·gross
//! profit = gross − costOfGoods − fees

use rust_decimal::Decimal;

use crate::fees::FeeModel;
use crate::solver::break_even_price;
use crate::types::{CostBasis, ForwardBreakdown, PricingResult};

/// Evaluate an item price at full precision. Negative profit is a valid result.
pub fn evaluate(item_price: Decimal, costs: &CostBasis, fees: &FeeModel) -> ForwardBreakdown {
    let gross_revenue = item_price + costs.buyer_shipping;

    let transaction_fee = fees.transaction_pct * gross_revenue;
    let processing_fee = fees.payment_pct * gross_revenue + fees.payment_fixed;
    let offsite_ads_fee = fees.offsite_ads_pct * gross_revenue;
    let total_fees = fees.listing_fee + transaction_fee + processing_fee + offsite_ads_fee;

    let cost_of_goods = costs.cost_of_goods();
    let profit = gross_revenue - cost_of_goods - total_fees;

    ForwardBreakdown {
        item_price,
        buyer_shipping: costs.buyer_shipping,
        gross_revenue,
        transaction_fee,
        processing_fee,
        offsite_ads_fee,
        listing_fee: fees.listing_fee,
        total_fees,
        cost_of_goods,
        profit,
    }
}

/// Evaluate an item price and round for output. The break-even price is
/// attached when the fee model is solvable.
pub fn calculate(item_price: Decimal, costs: &CostBasis, fees: &FeeModel) -> PricingResult {
    let breakdown = evaluate(item_price, costs, fees);
    PricingResult::from_breakdown(&breakdown, break_even_price(costs, fees).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::{FeeSettings, Percent};
    use rust_decimal_macros::dec;

    fn tee_costs() -> CostBasis {
        CostBasis::new(dec!(12.20), dec!(7.50), dec!(6.95))
    }

    #[test]
    fn test_au_reference_trace() {
        let result = calculate(dec!(24.95), &tee_costs(), &FeeModel::default());

        assert_eq!(result.gross_revenue, dec!(31.90));
        assert_eq!(result.transaction_fee, dec!(2.07));
        assert_eq!(result.processing_fee, dec!(1.26));
        assert_eq!(result.offsite_ads_fee, dec!(0.00));
        assert_eq!(result.listing_fee, dec!(0.30));
        assert_eq!(result.total_fees, dec!(3.63));
        assert_eq!(result.cost_of_goods, dec!(19.70));
        assert_eq!(result.profit, dec!(8.57));
        // 8.5695 / 31.90 × 100
        assert_eq!(result.margin_pct, Some(dec!(26.86)));
    }

    #[test]
    fn test_full_precision_is_kept_internally() {
        let breakdown = evaluate(dec!(24.95), &tee_costs(), &FeeModel::default());
        assert_eq!(breakdown.transaction_fee, dec!(2.0735));
        assert_eq!(breakdown.processing_fee, dec!(1.257));
        assert_eq!(breakdown.total_fees, dec!(3.6305));
        assert_eq!(breakdown.profit, dec!(8.5695));
    }

    #[test]
    fn test_negative_profit_is_reported() {
        let result = calculate(dec!(5.00), &tee_costs(), &FeeModel::default());
        assert!(result.profit < Decimal::ZERO);
        assert!(result.margin_pct.unwrap() < Decimal::ZERO);
    }

    #[test]
    fn test_zero_gross_has_no_margin() {
        let costs = CostBasis::new(dec!(3), dec!(1), Decimal::ZERO);
        let result = calculate(Decimal::ZERO, &costs, &FeeModel::default());
        assert_eq!(result.gross_revenue, Decimal::ZERO);
        assert_eq!(result.margin_pct, None);
        // listing + fixed processing still charged
        assert_eq!(result.total_fees, dec!(0.60));
        assert_eq!(result.profit, dec!(-4.60));
    }

    #[test]
    fn test_sub_cent_gross_margin_does_not_overflow() {
        let costs = CostBasis::new(dec!(1000000000), Decimal::ZERO, Decimal::ZERO);
        let result = calculate(
            dec!(0.0000000000000000000001),
            &costs,
            &FeeModel::default(),
        );
        assert_eq!(result.gross_revenue, dec!(0.00));
        assert_eq!(result.margin_pct, None);
        assert_eq!(result.profit, dec!(-1000000000.60));
    }

    #[test]
    fn test_offsite_ads_applies_to_shipping_too() {
        let overrides = FeeSettings {
            offsite_ads_pct: Some(Percent(dec!(15))),
            ..Default::default()
        };
        let fees = FeeModel::resolve(&overrides, &FeeSettings::default());
        let breakdown = evaluate(dec!(24.95), &tee_costs(), &fees);
        assert_eq!(breakdown.offsite_ads_fee, dec!(4.785));
    }

    #[test]
    fn test_profit_strictly_increases_with_price() {
        let fees = FeeModel::default();
        let costs = tee_costs();
        let mut previous = evaluate(Decimal::ZERO, &costs, &fees).profit;
        for cents in (50..=10_000).step_by(50) {
            let price = Decimal::new(cents, 2);
            let profit = evaluate(price, &costs, &fees).profit;
            assert!(profit > previous, "profit did not increase at {}", price);
            previous = profit;
        }
    }

    #[test]
    fn test_degenerate_fees_have_no_break_even() {
        let overrides = FeeSettings {
            transaction_fee_pct: Some(Percent(dec!(97))),
            ..Default::default()
        };
        let fees = FeeModel::resolve(&overrides, &FeeSettings::default());
        let result = calculate(dec!(24.95), &tee_costs(), &fees);
        assert_eq!(result.break_even_price, None);
    }
}
