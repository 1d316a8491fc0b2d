//! POD Pricing Engine — marketplace fees, profit, and price solving
//!
//! Pure, synchronous computations over `Decimal`:
//! - Fee model resolution (request overrides → configured defaults → built-in schedule)
//! - Forward calculator: item price → fees, profit, margin
//! - Inverse solver: target profit → item price, break-even
//! - Tiered recommendations per product profile

pub mod calculator;
pub mod error;
pub mod fees;
pub mod optimizer;
pub mod profiles;
pub mod quote;
pub mod solver;
pub mod types;

// Re-exports for convenience
pub use calculator::{calculate, evaluate};
pub use error::{PricingError, PricingOutcome};
pub use fees::{FeeModel, FeeSettings, Percent};
pub use optimizer::{
    build_tiers, competitive_range, evaluate_candidate, recommendation_text, CandidateEvaluation,
    CompetitiveRange, PricingTiers, ProfitBounds, RecommendedTiers,
};
pub use profiles::{all_profiles, lookup, ProductProfile, ProfileMatch, ProfitTargets};
pub use quote::{
    calculate_profit, optimize_pricing, MarketInsights, OptimizeRequest, OptimizeResponse,
    ProfitRequest, ProfitResponse,
};
pub use solver::{break_even_price, price_for_profit, solve_item_price};
pub use types::*;
