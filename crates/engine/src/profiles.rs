//! Built-in product profiles: default costs and profit targets per product type
//!
//! Figures are AUD, based on typical print-provider pricing for the AU region.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::warn;

use crate::types::CostBasis;

/// Profile used when a product type is not recognised
pub const DEFAULT_PROFILE_KEY: &str = "generic";

/// Conservative / optimal / premium profit per sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitTargets {
    pub min: Decimal,
    pub optimal: Decimal,
    pub premium: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductProfile {
    pub key: &'static str,
    pub label: &'static str,
    pub aliases: &'static [&'static str],
    pub costs: CostBasis,
    pub targets: ProfitTargets,
}

/// Result of resolving a caller-supplied product type
#[derive(Debug, Clone, Copy)]
pub struct ProfileMatch {
    pub profile: &'static ProductProfile,
    /// `false` when the default profile was substituted
    pub recognized: bool,
}

#[allow(clippy::too_many_arguments)]
fn profile(
    key: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    base: Decimal,
    ship: Decimal,
    buyer_ship: Decimal,
    min: Decimal,
    optimal: Decimal,
    premium: Decimal,
) -> ProductProfile {
    ProductProfile {
        key,
        label,
        aliases,
        costs: CostBasis::new(base, ship, buyer_ship),
        targets: ProfitTargets {
            min,
            optimal,
            premium,
        },
    }
}

static PROFILES: LazyLock<Vec<ProductProfile>> = LazyLock::new(|| {
    vec![
        profile(
            "t-shirt",
            "T-Shirt",
            &["tshirt", "tee", "shirt", "unisex tee"],
            dec!(12.20),
            dec!(7.50),
            dec!(6.95),
            dec!(5),
            dec!(8),
            dec!(12),
        ),
        profile(
            "hoodie",
            "Hoodie",
            &["hooded sweatshirt", "sweatshirt", "jumper"],
            dec!(28.50),
            dec!(9.95),
            dec!(9.95),
            dec!(10),
            dec!(15),
            dec!(22),
        ),
        profile(
            "mug",
            "Mug",
            &["coffee mug", "ceramic mug", "cup"],
            dec!(9.80),
            dec!(8.95),
            dec!(7.95),
            dec!(4),
            dec!(7),
            dec!(10),
        ),
        profile(
            "tote-bag",
            "Tote Bag",
            &["tote", "canvas bag", "bag"],
            dec!(11.40),
            dec!(7.50),
            dec!(6.95),
            dec!(5),
            dec!(8),
            dec!(11),
        ),
        profile(
            "poster",
            "Poster",
            &["print", "art print", "wall art"],
            dec!(8.60),
            dec!(6.50),
            dec!(5.95),
            dec!(4),
            dec!(7),
            dec!(11),
        ),
        profile(
            "phone-case",
            "Phone Case",
            &["iphone case", "case"],
            dec!(10.90),
            dec!(5.50),
            dec!(4.95),
            dec!(5),
            dec!(8),
            dec!(12),
        ),
        profile(
            "sticker",
            "Sticker",
            &["decal", "vinyl sticker"],
            dec!(2.40),
            dec!(2.50),
            dec!(2.95),
            dec!(2),
            dec!(3.50),
            dec!(5),
        ),
        profile(
            DEFAULT_PROFILE_KEY,
            "Generic Product",
            &[],
            dec!(12.00),
            dec!(7.50),
            dec!(6.95),
            dec!(5),
            dec!(8),
            dec!(12),
        ),
    ]
});

/// All built-in profiles, default profile last
pub fn all_profiles() -> &'static [ProductProfile] {
    PROFILES.as_slice()
}

pub fn default_profile() -> &'static ProductProfile {
    find(DEFAULT_PROFILE_KEY).unwrap_or(&PROFILES[PROFILES.len() - 1])
}

/// Lowercase, trim, and fold `-`/`_`/repeated whitespace into single spaces
fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn find(product_type: &str) -> Option<&'static ProductProfile> {
    let wanted = normalize(product_type);
    if wanted.is_empty() {
        return None;
    }
    let matches = |p: &&ProductProfile| {
        normalize(p.key) == wanted || p.aliases.iter().any(|a| normalize(a) == wanted)
    };
    PROFILES.iter().find(matches).or_else(|| {
        // Plural forms: "mugs", "tote bags"
        let singular = wanted.strip_suffix('s')?;
        PROFILES.iter().find(|p| {
            normalize(p.key) == singular || p.aliases.iter().any(|a| normalize(a) == singular)
        })
    })
}

/// Resolve a product type, falling back to the default profile.
pub fn lookup(product_type: &str) -> ProfileMatch {
    match find(product_type) {
        Some(profile) => ProfileMatch {
            profile,
            recognized: true,
        },
        None => {
            warn!(
                product_type,
                fallback = DEFAULT_PROFILE_KEY,
                "Unknown product type, using default profile"
            );
            ProfileMatch {
                profile: default_profile(),
                recognized: false,
            }
        }
    }
}
