//! Environment configuration
//!
//! Fee defaults are read as whole-number percentages / currency amounts.
//! Unset variables stay `None` so the engine's built-in schedule applies.

use engine::{FeeSettings, Percent};
use rust_decimal::Decimal;
use std::env::VarError;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_LISTING_FEE: &str = "ETSY_LISTING_FEE";
pub const ENV_TRANSACTION_PCT: &str = "ETSY_TRANSACTION_FEE_PCT";
pub const ENV_PAYMENT_PCT: &str = "ETSY_PAYMENT_PROCESSING_PCT";
pub const ENV_PAYMENT_FIXED: &str = "ETSY_PAYMENT_PROCESSING_FIXED";
pub const ENV_OFFSITE_ADS_PCT: &str = "ETSY_OFFSITE_ADS_PCT";
pub const ENV_DB_PATH: &str = "POD_PRICER_DB_PATH";

const DEFAULT_DB_PATH: &str = "data/pod-pricer.db";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Fee defaults from the environment; stored seller settings layer over these
    pub fee_defaults: FeeSettings,
    pub db_path: PathBuf,
}

/// Load `.env`, then read configuration from the process environment.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Parse configuration through `lookup`, so tests can pass a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let decimal = |var: &str| -> Result<Option<Decimal>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim())
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            _ => Ok(None),
        }
    };

    let fee_defaults = FeeSettings {
        listing_fee: decimal(ENV_LISTING_FEE)?,
        transaction_fee_pct: decimal(ENV_TRANSACTION_PCT)?.map(Percent),
        payment_processing_pct: decimal(ENV_PAYMENT_PCT)?.map(Percent),
        payment_processing_fixed: decimal(ENV_PAYMENT_FIXED)?,
        offsite_ads_pct: decimal(ENV_OFFSITE_ADS_PCT)?.map(Percent),
    };
    fee_defaults
        .validate("env")
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "fee defaults".to_string(),
            reason: e.to_string(),
        })?;

    let db_path = lookup(ENV_DB_PATH)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    Ok(AppConfig {
        fee_defaults,
        db_path: PathBuf::from(db_path),
    })
}
