//! Seller fee defaults kept in the settings store

use engine::{FeeSettings, Percent};
use persistence::repository::SettingsRepository;
use persistence::{DbResult, SqlitePool};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

use crate::config::AppConfig;

pub const FEE_PREFIX: &str = "fees.";
const KEY_LISTING_FEE: &str = "fees.listing_fee";
const KEY_TRANSACTION_PCT: &str = "fees.transaction_fee_pct";
const KEY_PAYMENT_PCT: &str = "fees.payment_processing_pct";
const KEY_PAYMENT_FIXED: &str = "fees.payment_processing_fixed";
const KEY_OFFSITE_ADS_PCT: &str = "fees.offsite_ads_pct";

const FEE_KEYS: [&str; 5] = [
    KEY_LISTING_FEE,
    KEY_TRANSACTION_PCT,
    KEY_PAYMENT_PCT,
    KEY_PAYMENT_FIXED,
    KEY_OFFSITE_ADS_PCT,
];

fn parse_stored(entries: &BTreeMap<String, String>, key: &str) -> Option<Decimal> {
    let raw = entries.get(key)?;
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring unparseable stored fee setting");
            None
        }
    }
}

/// Build fee settings from stored `fees.*` entries. Unparseable values are skipped.
pub fn fee_settings_from_entries(entries: &BTreeMap<String, String>) -> FeeSettings {
    FeeSettings {
        listing_fee: parse_stored(entries, KEY_LISTING_FEE),
        transaction_fee_pct: parse_stored(entries, KEY_TRANSACTION_PCT).map(Percent),
        payment_processing_pct: parse_stored(entries, KEY_PAYMENT_PCT).map(Percent),
        payment_processing_fixed: parse_stored(entries, KEY_PAYMENT_FIXED),
        offsite_ads_pct: parse_stored(entries, KEY_OFFSITE_ADS_PCT).map(Percent),
    }
}

/// Key/value pairs for every field set in `settings`
pub fn fee_settings_to_entries(settings: &FeeSettings) -> Vec<(String, String)> {
    let fields = [
        (KEY_LISTING_FEE, settings.listing_fee),
        (KEY_TRANSACTION_PCT, settings.transaction_fee_pct.map(|p| p.0)),
        (KEY_PAYMENT_PCT, settings.payment_processing_pct.map(|p| p.0)),
        (KEY_PAYMENT_FIXED, settings.payment_processing_fixed),
        (KEY_OFFSITE_ADS_PCT, settings.offsite_ads_pct.map(|p| p.0)),
    ];
    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.normalize().to_string())))
        .collect()
}

pub async fn stored_fee_settings(pool: &SqlitePool) -> DbResult<FeeSettings> {
    let entries = SettingsRepository::new(pool).get_prefixed(FEE_PREFIX).await?;
    Ok(fee_settings_from_entries(&entries))
}

pub async fn save_fee_settings(pool: &SqlitePool, settings: &FeeSettings) -> DbResult<()> {
    SettingsRepository::new(pool)
        .set_many(&fee_settings_to_entries(settings))
        .await
}

/// Remove every stored fee setting; returns how many existed
pub async fn clear_fee_settings(pool: &SqlitePool) -> DbResult<usize> {
    let repo = SettingsRepository::new(pool);
    let mut removed = 0;
    for key in FEE_KEYS {
        if repo.delete(key).await? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Fee defaults handed to the engine: stored seller settings over environment values
pub async fn effective_fee_defaults(config: &AppConfig, pool: &SqlitePool) -> DbResult<FeeSettings> {
    let stored = stored_fee_settings(pool).await?;
    Ok(stored.layered_over(&config.fee_defaults))
}
