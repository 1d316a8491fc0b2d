//! Seller settings repository — key/value store

use crate::DbResult;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// Repository for seller-level settings
pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a single value
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM seller_settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(|(v,)| v))
    }

    /// Get every setting whose key starts with `prefix`
    pub async fn get_prefixed(&self, prefix: &str) -> DbResult<BTreeMap<String, String>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM seller_settings WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )
        .bind(prefix)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Insert or replace a value
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"INSERT INTO seller_settings (key, value, updated_at)
               VALUES (?1, ?2, strftime('%s', 'now'))
               ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = strftime('%s', 'now')
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Write several values in one transaction
    pub async fn set_many(&self, entries: &[(String, String)]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(
                r#"INSERT INTO seller_settings (key, value, updated_at)
                   VALUES (?1, ?2, strftime('%s', 'now'))
                   ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = strftime('%s', 'now')
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Remove a value. Returns `true` if it existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM seller_settings WHERE key = ?1")
            .bind(key)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let db = Database::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db.pool());

        assert_eq!(repo.get("fees.listing_fee").await.unwrap(), None);

        repo.set("fees.listing_fee", "0.30").await.unwrap();
        repo.set("fees.listing_fee", "0.25").await.unwrap();
        assert_eq!(
            repo.get("fees.listing_fee").await.unwrap().as_deref(),
            Some("0.25")
        );
        assert_eq!(repo.get_prefixed("fees.").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prefixed_lookup() {
        let db = Database::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db.pool());

        repo.set_many(&[
            ("fees.listing_fee".to_string(), "0.30".to_string()),
            ("fees.offsite_ads_pct".to_string(), "15".to_string()),
            ("shop.currency".to_string(), "AUD".to_string()),
        ])
        .await
        .unwrap();

        let fees = repo.get_prefixed("fees.").await.unwrap();
        assert_eq!(fees.len(), 2);
        assert_eq!(fees.get("fees.offsite_ads_pct").map(String::as_str), Some("15"));
        assert!(!fees.contains_key("shop.currency"));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db.pool());

        repo.set("fees.listing_fee", "0.30").await.unwrap();
        assert!(repo.delete("fees.listing_fee").await.unwrap());
        assert!(!repo.delete("fees.listing_fee").await.unwrap());
        assert_eq!(repo.get("fees.listing_fee").await.unwrap(), None);
    }
}
