//! Pricing history repository — log of optimizer runs

use crate::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// One optimizer run. Amounts are decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PricingHistoryRecord {
    pub id: Option<i64>,
    pub product_type: String,
    pub resolved_profile: String,
    pub recognized: bool,
    pub target_profit: String,
    pub optimal_price: String,
    pub optimal_profit: String,
    pub optimal_margin_pct: Option<String>,
    pub candidate_price: Option<String>,
    pub candidate_in_range: Option<bool>,
    pub created_at: Option<i64>,
}

/// Repository for optimizer history
pub struct PricingHistoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PricingHistoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a run; returns its row id
    pub async fn save(&self, record: &PricingHistoryRecord) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO pricing_history (
                product_type, resolved_profile, recognized, target_profit,
                optimal_price, optimal_profit, optimal_margin_pct,
                candidate_price, candidate_in_range
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.product_type)
        .bind(&record.resolved_profile)
        .bind(record.recognized)
        .bind(&record.target_profit)
        .bind(&record.optimal_price)
        .bind(&record.optimal_profit)
        .bind(&record.optimal_margin_pct)
        .bind(&record.candidate_price)
        .bind(record.candidate_in_range)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Most recent runs first, optionally for one resolved profile
    pub async fn recent(
        &self,
        limit: i64,
        resolved_profile: Option<&str>,
    ) -> DbResult<Vec<PricingHistoryRecord>> {
        if limit <= 0 {
            return Err(DbError::Query(format!("limit must be positive, got {limit}")));
        }

        let records = match resolved_profile {
            Some(profile) => {
                sqlx::query_as::<_, PricingHistoryRecord>(
                    r#"SELECT * FROM pricing_history
                       WHERE resolved_profile = ?1
                       ORDER BY created_at DESC, id DESC
                       LIMIT ?2"#,
                )
                .bind(profile)
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PricingHistoryRecord>(
                    "SELECT * FROM pricing_history ORDER BY created_at DESC, id DESC LIMIT ?1",
                )
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(records)
    }

    /// Number of stored runs, optionally for one resolved profile
    pub async fn count(&self, resolved_profile: Option<&str>) -> DbResult<i64> {
        let row: (i64,) = match resolved_profile {
            Some(profile) => {
                sqlx::query_as("SELECT COUNT(*) FROM pricing_history WHERE resolved_profile = ?1")
                    .bind(profile)
                    .fetch_one(self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM pricing_history")
                    .fetch_one(self.pool)
                    .await?
            }
        };
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn record(product_type: &str, profile: &str, price: &str) -> PricingHistoryRecord {
        PricingHistoryRecord {
            id: None,
            product_type: product_type.to_string(),
            resolved_profile: profile.to_string(),
            recognized: profile != "generic",
            target_profit: "8".to_string(),
            optimal_price: price.to_string(),
            optimal_profit: "8.00".to_string(),
            optimal_margin_pct: Some("25.58".to_string()),
            candidate_price: None,
            candidate_in_range: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_recent() {
        let db = Database::in_memory().await.unwrap();
        let repo = PricingHistoryRepository::new(db.pool());

        repo.save(&record("tee", "t-shirt", "24.32")).await.unwrap();
        repo.save(&record("mug", "mug", "21.53")).await.unwrap();
        let id = repo
            .save(&record("beach towel", "generic", "24.10"))
            .await
            .unwrap();
        assert!(id > 0);
        assert_eq!(repo.count(None).await.unwrap(), 3);
        assert_eq!(repo.count(Some("mug")).await.unwrap(), 1);

        let all = repo.recent(10, None).await.unwrap();
        assert_eq!(all.len(), 3);
        // same-second inserts fall back to id ordering
        assert_eq!(all[0].product_type, "beach towel");
        assert!(!all[0].recognized);
        assert!(all[0].created_at.is_some());

        let mugs = repo.recent(10, Some("mug")).await.unwrap();
        assert_eq!(mugs.len(), 1);
        assert_eq!(mugs[0].optimal_price, "21.53");

        assert_eq!(repo.recent(1, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recent_rejects_non_positive_limit() {
        let db = Database::in_memory().await.unwrap();
        let repo = PricingHistoryRepository::new(db.pool());
        assert!(matches!(repo.recent(0, None).await, Err(DbError::Query(_))));
    }
}
