//! Database schema definitions

/// SQL to create all tables
/// NOTE: All prices/amounts stored as TEXT to preserve rust_decimal::Decimal precision
pub const CREATE_TABLES: &str = r#"
-- Seller-level settings (fee defaults and other key/value preferences)
CREATE TABLE IF NOT EXISTS seller_settings (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

-- Optimizer runs, newest first in queries
CREATE TABLE IF NOT EXISTS pricing_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_type TEXT NOT NULL,
    resolved_profile TEXT NOT NULL,
    recognized INTEGER NOT NULL DEFAULT 1,
    target_profit TEXT NOT NULL,
    optimal_price TEXT NOT NULL,
    optimal_profit TEXT NOT NULL,
    optimal_margin_pct TEXT,
    candidate_price TEXT,
    candidate_in_range INTEGER,
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

-- ========== INDEXES ==========

CREATE INDEX IF NOT EXISTS idx_history_profile ON pricing_history(resolved_profile);
CREATE INDEX IF NOT EXISTS idx_history_created ON pricing_history(created_at DESC)
"#;
