//! In-memory SQLite implementation of [`CorporationStore`]

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::CorporationStore;
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::models::Corporation;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS corporations (
           corp_code     TEXT PRIMARY KEY CHECK (length(corp_code) > 0),
           corp_name     TEXT NOT NULL CHECK (length(corp_name) > 0),
           corp_eng_name TEXT,
           stock_code    TEXT,
           modify_date   TEXT
       )"#,
    "CREATE INDEX IF NOT EXISTS idx_corporations_corp_name ON corporations (corp_name)",
    "CREATE INDEX IF NOT EXISTS idx_corporations_stock_code ON corporations (stock_code)",
];

const SELECT_COLUMNS: &str = "SELECT corp_code, corp_name, corp_eng_name, stock_code, modify_date FROM corporations";

#[derive(Clone, Debug)]
pub struct SqliteCorporationStore {
    pool: SqlitePool,
}

impl SqliteCorporationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a fresh in-memory database and create the schema.
    ///
    /// Every pooled connection sees the same database; it lives as long as
    /// the pool keeps at least one connection open.
    pub async fn connect_in_memory(config: &StoreConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    // LIKE is ASCII case-insensitive unless told otherwise
                    sqlx::query("PRAGMA case_sensitive_like = ON")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init_schema().await?;
        info!(
            max_connections = config.max_connections,
            "In-memory corporation store ready"
        );
        Ok(store)
    }

    pub async fn init_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally by
/// `LIKE ... ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        match ch {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[async_trait]
impl CorporationStore for SqliteCorporationStore {
    async fn upsert_all(&self, corporations: &[Corporation]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for corp in corporations {
            let result = sqlx::query(
                r#"INSERT INTO corporations
                       (corp_code, corp_name, corp_eng_name, stock_code, modify_date)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT (corp_code) DO UPDATE SET
                       corp_name = excluded.corp_name,
                       corp_eng_name = excluded.corp_eng_name,
                       stock_code = excluded.stock_code,
                       modify_date = excluded.modify_date"#,
            )
            .bind(&corp.corp_code)
            .bind(&corp.corp_name)
            .bind(&corp.corp_eng_name)
            .bind(&corp.stock_code)
            .bind(&corp.modify_date)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        debug!(written, "Upsert committed");
        Ok(written)
    }

    async fn search_by_name(&self, term: &str, limit: u32) -> StoreResult<Vec<Corporation>> {
        let pattern = format!("%{}%", escape_like(term));

        let rows = sqlx::query_as::<_, Corporation>(&format!(
            r#"{SELECT_COLUMNS}
               WHERE corp_name LIKE ?1 ESCAPE '\'
                  OR corp_eng_name LIKE ?1 ESCAPE '\'
               ORDER BY corp_name, corp_code
               LIMIT ?2"#
        ))
        .bind(&pattern)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_code(&self, corp_code: &str) -> StoreResult<Option<Corporation>> {
        let row =
            sqlx::query_as::<_, Corporation>(&format!("{SELECT_COLUMNS} WHERE corp_code = ?1"))
                .bind(corp_code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row)
    }

    async fn find_by_stock_code(&self, stock_code: &str) -> StoreResult<Vec<Corporation>> {
        let rows = sqlx::query_as::<_, Corporation>(&format!(
            "{SELECT_COLUMNS} WHERE stock_code = ?1 ORDER BY corp_name, corp_code"
        ))
        .bind(stock_code)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM corporations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
