//! Corporation storage
//!
//! The `CorporationStore` trait is the seam between the loader / query
//! service and the relational table. The only implementation keeps the table
//! in an in-memory SQLite database.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::Corporation;

mod sqlite;

pub use sqlite::SqliteCorporationStore;

/// Read/write access to the `corporations` table
///
/// Implementations must be Send + Sync; one handle is shared by the loader
/// and every request handler.
#[async_trait]
pub trait CorporationStore: Send + Sync {
    /// Insert or replace every row keyed by `corp_code`, all-or-nothing.
    ///
    /// Returns the number of rows written.
    async fn upsert_all(&self, corporations: &[Corporation]) -> StoreResult<u64>;

    /// Case-sensitive substring match on `corp_name` or `corp_eng_name`,
    /// ordered by `corp_name`. `term` is matched literally.
    async fn search_by_name(&self, term: &str, limit: u32) -> StoreResult<Vec<Corporation>>;

    async fn find_by_code(&self, corp_code: &str) -> StoreResult<Option<Corporation>>;

    /// Exact match; a stock code may belong to several corporations.
    async fn find_by_stock_code(&self, stock_code: &str) -> StoreResult<Vec<Corporation>>;

    async fn count(&self) -> StoreResult<i64>;
}
